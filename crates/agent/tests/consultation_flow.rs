//! End-to-end conversation flows against mock collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use aqua_agent_agent::{AgentEngine, Session, TurnKind};
use aqua_agent_catalog::CatalogStore;
use aqua_agent_config::{ConversationSettings, PromptTemplates, RetrievalSettings};
use aqua_agent_core::{
    DisplaySink, DocumentMetadata, GenerateRequest, LanguageModel, LlmError, Product,
    RetrievalError, RetrievedDocument, SimilarityRetriever,
};

/// Language model that records every request and answers with a fixed
/// line, so tests can inspect the exact prompt the engine built.
#[derive(Default)]
struct RecordingLlm {
    requests: Mutex<Vec<GenerateRequest>>,
}

#[async_trait]
impl LanguageModel for RecordingLlm {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        self.requests.lock().push(request.clone());
        Ok("Here are my recommendations.  ".to_string())
    }
}

struct FailingLlm;

#[async_trait]
impl LanguageModel for FailingLlm {
    async fn generate(&self, _request: &GenerateRequest) -> Result<String, LlmError> {
        Err(LlmError::Request("connection reset".into()))
    }
}

/// Retriever stub with canned documents.
#[derive(Default)]
struct StubRetriever {
    documents: Vec<RetrievedDocument>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SimilarityRetriever for StubRetriever {
    async fn search(
        &self,
        query: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        self.queries.lock().push(query.to_string());
        Ok(self.documents.clone())
    }
}

#[derive(Default)]
struct CollectSink {
    replies: Vec<String>,
    images: Vec<String>,
}

impl DisplaySink for CollectSink {
    fn display_reply(&mut self, text: &str) {
        self.replies.push(text.to_string());
    }

    fn display_image(&mut self, url: &str) {
        self.images.push(url.to_string());
    }
}

fn product(name: &str, category: &str, price: u64, short: &str, desc: &str) -> Product {
    Product {
        name: name.into(),
        category: category.into(),
        regular_price: price,
        short_description: short.into(),
        description: desc.into(),
        variant_attributes: String::new(),
        image_urls: vec![format!(
            "https://cdn.example.com/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        )],
    }
}

fn sample_catalog() -> CatalogStore {
    CatalogStore::from_products(vec![
        product(
            "Aquapure Home RO",
            "Domestic > RO Systems",
            9500,
            "12 LPH compact RO purifier",
            "Compact RO purifier for home kitchens",
        ),
        product(
            "Aquapure RO+UV Tower",
            "Domestic > RO Systems",
            13999,
            "RO UV combined purifier",
            "Dual stage purification with 15 LPH flow",
        ),
        product(
            "ClearFlow UV Guard",
            "Domestic > UV Systems",
            7999,
            "UV purifier for municipal supply",
            "Wall mounted UV purifier",
        ),
        product(
            "SoftStream Whole House Softener",
            "Domestic > Water Softeners",
            32000,
            "Ion exchange softener",
            "Removes hardness for the entire house",
        ),
        product(
            "HydroWorks Industrial RO Plant",
            "Industrial > RO Plants",
            250000,
            "500 LPH treatment plant",
            "Skid mounted industrial RO plant",
        ),
        product(
            "AquaServe Coin Vending Station",
            "Dispensing > Community",
            85000,
            "Coin operated water dispenser",
            "Community water vending station",
        ),
    ])
}

fn engine_with(
    llm: Arc<dyn LanguageModel>,
    retriever: Arc<dyn SimilarityRetriever>,
) -> AgentEngine {
    AgentEngine::new(
        Arc::new(sample_catalog()),
        llm,
        retriever,
        &RetrievalSettings::default(),
        PromptTemplates::default(),
        ConversationSettings::default(),
    )
}

fn session() -> Session {
    Session::new(&ConversationSettings::default())
}

#[tokio::test]
async fn greeting_short_circuits_the_pipeline() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm.clone(), Arc::new(StubRetriever::default()));
    let mut session = session();
    let mut sink = CollectSink::default();

    let outcome = engine
        .process_turn(&mut session, "hi", &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome.kind, TurnKind::Greeting);
    assert!(!outcome.reply.is_empty());
    // No filtering, no model call, needs untouched.
    assert!(llm.requests.lock().is_empty());
    assert!(session.needs.is_empty());
    assert!(!session.needs.requirements_gathered());
    assert_eq!(sink.replies.len(), 1);
}

#[tokio::test]
async fn family_of_four_turn_recommends_within_budget() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm.clone(), Arc::new(StubRetriever::default()));
    let mut session = session();
    let mut sink = CollectSink::default();

    let outcome = engine
        .process_turn(
            &mut session,
            "I need a water purifier for my home, family of 4, budget around 12000",
            &mut sink,
        )
        .await
        .unwrap();

    // One message was enough: 2 of 3 essential dimensions known.
    assert!(session.needs.requirements_gathered());
    assert_eq!(outcome.kind, TurnKind::Recommendation);

    let requests = llm.requests.lock();
    let prompt = &requests[0].prompt;

    // Both in-band products appear, cheaper one first (ascending price
    // is the default sort once a budget is active).
    let home = prompt.find("Aquapure Home RO").expect("home RO in prompt");
    let tower = prompt
        .find("Aquapure RO+UV Tower")
        .expect("tower in prompt");
    assert!(home < tower);

    // Rows outside the derived budget band never show up.
    assert!(!prompt.contains("SoftStream"));
    assert!(!prompt.contains("HydroWorks"));
    assert!(!prompt.contains("ClearFlow UV Guard"));
}

#[tokio::test]
async fn clarifying_questions_are_not_repeated() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm.clone(), Arc::new(StubRetriever::default()));
    let mut session = session();

    let mut sink = CollectSink::default();
    let first = engine
        .process_turn(&mut session, "recommend me some products", &mut sink)
        .await
        .unwrap();
    assert_eq!(first.kind, TurnKind::Clarification);
    assert!(first.reply.contains("Where will you be using"));

    // The same vague request again: the same questions are suppressed by
    // their fingerprints, the gate gives up interrogating and proceeds.
    let mut sink = CollectSink::default();
    let second = engine
        .process_turn(&mut session, "recommend me some products", &mut sink)
        .await
        .unwrap();
    assert_ne!(second.kind, TurnKind::Clarification);
    assert!(!second.reply.contains("Where will you be using"));
    assert!(session.needs.requirements_gathered());
}

#[tokio::test]
async fn vending_query_triggers_dedicated_rescan() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm.clone(), Arc::new(StubRetriever::default()));

    // Session past the gate with nothing on file that any stage could
    // match: the layered filter commits nothing for this query.
    let mut session = session();
    session.needs.mark_requirements_gathered();

    let mut sink = CollectSink::default();
    let outcome = engine
        .process_turn(&mut session, "do you have vending machines for sale", &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome.kind, TurnKind::Recommendation);
    let requests = llm.requests.lock();
    assert!(requests[0].prompt.contains("AquaServe Coin Vending Station"));
}

#[tokio::test]
async fn fallback_hits_are_validated_against_the_catalog() {
    let llm = Arc::new(RecordingLlm::default());
    let retriever = Arc::new(StubRetriever {
        documents: vec![
            RetrievedDocument {
                content: "fabricated product".into(),
                metadata: DocumentMetadata {
                    name: Some("Imaginary Purifier 3000".into()),
                    ..Default::default()
                },
            },
            RetrievedDocument {
                content: "softener doc".into(),
                metadata: DocumentMetadata {
                    name: Some("SoftStream Whole House Softener".into()),
                    ..Default::default()
                },
            },
        ],
        queries: Mutex::new(Vec::new()),
    });
    let engine = engine_with(llm.clone(), retriever.clone());

    let mut session = session();
    session.needs.mark_requirements_gathered();

    let mut sink = CollectSink::default();
    let outcome = engine
        .process_turn(&mut session, "i want the himalayan glacier edition", &mut sink)
        .await
        .unwrap();

    // The retriever was consulted, the fabricated name was dropped, the
    // real catalog row survived into the prompt.
    assert_eq!(retriever.queries.lock().len(), 1);
    assert_eq!(outcome.kind, TurnKind::Recommendation);
    let requests = llm.requests.lock();
    assert!(requests[0].prompt.contains("SoftStream Whole House Softener"));
    assert!(!requests[0].prompt.contains("Imaginary Purifier 3000"));
}

#[tokio::test]
async fn dry_fallback_reports_no_match() {
    let llm = Arc::new(RecordingLlm::default());
    let retriever = Arc::new(StubRetriever {
        documents: vec![RetrievedDocument {
            content: "fabricated".into(),
            metadata: DocumentMetadata {
                name: Some("Imaginary Purifier 3000".into()),
                ..Default::default()
            },
        }],
        queries: Mutex::new(Vec::new()),
    });
    let engine = engine_with(llm.clone(), retriever);

    let mut session = session();
    session.needs.mark_requirements_gathered();

    let mut sink = CollectSink::default();
    let outcome = engine
        .process_turn(&mut session, "i want the himalayan glacier edition", &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome.kind, TurnKind::NoMatch);
    // The model is never consulted for a dry turn.
    assert!(llm.requests.lock().is_empty());
}

#[tokio::test]
async fn collaborator_failure_leaves_history_untouched() {
    let engine = engine_with(Arc::new(FailingLlm), Arc::new(StubRetriever::default()));
    let mut session = session();
    let mut sink = CollectSink::default();

    let result = engine
        .process_turn(
            &mut session,
            "I need a purifier for my home, family of 4, high tds borewell water",
            &mut sink,
        )
        .await;

    let err = result.unwrap_err();
    assert!(err.is_collaborator_failure());
    // The failed turn is forgotten: an identical retry starts fresh.
    assert_eq!(session.context.history_len(), 0);
    // Requirements learned before the failure are intentionally kept.
    assert!(!session.needs.is_empty());
}

#[tokio::test]
async fn single_product_match_displays_its_image() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm, Arc::new(StubRetriever::default()));

    let mut session = session();
    let mut sink = CollectSink::default();

    // Hardness concern maps to the lone softener in the catalog.
    let outcome = engine
        .process_turn(
            &mut session,
            "I need a softener for my home, we have very hard water and soap won't lather",
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(outcome.kind, TurnKind::Recommendation);
    assert_eq!(sink.images.len(), 1);
    assert!(sink.images[0].starts_with("https://cdn.example.com/"));
}

#[tokio::test]
async fn educational_question_is_answered_without_products() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm.clone(), Arc::new(StubRetriever::default()));

    let mut session = session();
    let mut sink = CollectSink::default();

    let outcome = engine
        .process_turn(
            &mut session,
            "can you explain what TDS means for drinking water",
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(outcome.kind, TurnKind::Educational);
    let requests = llm.requests.lock();
    assert!(requests[0].prompt.contains("Total Dissolved Solids"));
    assert!(session.context.educational_topics().contains("tds_information"));
}

#[tokio::test]
async fn trimmed_reply_is_what_gets_displayed_and_recorded() {
    let llm = Arc::new(RecordingLlm::default());
    let engine = engine_with(llm, Arc::new(StubRetriever::default()));

    let mut session = session();
    let mut sink = CollectSink::default();

    let outcome = engine
        .process_turn(
            &mut session,
            "can you explain what TDS means for drinking water",
            &mut sink,
        )
        .await
        .unwrap();

    // The stub answers with trailing whitespace; the engine trims it.
    assert_eq!(outcome.reply, "Here are my recommendations.");
    assert_eq!(sink.replies[0], "Here are my recommendations.");
    assert_eq!(session.context.history_len(), 2);
}
