//! Turn orchestration.
//!
//! One call to [`AgentEngine::process_turn`] handles one customer
//! message end to end: intent routing, requirement extraction, the
//! needs gate, layered filtering with fallback, and prompt assembly for
//! the language model. Session state is injected by the caller; the
//! engine itself is immutable and shared across sessions.
//!
//! Error semantics at this boundary: a collaborator failure propagates
//! as a typed error and the turn leaves no trace in conversation
//! history, so an identical retry is processed fresh.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::Serialize;

use aqua_agent_catalog::{product_info_block, CatalogStore};
use aqua_agent_config::{
    education, ConversationSettings, PromptPayload, PromptTemplates, RetrievalSettings,
};
use aqua_agent_core::{AgentError, DisplaySink, GenerateRequest, LanguageModel, SimilarityRetriever};
use aqua_agent_nlu::{detect_sort_preference, keywords, IntentClassifier, SortPreference};

use crate::context::{ContextConfig, ConversationContext};
use crate::extract::RequirementExtractor;
use crate::fallback::FallbackRetriever;
use crate::filter::{filter_products, sort_products, vending_rescan};
use crate::gate;
use crate::needs::NeedsAssessment;

/// Per-conversation state, constructed once per customer and passed
/// into every turn. Sessions must not be shared across concurrent
/// conversations.
#[derive(Debug, Default)]
pub struct Session {
    pub needs: NeedsAssessment,
    pub context: ConversationContext,
}

impl Session {
    pub fn new(settings: &ConversationSettings) -> Self {
        Self {
            needs: NeedsAssessment::new(),
            context: ConversationContext::new(ContextConfig {
                history_limit: settings.history_limit,
                fingerprint_len: settings.question_fingerprint_len,
            }),
        }
    }
}

/// How a turn was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Greeting,
    Farewell,
    Clarification,
    Recommendation,
    Educational,
    NoMatch,
    Guidance,
}

impl TurnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnKind::Greeting => "greeting",
            TurnKind::Farewell => "farewell",
            TurnKind::Clarification => "clarification",
            TurnKind::Recommendation => "recommendation",
            TurnKind::Educational => "educational",
            TurnKind::NoMatch => "no_match",
            TurnKind::Guidance => "guidance",
        }
    }
}

/// Completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub kind: TurnKind,
    pub reply: String,
}

/// A product (or raw fallback document) staged for display.
struct StagedDoc {
    image_url: Option<String>,
    info: String,
}

/// The consultative engine. Immutable and cheap to share; all mutation
/// happens on the injected [`Session`].
pub struct AgentEngine {
    catalog: Arc<CatalogStore>,
    llm: Arc<dyn LanguageModel>,
    fallback: FallbackRetriever,
    classifier: IntentClassifier,
    requirements: RequirementExtractor,
    templates: PromptTemplates,
    settings: ConversationSettings,
}

impl AgentEngine {
    pub fn new(
        catalog: Arc<CatalogStore>,
        llm: Arc<dyn LanguageModel>,
        retriever: Arc<dyn SimilarityRetriever>,
        retrieval_settings: &RetrievalSettings,
        templates: PromptTemplates,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            fallback: FallbackRetriever::new(retriever, retrieval_settings),
            catalog,
            llm,
            classifier: IntentClassifier::new(),
            requirements: RequirementExtractor::new(),
            templates,
            settings,
        }
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Process one customer message. Strictly sequential per session:
    /// the caller must not start the next turn before this one resolves.
    pub async fn process_turn(
        &self,
        session: &mut Session,
        user_text: &str,
        sink: &mut dyn DisplaySink,
    ) -> Result<TurnOutcome, AgentError> {
        // Greetings and farewells never reach the model and never touch
        // the needs assessment.
        if self.classifier.is_greeting(user_text) {
            let reply = self
                .templates
                .greetings
                .choose(&mut rand::thread_rng())
                .cloned()
                .unwrap_or_default();
            sink.display_reply(&reply);
            session.context.record_turn(user_text, "[greeting]");
            return Ok(TurnOutcome {
                kind: TurnKind::Greeting,
                reply,
            });
        }

        if self.classifier.is_farewell(user_text) {
            let reply = self.templates.farewell.clone();
            sink.display_reply(&reply);
            session.context.record_turn(user_text, "[farewell]");
            return Ok(TurnOutcome {
                kind: TurnKind::Farewell,
                reply,
            });
        }

        // Every turn refines the needs assessment, whatever the intent.
        self.requirements.extract(user_text, &mut session.needs);
        let extraction = keywords::extract(user_text);
        if let Some(price) = extraction.max_price {
            session.context.set_max_price(price);
        }
        let turn_keywords = keywords::normalize(&extraction.tokens);

        let is_educational = self.classifier.is_educational(user_text);
        let mut education_info = String::new();
        if is_educational {
            let topics = education::matching_topics(user_text);
            if !topics.is_empty() {
                education_info = education::render_topics(&topics);
                for topic in &topics {
                    session.context.add_educational_topic(topic.id);
                }
            }
        }

        let is_product = self.classifier.is_product_inquiry(user_text);

        // Needs gate: for product requests without enough information,
        // ask up to two clarifying questions - but never one the
        // customer has already been asked this session.
        if is_product && !session.needs.requirements_gathered() {
            if gate::sufficient(&session.needs) {
                session.needs.mark_requirements_gathered();
            } else {
                let questions: Vec<String> =
                    gate::next_questions(&session.needs, self.settings.max_questions_per_turn)
                        .into_iter()
                        .filter(|q| !session.context.is_repeat_question(q))
                        .collect();

                if questions.is_empty() {
                    // Everything left to ask was already asked; stop
                    // interrogating and work with what we have.
                    session.needs.mark_requirements_gathered();
                } else {
                    for question in &questions {
                        session.context.record_question(question);
                    }
                    let reply = self.templates.render_needs_questions(&questions);
                    sink.display_reply(&reply);
                    session
                        .context
                        .record_turn(user_text, "[needs assessment questions]");
                    return Ok(TurnOutcome {
                        kind: TurnKind::Clarification,
                        reply,
                    });
                }
            }
        }

        let gathered = session.needs.requirements_gathered();
        let should_filter = (is_product && gathered) || (!is_educational && !is_product && gathered);

        let mut staged: Vec<StagedDoc> = Vec::new();
        if should_filter {
            let outcome = filter_products(
                &self.catalog,
                &session.needs,
                session.context.max_price(),
                &turn_keywords,
            );

            if !outcome.is_empty() {
                let mut products = outcome.products;
                let budget_active = session.needs.budget_range().is_some()
                    || session.context.max_price().is_some();
                let preference = detect_sort_preference(user_text).or(if budget_active {
                    Some(SortPreference::PriceAscending)
                } else {
                    None
                });
                if let Some(preference) = preference {
                    sort_products(&mut products, preference);
                }

                for product in products.iter().take(self.settings.product_display_limit) {
                    session.context.mark_shown(&product.name);
                    staged.push(StagedDoc {
                        image_url: product.primary_image().map(str::to_string),
                        info: product_info_block(product),
                    });
                }
            } else {
                // Dedicated rescan for water-ATM queries the normal
                // stages cannot see past.
                if turn_keywords.iter().any(|k| k == "atm") {
                    for product in vending_rescan(&self.catalog)
                        .into_iter()
                        .take(self.settings.product_display_limit)
                    {
                        session.context.mark_shown(&product.name);
                        staged.push(StagedDoc {
                            image_url: product.primary_image().map(str::to_string),
                            info: product_info_block(product),
                        });
                    }
                }

                if staged.is_empty() {
                    let hits = self.fallback.retrieve(user_text, &self.catalog).await?;
                    for hit in hits {
                        match hit.product {
                            Some(product) => {
                                session.context.mark_shown(&product.name);
                                staged.push(StagedDoc {
                                    image_url: product.primary_image().map(str::to_string),
                                    info: product_info_block(product),
                                });
                            }
                            None => staged.push(StagedDoc {
                                image_url: None,
                                info: hit.content,
                            }),
                        }
                    }
                }
            }
        }

        // Product request that came up completely dry: a normal turn,
        // not an error.
        if is_product && gathered && staged.is_empty() && education_info.is_empty() {
            let reply = self.templates.no_match.clone();
            sink.display_reply(&reply);
            session.context.record_turn(user_text, "[no matching products]");
            return Ok(TurnOutcome {
                kind: TurnKind::NoMatch,
                reply,
            });
        }

        // Nothing to recommend, nothing to teach, nothing asked for:
        // point at what the assistant can do.
        if staged.is_empty() && education_info.is_empty() && !is_product {
            let reply = self.templates.guidance.clone();
            sink.display_reply(&reply);
            session.context.record_turn(user_text, "[capability overview]");
            return Ok(TurnOutcome {
                kind: TurnKind::Guidance,
                reply,
            });
        }

        let product_info = staged
            .iter()
            .take(self.settings.prompt_product_limit)
            .map(|doc| doc.info.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let history = session
            .context
            .recent_history(self.settings.prompt_history_lines);
        let context_analysis = session.context.analyze(&session.needs);
        let payload = PromptPayload {
            history: &history,
            question: user_text,
            product_info: &product_info,
            education_info: &education_info,
            context_analysis: &context_analysis,
        };

        let request = GenerateRequest::new(
            self.templates.system_prompt.clone(),
            self.templates.render_user_prompt(&payload),
        );

        // Collaborator failures propagate from here on; note that the
        // turn is only recorded into history after a successful reply.
        let reply = self.llm.generate(&request).await?.trim().to_string();
        sink.display_reply(&reply);

        // A single staged product gets its image displayed alongside.
        if staged.len() == 1 {
            if let Some(url) = staged[0].image_url.as_deref() {
                if url.starts_with("http") {
                    sink.display_image(url);
                }
            }
        }

        session.context.record_turn(user_text, &reply);

        let kind = if !staged.is_empty() {
            TurnKind::Recommendation
        } else {
            TurnKind::Educational
        };
        tracing::debug!(kind = kind.as_str(), staged = staged.len(), "turn completed");

        Ok(TurnOutcome { kind, reply })
    }
}
