//! Prompt templates and canned responses.
//!
//! The system prompt pins the model to the provided product data: no
//! invented specifications, no guessed prices, no repeated questions.
//! Canned responses cover the turns that never reach the model at all
//! (greetings, farewells, clarifying questions, misses).

use serde::{Deserialize, Serialize};

/// Named sections handed to the language model for one turn.
#[derive(Debug, Clone, Default)]
pub struct PromptPayload<'a> {
    /// Recent conversation lines, oldest first.
    pub history: &'a str,
    /// The customer's current message, verbatim.
    pub question: &'a str,
    /// Pre-filtered product info blocks; possibly empty.
    pub product_info: &'a str,
    /// Matched education content; possibly empty.
    pub education_info: &'a str,
    /// One-line summary of the session state.
    pub context_analysis: &'a str,
}

/// All template text used by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// System prompt for the language model.
    pub system_prompt: String,
    /// Greeting replies; one is chosen per greeting turn.
    pub greetings: Vec<String>,
    /// Farewell reply.
    pub farewell: String,
    /// Line introducing a block of clarifying questions.
    pub needs_intro: String,
    /// Line closing a block of clarifying questions.
    pub needs_outro: String,
    /// Reply when neither filtering nor fallback found products.
    pub no_match: String,
    /// Capability overview for turns with nothing to act on.
    pub guidance: String,
    /// Generic apology shown when a collaborator fails.
    pub apology: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
            greetings: vec![
                GREETING_CONSULTANT.to_string(),
                GREETING_MATCHING.to_string(),
                GREETING_SPECIALIST.to_string(),
            ],
            farewell: FAREWELL.to_string(),
            needs_intro: "To recommend the right water treatment system, I'd like to \
                          understand your needs a little better:"
                .to_string(),
            needs_outro: "This helps me suggest the most suitable and cost-effective \
                          solution for your specific requirements."
                .to_string(),
            no_match: "I couldn't find products matching your requirements. Could you \
                       share a few more details about what you're looking for? I can \
                       help you find the right water treatment solution."
                .to_string(),
            guidance: GUIDANCE.to_string(),
            apology: "Sorry, something went wrong on my side while preparing a reply. \
                      Please try asking again in a moment."
                .to_string(),
        }
    }
}

impl PromptTemplates {
    /// Render the user-facing prompt body from the payload sections.
    pub fn render_user_prompt(&self, payload: &PromptPayload<'_>) -> String {
        format!(
            "Recommended products (pre-filtered for the customer's needs):\n{info}\n\n\
             Water education content:\n{education}\n\n\
             Customer question:\n{question}\n\n\
             Previous conversation:\n{history}\n\n\
             Context analysis:\n{context}",
            info = section_or_none(payload.product_info),
            education = section_or_none(payload.education_info),
            question = payload.question,
            history = section_or_none(payload.history),
            context = section_or_none(payload.context_analysis),
        )
    }

    /// Render a clarifying-question block.
    pub fn render_needs_questions(&self, questions: &[String]) -> String {
        let mut out = String::new();
        out.push_str(&self.needs_intro);
        for question in questions {
            out.push_str("\n\n");
            out.push_str(question);
        }
        out.push_str("\n\n");
        out.push_str(&self.needs_outro);
        out
    }
}

fn section_or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "(none)"
    } else {
        text
    }
}

const SYSTEM_PROMPT: &str = "\
You are a knowledgeable water treatment systems consultant. You follow a \
consultative approach: understand customer needs before recommending products.

Critical constraints:
1. Use ONLY information from the provided product data. Never add external \
knowledge or specifications.
2. If a price is not available in the data, state \"Price on request\". Do not \
estimate or guess.
3. Mention only features and specifications explicitly stated in the product \
descriptions.
4. Do not invent technical details, installation requirements, or warranty \
information.
5. Never ask questions the customer has already answered; the context analysis \
lists what is already known.
6. Products shown to you are already filtered for the customer's requirements. \
When recommending, explain why each product suits the stated needs using only \
its listed features.
7. Answer educational questions using only the provided education content. If a \
topic is not covered there, say the information is not available.
8. Greetings and goodbyes are handled separately; do not produce them.
9. If information is missing from the data, say it is not available in the \
current product data.

Be helpful and professional while staying within these constraints.";

const GREETING_CONSULTANT: &str = "\
Hello, great to meet you! I'm your water treatment consultant. I can help with \
product recommendations for home, office, or industrial use, water science \
questions (alkaline water, TDS, pH), and comparisons between RO, UV, and UF \
technologies. What would you like to know about water treatment today?";

const GREETING_MATCHING: &str = "\
Hi, welcome! I help match water treatment systems to your exact needs - tell me \
a little about your situation and I'll suggest suitable options. I can also \
explain water quality topics like hardness, TDS, and purification technologies \
in plain terms. How can I assist you?";

const GREETING_SPECIALIST: &str = "\
Hello! As your water treatment specialist I can help you pick the right system, \
understand specifications and features, and learn how water quality affects \
health. What brings you here today?";

const FAREWELL: &str = "\
Thank you for using our water treatment assistant. I hope I was able to help \
with your water treatment needs. If you have more questions about products or \
water quality, feel free to ask anytime. Have a great day and stay hydrated!";

const GUIDANCE: &str = "\
I'm here to help with water treatment systems and water quality questions. You \
can ask me about:

- Product recommendations (just tell me your needs first)
- Water science: alkaline water, TDS, pH levels
- Technology comparisons: RO vs UV vs UF
- Water quality issues and their solutions

What would you like to know?";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_user_prompt_fills_sections() {
        let templates = PromptTemplates::default();
        let payload = PromptPayload {
            history: "User: hi\nBot: hello",
            question: "show me RO systems",
            product_info: "PRODUCT: Aquapure Home RO",
            education_info: "",
            context_analysis: "Requirements being assessed",
        };

        let prompt = templates.render_user_prompt(&payload);
        assert!(prompt.contains("PRODUCT: Aquapure Home RO"));
        assert!(prompt.contains("show me RO systems"));
        assert!(prompt.contains("Requirements being assessed"));
        // Empty sections render as an explicit marker, not a blank hole.
        assert!(prompt.contains("Water education content:\n(none)"));
    }

    #[test]
    fn test_render_needs_questions() {
        let templates = PromptTemplates::default();
        let questions = vec![
            "Where will you be using the system?".to_string(),
            "What is your water source?".to_string(),
        ];

        let block = templates.render_needs_questions(&questions);
        assert!(block.starts_with(&templates.needs_intro));
        assert!(block.contains("Where will you be using the system?"));
        assert!(block.contains("What is your water source?"));
        assert!(block.ends_with(&templates.needs_outro));
    }

    #[test]
    fn test_greeting_variants_present() {
        let templates = PromptTemplates::default();
        assert_eq!(templates.greetings.len(), 3);
        assert!(templates.greetings.iter().all(|g| !g.is_empty()));
    }
}
