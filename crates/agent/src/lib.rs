//! Conversational engine.
//!
//! The consultative pipeline for one customer session: extract
//! requirements from free text into a needs assessment, gate on whether
//! enough is known to recommend, filter the catalog through layered
//! predicates with empty-result rollback, fall back to similarity
//! retrieval when rules find nothing, and assemble the prompt handed to
//! the language model. Session state is owned by the caller and passed
//! in by reference; nothing here is global.

pub mod context;
pub mod engine;
pub mod extract;
pub mod fallback;
pub mod filter;
pub mod gate;
pub mod needs;

pub use context::ConversationContext;
pub use engine::{AgentEngine, Session, TurnKind, TurnOutcome};
pub use extract::RequirementExtractor;
pub use fallback::{FallbackHit, FallbackRetriever};
pub use filter::{filter_products, sort_products, vending_rescan, FilterOutcome};
pub use needs::{BudgetRange, CapacityNeed, Concern, NeedsAssessment, UsageType, WaterSource};
