//! Language-model collaborator client.

mod groq;

pub use groq::GroqClient;
