//! Model-backed judgment of thesis document structure.
//!
//! A [`StructureJudge`] drives any [`TextCompletion`] backend; the shipped
//! backend is [`GroqClient`]. Model replies are parsed leniently: valid JSON
//! when available, text heuristics otherwise.

pub mod client;
pub mod error;
pub mod judge;
pub mod parse;
pub mod prompt;

pub use client::GroqClient;
pub use error::JudgeError;
pub use judge::{StructureJudge, TextCompletion};
pub use parse::parse_judgment;
