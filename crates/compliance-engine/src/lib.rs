//! Deterministic, LLM-free judgment of thesis document structure.
//!
//! Pure functions of (extracted text, metadata, rule set): always available,
//! used both as the fallback when the model path fails and as a supplement
//! to it (the page-level checks run on every check regardless of path).

pub mod evaluator;
pub mod format;
pub mod pagination;
pub mod sections;

pub use evaluator::evaluate;
pub use pagination::{check_page_count, check_positions};
pub use sections::classify_sections;
