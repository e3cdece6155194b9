//! Domain layer for the database action impact analyzer.
//!
//! Holds everything that does not touch the network: the schema catalogs
//! given to the model as grounding, prompt construction, the analysis data
//! model, the response renderer and the per-session page state machine.

pub mod analysis;
pub mod error;
pub mod page;
pub mod prompt;
pub mod render;
pub mod schema;
