//! Model catalog: listing, ranking and auto-selection of chat models

pub mod catalog;
pub mod ranker;

pub use catalog::{ListedModel, ModelCatalog, ModelOption, DEFAULT_MODEL_OPTION, FALLBACK_MODELS};
pub use ranker::{rank, ModelDescriptor, Tier};
