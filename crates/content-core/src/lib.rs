//! Content Core Library
//!
//! Domain model and projection rules for writing content documents
//! into a graph store.

pub mod content;
pub mod error;
pub mod policy;
pub mod service;

pub use content::model::ContentDocument;
pub use error::{ContentError, ContentResult, StoreError};
pub use policy::{PolicyAgent, PolicyError};
pub use service::ContentRw;
