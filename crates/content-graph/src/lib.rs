//! # Content Graph
//!
//! Neo4j persistence for content documents.
//!
//! Projects content onto `(:Thing:Content)` nodes, keeps their
//! `IS_CURATED_FOR` and `CONTAINS` relationships in step with each write,
//! and reads them back.

pub mod client;
pub mod queries;
pub mod schema;
pub mod service;
pub mod store;

pub use client::{GraphClient, GraphConfig};
pub use schema::{Constraint, CONTENT_CONSTRAINTS};
pub use service::ContentService;
pub use store::{GraphStore, Param, Statement, WriteSummary};
