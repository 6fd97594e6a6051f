//! # ms-core
//!
//! Core types and error types for mailsort.
//!
//! This crate provides the foundational types shared across all mailsort crates:
//! - Email and conversation entities produced by ingestion
//! - The per-run [`ClusterResult`](cluster::ClusterResult) with its outlier sentinel
//! - The closed set of intent categories and [`IntentResult`](intent::IntentResult)
//! - The Taxonomy Assigner, which fuses cluster membership with intent
//! - The serialized report shape
//! - Dense vector helpers (cosine, normalization, centroids)
//! - Cross-cutting error types

pub mod cluster;
pub mod entities;
pub mod errors;
pub mod intent;
pub mod report;
pub mod taxonomy;
pub mod vector;

pub use cluster::{ClusterId, ClusterResult, OUTLIER, OUTLIER_LABEL};
pub use errors::CoreError;
pub use intent::{IntentLabel, IntentResult};
pub use taxonomy::{TaxonomyLabel, assign_taxonomy};
