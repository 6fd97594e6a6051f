//! # ms-cluster
//!
//! Clustering engine for mailsort conversations.
//!
//! - [`cluster_embeddings`]: HDBSCAN leaf clusters (level2) named by TF-IDF
//!   keywords, grouped into Ward meta-clusters (level1)
//! - [`KeywordExtractor`]: discriminative terms of a group of texts
//! - [`average_intra_cluster_similarity`] and [`dunn_index`]: quality
//!   metrics reported with each run

mod engine;
pub mod error;
pub mod hdbscan;
pub mod keywords;
pub mod quality;
mod stopwords;
pub mod ward;

pub use engine::cluster_embeddings;
pub use error::ClusterError;
pub use keywords::KeywordExtractor;
pub use quality::{average_intra_cluster_similarity, dunn_index};
