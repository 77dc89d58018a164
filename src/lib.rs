//! Clusters labeled card-game decks by card composition and scores how well
//! the clusters recover the labels.

/// Declare common crate modules for linking
pub mod accuracy;
pub mod centroid;
pub mod clusterer;
pub mod constants;
pub mod deck;
pub mod deck_reader;
pub mod distance;
pub mod error;
pub mod kmeans;
pub mod membership;
pub mod vocabulary;

pub use clusterer::{Clusterer, ClustererOptions, ClusteringReport};
pub use error::ClusterError;
