//! Scholarship candidate retrieval over Qdrant.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{CandidateStore, ScholarshipStore};
pub use error::StoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCandidateStore, RecordedQuery};
pub use model::{CandidateRow, EligibilityFilter};

/// Default collection name holding scholarship embeddings.
pub const DEFAULT_COLLECTION_NAME: &str = "scholarships";
