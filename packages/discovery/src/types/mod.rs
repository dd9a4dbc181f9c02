//! Core data types for the discovery pipeline.

pub mod domain;
pub mod result;
pub mod session;

pub use domain::{DomainRecord, DomainStatus, Registration};
pub use result::{extract_domain, RawSearchResult, ScoredResult};
pub use session::{
    DiscoverySession, SearchExecutionResult, SessionStatistics, SessionStatus,
};
