pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::{CensysClient, CensysConfig, DEFAULT_CERTIFICATE_PAGES};
pub use error::SearchError;
pub use query::{certificate_query, host_query};
pub use types::first_present;
