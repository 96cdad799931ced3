//! Fetch, filter and publish state and federal legislation from the LegiScan API.
//!
//! A run searches every jurisdiction for matching bills, fetches each bill's
//! detail, keeps the policy-relevant ones and stores them as a single JSON
//! dataset. A separate step renders that dataset into a static HTML page.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod jurisdiction;
pub mod legiscan;
pub mod pacing;
pub mod relevance;
pub mod render;
pub mod store;
pub mod types;

pub use aggregator::{fetch_all, fetch_jurisdictions, Aggregator};
pub use config::{Config, ConfigBuilder, SiteSettings};
pub use error::{Error, Result};
pub use fetcher::{FetchStats, RegionFetcher, RegionReport};
pub use jurisdiction::Jurisdiction;
pub use legiscan::{LegiscanClient, LegislationApi, SearchYear};
pub use pacing::PacingPolicy;
pub use relevance::{FilterResult, RelevanceFilter};
pub use types::{AggregateResult, BillId, BillRecord, Sponsor};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::aggregator::{fetch_all, Aggregator};
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::jurisdiction::Jurisdiction;
    pub use crate::legiscan::{LegislationApi, SearchYear};
    pub use crate::pacing::PacingPolicy;
    pub use crate::relevance::RelevanceFilter;
    pub use crate::types::{AggregateResult, BillRecord};
}
