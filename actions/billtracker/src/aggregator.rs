use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{FetchStats, RegionFetcher};
use crate::jurisdiction::Jurisdiction;
use crate::legiscan::{LegiscanClient, LegislationApi, SearchYear};
use crate::pacing::PacingPolicy;
use crate::relevance::RelevanceFilter;
use crate::types::AggregateResult;

/// Runs the region fetcher over a list of jurisdictions, one at a time
pub struct Aggregator<A> {
    api: A,
    filter: RelevanceFilter,
    pacing: PacingPolicy,
    query: String,
    year: SearchYear,
}

impl<A: LegislationApi> Aggregator<A> {
    pub fn new(api: A, filter: RelevanceFilter, config: &Config) -> Self {
        Self {
            api,
            filter,
            pacing: config.pacing,
            query: config.search_query.clone(),
            year: config.search_year,
        }
    }

    /// Fetch every jurisdiction and assemble the sorted dataset.
    ///
    /// Bills are not de-duplicated: an identifier returned under two
    /// jurisdictions appears twice.
    pub async fn run(&self, jurisdictions: &[Jurisdiction]) -> AggregateResult {
        let fetcher = RegionFetcher::new(&self.api, &self.filter, self.pacing, &self.query, self.year);

        let mut bills = Vec::new();
        let mut totals = FetchStats::default();
        let mut failed_searches = Vec::new();

        for (idx, jurisdiction) in jurisdictions.iter().enumerate() {
            let report = fetcher.fetch(jurisdiction).await;

            totals.hits += report.stats.hits;
            totals.kept += report.stats.kept;
            totals.filtered += report.stats.filtered;
            totals.failed += report.stats.failed;
            if report.stats.search_failed {
                failed_searches.push(jurisdiction.code);
            }
            bills.extend(report.bills);

            if idx + 1 < jurisdictions.len() {
                self.pacing.after_jurisdiction().await;
            }
        }

        if !failed_searches.is_empty() {
            warn!(
                jurisdictions = ?failed_searches,
                "{} jurisdiction searches failed",
                failed_searches.len()
            );
        }

        let result = AggregateResult::new(bills, Utc::now());

        info!(
            hits = totals.hits,
            kept = totals.kept,
            filtered = totals.filtered,
            failed = totals.failed,
            "Collected {} bills across {} jurisdictions ({} federal)",
            result.total_bills,
            result.total_states,
            result.federal_bills
        );

        result
    }
}

/// Fetch the full dataset from LegiScan: federal plus all fifty states
pub async fn fetch_all(config: &Config) -> Result<AggregateResult> {
    fetch_jurisdictions(config, Jurisdiction::all()).await
}

/// Fetch the given jurisdictions from LegiScan.
///
/// Fails before any network access when no API key is configured; every
/// other failure is absorbed per jurisdiction or per bill.
pub async fn fetch_jurisdictions(
    config: &Config,
    jurisdictions: &[Jurisdiction],
) -> Result<AggregateResult> {
    let api_key = config.require_api_key()?;
    let filter = config.relevance_filter()?;
    let client = LegiscanClient::new(&config.api_base, api_key, config.request_timeout)?;

    info!(
        query = %config.search_query,
        year = config.search_year.as_param(),
        "Fetching legislation for {} jurisdictions",
        jurisdictions.len()
    );

    let aggregator = Aggregator::new(client, filter, config);
    Ok(aggregator.run(jurisdictions).await)
}
