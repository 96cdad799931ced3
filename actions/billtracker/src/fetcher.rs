use tracing::{debug, info, warn};

use crate::jurisdiction::Jurisdiction;
use crate::legiscan::{BillDetail, LegislationApi, RawSearchHit, SearchEntry, SearchYear};
use crate::pacing::PacingPolicy;
use crate::relevance::{FilterResult, RelevanceFilter};
use crate::types::{truncate_description, truncate_sponsors, BillRecord, Sponsor};

/// Per-jurisdiction counters, logged after each fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub hits: usize,
    pub kept: usize,
    pub filtered: usize,
    pub failed: usize,
    pub search_failed: bool,
}

/// Relevant bills of one jurisdiction, in search-result order
#[derive(Debug, Clone)]
pub struct RegionReport {
    pub jurisdiction: Jurisdiction,
    pub bills: Vec<BillRecord>,
    pub stats: FetchStats,
}

/// Fetches and normalizes the bills of a single jurisdiction
pub struct RegionFetcher<'a, A> {
    api: &'a A,
    filter: &'a RelevanceFilter,
    pacing: PacingPolicy,
    query: &'a str,
    year: SearchYear,
}

impl<'a, A: LegislationApi> RegionFetcher<'a, A> {
    pub fn new(
        api: &'a A,
        filter: &'a RelevanceFilter,
        pacing: PacingPolicy,
        query: &'a str,
        year: SearchYear,
    ) -> Self {
        Self {
            api,
            filter,
            pacing,
            query,
            year,
        }
    }

    /// Search one jurisdiction and collect its relevant bills.
    ///
    /// Never fails: a failed search yields an empty report, a failed detail
    /// request skips that bill.
    pub async fn fetch(&self, jurisdiction: &Jurisdiction) -> RegionReport {
        let mut report = RegionReport {
            jurisdiction: *jurisdiction,
            bills: Vec::new(),
            stats: FetchStats::default(),
        };

        let results = match self
            .api
            .search(jurisdiction.code, self.query, self.year)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(state = jurisdiction.code, error = %e, "Search failed, skipping jurisdiction");
                report.stats.search_failed = true;
                return report;
            }
        };

        for entry in &results.entries {
            let hit = match entry {
                SearchEntry::Hit(hit) => hit,
                SearchEntry::Summary(_) => continue,
                SearchEntry::Invalid { key, reason } => {
                    warn!(state = jurisdiction.code, key = %key, reason = %reason, "Malformed search hit, skipping");
                    report.stats.hits += 1;
                    report.stats.failed += 1;
                    continue;
                }
            };
            report.stats.hits += 1;

            let outcome = self.api.bill(hit.bill_id).await;
            self.pacing.after_detail().await;

            let detail = match outcome {
                Ok(detail) => detail,
                Err(e) => {
                    warn!(
                        state = jurisdiction.code,
                        bill_id = %hit.bill_id,
                        error = %e,
                        "Failed to fetch bill detail, skipping"
                    );
                    report.stats.failed += 1;
                    continue;
                }
            };

            match self.filter.check(&detail.title, &detail.description) {
                FilterResult::Keep => {
                    report.bills.push(normalize(detail, hit, jurisdiction));
                    report.stats.kept += 1;
                }
                FilterResult::FilterOut => {
                    debug!(
                        state = jurisdiction.code,
                        bill_number = %detail.bill_number,
                        "Not policy-relevant, filtered out"
                    );
                    report.stats.filtered += 1;
                }
            }
        }

        info!(
            state = jurisdiction.code,
            hits = report.stats.hits,
            kept = report.stats.kept,
            filtered = report.stats.filtered,
            failed = report.stats.failed,
            "{}: kept {} of {} bills",
            jurisdiction.name,
            report.stats.kept,
            report.stats.hits
        );

        report
    }
}

/// Map a detail payload onto a bill record, using the search hit for missing fields
pub fn normalize(detail: BillDetail, hit: &RawSearchHit, jurisdiction: &Jurisdiction) -> BillRecord {
    let status = detail.status_text();

    let sponsors = truncate_sponsors(
        detail
            .sponsors
            .into_iter()
            .map(|s| Sponsor {
                name: s.name,
                party: s.party,
                role: s.role,
            })
            .collect(),
    );

    BillRecord {
        id: detail.bill_id,
        state_code: jurisdiction.code.to_string(),
        state_name: jurisdiction.name.to_string(),
        bill_number: non_empty(detail.bill_number, &hit.bill_number),
        title: non_empty(detail.title, &hit.title),
        description: truncate_description(&detail.description),
        status,
        status_date: detail.status_date,
        url: non_empty(detail.url, &hit.url),
        last_action: non_empty(detail.last_action, &hit.last_action),
        last_action_date: detail.last_action_date.or(hit.last_action_date),
        sponsors,
        analysis_url: None,
    }
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
