#![allow(dead_code)]

use async_trait::async_trait;
use billtracker::legiscan::{BillDetail, RawSearchHit, SearchEntry, SearchResult, SearchSummary};
use billtracker::prelude::*;
use billtracker::types::{BillId, Sponsor};
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory LegiScan stand-in
#[derive(Default)]
pub struct FakeApi {
    searches: HashMap<String, std::result::Result<Vec<RawSearchHit>, u16>>,
    bills: HashMap<BillId, BillDetail>,
    pub detail_calls: Mutex<Vec<BillId>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register search hits for a state, in result order
    pub fn with_search(mut self, state: &str, hits: Vec<RawSearchHit>) -> Self {
        self.searches.insert(state.to_string(), Ok(hits));
        self
    }

    /// Make the search for a state fail with an HTTP status
    pub fn with_failed_search(mut self, state: &str, status: u16) -> Self {
        self.searches.insert(state.to_string(), Err(status));
        self
    }

    pub fn with_bill(mut self, detail: BillDetail) -> Self {
        self.bills.insert(detail.bill_id, detail);
        self
    }

    pub fn detail_calls(&self) -> Vec<BillId> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LegislationApi for FakeApi {
    async fn search(&self, state: &str, _query: &str, _year: SearchYear) -> Result<SearchResult> {
        match self.searches.get(state) {
            Some(Ok(hits)) => {
                let mut entries = vec![SearchEntry::Summary(SearchSummary {
                    count: hits.len() as u64,
                    ..Default::default()
                })];
                entries.extend(hits.iter().cloned().map(SearchEntry::Hit));
                Ok(SearchResult { entries })
            }
            Some(Err(status)) => Err(Error::HttpStatus(*status)),
            None => Ok(SearchResult::default()),
        }
    }

    async fn bill(&self, bill_id: BillId) -> Result<BillDetail> {
        self.detail_calls.lock().unwrap().push(bill_id);
        self.bills
            .get(&bill_id)
            .cloned()
            .ok_or_else(|| Error::Api("Unknown bill id".to_string()))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hit(id: u64, state: &str, number: &str) -> RawSearchHit {
    RawSearchHit {
        bill_id: BillId(id),
        bill_number: number.to_string(),
        title: String::new(),
        state: state.to_string(),
        url: format!("https://legiscan.com/{}/bill/{}", state, number),
        last_action: String::new(),
        last_action_date: None,
    }
}

pub fn detail(id: u64, number: &str, title: &str, last_action_date: Option<NaiveDate>) -> BillDetail {
    serde_json::from_value(serde_json::json!({
        "bill_id": id,
        "bill_number": number,
        "title": title,
        "description": format!("An act relating to {}", title.to_lowercase()),
        "status": 1,
        "status_desc": "Introduced",
        "last_action": "Referred to committee",
        "last_action_date": last_action_date.map(|d| d.to_string()),
        "url": format!("https://legiscan.com/bill/{}", id),
        "sponsors": [{"name": "Sen. Example", "party": "D", "role": "Sen"}]
    }))
    .unwrap()
}

/// Configuration with no pauses, suitable for tests
pub fn test_config() -> Config {
    ConfigBuilder::new()
        .pacing(PacingPolicy::none())
        .build()
        .unwrap()
}

pub fn record(id: u64, state_code: &str, state_name: &str, status: &str) -> BillRecord {
    BillRecord {
        id: BillId(id),
        state_code: state_code.to_string(),
        state_name: state_name.to_string(),
        bill_number: format!("HB {}", id),
        title: format!("Cannabis bill {}", id),
        description: "Regulates adult-use cannabis sales".to_string(),
        status: status.to_string(),
        status_date: None,
        url: format!("https://legiscan.com/bill/{}", id),
        last_action: "Referred to committee".to_string(),
        last_action_date: Some(date(2024, 3, id as u32 % 28 + 1)),
        sponsors: vec![Sponsor {
            name: "Rep. Example".to_string(),
            party: "R".to_string(),
            role: "Rep".to_string(),
        }],
        analysis_url: None,
    }
}

pub fn fixed_timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
}
