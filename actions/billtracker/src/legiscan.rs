//! Client for the LegiScan pull API.
//!
//! Both operations used here (`getSearch` and `getBill`) answer with the same
//! envelope: a top-level `status` of `"OK"` plus a payload object, or any
//! other status with an `alert.message`. Search payloads are keyed by result
//! index and always contain one extra `summary` key; it is decoded into its
//! own [`SearchEntry`] variant so callers never compare key names.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::BillId;

/// Default endpoint of the LegiScan pull API
pub const DEFAULT_API_BASE: &str = "https://api.legiscan.com/";

/// Time window accepted by the `year` parameter of `getSearch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchYear {
    All,
    Current,
    Recent,
    Prior,
    Exact(u32),
}

impl SearchYear {
    /// Map a configured value onto the nearest window the API supports
    pub fn nearest(value: u32) -> Self {
        match value {
            0 | 1 => SearchYear::All,
            2 => SearchYear::Current,
            3 => SearchYear::Recent,
            4..=1899 => SearchYear::Prior,
            year => SearchYear::Exact(year),
        }
    }

    /// True when `value` is accepted by the API without adjustment
    pub fn is_supported(value: u32) -> bool {
        matches!(value, 1..=4) || value >= 1900
    }

    pub fn as_param(&self) -> u32 {
        match self {
            SearchYear::All => 1,
            SearchYear::Current => 2,
            SearchYear::Recent => 3,
            SearchYear::Prior => 4,
            SearchYear::Exact(year) => *year,
        }
    }
}

impl Default for SearchYear {
    fn default() -> Self {
        SearchYear::Current
    }
}

/// Pagination block LegiScan adds to every search result
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub page: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub range: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub relevancy: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub page_current: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub page_total: u64,
}

/// One search hit; only used to reach the detail record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSearchHit {
    pub bill_id: BillId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bill_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_action: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_action_date: Option<NaiveDate>,
}

/// An entry of the `searchresult` object
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEntry {
    Summary(SearchSummary),
    Hit(RawSearchHit),
    /// A hit that could not be decoded; its siblings are unaffected
    Invalid { key: String, reason: String },
}

/// Decoded `searchresult` object, entries in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub entries: Vec<SearchEntry>,
}

impl SearchResult {
    pub fn hits(&self) -> impl Iterator<Item = &RawSearchHit> {
        self.entries.iter().filter_map(|entry| match entry {
            SearchEntry::Hit(hit) => Some(hit),
            _ => None,
        })
    }

    pub fn summary(&self) -> Option<&SearchSummary> {
        self.entries.iter().find_map(|entry| match entry {
            SearchEntry::Summary(summary) => Some(summary),
            _ => None,
        })
    }
}

impl<'de> Deserialize<'de> for SearchResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SearchResultVisitor;

        impl<'de> Visitor<'de> for SearchResultVisitor {
            type Value = SearchResult;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a LegiScan searchresult object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<SearchResult, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    let value: Value = map.next_value()?;
                    if key == "summary" {
                        // pagination info only; a malformed block is dropped
                        match SearchSummary::deserialize(value) {
                            Ok(summary) => entries.push(SearchEntry::Summary(summary)),
                            Err(e) => debug!(error = %e, "Ignoring malformed search summary"),
                        }
                        continue;
                    }
                    let entry = match RawSearchHit::deserialize(value) {
                        Ok(hit) => SearchEntry::Hit(hit),
                        Err(e) => SearchEntry::Invalid {
                            key,
                            reason: e.to_string(),
                        },
                    };
                    entries.push(entry);
                }
                Ok(SearchResult { entries })
            }
        }

        deserializer.deserialize_map(SearchResultVisitor)
    }
}

/// Sponsor as returned inside a bill detail
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSponsor {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub party: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
}

/// Full bill record from `getBill`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BillDetail {
    pub bill_id: BillId,
    #[serde(default)]
    pub bill_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default)]
    pub state: String,
    /// Numeric progress code
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_desc: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub status_date: Option<NaiveDate>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub state_link: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_action: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_action_date: Option<NaiveDate>,
    #[serde(default)]
    pub sponsors: Vec<RawSponsor>,
}

impl BillDetail {
    /// Human-readable status, falling back to the numeric progress code
    pub fn status_text(&self) -> String {
        if !self.status_desc.trim().is_empty() {
            return self.status_desc.trim().to_string();
        }
        match self.status {
            Some(1) => "Introduced",
            Some(2) => "Engrossed",
            Some(3) => "Enrolled",
            Some(4) => "Passed",
            Some(5) => "Vetoed",
            Some(6) => "Failed",
            _ => "Unknown",
        }
        .to_string()
    }
}

/// Error block of a non-OK envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAlert {
    #[serde(default)]
    pub message: String,
}

/// Response envelope shared by all operations.
///
/// The payload sits under an operation-specific key (`searchresult` for
/// `getSearch`, `bill` for `getBill`); both decode into `payload`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub alert: Option<ApiAlert>,
    #[serde(alias = "searchresult", alias = "bill")]
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    /// The decoded payload, or the API's own error message on a non-OK status
    pub fn into_payload(self) -> Result<T> {
        if self.status != "OK" {
            let message = self
                .alert
                .map(|a| a.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("status {}", self.status));
            return Err(Error::Api(message));
        }

        self.payload
            .ok_or_else(|| Error::Api("response has no payload".to_string()))
    }
}

/// Decode a response body into the envelope of payload `T`
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    Ok(serde_json::from_str(body)?)
}

/// Operations the fetch pipeline needs from a legislative data source
#[async_trait]
pub trait LegislationApi {
    /// Full-text search scoped to one jurisdiction
    async fn search(&self, state: &str, query: &str, year: SearchYear) -> Result<SearchResult>;

    /// Detail record for one bill
    async fn bill(&self, bill_id: BillId) -> Result<BillDetail>;
}

/// HTTP client for the LegiScan API
#[derive(Debug, Clone)]
pub struct LegiscanClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LegiscanClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        op: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>> {
        debug!(op, ?params, "LegiScan request");

        let mut query: Vec<(&str, String)> =
            vec![("key", self.api_key.clone()), ("op", op.to_string())];
        query.extend(params.iter().cloned());

        let response = self.client.get(&self.base_url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        parse_envelope(&body)
    }
}

#[async_trait]
impl LegislationApi for LegiscanClient {
    async fn search(&self, state: &str, query: &str, year: SearchYear) -> Result<SearchResult> {
        let envelope: Envelope<SearchResult> = self
            .request(
                "getSearch",
                &[
                    ("state", state.to_string()),
                    ("query", query.to_string()),
                    ("year", year.as_param().to_string()),
                ],
            )
            .await?;
        envelope.into_payload()
    }

    async fn bill(&self, bill_id: BillId) -> Result<BillDetail> {
        let envelope: Envelope<BillDetail> = self
            .request("getBill", &[("id", bill_id.to_string())])
            .await?;
        envelope.into_payload()
    }
}

/// Dates arrive as `YYYY-MM-DD`, but also as "", "0000-00-00" or null
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

/// Counts arrive as numbers or numeric strings
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// Optional text fields are sometimes null or numeric
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}
