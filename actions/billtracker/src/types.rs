use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::jurisdiction::FEDERAL_CODE;

/// Longest description kept on a record, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Most sponsors kept on a record
pub const MAX_SPONSORS: usize = 5;

/// Identifier assigned by LegiScan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(pub u64);

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sponsor of a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub name: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub role: String,
}

/// A normalized piece of legislation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    pub id: BillId,
    pub state_code: String,
    pub state_name: String,
    pub bill_number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_date: Option<NaiveDate>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub last_action: String,
    #[serde(default)]
    pub last_action_date: Option<NaiveDate>,
    #[serde(default)]
    pub sponsors: Vec<Sponsor>,
    /// Link to an editorial write-up, filled in by hand after publishing
    #[serde(default)]
    pub analysis_url: Option<String>,
}

impl BillRecord {
    /// The more recent of the last action date and the status date
    pub fn recency(&self) -> Option<NaiveDate> {
        self.last_action_date.max(self.status_date)
    }

    pub fn is_federal(&self) -> bool {
        self.state_code == FEDERAL_CODE
    }

    /// Bills whose status does not mark the end of the legislative process
    pub fn is_active(&self) -> bool {
        let status = self.status.to_lowercase();
        !["enacted", "vetoed", "failed", "dead"]
            .iter()
            .any(|term| status.contains(term))
    }
}

/// Cut a description down to `MAX_DESCRIPTION_CHARS` characters
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Keep the first `MAX_SPONSORS` sponsors, preserving order
pub fn truncate_sponsors(mut sponsors: Vec<Sponsor>) -> Vec<Sponsor> {
    sponsors.truncate(MAX_SPONSORS);
    sponsors
}

/// Sort bills newest first; bills without any date go last
pub fn sort_by_recency(bills: &mut [BillRecord]) {
    bills.sort_by(|a, b| b.recency().cmp(&a.recency()));
}

/// The complete dataset produced by one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub last_updated: DateTime<Utc>,
    pub total_bills: usize,
    pub total_states: usize,
    #[serde(default)]
    pub federal_bills: usize,
    pub bills: Vec<BillRecord>,
}

impl AggregateResult {
    /// Build the dataset from collected bills, sorting them and computing counts
    pub fn new(mut bills: Vec<BillRecord>, last_updated: DateTime<Utc>) -> Self {
        sort_by_recency(&mut bills);

        let total_states = bills
            .iter()
            .map(|bill| bill.state_code.as_str())
            .collect::<HashSet<_>>()
            .len();
        let federal_bills = bills.iter().filter(|bill| bill.is_federal()).count();

        Self {
            last_updated,
            total_bills: bills.len(),
            total_states,
            federal_bills,
            bills,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(id: u64, last_action: Option<&str>, status: Option<&str>) -> BillRecord {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        BillRecord {
            id: BillId(id),
            state_code: "CA".to_string(),
            state_name: "California".to_string(),
            bill_number: format!("AB{}", id),
            title: String::new(),
            description: String::new(),
            status: String::new(),
            status_date: status.map(date),
            url: String::new(),
            last_action: String::new(),
            last_action_date: last_action.map(date),
            sponsors: vec![],
            analysis_url: None,
        }
    }

    #[test]
    fn test_recency_uses_later_date() {
        let b = bill(1, Some("2024-01-05"), Some("2024-03-01"));
        assert_eq!(b.recency(), NaiveDate::from_ymd_opt(2024, 3, 1));
        let b = bill(2, Some("2024-04-05"), None);
        assert_eq!(b.recency(), NaiveDate::from_ymd_opt(2024, 4, 5));
    }

    #[test]
    fn test_undated_bills_sort_last() {
        let mut bills = vec![
            bill(1, None, None),
            bill(2, Some("2023-06-01"), None),
            bill(3, None, Some("2024-02-10")),
            bill(4, None, None),
            bill(5, Some("2024-01-01"), Some("2022-01-01")),
        ];
        sort_by_recency(&mut bills);
        let ids: Vec<u64> = bills.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn test_description_truncation_counts_chars() {
        let long = "é".repeat(MAX_DESCRIPTION_CHARS + 20);
        let cut = truncate_description(&long);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS);

        assert_eq!(truncate_description("short"), "short");
    }

    #[test]
    fn test_sponsor_truncation_keeps_order() {
        let sponsors: Vec<Sponsor> = (0..9)
            .map(|i| Sponsor {
                name: format!("Member {}", i),
                party: "D".to_string(),
                role: "Rep".to_string(),
            })
            .collect();
        let kept = truncate_sponsors(sponsors);
        assert_eq!(kept.len(), MAX_SPONSORS);
        assert_eq!(kept[0].name, "Member 0");
        assert_eq!(kept[4].name, "Member 4");
    }

    #[test]
    fn test_aggregate_counts_jurisdictions() {
        let mut federal = bill(10, Some("2024-05-01"), None);
        federal.state_code = FEDERAL_CODE.to_string();
        federal.state_name = "Federal".to_string();

        let result = AggregateResult::new(
            vec![bill(1, None, None), bill(2, None, None), federal],
            Utc::now(),
        );
        assert_eq!(result.total_bills, 3);
        assert_eq!(result.total_states, 2);
        assert_eq!(result.federal_bills, 1);
        assert_eq!(result.bills[0].id, BillId(10));
    }

    #[test]
    fn test_active_excludes_terminal_statuses() {
        let mut b = bill(1, None, None);
        b.status = "Introduced".to_string();
        assert!(b.is_active());
        b.status = "Vetoed".to_string();
        assert!(!b.is_active());
    }
}
