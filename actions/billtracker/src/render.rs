use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::config::SiteSettings;
use crate::error::{Error, Result};
use crate::store;
use crate::types::{sort_by_recency, AggregateResult, BillRecord};

const STYLE: &str = include_str!("../assets/style.css");
const FILTER_SCRIPT: &str = include_str!("../assets/filters.js");

/// Sponsors shown on a card before collapsing into "+N more"
const SPONSORS_SHOWN: usize = 3;

/// Headline numbers shown above the bill list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStats {
    pub total_bills: usize,
    pub jurisdictions: usize,
    pub active_bills: usize,
    pub analyzed_bills: usize,
}

impl PageStats {
    pub fn from_bills(bills: &[BillRecord]) -> Self {
        let jurisdictions = bills
            .iter()
            .map(|b| b.state_code.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();

        Self {
            total_bills: bills.len(),
            jurisdictions,
            active_bills: bills.iter().filter(|b| b.is_active()).count(),
            analyzed_bills: bills.iter().filter(|b| b.analysis_url.is_some()).count(),
        }
    }
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// CSS class for a free-text bill status
pub fn status_class(status: &str) -> &'static str {
    let status = status.to_lowercase();
    if status.contains("introduced") {
        "status-introduced"
    } else if status.contains("committee") {
        "status-committee"
    } else if status.contains("passed") {
        "status-passed"
    } else if status.contains("enacted") || status.contains("signed") {
        "status-enacted"
    } else {
        "status-introduced"
    }
}

/// Format a bill date for display
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%b %d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Format date and time for HTML display
fn format_datetime_html(dt: &DateTime<Utc>) -> String {
    dt.format("%B %d, %Y at %I:%M %p UTC").to_string()
}

fn sponsors_html(bill: &BillRecord) -> String {
    if bill.sponsors.is_empty() {
        return String::new();
    }

    let mut tags: Vec<String> = bill
        .sponsors
        .iter()
        .take(SPONSORS_SHOWN)
        .map(|sponsor| {
            let party = if sponsor.party.is_empty() {
                String::new()
            } else {
                format!(" ({})", escape_html(&sponsor.party))
            };
            format!(
                "<span class=\"sponsor-tag\">{}{}</span>",
                escape_html(&sponsor.name),
                party
            )
        })
        .collect();

    if bill.sponsors.len() > SPONSORS_SHOWN {
        tags.push(format!(
            "<span class=\"sponsor-tag\">+{} more</span>",
            bill.sponsors.len() - SPONSORS_SHOWN
        ));
    }

    format!(
        r#"
          <div class="bill-sponsors">
            <strong>Sponsors:</strong>
            <div class="sponsor-list">{}</div>
          </div>"#,
        tags.join(" ")
    )
}

/// Render one pre-rendered bill card
pub fn bill_card_html(bill: &BillRecord, site: &SiteSettings) -> String {
    let date = bill.last_action_date.or(bill.status_date);
    // must agree with the dataset's recency order
    let date_attr = bill.recency().map(|d| d.to_string()).unwrap_or_default();
    let badge_class = if bill.is_federal() {
        "state-badge-federal"
    } else {
        "state-badge-state"
    };
    let status = if bill.status.is_empty() {
        "Unknown"
    } else {
        bill.status.as_str()
    };

    let search_text = format!(
        "{} {} {} {}",
        bill.title, bill.description, bill.bill_number, bill.state_name
    )
    .to_lowercase();

    let source_link = if bill.url.is_empty() {
        String::new()
    } else {
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"btn btn-secondary\">{}</a>",
            escape_html(&bill.url),
            escape_html(&site.source_label)
        )
    };

    let analysis = match &bill.analysis_url {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"btn btn-analysis\">{}</a>",
            escape_html(url),
            escape_html(&site.analysis_label)
        ),
        None => {
            "<span class=\"btn btn-disabled\" title=\"Analysis coming soon\">Analysis Pending</span>"
                .to_string()
        }
    };

    format!(
        r#"      <article class="bill-card" data-state="{state_name}" data-state-code="{state_code}" data-status="{status_attr}" data-date="{date_attr}" data-number="{number}" data-search="{search}">
        <div class="bill-header">
          <div class="bill-title">
            <div class="bill-meta-top">
              <span class="state-badge {badge_class}">{state_name}</span>
              <span class="bill-number">{number}</span>
            </div>
            <h3>{title}</h3>
          </div>
          <div class="bill-status {status_class}">{status}</div>
        </div>
        <p class="bill-description">{description}</p>
        <div class="bill-meta">
          <div class="bill-meta-item"><strong>Last Action:</strong> {last_action_date}</div>
          <div class="bill-meta-item">{last_action}</div>
        </div>{sponsors}
        <div class="bill-actions">
          {source_link}
          {analysis}
        </div>
      </article>
"#,
        state_name = escape_html(&bill.state_name),
        state_code = escape_html(&bill.state_code),
        status_attr = escape_html(&bill.status.to_lowercase()),
        date_attr = date_attr,
        number = escape_html(&bill.bill_number),
        search = escape_html(&search_text),
        badge_class = badge_class,
        title = escape_html(&bill.title),
        status_class = status_class(status),
        status = escape_html(status),
        description = escape_html(&bill.description),
        last_action_date = escape_html(&format_date(date)),
        last_action = escape_html(&bill.last_action),
        sponsors = sponsors_html(bill),
        source_link = source_link,
        analysis = analysis,
    )
}

/// One `<option>` per state present, ordered by display name
fn state_options_html(bills: &[BillRecord]) -> String {
    let states: BTreeMap<&str, &str> = bills
        .iter()
        .filter(|b| !b.is_federal())
        .map(|b| (b.state_name.as_str(), b.state_code.as_str()))
        .collect();

    states
        .iter()
        .map(|(name, code)| {
            format!(
                "            <option value=\"{}\">{}</option>",
                escape_html(code),
                escape_html(name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON-LD block describing the page
fn structured_data(site: &SiteSettings) -> String {
    let mut app = json!({
        "@context": "https://schema.org",
        "@type": "WebApplication",
        "name": site.title,
        "description": site.description,
        "applicationCategory": "GovernmentApplication",
        "operatingSystem": "Web Browser",
        "offers": {
            "@type": "Offer",
            "price": "0",
            "priceCurrency": "USD"
        }
    });
    if !site.url.is_empty() {
        app["url"] = json!(site.url);
    }

    // a "</" inside a string value would close the script element
    serde_json::to_string_pretty(&app)
        .unwrap_or_default()
        .replace("</", "<\\/")
}

/// Render the complete static page for a dataset
pub fn render_page(result: &AggregateResult, site: &SiteSettings) -> String {
    let mut bills = result.bills.clone();
    sort_by_recency(&mut bills);

    let stats = PageStats::from_bills(&bills);
    let cards: String = bills.iter().map(|bill| bill_card_html(bill, site)).collect();

    let canonical = if site.url.is_empty() {
        String::new()
    } else {
        format!(
            "  <link rel=\"canonical\" href=\"{url}\">\n  <meta property=\"og:url\" content=\"{url}\">\n",
            url = escape_html(&site.url)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <meta name="description" content="{description}">
  <meta name="robots" content="index, follow">
{canonical}  <meta property="og:type" content="website">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta name="twitter:card" content="summary">
  <meta name="twitter:title" content="{title}">
  <meta name="twitter:description" content="{description}">
  <script type="application/ld+json">
{structured_data}
  </script>
  <style>
{style}
  </style>
</head>
<body>
  <header>
    <div class="container">
      <h1>{title}</h1>
      <p class="subtitle">{description}</p>
      <p class="last-updated">Last Updated: <time datetime="{updated_iso}">{updated}</time></p>
    </div>
  </header>

  <main class="container">
    <section class="filters">
      <h2>Filter Bills</h2>
      <div class="filter-controls">
        <input type="text" id="searchInput" placeholder="Search bills by title, description, or bill number..." aria-label="Search bills">
        <select id="stateFilter" aria-label="Filter by jurisdiction">
          <option value="all">All States + Federal</option>
          <option value="US">Federal Only</option>
          <optgroup label="States">
{state_options}
          </optgroup>
        </select>
        <select id="statusFilter" aria-label="Filter by status">
          <option value="all">All Statuses</option>
          <option value="introduced">Introduced</option>
          <option value="committee">In Committee</option>
          <option value="passed">Passed</option>
          <option value="enacted">Enacted</option>
        </select>
        <select id="sortOrder" aria-label="Sort order">
          <option value="recent">Most Recent</option>
          <option value="oldest">Oldest First</option>
          <option value="state">By State</option>
          <option value="alphabetical">By Bill Number</option>
        </select>
      </div>
    </section>

    <section class="stats">
      <div class="stat-card"><h4>Total Bills</h4><p class="stat-number" id="totalBills">{total}</p></div>
      <div class="stat-card"><h4>States Tracked</h4><p class="stat-number" id="totalStates">{jurisdictions}</p></div>
      <div class="stat-card"><h4>Active Bills</h4><p class="stat-number" id="activeBills">{active}</p></div>
      <div class="stat-card"><h4>With Analysis</h4><p class="stat-number" id="analyzedBills">{analyzed}</p></div>
    </section>

    <section class="bills-list">
      <h2>Current Bills</h2>
      <div id="billsContainer">
{cards}      </div>
      <div id="noResults" class="no-results" hidden>
        <p>No bills found matching your criteria.</p>
      </div>
    </section>
  </main>

  <footer>
    <div class="container">
      <p>Data from the LegiScan API • Last updated: {updated}</p>
    </div>
  </footer>

  <script>
{script}
  </script>
</body>
</html>
"#,
        title = escape_html(&site.title),
        description = escape_html(&site.description),
        canonical = canonical,
        structured_data = structured_data(site),
        style = STYLE,
        updated_iso = result.last_updated.to_rfc3339(),
        updated = format_datetime_html(&result.last_updated),
        state_options = state_options_html(&bills),
        total = stats.total_bills,
        jurisdictions = stats.jurisdictions,
        active = stats.active_bills,
        analyzed = stats.analyzed_bills,
        cards = cards,
        script = FILTER_SCRIPT,
    )
}

/// Render the page for the dataset at `data_path` and write it to `html_path`
pub fn publish(data_path: &Path, html_path: &Path, site: &SiteSettings) -> Result<PageStats> {
    let result = store::load(data_path)?;
    if result.is_empty() {
        return Err(Error::EmptyDataset(data_path.to_path_buf()));
    }

    info!(
        bills = result.bills.len(),
        last_updated = %result.last_updated,
        "Loaded dataset from {}",
        data_path.display()
    );

    let html = render_page(&result, site);
    store::write_atomic(html_path, html.as_bytes())?;

    let stats = PageStats::from_bills(&result.bills);
    info!(
        total = stats.total_bills,
        active = stats.active_bills,
        analyzed = stats.analyzed_bills,
        "Wrote {}",
        html_path.display()
    );

    Ok(stats)
}
