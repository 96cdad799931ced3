use crate::error::{Error, Result};
use crate::legiscan::{SearchYear, DEFAULT_API_BASE};
use crate::pacing::PacingPolicy;
use crate::relevance::{RelevanceFilter, DEFAULT_POLICY_TERMS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable holding the LegiScan API key
pub const API_KEY_ENV: &str = "LEGISCAN_API_KEY";

/// Environment variable pointing at an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "BILLTRACKER_CONFIG";

/// Configuration file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "tracker.yml";

pub const DEFAULT_SEARCH_QUERY: &str = "cannabis OR marijuana";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Text and links used by the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    /// Canonical URL of the published page
    pub url: String,
    /// Label of the link to the bill's source page
    pub source_label: String,
    /// Label of the link to an editorial analysis
    pub analysis_label: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Cannabis Legislation Tracker".to_string(),
            description: "Cannabis legislation across all 50 states and the federal government, \
                          updated from the LegiScan API."
                .to_string(),
            url: String::new(),
            source_label: "View on LegiScan".to_string(),
            analysis_label: "Read Analysis".to_string(),
        }
    }
}

/// Optional overrides read from the YAML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub api_base: Option<String>,
    pub search_query: Option<String>,
    pub search_year: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub detail_delay_ms: Option<u64>,
    pub jurisdiction_delay_ms: Option<u64>,
    pub policy_terms: Option<Vec<String>>,
    pub data_path: Option<PathBuf>,
    pub html_path: Option<PathBuf>,
    pub site: Option<SiteSettings>,
}

impl FileSettings {
    /// Load and parse a YAML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// Configuration for a tracker run
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub search_query: String,
    pub search_year: SearchYear,
    pub request_timeout: Duration,
    pub pacing: PacingPolicy,
    pub policy_terms: Vec<String>,
    pub data_path: PathBuf,
    pub html_path: PathBuf,
    pub site: SiteSettings,
}

impl Config {
    /// Create a new default configuration without credentials
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            search_year: SearchYear::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            pacing: PacingPolicy::default(),
            policy_terms: DEFAULT_POLICY_TERMS.iter().map(|t| t.to_string()).collect(),
            data_path: PathBuf::from("bills.json"),
            html_path: PathBuf::from("index.html"),
            site: SiteSettings::default(),
        }
    }

    /// Load configuration from the environment and the optional YAML file.
    ///
    /// The file comes from `BILLTRACKER_CONFIG` when set, otherwise from
    /// `tracker.yml` in the working directory if it exists.
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        if let Some(path) = config_path {
            let settings = FileSettings::load(&path).map_err(|e| {
                Error::Config(format!("Failed to load {}: {}", path.display(), e))
            })?;
            builder = builder.file_settings(settings);
        }

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            builder = builder.api_key(key);
        }

        builder.build()
    }

    /// The API key, or the fatal configuration error when it is missing
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)
    }

    pub fn relevance_filter(&self) -> Result<RelevanceFilter> {
        RelevanceFilter::new(self.policy_terms.as_slice())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(Error::Config("API base URL is empty".to_string()));
        }

        if self.search_query.trim().is_empty() {
            return Err(Error::Config("Search query is empty".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config("Request timeout must be positive".to_string()));
        }

        self.relevance_filter()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    pub fn search_query(mut self, query: impl Into<String>) -> Self {
        self.config.search_query = query.into();
        self
    }

    /// Set the search window, falling back to the nearest supported value
    pub fn search_year(mut self, year: u32) -> Self {
        let window = SearchYear::nearest(year);
        if !SearchYear::is_supported(year) {
            warn!(
                requested = year,
                using = window.as_param(),
                "Unsupported search year, using nearest supported value"
            );
        }
        self.config.search_year = window;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn pacing(mut self, pacing: PacingPolicy) -> Self {
        self.config.pacing = pacing;
        self
    }

    pub fn policy_terms(mut self, terms: Vec<String>) -> Self {
        self.config.policy_terms = terms;
        self
    }

    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    pub fn html_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.html_path = path.into();
        self
    }

    pub fn site(mut self, site: SiteSettings) -> Self {
        self.config.site = site;
        self
    }

    /// Apply every value present in a configuration file
    pub fn file_settings(mut self, settings: FileSettings) -> Self {
        if let Some(base) = settings.api_base {
            self = self.api_base(base);
        }
        if let Some(query) = settings.search_query {
            self = self.search_query(query);
        }
        if let Some(year) = settings.search_year {
            self = self.search_year(year);
        }
        if let Some(secs) = settings.request_timeout_secs {
            self = self.request_timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = settings.detail_delay_ms {
            self.config.pacing.detail_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = settings.jurisdiction_delay_ms {
            self.config.pacing.jurisdiction_delay = Duration::from_millis(ms);
        }
        if let Some(terms) = settings.policy_terms {
            self = self.policy_terms(terms);
        }
        if let Some(path) = settings.data_path {
            self = self.data_path(path);
        }
        if let Some(path) = settings.html_path {
            self = self.html_path(path);
        }
        if let Some(site) = settings.site {
            self = self.site(site);
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
