//! Configuration types for the dashboard core.

use url::Url;

use crate::error::{DashboardError, DashboardResult};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "EVALBOARD_API_URL";
/// Environment variable holding the project uuid.
pub const PROJECT_ENV: &str = "EVALBOARD_PROJECT";

/// Configuration for the dashboard core.
///
/// # Example
///
/// ```rust
/// use evalboard_state::{DashboardConfig, MetricCacheConfig};
///
/// let config = DashboardConfig::builder()
///     .with_api_base_url("http://localhost:8000")
///     .with_project("4f1c")
///     .with_metric_cache(MetricCacheConfig::bounded(5_000))
///     .with_table_page_size(25)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL.
    pub api_base_url: String,
    /// Project uuid used in every endpoint path.
    pub project: String,
    /// Slice/tag metric cache configuration.
    pub metric_cache: MetricCacheConfig,
    /// Rows per table page.
    pub table_page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            project: String::new(),
            metric_cache: MetricCacheConfig::default(),
            table_page_size: 15,
        }
    }
}

impl DashboardConfig {
    /// Creates a new builder for DashboardConfig.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Reads the base URL and project from the process environment.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the base URL and project through `lookup`.
    ///
    /// The project is required; the base URL falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let project = lookup(PROJECT_ENV)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DashboardError::Config(format!("{} is not set", PROJECT_ENV)))?;

        let mut builder = Self::builder().with_project(project);
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.is_empty()) {
            builder = builder.with_api_base_url(url);
        }
        Ok(builder.build())
    }

    /// Parses the base URL, normalised to end with `/` so endpoint paths
    /// join beneath it.
    pub fn api_url(&self) -> DashboardResult<Url> {
        let mut base = self.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }
}

/// Builder for DashboardConfig.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfigBuilder {
    api_base_url: Option<String>,
    project: Option<String>,
    metric_cache: Option<MetricCacheConfig>,
    table_page_size: Option<usize>,
}

impl DashboardConfigBuilder {
    /// Sets the backend base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the project uuid.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Sets the metric cache configuration.
    pub fn with_metric_cache(mut self, metric_cache: MetricCacheConfig) -> Self {
        self.metric_cache = Some(metric_cache);
        self
    }

    /// Sets the number of rows per table page.
    pub fn with_table_page_size(mut self, size: usize) -> Self {
        self.table_page_size = Some(size);
        self
    }

    /// Builds the DashboardConfig.
    pub fn build(self) -> DashboardConfig {
        let defaults = DashboardConfig::default();
        DashboardConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            project: self.project.unwrap_or(defaults.project),
            metric_cache: self.metric_cache.unwrap_or(defaults.metric_cache),
            table_page_size: self.table_page_size.unwrap_or(defaults.table_page_size),
        }
    }
}

/// Configuration for the slice and tag metric caches.
///
/// Unbounded by default: entries live for the whole session. A metric key
/// names a slice (or tag), a model and a metric, and for a fixed dataset the
/// result for a key never changes, so entries never go stale.
#[derive(Debug, Clone, Default)]
pub struct MetricCacheConfig {
    /// Maximum number of cached results (None = unbounded).
    pub max_entries: Option<usize>,
}

impl MetricCacheConfig {
    /// An unbounded, session-lifetime cache.
    pub fn unbounded() -> Self {
        Self { max_entries: None }
    }

    /// An LRU cache holding at most `max_entries` results.
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
        }
    }
}
