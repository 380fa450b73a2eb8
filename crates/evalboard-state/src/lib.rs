//! # evalboard-state
//!
//! Selection state and backend request orchestration for the evalboard
//! evaluation dashboard.
//!
//! This crate bridges the [`evalboard-filter`] predicate model and a REST
//! backend:
//!
//! - **Selection store**: atomic snapshots of the current selections with
//!   the composed filter derived on every mutation, plus subscriptions
//! - **Histograms**: two-phase bucket/count requests where a newer request
//!   supersedes any older one still in flight
//! - **Metric caches**: slice and tag metrics cached per key for the session
//! - **Tables**: paged row requests under the current filter
//! - **Sessions**: bearer tokens refreshed when they expire
//!
//! ## Quick Start
//!
//! ```ignore
//! use evalboard_state::{Dashboard, DashboardConfig, HttpBackend, Session, SessionManager};
//! use std::sync::Arc;
//!
//! let config = DashboardConfig::from_env()?;
//! let session = Arc::new(SessionManager::new(refresher, Some(Session::from_cookie(&cookie)?)));
//! let backend = HttpBackend::new(&config, session)?;
//!
//! let dashboard = Dashboard::new(Arc::new(backend), config);
//! dashboard.load_catalog().await?;
//! dashboard.store().toggle_slice(1, false);
//!
//! let columns = dashboard_columns();
//! let histograms = dashboard.refresh_histograms(&columns, Some("gpt2"), Some("accuracy")).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default) - [`HttpBackend`], a `reqwest` client for the REST API
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        evalboard-state                        │
//! │                                                              │
//! │  Dashboard                                                   │
//! │  ├── SelectionStore    selections → Snapshot (composed)      │
//! │  ├── HistogramOrchestrator  buckets → counts → metrics       │
//! │  ├── MetricFetcher     MetricCache per slice/tag key         │
//! │  └── table             TableRequest → rows                   │
//! │                                                              │
//! │  DashboardBackend (trait)                                    │
//! │  └── HttpBackend       reqwest + SessionManager bearer token │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod api;
mod backend;
mod cache;
mod config;
mod dashboard;
mod error;
mod histogram;
#[cfg(feature = "http")]
mod http;
mod metrics;
mod session;
mod store;
mod table;

// Public re-exports
pub use api::{
    ColumnRequest, GroupMetric, HistogramBucket, HistogramRequest, Metric, MetricKey,
    MetricRequest, TableRequest, TagMetricKey, TagMetricRequest,
};
pub use backend::DashboardBackend;
pub use cache::{cache_key, CacheStats, MetricCache};
pub use config::{
    DashboardConfig, DashboardConfigBuilder, MetricCacheConfig, API_URL_ENV, PROJECT_ENV,
};
pub use dashboard::{ColumnHistograms, Dashboard};
pub use error::{DashboardError, DashboardResult};
pub use histogram::{HistogramOrchestrator, HistogramQuery, MetricRange};
#[cfg(feature = "http")]
pub use http::HttpBackend;
pub use metrics::MetricFetcher;
pub use session::{Session, SessionManager, TokenRefresher};
pub use store::{SelectionStore, SliceCatalog, Snapshot, SubscriptionId};
pub use table::{decode_rows, fetch_table, Row, TablePage};

// Re-export the predicate model for convenience
pub use evalboard_filter;
