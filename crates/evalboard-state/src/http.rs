//! REST backend over HTTP (feature `http`).

use std::sync::Arc;

use async_trait::async_trait;
use evalboard_filter::{Column, Slice, Tag};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::{
    GroupMetric, HistogramBucket, HistogramRequest, Metric, MetricRequest, TableRequest,
    TagMetricRequest,
};
use crate::backend::DashboardBackend;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::session::SessionManager;

/// [`DashboardBackend`] talking JSON to the REST API.
///
/// Every endpoint lives at `{base}/api/{endpoint}/{project}` and every call
/// carries `Authorization: Bearer <access token>`. Expired tokens are
/// refreshed before the call. A 401 answer forces one refresh and one retry;
/// a second 401 clears the session and surfaces as
/// [`DashboardError::Unauthorized`].
pub struct HttpBackend {
    client: Client,
    base: Url,
    project: String,
    session: Arc<SessionManager>,
}

impl HttpBackend {
    /// Creates a backend for the configured URL and project.
    pub fn new(config: &DashboardConfig, session: Arc<SessionManager>) -> DashboardResult<Self> {
        if config.project.is_empty() {
            return Err(DashboardError::Config("project is not set".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base: config.api_url()?,
            project: config.project.clone(),
            session,
        })
    }

    /// URL of an endpoint for this project.
    pub fn endpoint(&self, name: &str) -> DashboardResult<Url> {
        Ok(self.base.join(&format!("api/{}/{}", name, self.project))?)
    }

    async fn get<T: DeserializeOwned>(&self, name: &str) -> DashboardResult<T> {
        let url = self.endpoint(name)?;
        self.send(self.client.get(url)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        name: &str,
        body: &B,
    ) -> DashboardResult<T> {
        let url = self.endpoint(name)?;
        self.send(self.client.post(url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> DashboardResult<T> {
        let token = self.session.access_token().await?;
        let retry = request.try_clone();
        let mut response = execute(request, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(retry) = retry {
                tracing::debug!("access token rejected, refreshing");
                let token = self.session.refresh_after_unauthorized().await?;
                response = execute(retry, &token).await?;
            }
        }

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.clear();
            return Err(DashboardError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn execute(request: RequestBuilder, token: &str) -> DashboardResult<Response> {
    request
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| DashboardError::Transport(e.to_string()))
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base", &self.base.as_str())
            .field("project", &self.project)
            .finish()
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn columns(&self) -> DashboardResult<Vec<Column>> {
        self.get("columns").await
    }

    async fn slices(&self) -> DashboardResult<Vec<Slice>> {
        self.get("slices").await
    }

    async fn tags(&self) -> DashboardResult<Vec<Tag>> {
        self.get("tags").await
    }

    async fn models(&self) -> DashboardResult<Vec<String>> {
        self.get("models").await
    }

    async fn metrics(&self) -> DashboardResult<Vec<Metric>> {
        self.get("metrics").await
    }

    async fn histogram_buckets(
        &self,
        columns: &[Column],
    ) -> DashboardResult<Vec<Vec<HistogramBucket>>> {
        self.post("histogram-buckets", columns).await
    }

    async fn histogram_counts(&self, request: &HistogramRequest) -> DashboardResult<Vec<Vec<u64>>> {
        self.post("histogram-counts", request).await
    }

    async fn histogram_metrics(
        &self,
        request: &HistogramRequest,
    ) -> DashboardResult<Vec<Vec<Option<f64>>>> {
        self.post("histogram-metrics", request).await
    }

    async fn slice_metrics(&self, request: &MetricRequest) -> DashboardResult<Vec<GroupMetric>> {
        self.post("slice-metrics", request).await
    }

    async fn tag_metrics(&self, request: &TagMetricRequest) -> DashboardResult<Vec<GroupMetric>> {
        self.post("tag-metrics", request).await
    }

    async fn table(&self, request: &TableRequest) -> DashboardResult<String> {
        self.post("table", request).await
    }
}
