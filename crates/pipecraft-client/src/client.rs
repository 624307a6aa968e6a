//! Reqwest-based client for the analysis service.

use std::sync::Arc;

use async_trait::async_trait;
use pipecraft_graph::analysis::{AnalysisReport, PipelineAnalyzer};
use pipecraft_graph::document::PipelineDocument;
use reqwest::Client;
use url::Url;

use crate::{AnalyzerConfig, Error, Result, TRACING_TARGET};

/// Path of the analysis endpoint, relative to the analyzer URL.
pub const PARSE_ENDPOINT: &str = "pipelines/parse";

struct AnalyzerClientInner {
    http: Client,
    endpoint: Url,
    config: AnalyzerConfig,
}

/// HTTP client submitting pipeline documents for analysis.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct AnalyzerClient {
    inner: Arc<AnalyzerClientInner>,
}

impl std::fmt::Debug for AnalyzerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AnalyzerClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let timeout = config.effective_timeout();
        let endpoint = endpoint_url(&config.analyzer_url)?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(Error::Client)?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis(),
            "analysis client created"
        );

        let inner = AnalyzerClientInner {
            http,
            endpoint,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.inner.config
    }

    /// Returns the full URL submissions are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Submits `document` and returns the service's report.
    ///
    /// An empty pipeline is refused without contacting the service.
    pub async fn submit(&self, document: &PipelineDocument) -> Result<AnalysisReport> {
        if document.nodes.is_empty() {
            tracing::debug!(target: TRACING_TARGET, "refusing to submit an empty pipeline");
            return Err(Error::EmptyPipeline);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %self.inner.endpoint,
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "submitting pipeline"
        );

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .json(document)
            .send()
            .await
            .map_err(|err| self.transport_failure(err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_failure(err))?;

        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "analysis service refused the pipeline"
            );
            return Err(Error::Status { status, body });
        }

        let report: AnalysisReport = serde_json::from_str(&body).map_err(Error::Decode)?;

        tracing::info!(
            target: TRACING_TARGET,
            num_nodes = report.node_count,
            num_edge = report.edge_count,
            is_dag = report.is_dag,
            "pipeline analyzed remotely"
        );

        Ok(report)
    }

    fn transport_failure(&self, err: reqwest::Error) -> Error {
        tracing::warn!(
            target: TRACING_TARGET,
            endpoint = %self.inner.endpoint,
            timeout = err.is_timeout(),
            connect = err.is_connect(),
            error = %err,
            "analysis service unreachable"
        );
        Error::Transport(err)
    }
}

#[async_trait]
impl PipelineAnalyzer for AnalyzerClient {
    type Error = Error;

    async fn analyze(&self, document: PipelineDocument) -> Result<AnalysisReport> {
        self.submit(&document).await
    }
}

/// Joins [`PARSE_ENDPOINT`] onto `base`, treating `base` as a directory.
fn endpoint_url(base: &Url) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(PARSE_ENDPOINT)?)
}
