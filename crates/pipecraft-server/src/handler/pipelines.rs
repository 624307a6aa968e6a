//! Pipeline analysis handlers.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use pipecraft_graph::analysis::{AnalysisReport, AnalysisRequest};

use crate::extract::Json;
use crate::handler::Result;

/// Tracing target for pipeline operations.
const TRACING_TARGET: &str = "pipecraft_server::handler::pipelines";

/// Counts nodes and edges of the submitted pipeline and checks it is a DAG.
#[tracing::instrument(skip_all)]
async fn parse_pipeline(
    Json(request): Json<AnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisReport>)> {
    tracing::debug!(
        target: TRACING_TARGET,
        nodes = request.nodes.len(),
        edges = request.edges.len(),
        "analyzing pipeline"
    );

    let report = request.analyze();

    tracing::info!(
        target: TRACING_TARGET,
        num_nodes = report.node_count,
        num_edge = report.edge_count,
        is_dag = report.is_dag,
        "pipeline analyzed"
    );

    Ok((StatusCode::OK, Json(report)))
}

/// Returns a [`Router`] with all pipeline routes.
pub fn routes() -> Router {
    Router::new().route("/pipelines/parse", post(parse_pipeline))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn reports_counts_for_a_chain() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes())?;

        let response = server
            .post("/pipelines/parse")
            .json(&json!({
                "nodes": [
                    { "id": "node_0", "type": "input", "position": { "x": 100, "y": 100 }, "data": {} },
                    { "id": "node_1", "type": "text", "data": { "value": "Hello [[name]]" } },
                    { "id": "node_2", "type": "output" },
                ],
                "edges": [
                    { "id": "e1", "source": "node_0", "target": "node_1", "sourceHandle": "node_0-output" },
                    { "id": "e2", "source": "node_1", "target": "node_2" },
                ],
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "num_nodes": 3, "num_edge": 2, "is_dag": true }));
        Ok(())
    }

    #[tokio::test]
    async fn detects_a_cycle() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes())?;

        let response = server
            .post("/pipelines/parse")
            .json(&json!({
                "nodes": [{ "id": "a" }, { "id": "b" }, { "id": "c" }],
                "edges": [
                    { "source": "a", "target": "b" },
                    { "source": "b", "target": "c" },
                    { "source": "c", "target": "a" },
                ],
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "num_nodes": 3, "num_edge": 3, "is_dag": false }));
        Ok(())
    }

    #[tokio::test]
    async fn self_loop_is_not_a_dag() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes())?;

        let response = server
            .post("/pipelines/parse")
            .json(&json!({
                "nodes": [{ "id": "solo" }],
                "edges": [{ "source": "solo", "target": "solo" }],
            }))
            .await;

        let report: AnalysisReport = response.json();
        assert!(!report.is_dag);
        assert_eq!(report.edge_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn empty_pipeline_is_a_dag() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes())?;

        let response = server
            .post("/pipelines/parse")
            .json(&json!({ "nodes": [], "edges": [] }))
            .await;

        response.assert_json(&json!({ "num_nodes": 0, "num_edge": 0, "is_dag": true }));
        Ok(())
    }

    #[tokio::test]
    async fn missing_edges_is_a_bad_request() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes())?;

        let response = server
            .post("/pipelines/parse")
            .json(&json!({ "nodes": [] }))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["name"], "bad_request");
        assert!(body["context"].as_str().is_some_and(|c| c.contains("edges")));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_json_is_a_bad_request() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes())?;

        let response = server
            .post("/pipelines/parse")
            .text("{ not json")
            .content_type("application/json")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["name"], "bad_request");
        Ok(())
    }
}
