//! `pipecraft analyze`: the same count and DAG check the service performs.

use anyhow::Context;
use pipecraft_graph::analysis::{AnalysisReport, AnalysisRequest};

use super::read_source;
use crate::TRACING_TARGET_COMMAND;
use crate::config::AnalyzeArgs;

pub fn run(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let report = analyze_source(read_source(&args.document)?.as_deref())?;
    println!("{}", render(&report, args.json)?);
    Ok(())
}

/// Analyzes raw JSON leniently; nothing to read counts as an empty pipeline.
fn analyze_source(text: Option<&str>) -> anyhow::Result<AnalysisReport> {
    let request: AnalysisRequest = match text {
        Some(text) => serde_json::from_str(text)
            .context("expected an object with `nodes` and `edges` lists")?,
        None => AnalysisRequest::default(),
    };

    let report = request.analyze();
    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        num_nodes = report.node_count,
        num_edge = report.edge_count,
        is_dag = report.is_dag,
        "pipeline analyzed locally"
    );
    Ok(report)
}

/// Renders a report for the terminal or as the service's JSON body.
pub(super) fn render(report: &AnalysisReport, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(report.to_string())
    }
}
