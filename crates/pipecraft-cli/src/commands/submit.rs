//! `pipecraft submit`: sends a pipeline to a running analysis service.

use anyhow::Context;
use pipecraft_client::{AnalyzerClient, Error as ClientError};

use super::analyze::render;
use super::validated_document;
use crate::config::SubmitArgs;

pub async fn run(args: SubmitArgs) -> anyhow::Result<()> {
    let document = validated_document(&args.document)?;
    let client = AnalyzerClient::new(args.analyzer)?;

    let report = match client.submit(&document).await {
        Ok(report) => report,
        Err(error) if error.is_transport() => {
            let url = client.config().analyzer_url.clone();
            return Err(error)
                .with_context(|| format!("make sure the analysis service is running at {url}"));
        }
        Err(ClientError::EmptyPipeline) => {
            anyhow::bail!("please add at least one node to the pipeline before submitting it")
        }
        Err(error) => return Err(error).context("analysis failed"),
    };

    println!("{}", render(&report, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pipecraft_client::AnalyzerConfig;
    use pipecraft_graph::document::DocumentStore;
    use tokio::net::TcpListener;

    use super::*;
    use crate::commands::test::{chain, saved};

    async fn spawn_service() -> anyhow::Result<url::Url> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, pipecraft_server::handler::routes()).await;
        });
        Ok(format!("http://{addr}").parse()?)
    }

    fn args(dir: &std::path::Path, analyzer_url: url::Url) -> SubmitArgs {
        SubmitArgs {
            document: saved(dir),
            analyzer: AnalyzerConfig::new(analyzer_url),
            json: false,
        }
    }

    #[tokio::test]
    async fn submits_the_saved_pipeline() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let (store, _) = chain()?;
        saved(dir.path()).storage.store().save(&store.to_document())?;

        let base = spawn_service().await?;
        run(args(dir.path(), base)).await
    }

    #[tokio::test]
    async fn empty_pipeline_is_refused() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let base = spawn_service().await?;

        let error = run(args(dir.path(), base)).await.err();
        assert!(error.is_some_and(|e| e.to_string().contains("at least one node")));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_service_names_the_url() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let (store, _) = chain()?;
        saved(dir.path()).storage.store().save(&store.to_document())?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let error = run(args(dir.path(), format!("http://{addr}").parse()?))
            .await
            .err();
        assert!(error.is_some_and(|e| e.to_string().contains("make sure the analysis service")));
        Ok(())
    }
}
