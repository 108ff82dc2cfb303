use std::io::{IsTerminal, Write};

use catalog_core::config::AppConfig;
use catalog_core::ViewState;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{CommandResult, EXIT_OK, EXIT_VIEW_ERROR};
use crate::render::{CatalogRenderer, OutputFormat, RenderError};
use crate::session::{CatalogSession, LoadOutcome};
use crate::source::{CatalogSource, HttpCatalogSource};

const COMMAND: &str = "view";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewExit {
    Loaded,
    Failed,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

pub fn run(config: &AppConfig, format: OutputFormat, allow_retry: bool) -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to build async runtime: {error}"),
                EXIT_VIEW_ERROR,
            )
        }
    };
    let source = match HttpCatalogSource::from_config(&config.client) {
        Ok(source) => source,
        Err(error) => {
            return CommandResult::failure(COMMAND, "client", error.to_string(), EXIT_VIEW_ERROR)
        }
    };
    let renderer = match CatalogRenderer::new() {
        Ok(renderer) => renderer,
        Err(error) => {
            return CommandResult::failure(COMMAND, "render", error.to_string(), EXIT_VIEW_ERROR)
        }
    };

    let interactive =
        allow_retry && format == OutputFormat::Text && std::io::stdin().is_terminal();
    debug!(
        event_name = "client.view.started",
        base_url = %source.base_url(),
        interactive,
        "starting catalog view"
    );

    let session = CatalogSession::new(source);
    let mut stdout = std::io::stdout();
    let result = runtime.block_on(async {
        let input = interactive.then(|| BufReader::new(tokio::io::stdin()));
        drive(&session, &renderer, format, input, &mut stdout).await
    });
    session.close();

    match result {
        Ok(ViewExit::Loaded) => CommandResult::streamed(EXIT_OK),
        Ok(ViewExit::Failed) => CommandResult::streamed(EXIT_VIEW_ERROR),
        Err(error) => CommandResult::failure(COMMAND, "output", error.to_string(), EXIT_VIEW_ERROR),
    }
}

/// Runs the view until products load or the user gives up.
///
/// With `input`, an error is followed by a prompt: an empty line retries,
/// `q` or end of input stops. Without it the first failure is final.
pub async fn drive<S, R, W>(
    session: &CatalogSession<S>,
    renderer: &CatalogRenderer,
    format: OutputFormat,
    mut input: Option<R>,
    out: &mut W,
) -> Result<ViewExit, ViewError>
where
    S: CatalogSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if format == OutputFormat::Text {
        write!(out, "{}", renderer.render_header()?)?;
    }

    let mut retrying = false;
    loop {
        if format == OutputFormat::Text {
            write!(out, "{}", renderer.render_view(&ViewState::Loading, format, false)?)?;
            out.flush()?;
        }

        let attempt = if retrying { session.retry().await } else { session.load().await };
        let state = session.state();
        writeln!(out, "{}", renderer.render_view(&state, format, input.is_some())?)?;
        out.flush()?;

        if matches!(attempt, LoadOutcome::Loaded { .. }) {
            return Ok(ViewExit::Loaded);
        }
        if state.error_message().is_none() {
            return Ok(ViewExit::Failed);
        }
        retrying = true;

        let Some(reader) = input.as_mut() else {
            return Ok(ViewExit::Failed);
        };
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 || line.trim().eq_ignore_ascii_case("q") {
            return Ok(ViewExit::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use catalog_core::{ApiEnvelope, Product};
    use rust_decimal::Decimal;

    use super::{drive, ViewExit};
    use crate::render::{CatalogRenderer, OutputFormat};
    use crate::session::CatalogSession;
    use crate::source::{CatalogSource, FetchError, ProductsEnvelope};

    struct ScriptedSource(Mutex<VecDeque<Result<ProductsEnvelope, FetchError>>>);

    impl ScriptedSource {
        fn session(responses: Vec<Result<ProductsEnvelope, FetchError>>) -> CatalogSession<Self> {
            CatalogSession::new(Self(Mutex::new(responses.into())))
        }
    }

    #[async_trait]
    impl CatalogSource for ScriptedSource {
        async fn fetch_products(&self) -> Result<ProductsEnvelope, FetchError> {
            self.0
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport { message: "script exhausted".into() }))
        }

        fn endpoint(&self) -> &str {
            "http://catalog.test"
        }
    }

    fn refused() -> Result<ProductsEnvelope, FetchError> {
        Err(FetchError::Transport { message: "connection refused".to_string() })
    }

    fn loaded() -> Result<ProductsEnvelope, FetchError> {
        Ok(ApiEnvelope::success(vec![Product::new(1, "Laptop", Decimal::new(99_999, 2))]))
    }

    fn renderer() -> CatalogRenderer {
        CatalogRenderer::new().expect("templates parse")
    }

    #[tokio::test]
    async fn prints_products_after_loading_indicator() {
        let session = ScriptedSource::session(vec![loaded()]);
        let mut out = Vec::new();

        let exit = drive(&session, &renderer(), OutputFormat::Text, None::<&[u8]>, &mut out)
            .await
            .expect("drive");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(exit, ViewExit::Loaded);
        assert!(text.starts_with("Product Catalog"));
        assert!(text.find("Loading products...") < text.find("[1] Laptop"));
        assert!(text.contains("Total Value: $999.99"));
    }

    #[tokio::test]
    async fn failure_without_input_is_final() {
        let session = ScriptedSource::session(vec![refused(), loaded()]);
        let mut out = Vec::new();

        let exit = drive(&session, &renderer(), OutputFormat::Text, None::<&[u8]>, &mut out)
            .await
            .expect("drive");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(exit, ViewExit::Failed);
        assert!(text.contains("connection refused"));
        assert!(!text.contains("Press Enter"));
    }

    #[tokio::test]
    async fn enter_retries_after_failure() {
        let session = ScriptedSource::session(vec![refused(), loaded()]);
        let mut out = Vec::new();

        let exit = drive(&session, &renderer(), OutputFormat::Text, Some(&b"\n"[..]), &mut out)
            .await
            .expect("drive");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(exit, ViewExit::Loaded);
        assert!(text.contains("Press Enter to try again"));
        assert_eq!(text.matches("Loading products...").count(), 2);
        assert!(text.contains("[1] Laptop"));
    }

    #[tokio::test]
    async fn q_stops_retrying() {
        let session = ScriptedSource::session(vec![refused(), loaded()]);
        let mut out = Vec::new();

        let exit = drive(&session, &renderer(), OutputFormat::Text, Some(&b"q\n"[..]), &mut out)
            .await
            .expect("drive");

        assert_eq!(exit, ViewExit::Failed);
        assert!(session.state().error_message().is_some());
    }

    #[tokio::test]
    async fn html_format_prints_single_page() {
        let session = ScriptedSource::session(vec![loaded()]);
        let mut out = Vec::new();

        let exit = drive(&session, &renderer(), OutputFormat::Html, None::<&[u8]>, &mut out)
            .await
            .expect("drive");

        let html = String::from_utf8(out).expect("utf8");
        assert_eq!(exit, ViewExit::Loaded);
        assert!(html.trim_start().starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("Loading products..."));
        assert!(html.contains("Total Products: 1"));
    }
}
