// * HTTP layer: the /scrape endpoint, metrics exposition and the static
// * front-end. Status codes are assigned here and nowhere else.

pub mod statics;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info};

use crate::config::constants::{DEFAULT_LIMIT, HARD_TIMEOUT_MS, MAX_LIMIT};
use crate::engine::enrich::EnrichedVideo;
use crate::engine::pipeline::{self, PipelineConfig};
use crate::engine::normalization::listing_url;
use crate::ops::telemetry;
use crate::surface::SurfaceProvider;

// * Unified error type for the request path
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Missing channelUrl parameter")]
    MissingChannelUrl,

    #[error("Invalid channelUrl parameter: {0}")]
    InvalidChannelUrl(String),

    #[error("Failed to launch rendering surface: {0}")]
    Provisioning(#[from] crate::surface::SurfaceError),

    #[error("Scrape timed out after {0}ms")]
    HardTimeout(u64),
}

impl ScrapeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingChannelUrl | Self::InvalidChannelUrl(_) => StatusCode::BAD_REQUEST,
            Self::Provisioning(_) | Self::HardTimeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            Self::MissingChannelUrl | Self::InvalidChannelUrl(_) => "invalid",
            Self::Provisioning(_) => "launch_error",
            Self::HardTimeout(_) => "timeout",
        }
    }
}

/// Validated inputs of one scrape request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeParams {
    pub listing_url: String,
    pub limit: usize,
}

/// Parses and validates the /scrape query string.
pub fn parse_scrape_query(query: Option<&str>) -> Result<ScrapeParams, ScrapeError> {
    let query = query.unwrap_or("");

    let mut channel_url: Option<String> = None;
    let mut limit = DEFAULT_LIMIT;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "channelUrl" => channel_url = Some(value.into_owned()),
            "limit" => limit = value.parse().unwrap_or(DEFAULT_LIMIT),
            _ => {}
        }
    }

    let channel_url = channel_url
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(ScrapeError::MissingChannelUrl)?;

    let listing_url =
        listing_url(&channel_url).ok_or_else(|| ScrapeError::InvalidChannelUrl(channel_url))?;

    Ok(ScrapeParams {
        listing_url,
        limit: limit.min(MAX_LIMIT),
    })
}

/// Provisions a session, races the pipeline against the hard deadline and
/// releases the session on every exit path, including the timeout one.
pub async fn run_scrape(
    provider: &dyn SurfaceProvider,
    params: &ScrapeParams,
    config: &PipelineConfig,
    hard_timeout_ms: u64,
) -> Result<Vec<EnrichedVideo>, ScrapeError> {
    let session = provider.provision().await?;

    let outcome = tokio::time::timeout(
        Duration::from_millis(hard_timeout_ms),
        pipeline::run(session.as_ref(), &params.listing_url, params.limit, config),
    )
    .await;

    // * In-flight work was abandoned if the race was lost; the session is
    // * still ours to release
    session.close().await;

    match outcome {
        Err(_elapsed) => Err(ScrapeError::HardTimeout(hard_timeout_ms)),
        Ok(Err(e)) => Err(ScrapeError::Provisioning(e)),
        Ok(Ok(videos)) => Ok(videos),
    }
}

/// Shared per-process server state.
pub struct ServerState {
    pub provider: Arc<dyn SurfaceProvider>,
    pub static_dir: PathBuf,
    pub pipeline: PipelineConfig,
    pub hard_timeout_ms: u64,
}

impl ServerState {
    pub fn new(provider: Arc<dyn SurfaceProvider>, static_dir: PathBuf) -> Self {
        Self {
            provider,
            static_dir,
            pipeline: PipelineConfig::default(),
            hard_timeout_ms: HARD_TIMEOUT_MS,
        }
    }
}

/// Binds and runs the HTTP server until it errors or is shut down.
pub async fn serve(addr: SocketAddr, state: Arc<ServerState>) -> Result<(), hyper::Error> {
    let make_svc = make_service_fn(move |_conn| {
        let state = Arc::clone(&state);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { route(req, state).await }
            }))
        }
    });

    let server = hyper::Server::bind(&addr).serve(make_svc);
    info!(address = %addr, "Server running");
    server.await
}

async fn route(
    req: Request<Body>,
    state: Arc<ServerState>,
) -> Result<Response<Body>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/scrape") => Ok(handle_scrape(&req, &state).await),
        (&Method::GET, "/metrics") => Ok(metrics_response()),
        (&Method::GET, "/health") => Ok(text_response(StatusCode::OK, "OK")),
        (&Method::GET, path) => Ok(statics::serve_file(&state.static_dir, path).await),
        _ => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "error": "Method not allowed" }),
        )),
    }
}

async fn handle_scrape(req: &Request<Body>, state: &ServerState) -> Response<Body> {
    let started = Instant::now();

    let params = match parse_scrape_query(req.uri().query()) {
        Ok(params) => params,
        Err(e) => {
            telemetry::record_scrape(e.metric_label());
            return json_response(e.status(), json!({ "error": e.to_string() }));
        }
    };

    info!(url = %params.listing_url, limit = params.limit, "Scrape request");

    let result = run_scrape(
        state.provider.as_ref(),
        &params,
        &state.pipeline,
        state.hard_timeout_ms,
    )
    .await;

    telemetry::record_scrape_duration(started.elapsed().as_secs_f64());

    match result {
        Ok(videos) => {
            telemetry::record_scrape("ok");
            telemetry::record_videos_returned(videos.len());
            info!(
                url = %params.listing_url,
                count = videos.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Scrape finished"
            );
            json_response(StatusCode::OK, json!({ "videos": videos }))
        }
        Err(e) => {
            telemetry::record_scrape(e.metric_label());
            error!(url = %params.listing_url, error = %e, "Scrape failed");
            json_response(e.status(), json!({ "error": e.to_string() }))
        }
    }
}

fn metrics_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(Body::from(telemetry::get_metrics_string()))
        .unwrap()
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(Body::from(body))
        .unwrap()
}

pub(crate) fn json_response(status: StatusCode, payload: serde_json::Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_requires_channel_url() {
        assert!(matches!(
            parse_scrape_query(None),
            Err(ScrapeError::MissingChannelUrl)
        ));
        assert!(matches!(
            parse_scrape_query(Some("limit=5")),
            Err(ScrapeError::MissingChannelUrl)
        ));
        assert!(matches!(
            parse_scrape_query(Some("channelUrl=")),
            Err(ScrapeError::MissingChannelUrl)
        ));
    }

    #[test]
    fn test_query_normalizes_target() {
        let params = parse_scrape_query(Some("channelUrl=example.com%2Fcreator&limit=5")).unwrap();
        assert_eq!(params.listing_url, "https://example.com/creator/shorts");
        assert_eq!(params.limit, 5);
    }

    #[test]
    fn test_query_limit_defaults_and_clamps() {
        let default = parse_scrape_query(Some("channelUrl=example.com/c")).unwrap();
        assert_eq!(default.limit, DEFAULT_LIMIT);

        let clamped = parse_scrape_query(Some("channelUrl=example.com/c&limit=9999")).unwrap();
        assert_eq!(clamped.limit, MAX_LIMIT);

        let junk = parse_scrape_query(Some("channelUrl=example.com/c&limit=abc")).unwrap();
        assert_eq!(junk.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            ScrapeError::MissingChannelUrl.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScrapeError::HardTimeout(55_000).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ScrapeError::Provisioning(crate::surface::SurfaceError::Launch("boom".into()))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_json_response_sets_cors() {
        let resp = json_response(StatusCode::OK, json!({"videos": []}));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
