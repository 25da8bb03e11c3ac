use axum::{
    Json, Router,
    routing::{get, post},
};
use panel_prep::input::Job;
use panel_prep::marking::{self, MarkingConfig, MarkingPanel};
use panel_prep::pipeline::{Pipeline, TracingObserver};
use panel_prep::types::NormalizedPart;
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrepareResponse {
    parts: Vec<NormalizedPart>,
    part_count: usize,
    locked_count: usize,
}

#[derive(Deserialize, Serialize)]
struct MarkingRequest {
    panels: Vec<MarkingPanel>,
}

#[derive(Serialize)]
struct MarkingEntry {
    index: usize,
    id: Option<String>,
    marking: MarkingConfig,
}

async fn prepare(Json(job): Json<Job>) -> Json<PrepareResponse> {
    tracing::info!(
        body = serde_json::to_string(&job).unwrap_or_default(),
        "POST /prepare"
    );

    let grain = job.grain_preferences();

    let parts = Pipeline::new(&grain)
        .with_observer(&TracingObserver)
        .prepare(&job.panels);
    let locked_count = parts.iter().filter(|p| !p.rotation_allowed()).count();

    Json(PrepareResponse {
        part_count: parts.len(),
        locked_count,
        parts,
    })
}

/// Ineligible panels are left out of the response.
async fn markings(Json(req): Json<MarkingRequest>) -> Json<Vec<MarkingEntry>> {
    tracing::info!(panels = req.panels.len(), "POST /marking");

    let entries = req
        .panels
        .into_iter()
        .enumerate()
        .filter_map(|(index, panel)| {
            marking::resolve(&panel).map(|marking| MarkingEntry {
                index,
                id: panel.id,
                marking,
            })
        })
        .collect();
    Json(entries)
}

#[tokio::main]
async fn main() {
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: failed to open development.log: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_ansi(false)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/prepare", post(prepare))
        .route("/marking", post(markings))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("Listening on {addr}");
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Error: server stopped: {e}");
        std::process::exit(1);
    }
}
