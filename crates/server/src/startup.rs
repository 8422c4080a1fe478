use std::process::ExitCode;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use models::db::Db;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::StartupError;
use crate::routes::{build_collection_router, build_tires_router};
use crate::state::{CollectionState, TiresState};

/// Which of the two backends a process serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceKind {
    Collection,
    Tires,
}

impl ServiceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Collection => "collection",
            ServiceKind::Tires => "tires",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServiceKind::Collection => 8001,
            ServiceKind::Tires => 8000,
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

pub fn load_config(kind: ServiceKind) -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate(kind.default_port()).map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Router for `kind` over an already connected database.
pub fn build_app(kind: ServiceKind, db: Db, cfg: &AppConfig) -> Router {
    match kind {
        ServiceKind::Collection => build_collection_router(
            CollectionState::new(db, cfg.validation),
            build_cors(),
            cfg.server.max_upload_bytes,
        ),
        ServiceKind::Tires => build_tires_router(TiresState::new(db), build_cors()),
    }
}

/// Connect, build the router and serve until the listener fails.
pub async fn run(kind: ServiceKind, cfg: AppConfig) -> Result<(), StartupError> {
    let db = Db::connect(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let app = build_app(kind, db, &cfg);

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr).await.map_err(anyhow::Error::from)?;
    info!(service = kind.name(), %addr, "listening");
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}

/// Process entry shared by the two binaries: logging, panic hook, runtime
/// sized from config, Ctrl+C handling.
pub fn launch(kind: ServiceKind) -> ExitCode {
    dotenv().ok();
    init_logging_from_env();
    let service = kind.name();
    info!(service, event = "logger_init", "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let cfg = match load_config(kind) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service, event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "service starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(async move {
            run(kind, cfg).await.inspect_err(|e| {
                error!(service, event = "run_failed", error = %e, "server run returned error");
            })
        });

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service, event = "stop", %service_id, pid, "server stopped normally");
                    ExitCode::SUCCESS
                }
                Ok(Err(_)) => ExitCode::FAILURE,
                Err(e) => {
                    error!(service, event = "task_join_error", error = %e, "server task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service, event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
