use crate::modules::handlers::{auth, blocs, liveness, readiness, users};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use bloc_catalogue_libs::store::Catalogue;
use clap::Args;
use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let data_dir = match env::var("DATA_DIR") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            tracing::warn!(
                "DATA_DIR environment variable is not set. Default value `./data` will be used."
            );
            PathBuf::from("./data")
        }
    };

    tracing::info!("Open catalogue store at {}", data_dir.display());
    let catalogue = Catalogue::new(&data_dir);
    catalogue.ensure_data_dir().await.with_context(|| {
        let message = format!("couldn't create data directory {}", data_dir.display());
        tracing::error!(message);
        message
    })?;
    catalogue.ping().await.with_context(|| {
        let message = format!(
            "catalogue store at {} is not available. check the value of the DATA_DIR environment variable.",
            data_dir.display()
        );
        tracing::error!(message);
        message
    })?;

    let app = create_router(catalogue);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}

fn create_router(catalogue: Catalogue) -> Router {
    Router::new()
        .route("/api/register", routing::post(auth::register))
        .route("/api/login", routing::post(auth::login))
        .route("/api/logout", routing::post(auth::logout))
        .route(
            "/api/blocs",
            routing::get(blocs::list_blocs).post(blocs::create_bloc),
        )
        .route(
            "/api/blocs/:id",
            routing::get(blocs::get_bloc).delete(blocs::delete_bloc),
        )
        .route(
            "/api/blocs/:id/ratings",
            routing::get(blocs::bloc_ratings).post(blocs::rate_bloc),
        )
        .route(
            "/api/users/me",
            routing::get(users::profile)
                .put(users::update_profile)
                .delete(users::delete_account),
        )
        .route(
            "/api/users/me/favorites/:bloc_id",
            routing::put(users::add_favorite).delete(users::remove_favorite),
        )
        .route(
            "/api/users/me/ascents/:bloc_id",
            routing::put(users::upsert_ascent).delete(users::remove_ascent),
        )
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .layer(Extension(Arc::new(catalogue)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}
