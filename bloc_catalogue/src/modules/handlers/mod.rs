pub mod auth;
pub mod blocs;
pub mod users;

use axum::{extract::Extension, http::StatusCode};
use bloc_catalogue_libs::store::Catalogue;
use std::sync::Arc;

pub async fn liveness(Extension(catalogue): Extension<Arc<Catalogue>>) -> StatusCode {
    match catalogue.ping().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn readiness(Extension(catalogue): Extension<Arc<Catalogue>>) -> StatusCode {
    let blocs_ok = catalogue.blocs.load().await.is_ok();
    let users_ok = catalogue.users.load().await.is_ok();
    let sessions_ok = catalogue.sessions.load().await.is_ok();

    if [blocs_ok, users_ok, sessions_ok].iter().all(|ok| *ok) {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
