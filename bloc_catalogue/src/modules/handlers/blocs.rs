use crate::modules::error::ApiError;
use crate::modules::models::request::{
    validate_payload, CatalogueQueryParameters, CreateBlocRequest, CurrentUser, RateBlocRequest,
    Validated,
};
use crate::modules::models::response::{CatalogueResponse, CatalogueStats};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use bloc_catalogue_libs::catalogue::{self, SortOrder};
use bloc_catalogue_libs::rating::{self, RatingSummary};
use bloc_catalogue_libs::store::model::{Bloc, Role};
use bloc_catalogue_libs::store::Catalogue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;

pub async fn list_blocs(
    Validated(params): Validated<CatalogueQueryParameters>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<Json<CatalogueResponse>, ApiError> {
    let start_process = Instant::now();

    let blocs = catalogue.blocs.load().await?;
    let total = blocs.len() as u32;

    let blocs = catalogue::filter_by_grade(
        blocs,
        params.min_grade.as_deref(),
        params.max_grade.as_deref(),
    );

    let blocs = match params.sort.as_deref() {
        Some("rating") | Some("-rating") => {
            let averages: HashMap<String, RatingSummary> = blocs
                .iter()
                .map(|b| (b.id.clone(), rating::average(b)))
                .collect();
            let order = if params.sort.as_deref() == Some("rating") {
                SortOrder::Asc
            } else {
                SortOrder::Desc
            };
            catalogue::sort_by_rating(blocs, &averages, order)
        }
        Some("grade") => catalogue::sort_by_grade(blocs, SortOrder::Asc),
        Some("-grade") => catalogue::sort_by_grade(blocs, SortOrder::Desc),
        _ => blocs,
    };

    let time = Instant::now().duration_since(start_process).as_millis() as u32;
    let count = blocs.len() as u32;
    tracing::info!(
        target: "querylog",
        "elapsed_time={} hits={} params={}",
        time, count, serde_json::to_string(&params).unwrap_or(String::from(""))
    );

    let stats = CatalogueStats {
        time,
        total,
        count,
        params: serde_json::json!(params),
    };

    Ok(Json(CatalogueResponse {
        stats,
        items: blocs,
    }))
}

pub async fn get_bloc(
    Path(id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<Json<Bloc>, ApiError> {
    let blocs = catalogue.blocs.load().await?;
    let bloc = blocs
        .into_iter()
        .find(|b| b.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("bloc {}", id)))?;

    Ok(Json(bloc))
}

pub async fn create_bloc(
    _current: CurrentUser,
    Extension(catalogue): Extension<Arc<Catalogue>>,
    Json(payload): Json<CreateBlocRequest>,
) -> Result<(StatusCode, Json<Bloc>), ApiError> {
    validate_payload(&payload)?;

    let bloc = Bloc::new(
        payload.name,
        payload.description.unwrap_or_default(),
        payload.holds,
        payload.grade.unwrap_or_default(),
    );
    let created = bloc.clone();
    catalogue
        .blocs
        .update(|blocs| -> Result<(), ApiError> {
            blocs.push(bloc);
            Ok(())
        })
        .await?;

    tracing::info!("created bloc {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Admin-only. Also scrubs the bloc from every user's favorites and ascents
/// so user documents never point at a bloc that no longer exists.
pub async fn delete_bloc(
    current: CurrentUser,
    Path(id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<StatusCode, ApiError> {
    if current.user.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }

    catalogue
        .blocs
        .update(|blocs| -> Result<(), ApiError> {
            let before = blocs.len();
            blocs.retain(|b| b.id != id);
            if blocs.len() == before {
                return Err(ApiError::NotFound(format!("bloc {}", id)));
            }
            Ok(())
        })
        .await?;

    catalogue
        .users
        .update(|users| -> Result<(), ApiError> {
            for user in users.iter_mut() {
                user.favorites.remove(&id);
                user.ascents.remove(&id);
            }
            Ok(())
        })
        .await?;

    tracing::info!("deleted bloc {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rate_bloc(
    current: CurrentUser,
    Path(id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
    Json(payload): Json<RateBlocRequest>,
) -> Result<Json<RatingSummary>, ApiError> {
    let summary = catalogue
        .blocs
        .update(|blocs| -> Result<RatingSummary, ApiError> {
            let bloc = blocs
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| ApiError::NotFound(format!("bloc {}", id)))?;

            rating::upsert_rating(bloc, &current.user.id, payload.score)?;
            Ok(rating::average(bloc))
        })
        .await?;

    Ok(Json(summary))
}

pub async fn bloc_ratings(
    Path(id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<Json<RatingSummary>, ApiError> {
    let blocs = catalogue.blocs.load().await?;
    let bloc = blocs
        .iter()
        .find(|b| b.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("bloc {}", id)))?;

    Ok(Json(rating::average(bloc)))
}
