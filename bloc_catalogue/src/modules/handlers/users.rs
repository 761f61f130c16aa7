use crate::modules::error::ApiError;
use crate::modules::models::request::{
    validate_payload, CurrentUser, UpdateProfileRequest, UpsertAscentRequest,
};
use crate::modules::models::response::UserResponse;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use bloc_catalogue_libs::ascent::{self, AscentStatus};
use bloc_catalogue_libs::store::model::User;
use bloc_catalogue_libs::store::Catalogue;
use std::sync::Arc;

pub async fn profile(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(current.user))
}

pub async fn update_profile(
    current: CurrentUser,
    Extension(catalogue): Extension<Arc<Catalogue>>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    validate_payload(&payload)?;

    let updated = catalogue
        .users
        .update(|users| -> Result<User, ApiError> {
            let user = find_user_mut(users, &current.user.id)?;
            if let Some(name) = &payload.name {
                user.name = name.clone();
            }
            if let Some(avatar) = &payload.avatar {
                user.avatar = Some(avatar.clone());
            }
            Ok(user.clone())
        })
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Full erasure: the user document and every session it owns disappear, no
/// tombstone is kept. The user's ratings on blocs stay, as in the original
/// catalogue.
pub async fn delete_account(
    current: CurrentUser,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<StatusCode, ApiError> {
    catalogue
        .users
        .update(|users| -> Result<(), ApiError> {
            users.retain(|u| u.id != current.user.id);
            Ok(())
        })
        .await?;

    catalogue
        .sessions
        .update(|sessions| -> Result<(), ApiError> {
            sessions.retain(|s| s.user_id != current.user.id);
            Ok(())
        })
        .await?;

    tracing::info!("erased user {}", current.user.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_favorite(
    current: CurrentUser,
    Path(bloc_id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<Json<UserResponse>, ApiError> {
    require_bloc(&catalogue, &bloc_id).await?;

    let updated = catalogue
        .users
        .update(|users| -> Result<User, ApiError> {
            let user = find_user_mut(users, &current.user.id)?;
            user.favorites.insert(bloc_id.clone());
            Ok(user.clone())
        })
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

pub async fn remove_favorite(
    current: CurrentUser,
    Path(bloc_id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<StatusCode, ApiError> {
    catalogue
        .users
        .update(|users| -> Result<(), ApiError> {
            let user = find_user_mut(users, &current.user.id)?;
            user.favorites.remove(&bloc_id);
            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_ascent(
    current: CurrentUser,
    Path(bloc_id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
    Json(payload): Json<UpsertAscentRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let status: AscentStatus = payload.status.parse()?;
    require_bloc(&catalogue, &bloc_id).await?;

    let updated = catalogue
        .users
        .update(|users| -> Result<User, ApiError> {
            let user = find_user_mut(users, &current.user.id)?;
            ascent::upsert_ascent(user, &bloc_id, status, payload.attempts);
            Ok(user.clone())
        })
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Removing an ascent that was never recorded is fine; the map just stays
/// as it was.
pub async fn remove_ascent(
    current: CurrentUser,
    Path(bloc_id): Path<String>,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<StatusCode, ApiError> {
    catalogue
        .users
        .update(|users| -> Result<(), ApiError> {
            let user = find_user_mut(users, &current.user.id)?;
            ascent::remove_ascent(user, &bloc_id);
            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn find_user_mut<'a>(users: &'a mut [User], id: &str) -> Result<&'a mut User, ApiError> {
    users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))
}

async fn require_bloc(catalogue: &Catalogue, bloc_id: &str) -> Result<(), ApiError> {
    let blocs = catalogue.blocs.load().await?;
    if !blocs.iter().any(|b| b.id == bloc_id) {
        return Err(ApiError::NotFound(format!("bloc {}", bloc_id)));
    }

    Ok(())
}
