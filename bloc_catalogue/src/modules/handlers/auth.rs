use crate::modules::error::ApiError;
use crate::modules::models::request::{
    validate_payload, CurrentUser, LoginRequest, RegisterRequest,
};
use crate::modules::models::response::{LoginResponse, UserResponse};
use axum::{extract::Extension, http::StatusCode, Json};
use bloc_catalogue_libs::auth;
use bloc_catalogue_libs::store::model::{Role, Session, User};
use bloc_catalogue_libs::store::Catalogue;
use chrono::Utc;
use std::sync::Arc;

pub async fn register(
    Extension(catalogue): Extension<Arc<Catalogue>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_payload(&payload)?;

    let password_hash =
        auth::hash_password(&payload.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let created = catalogue
        .users
        .update(|users| -> Result<User, ApiError> {
            if users.iter().any(|u| u.email == payload.email) {
                return Err(ApiError::Conflict(format!(
                    "email {} is already registered",
                    payload.email
                )));
            }

            // The first account on a fresh catalogue belongs to the gym and
            // gets the admin role. The role is never reassigned afterwards.
            let role = if users.is_empty() {
                Role::Admin
            } else {
                Role::User
            };
            let user = User::new(
                payload.email.clone(),
                password_hash.clone(),
                payload.name.clone(),
                role,
            );
            users.push(user.clone());
            Ok(user)
        })
        .await?;

    tracing::info!("registered user {}", created.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

pub async fn login(
    Extension(catalogue): Extension<Arc<Catalogue>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let users = catalogue.users.load().await?;
    let user = users
        .into_iter()
        .find(|u| u.email == payload.email)
        .ok_or(ApiError::Unauthorized)?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let session = Session {
        token: auth::generate_token(),
        user_id: user.id.clone(),
        created_at: Utc::now(),
    };
    let token = session.token.clone();
    catalogue
        .sessions
        .update(|sessions| -> Result<(), ApiError> {
            sessions.push(session);
            Ok(())
        })
        .await?;

    tracing::info!("user {} logged in", user.id);
    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

pub async fn logout(
    current: CurrentUser,
    Extension(catalogue): Extension<Arc<Catalogue>>,
) -> Result<StatusCode, ApiError> {
    catalogue
        .sessions
        .update(|sessions| -> Result<(), ApiError> {
            sessions.retain(|s| s.token != current.token);
            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
