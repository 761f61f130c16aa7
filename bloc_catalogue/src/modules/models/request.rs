use crate::modules::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use bloc_catalogue_libs::grade;
use bloc_catalogue_libs::store::model::{Hold, User};
use bloc_catalogue_libs::store::Catalogue;
use http::request::Parts;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use validator::{Validate, ValidationError};

static VALID_SORT_OPTIONS: Lazy<HashSet<&str>> =
    Lazy::new(|| HashSet::from(["rating", "-rating", "grade", "-grade"]));

fn validate_sort_field(value: &str) -> Result<(), ValidationError> {
    if VALID_SORT_OPTIONS.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid sort field"))
    }
}

// Grade bounds and bloc grades must come from the fixed scale; the empty
// string is the "no bound" / "ungraded" value the catalogue UI submits.
fn validate_grade_label(value: &str) -> Result<(), ValidationError> {
    if grade::is_valid(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid grade label"))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Default)]
pub struct CatalogueQueryParameters {
    #[validate(custom = "validate_grade_label")]
    pub min_grade: Option<String>,
    #[validate(custom = "validate_grade_label")]
    pub max_grade: Option<String>,
    #[validate(custom = "validate_sort_field")]
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlocRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub holds: Vec<Hold>,
    #[validate(custom = "validate_grade_label")]
    pub grade: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RateBlocRequest {
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpsertAscentRequest {
    pub status: String,
    pub attempts: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

/// Runs validator rules on a JSON payload, folding violations into one
/// `InvalidInput` line.
pub fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|rejection| {
        tracing::error!("Validation error: {}", rejection);
        ApiError::InvalidInput(format!("{}", rejection).replace('\n', ", "))
    })
}

/// Query-string extractor that deserializes and validates in one step.
pub struct Validated<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Validated<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            ApiError::InvalidInput(format!("invalid format query string: [{}]", rejection))
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            ApiError::InvalidInput(format!("{}", rejection).replace('\n', ", "))
        })?;

        Ok(Validated(value))
    }
}

/// Resolves the bearer token in the `Authorization` header to a stored
/// session and its user. Missing or unknown tokens are a 401, never a 500.
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(String::from)
            .ok_or(ApiError::Unauthorized)?;

        let catalogue = parts
            .extensions
            .get::<Arc<Catalogue>>()
            .cloned()
            .ok_or_else(|| {
                ApiError::Internal(String::from("catalogue extension is not installed"))
            })?;

        let sessions = catalogue.sessions.load().await?;
        let session = sessions
            .into_iter()
            .find(|s| s.token == token)
            .ok_or(ApiError::Unauthorized)?;

        let users = catalogue.users.load().await?;
        let user = users
            .into_iter()
            .find(|u| u.id == session.user_id)
            .ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser { user, token })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalogue_query_deserializes_from_a_query_string() {
        let params: CatalogueQueryParameters =
            serde_urlencoded::from_str("min_grade=6A&max_grade=7A&sort=-rating").unwrap();

        let expected = CatalogueQueryParameters {
            min_grade: Some(String::from("6A")),
            max_grade: Some(String::from("7A")),
            sort: Some(String::from("-rating")),
        };
        assert_eq!(params, expected);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn empty_query_string_means_no_filtering() {
        let params: CatalogueQueryParameters = serde_urlencoded::from_str("").unwrap();
        assert_eq!(params, CatalogueQueryParameters::default());
    }

    #[test]
    fn empty_grade_bounds_are_accepted() {
        let params: CatalogueQueryParameters =
            serde_urlencoded::from_str("min_grade=7A&max_grade=").unwrap();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn unknown_grade_bound_is_rejected() {
        let params: CatalogueQueryParameters =
            serde_urlencoded::from_str("min_grade=9Z").unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let params: CatalogueQueryParameters =
            serde_urlencoded::from_str("sort=name").unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn register_payload_enforces_email_and_password_rules() {
        let valid = RegisterRequest {
            email: String::from("alice@example.com"),
            name: String::from("Alice"),
            password: String::from("longenough"),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: String::from("not-an-email"),
            ..register_fixture()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: String::from("short"),
            ..register_fixture()
        };
        assert!(short_password.validate().is_err());
    }

    fn register_fixture() -> RegisterRequest {
        RegisterRequest {
            email: String::from("alice@example.com"),
            name: String::from("Alice"),
            password: String::from("longenough"),
        }
    }

    #[test]
    fn bloc_payload_requires_at_least_one_hold() {
        let payload = CreateBlocRequest {
            name: String::from("Slab left"),
            description: None,
            holds: Vec::new(),
            grade: Some(String::from("6A")),
        };
        assert!(payload.validate().is_err());
    }
}
