use bloc_catalogue_libs::store::model::{Ascent, Bloc, Role, User};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Serialize)]
pub struct CatalogueResponse {
    pub stats: CatalogueStats,
    pub items: Vec<Bloc>,
}

#[derive(Debug, Serialize)]
pub struct CatalogueStats {
    pub time: u32,
    pub total: u32,
    pub count: u32,
    pub params: Value,
}

/// The user document as the API exposes it. The password hash never leaves
/// the store; this view is the only user shape handlers return.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub favorites: BTreeSet<String>,
    pub ascents: BTreeMap<String, Ascent>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            role: user.role,
            favorites: user.favorites,
            ascents: user.ascents,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_response_never_carries_the_password_hash() {
        let user = User::new(
            String::from("alice@example.com"),
            String::from("$argon2id$secret"),
            String::from("Alice"),
            Role::Admin,
        );

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
