use crate::ascent::AscentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoldKind {
    Start,
    Finish,
    Middle,
    FootMarker,
}

/// A numbered point on the wall. `number` gives the intended sequence of the
/// bloc, `kind` tags how the hold may be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    pub number: u32,
    pub kind: HoldKind,
}

/// One user's score for a bloc. A bloc holds at most one entry per user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bloc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub holds: Vec<Hold>,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl Bloc {
    pub fn new(name: String, description: String, holds: Vec<Hold>, grade: String) -> Self {
        Bloc {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            holds,
            grade,
            ratings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// A user's recorded state for one bloc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ascent {
    pub status: AscentStatus,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub favorites: BTreeSet<String>,
    #[serde(default)]
    pub ascents: BTreeMap<String, Ascent>,
}

impl User {
    /// The role is decided here, at creation, and no operation reassigns it.
    pub fn new(email: String, password_hash: String, name: String, role: Role) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            name,
            avatar: None,
            role,
            favorites: BTreeSet::new(),
            ascents: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
