use crate::error::CoreError;
use crate::store::model::{Ascent, User};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AscentStatus {
    Sent,
    Tried,
}

impl FromStr for AscentStatus {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sent" => Ok(AscentStatus::Sent),
            "tried" => Ok(AscentStatus::Tried),
            other => Err(CoreError::InvalidInput(format!(
                "ascent status must be `sent` or `tried`, got `{}`",
                other
            ))),
        }
    }
}

/// Records `status` and `attempts` for `bloc_id` on the user's ascent map.
/// An existing entry has both fields overwritten. `attempts` of `None` or 0
/// counts as a single attempt.
pub fn upsert_ascent(user: &mut User, bloc_id: &str, status: AscentStatus, attempts: Option<u32>) {
    let attempts = match attempts {
        Some(n) if n > 0 => n,
        _ => 1,
    };
    user.ascents
        .insert(String::from(bloc_id), Ascent { status, attempts });
}

/// Removes the ascent entry for `bloc_id` if present; absent entries are not
/// an error.
pub fn remove_ascent(user: &mut User, bloc_id: &str) {
    user.ascents.remove(bloc_id);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::model::Role;

    fn climber() -> User {
        User::new(
            String::from("alice@example.com"),
            String::from("$argon2id$stub"),
            String::from("Alice"),
            Role::User,
        )
    }

    #[test]
    fn status_parses_the_two_known_labels_only() {
        assert_eq!("sent".parse::<AscentStatus>().unwrap(), AscentStatus::Sent);
        assert_eq!(
            "tried".parse::<AscentStatus>().unwrap(),
            AscentStatus::Tried
        );

        assert!("flashed".parse::<AscentStatus>().is_err());
        assert!("Sent".parse::<AscentStatus>().is_err());
        assert!("".parse::<AscentStatus>().is_err());
    }

    #[test]
    fn missing_or_zero_attempts_default_to_one() {
        let mut user = climber();

        upsert_ascent(&mut user, "b1", AscentStatus::Tried, None);
        assert_eq!(user.ascents["b1"].attempts, 1);

        upsert_ascent(&mut user, "b2", AscentStatus::Sent, Some(0));
        assert_eq!(user.ascents["b2"].attempts, 1);

        upsert_ascent(&mut user, "b3", AscentStatus::Sent, Some(4));
        assert_eq!(user.ascents["b3"].attempts, 4);
    }

    #[test]
    fn upsert_overwrites_both_fields() {
        let mut user = climber();

        upsert_ascent(&mut user, "b1", AscentStatus::Tried, Some(3));
        upsert_ascent(&mut user, "b1", AscentStatus::Sent, Some(5));

        assert_eq!(user.ascents.len(), 1);
        assert_eq!(
            user.ascents["b1"],
            Ascent {
                status: AscentStatus::Sent,
                attempts: 5
            }
        );
    }

    #[test]
    fn upsert_then_remove_round_trips_to_the_prior_map() {
        let mut user = climber();
        upsert_ascent(&mut user, "b1", AscentStatus::Sent, Some(2));
        let before = user.ascents.clone();

        upsert_ascent(&mut user, "b2", AscentStatus::Tried, None);
        remove_ascent(&mut user, "b2");

        assert_eq!(user.ascents, before);
    }

    #[test]
    fn remove_of_absent_entry_is_a_no_op() {
        let mut user = climber();
        remove_ascent(&mut user, "nope");
        assert!(user.ascents.is_empty());
    }
}
