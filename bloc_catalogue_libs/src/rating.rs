use crate::error::CoreError;
use crate::store::model::{Bloc, Rating};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub mean: Option<f64>,
    pub count: usize,
}

/// Records `score` for `user_id` on the bloc. An existing entry for the user
/// is overwritten in place, so applying the same pair twice leaves a single
/// entry. Scores outside 1..=5 are rejected before anything is touched.
pub fn upsert_rating(bloc: &mut Bloc, user_id: &str, score: i64) -> Result<(), CoreError> {
    if !(1..=5).contains(&score) {
        return Err(CoreError::InvalidInput(format!(
            "score must be an integer between 1 and 5, got {}",
            score
        )));
    }
    let score = score as u8;

    match bloc.ratings.iter_mut().find(|r| r.user_id == user_id) {
        Some(rating) => rating.score = score,
        None => bloc.ratings.push(Rating {
            user_id: String::from(user_id),
            score,
        }),
    }

    Ok(())
}

/// Mean and count of the bloc's ratings. Zero ratings yields no mean rather
/// than a zero mean, so callers can tell "unrated" from "rated 0".
pub fn average(bloc: &Bloc) -> RatingSummary {
    let count = bloc.ratings.len();
    if count == 0 {
        return RatingSummary {
            mean: None,
            count: 0,
        };
    }

    let sum: u32 = bloc.ratings.iter().map(|r| u32::from(r.score)).sum();
    RatingSummary {
        mean: Some(f64::from(sum) / count as f64),
        count,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bloc() -> Bloc {
        Bloc::new(
            String::from("Traverse"),
            String::new(),
            Vec::new(),
            String::from("6B"),
        )
    }

    #[test]
    fn average_of_three_and_four_is_three_point_five() {
        let mut bloc = bloc();
        upsert_rating(&mut bloc, "u1", 3).unwrap();
        upsert_rating(&mut bloc, "u2", 4).unwrap();

        let summary = average(&bloc);
        assert_eq!(summary.mean, Some(3.5));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn average_of_no_ratings_has_no_mean() {
        let summary = average(&bloc());
        assert_eq!(summary.mean, None);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn upsert_is_idempotent_per_user() {
        let mut bloc = bloc();
        upsert_rating(&mut bloc, "u1", 4).unwrap();
        upsert_rating(&mut bloc, "u1", 4).unwrap();

        assert_eq!(bloc.ratings.len(), 1);
        assert_eq!(bloc.ratings[0].score, 4);
    }

    #[test]
    fn upsert_overwrites_the_previous_score() {
        let mut bloc = bloc();
        upsert_rating(&mut bloc, "u1", 2).unwrap();
        upsert_rating(&mut bloc, "u1", 5).unwrap();

        assert_eq!(bloc.ratings.len(), 1);
        assert_eq!(average(&bloc).mean, Some(5.0));
    }

    #[test]
    fn scores_outside_the_scale_are_rejected() {
        let mut bloc = bloc();
        assert!(upsert_rating(&mut bloc, "u1", 0).is_err());
        assert!(upsert_rating(&mut bloc, "u1", 6).is_err());
        assert!(upsert_rating(&mut bloc, "u1", -3).is_err());
        assert!(bloc.ratings.is_empty());
    }
}
