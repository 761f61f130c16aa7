use crate::grade::rank;
use crate::rating::RatingSummary;
use crate::store::model::Bloc;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

// An empty-string bound means "no bound", matching how the catalogue UI
// submits the range selects.
fn bound(grade: Option<&str>) -> Option<usize> {
    match grade {
        Some(g) if !g.is_empty() => Some(rank(g)),
        _ => None,
    }
}

/// Keeps the blocs whose grade rank falls inside the inclusive
/// `[min, max]` range; one-sided when only one bound is given, and the
/// whole input when neither is. The filter is stable: output order is input
/// order. An unrecognized bloc grade ranks 0, so ungraded blocs pass any
/// filter whose lower bound is absent or minimal.
pub fn filter_by_grade(mut blocs: Vec<Bloc>, min: Option<&str>, max: Option<&str>) -> Vec<Bloc> {
    match (bound(min), bound(max)) {
        (Some(lo), Some(hi)) => blocs.retain(|b| {
            let r = rank(&b.grade);
            r >= lo && r <= hi
        }),
        (Some(lo), None) => blocs.retain(|b| rank(&b.grade) >= lo),
        (None, Some(hi)) => blocs.retain(|b| rank(&b.grade) <= hi),
        (None, None) => {}
    }
    blocs
}

/// Orders blocs by average rating. A bloc with no rating counts as 0 for
/// the comparison. Ties keep their relative input order.
pub fn sort_by_rating(
    mut blocs: Vec<Bloc>,
    averages: &HashMap<String, RatingSummary>,
    order: SortOrder,
) -> Vec<Bloc> {
    blocs.sort_by(|a, b| {
        let ra = averages.get(&a.id).and_then(|s| s.mean).unwrap_or(0.0);
        let rb = averages.get(&b.id).and_then(|s| s.mean).unwrap_or(0.0);
        match order {
            SortOrder::Asc => ra.total_cmp(&rb),
            SortOrder::Desc => rb.total_cmp(&ra),
        }
    });
    blocs
}

/// Orders blocs by grade rank with the same tie-breaking rule as
/// [`sort_by_rating`].
pub fn sort_by_grade(mut blocs: Vec<Bloc>, order: SortOrder) -> Vec<Bloc> {
    blocs.sort_by(|a, b| {
        let ra = rank(&a.grade);
        let rb = rank(&b.grade);
        match order {
            SortOrder::Asc => ra.cmp(&rb),
            SortOrder::Desc => rb.cmp(&ra),
        }
    });
    blocs
}
