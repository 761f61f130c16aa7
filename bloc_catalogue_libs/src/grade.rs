use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The fixed Fontainebleau-style difficulty scale. The empty string is the
/// "ungraded" sentinel and sits at index 0.
pub const GRADES: [&str; 22] = [
    "", "3", "4", "5", "6A", "6A+", "6B", "6B+", "6C", "6C+", "7A", "7A+", "7B", "7B+", "7C",
    "7C+", "8A", "8A+", "8B", "8B+", "8C", "8C+",
];

static GRADE_ORDER: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    GRADES
        .iter()
        .enumerate()
        .filter(|(_, grade)| !grade.is_empty())
        .map(|(index, grade)| (*grade, index))
        .collect()
});

/// Position of `grade` on the fixed scale. Unrecognized or empty input maps
/// to 0, so an ungraded bloc sorts below every graded one.
pub fn rank(grade: &str) -> usize {
    GRADE_ORDER.get(grade).copied().unwrap_or(0)
}

/// Whether `grade` is a label the scale knows, the empty sentinel included.
pub fn is_valid(grade: &str) -> bool {
    grade.is_empty() || GRADE_ORDER.contains_key(grade)
}
