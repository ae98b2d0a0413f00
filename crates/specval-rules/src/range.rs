use specval_core::AuthoringIssue;
use std::fmt::Display;

/// Returns an issue if `min..max` (or `min..=max` when `inclusive`) is empty.
pub(crate) fn check_range<V: PartialOrd + Display>(
    min: &V,
    max: &V,
    inclusive: bool,
) -> Option<AuthoringIssue> {
    let valid = if inclusive { min <= max } else { min < max };
    if valid {
        return None;
    }
    Some(AuthoringIssue::InvalidRange {
        min: min.to_string(),
        max: max.to_string(),
        relation: if inclusive {
            "less than or equal to"
        } else {
            "less than"
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_accepts_equal_bounds() {
        assert!(check_range(&3, &3, true).is_none());
        assert!(check_range(&3, &3, false).is_some());
    }

    #[test]
    fn reversed_bounds() {
        let issue = check_range(&5, &1, true).expect("reversed range");
        assert_eq!(
            issue.to_string(),
            "invalid range: 5 must be less than or equal to 1"
        );
    }

    #[test]
    fn nan_bounds_are_rejected() {
        assert!(check_range(&f64::NAN, &1.0, true).is_some());
    }
}
