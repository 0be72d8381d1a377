//! Inclusive date windows for report queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive `[from, to]` window at day granularity. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// Lower bound (inclusive).
    pub from: Option<NaiveDate>,
    /// Upper bound (inclusive).
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    /// A window with no bounds, covering all dates.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// A window bounded on both sides.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether a day falls inside the window.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let w = DateWindow::unbounded();
        assert!(w.contains(d("1990-01-01")));
        assert!(w.contains(d("2050-12-31")));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let w = DateWindow::new(d("2024-01-01"), d("2024-01-31"));
        assert!(w.contains(d("2024-01-01")));
        assert!(w.contains(d("2024-01-31")));
        assert!(!w.contains(d("2023-12-31")));
        assert!(!w.contains(d("2024-02-01")));
    }

    #[test]
    fn test_half_open_windows() {
        let from_only = DateWindow {
            from: Some(d("2024-01-01")),
            to: None,
        };
        assert!(from_only.contains(d("2030-01-01")));
        assert!(!from_only.contains(d("2023-12-31")));

        let to_only = DateWindow {
            from: None,
            to: Some(d("2024-01-31")),
        };
        assert!(to_only.contains(d("1990-01-01")));
        assert!(!to_only.contains(d("2024-02-01")));
    }
}
