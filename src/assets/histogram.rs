//! Status counts for dashboard rows and totals.

use std::ops::AddAssign;

use crate::model::AssetStatus;

const STATUS_COUNT: usize = 6;

/// Count of items per [`AssetStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusHistogram {
    counts: [usize; STATUS_COUNT],
}

impl StatusHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one item with `status`.
    pub fn add(&mut self, status: AssetStatus) {
        self.counts[status.index()] += 1;
    }

    /// Count for a status.
    pub fn get(&self, status: AssetStatus) -> usize {
        self.counts[status.index()]
    }

    /// Total items counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Check if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero (status, count) pairs in dashboard order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetStatus, usize)> + '_ {
        AssetStatus::all()
            .iter()
            .map(|s| (*s, self.get(*s)))
            .filter(|(_, n)| *n > 0)
    }

    /// Summary status of the counted items.
    pub fn row_status(&self) -> RowStatus {
        let mut present = self.iter();
        match (present.next(), present.next()) {
            (None, _) => RowStatus::Empty,
            (Some((status, _)), None) => RowStatus::Uniform(status),
            _ => RowStatus::Mixed,
        }
    }
}

impl AddAssign for StatusHistogram {
    fn add_assign(&mut self, other: Self) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
    }
}

impl FromIterator<AssetStatus> for StatusHistogram {
    fn from_iter<I: IntoIterator<Item = AssetStatus>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for status in iter {
            histogram.add(status);
        }
        histogram
    }
}

/// Status shown in a row's status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// Row has no items
    Empty,
    /// Every item has the same status
    Uniform(AssetStatus),
    /// Items differ
    Mixed,
}

impl RowStatus {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            RowStatus::Empty => "-",
            RowStatus::Uniform(status) => status.name(),
            RowStatus::Mixed => "Mixed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_total() {
        let h: StatusHistogram = [
            AssetStatus::Pending,
            AssetStatus::Installed,
            AssetStatus::Installed,
        ]
        .into_iter()
        .collect();

        assert_eq!(h.get(AssetStatus::Installed), 2);
        assert_eq!(h.get(AssetStatus::Removed), 0);
        assert_eq!(h.total(), 3);
        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![(AssetStatus::Pending, 1), (AssetStatus::Installed, 2)]
        );
    }

    #[test]
    fn test_row_status() {
        assert_eq!(StatusHistogram::new().row_status(), RowStatus::Empty);

        let uniform: StatusHistogram = [AssetStatus::Printed; 3].into_iter().collect();
        assert_eq!(uniform.row_status(), RowStatus::Uniform(AssetStatus::Printed));

        let mut mixed = uniform;
        mixed.add(AssetStatus::Damaged);
        assert_eq!(mixed.row_status(), RowStatus::Mixed);
        assert_eq!(mixed.row_status().label(), "Mixed");
    }

    #[test]
    fn test_add_assign() {
        let mut a: StatusHistogram = [AssetStatus::Pending].into_iter().collect();
        let b: StatusHistogram = [AssetStatus::Pending, AssetStatus::Ordered]
            .into_iter()
            .collect();
        a += b;
        assert_eq!(a.get(AssetStatus::Pending), 2);
        assert_eq!(a.total(), 3);
    }
}
