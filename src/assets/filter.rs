//! Dashboard tab filters.

use serde::{Deserialize, Serialize};

use crate::assets::histogram::StatusHistogram;
use crate::assets::rows::{DesignRow, SignRow, StandRow};
use crate::model::{AssetStatus, names_match};

/// A row that can be searched and filtered on the dashboard.
pub trait DashboardRow {
    /// Text columns matched by the search box.
    fn search_text(&self) -> Vec<&str>;

    /// Value matched by the type filter.
    fn type_name(&self) -> &str;

    /// Status counts of the row.
    fn statuses(&self) -> &StatusHistogram;
}

impl DashboardRow for SignRow {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.type_name.as_str(), self.direction.name()];
        text.extend(self.sub_type_name.as_deref());
        text.extend(self.notes.as_deref());
        text
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn statuses(&self) -> &StatusHistogram {
        &self.statuses
    }
}

impl DashboardRow for StandRow {
    fn search_text(&self) -> Vec<&str> {
        vec![self.holder_name.as_str()]
    }

    /// Stands are filtered by holder type.
    fn type_name(&self) -> &str {
        &self.holder_name
    }

    fn statuses(&self) -> &StatusHistogram {
        &self.statuses
    }
}

impl DashboardRow for DesignRow {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.type_name.as_str()];
        text.extend(self.sub_type_name.as_deref());
        text
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn statuses(&self) -> &StatusHistogram {
        &self.statuses
    }
}

/// Search, status and type filter of one dashboard tab.
///
/// Unset fields match everything. A status filter keeps rows with at least
/// one item in that status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl DashboardFilter {
    /// Create a filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Check if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none() && self.status.is_none() && self.type_term().is_none()
    }

    /// Check a single row.
    pub fn matches<R: DashboardRow>(&self, row: &R) -> bool {
        if let Some(status) = self.status
            && row.statuses().get(status) == 0
        {
            return false;
        }

        if let Some(type_name) = self.type_term()
            && !names_match(row.type_name(), type_name)
        {
            return false;
        }

        match self.search_term() {
            Some(term) => {
                let term = term.to_lowercase();
                row.search_text()
                    .iter()
                    .any(|text| text.to_lowercase().contains(&term))
            }
            None => true,
        }
    }

    /// Matching rows, in their original order.
    pub fn apply<'a, R: DashboardRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn type_term(&self) -> Option<&str> {
        self.type_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    Signs,
    Stands,
    Designs,
}

impl DashboardTab {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            DashboardTab::Signs => "Signs",
            DashboardTab::Stands => "Stands",
            DashboardTab::Designs => "Designs",
        }
    }

    /// All tabs in display order.
    pub fn all() -> &'static [DashboardTab] {
        &[DashboardTab::Signs, DashboardTab::Stands, DashboardTab::Designs]
    }

    fn index(&self) -> usize {
        match self {
            DashboardTab::Signs => 0,
            DashboardTab::Stands => 1,
            DashboardTab::Designs => 2,
        }
    }
}

/// One independent filter per tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabFilters {
    filters: [DashboardFilter; 3],
}

impl TabFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tab: DashboardTab) -> &DashboardFilter {
        &self.filters[tab.index()]
    }

    pub fn get_mut(&mut self, tab: DashboardTab) -> &mut DashboardFilter {
        &mut self.filters[tab.index()]
    }

    pub fn set(&mut self, tab: DashboardTab, filter: DashboardFilter) {
        self.filters[tab.index()] = filter;
    }

    /// Reset every tab's filter.
    pub fn clear(&mut self) {
        self.filters = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn sign(type_name: &str, notes: Option<&str>, statuses: &[AssetStatus]) -> SignRow {
        SignRow {
            type_name: type_name.to_string(),
            sub_type_name: None,
            direction: Direction::Left,
            notes: notes.map(str::to_string),
            color: "#000000".to_string(),
            icon: None,
            quantity: statuses.len(),
            statuses: statuses.iter().copied().collect(),
            annotation_ids: Vec::new(),
        }
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let rows = vec![sign("Exit", None, &[]), sign("Bar", None, &[])];
        let filter = DashboardFilter::new().with_search("   ");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&rows).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_over_columns() {
        let rows = vec![
            sign("Exit", Some("North Gate"), &[]),
            sign("Tickets", None, &[]),
        ];
        let by_notes = DashboardFilter::new().with_search("north");
        assert_eq!(by_notes.apply(&rows).len(), 1);

        let by_direction = DashboardFilter::new().with_search("LEFT");
        assert_eq!(by_direction.apply(&rows).len(), 2);
    }

    #[test]
    fn test_status_filter_uses_histogram() {
        let rows = vec![
            sign("Exit", None, &[AssetStatus::Pending, AssetStatus::Installed]),
            sign("Bar", None, &[AssetStatus::Pending]),
        ];
        let filter = DashboardFilter::new().with_status(AssetStatus::Installed);
        let matched = filter.apply(&rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].type_name, "Exit");
    }

    #[test]
    fn test_type_filter_on_stands_uses_holder() {
        let stand = StandRow {
            holder_name: "A-frame".to_string(),
            sides: 2,
            quantity: 1,
            faces: 2,
            statuses: [AssetStatus::Pending].into_iter().collect(),
            annotation_ids: vec!["a".to_string()],
        };
        assert!(DashboardFilter::new().with_type("a-frame").matches(&stand));
        assert!(!DashboardFilter::new().with_type("Pole").matches(&stand));
    }

    #[test]
    fn test_tab_filters_are_independent() {
        let mut tabs = TabFilters::new();
        tabs.get_mut(DashboardTab::Signs).search = Some("exit".to_string());
        assert!(!tabs.get(DashboardTab::Signs).is_empty());
        assert!(tabs.get(DashboardTab::Stands).is_empty());

        tabs.clear();
        assert!(tabs.get(DashboardTab::Signs).is_empty());
    }
}
