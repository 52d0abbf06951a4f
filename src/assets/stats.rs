//! Assets dashboard aggregate.

use std::collections::BTreeMap;

use crate::assets::face::{FaceRecord, layout_faces};
use crate::assets::filter::{DashboardFilter, DashboardTab, TabFilters};
use crate::assets::histogram::StatusHistogram;
use crate::assets::rows::{
    DesignRow, SignRow, StandRow, group_designs, group_signs, group_stands, total_statuses,
};
use crate::model::{AnnotationCategory, Catalog, VenueLayout};

/// Everything the assets dashboard shows for a set of layouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetStats {
    pub signs: Vec<SignRow>,
    pub stands: Vec<StandRow>,
    pub designs: Vec<DesignRow>,
    /// Face statuses over all sign rows
    pub sign_statuses: StatusHistogram,
    /// Primary-face statuses over all stand rows
    pub stand_statuses: StatusHistogram,
    pub total_faces: usize,
    pub total_signage: usize,
    /// Annotation count per category, all categories present
    pub category_counts: BTreeMap<AnnotationCategory, usize>,
}

impl AssetStats {
    /// Aggregate the given layouts.
    pub fn compute<'a>(
        layouts: impl IntoIterator<Item = &'a VenueLayout>,
        catalog: &Catalog,
    ) -> Self {
        let mut faces: Vec<FaceRecord> = Vec::new();
        let mut category_counts: BTreeMap<AnnotationCategory, usize> = AnnotationCategory::all()
            .iter()
            .map(|c| (*c, 0))
            .collect();
        let mut layout_count = 0;

        for layout in layouts {
            layout_count += 1;
            for annotation in &layout.annotations {
                *category_counts.entry(annotation.category).or_insert(0) += 1;
            }
            faces.extend(layout_faces(layout, catalog));
        }

        let signs = group_signs(&faces, catalog);
        let stands = group_stands(&faces, catalog);
        let designs = group_designs(&faces, catalog);

        let sign_statuses = total_statuses(signs.iter().map(|r| &r.statuses));
        let stand_statuses = total_statuses(stands.iter().map(|r| &r.statuses));
        let total_signage = category_counts
            .get(&AnnotationCategory::Signage)
            .copied()
            .unwrap_or(0);

        log::debug!(
            "Aggregated {} layouts: {} faces, {} sign rows, {} stand rows, {} designs",
            layout_count,
            faces.len(),
            signs.len(),
            stands.len(),
            designs.len()
        );

        Self {
            signs,
            stands,
            designs,
            sign_statuses,
            stand_statuses,
            total_faces: faces.len(),
            total_signage,
            category_counts,
        }
    }

    /// Number of rows on a tab.
    pub fn row_count(&self, tab: DashboardTab) -> usize {
        match tab {
            DashboardTab::Signs => self.signs.len(),
            DashboardTab::Stands => self.stands.len(),
            DashboardTab::Designs => self.designs.len(),
        }
    }

    /// Number of designs missing artwork.
    pub fn designs_without_artwork(&self) -> usize {
        self.designs.iter().filter(|d| !d.has_artwork()).count()
    }

    /// Annotation count of a category.
    pub fn category_count(&self, category: AnnotationCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }
}

/// Aggregate plus the per-tab filter state.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    stats: AssetStats,
    filters: TabFilters,
    active_tab: Option<DashboardTab>,
}

impl Dashboard {
    pub fn new(stats: AssetStats) -> Self {
        Self {
            stats,
            ..Self::default()
        }
    }

    /// Recompute from layouts, keeping filters.
    pub fn refresh<'a>(
        &mut self,
        layouts: impl IntoIterator<Item = &'a VenueLayout>,
        catalog: &Catalog,
    ) {
        self.stats = AssetStats::compute(layouts, catalog);
    }

    pub fn stats(&self) -> &AssetStats {
        &self.stats
    }

    pub fn active_tab(&self) -> DashboardTab {
        self.active_tab.unwrap_or(DashboardTab::Signs)
    }

    pub fn set_active_tab(&mut self, tab: DashboardTab) {
        self.active_tab = Some(tab);
    }

    pub fn filter(&self, tab: DashboardTab) -> &DashboardFilter {
        self.filters.get(tab)
    }

    pub fn set_filter(&mut self, tab: DashboardTab, filter: DashboardFilter) {
        self.filters.set(tab, filter);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Sign rows passing the Signs filter.
    pub fn visible_signs(&self) -> Vec<&SignRow> {
        self.filters.get(DashboardTab::Signs).apply(&self.stats.signs)
    }

    /// Stand rows passing the Stands filter.
    pub fn visible_stands(&self) -> Vec<&StandRow> {
        self.filters
            .get(DashboardTab::Stands)
            .apply(&self.stats.stands)
    }

    /// Design rows passing the Designs filter.
    pub fn visible_designs(&self) -> Vec<&DesignRow> {
        self.filters
            .get(DashboardTab::Designs)
            .apply(&self.stats.designs)
    }
}
