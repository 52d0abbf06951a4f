//! Dashboard tables as CSV.
//!
//! One format per dashboard tab. Every table ends with one count column per
//! asset status so spreadsheets can total them.

use crate::assets::{AssetStats, DashboardFilter, DashboardTab, StatusHistogram};
use crate::format::bundle::ExportBundle;
use crate::format::error::FormatError;
use crate::format::traits::{ExportFormat, ExportOptions, ExportResult, FormatWarning};
use crate::model::AssetStatus;

/// CSV export of one dashboard tab.
pub struct CsvTableFormat {
    tab: DashboardTab,
}

impl CsvTableFormat {
    pub fn signs() -> Self {
        Self {
            tab: DashboardTab::Signs,
        }
    }

    pub fn stands() -> Self {
        Self {
            tab: DashboardTab::Stands,
        }
    }

    pub fn designs() -> Self {
        Self {
            tab: DashboardTab::Designs,
        }
    }

    /// Tab this format exports.
    pub fn tab(&self) -> DashboardTab {
        self.tab
    }
}

impl ExportFormat for CsvTableFormat {
    fn id(&self) -> &'static str {
        match self.tab {
            DashboardTab::Signs => "signs-csv",
            DashboardTab::Stands => "stands-csv",
            DashboardTab::Designs => "designs-csv",
        }
    }

    fn display_name(&self) -> &'static str {
        match self.tab {
            DashboardTab::Signs => "Signs table (CSV)",
            DashboardTab::Stands => "Stands table (CSV)",
            DashboardTab::Designs => "Designs table (CSV)",
        }
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn export_to_bytes(
        &self,
        bundle: &ExportBundle,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        let layouts = bundle.select_layouts(options.layout_id.as_deref())?;
        let annotations = layouts.iter().map(|l| l.annotations.len()).sum();
        let stats = AssetStats::compute(layouts, &bundle.catalog);

        let table = write_table(self.tab, &stats, &options.filter)?;
        let mut result = ExportResult::new(table.bytes);
        result.annotations_exported = annotations;
        result.rows_exported = table.rows;
        result.warnings = table.warnings;
        Ok(result)
    }
}

/// Encoded table with its row count.
pub(crate) struct CsvTable {
    pub bytes: Vec<u8>,
    pub rows: usize,
    pub warnings: Vec<FormatWarning>,
}

/// Encode the filtered rows of a dashboard tab.
pub(crate) fn write_table(
    tab: DashboardTab,
    stats: &AssetStats,
    filter: &DashboardFilter,
) -> Result<CsvTable, FormatError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut warnings = Vec::new();
    let rows;

    match tab {
        DashboardTab::Signs => {
            writer.write_record(header(&[
                "Type",
                "Sub-type",
                "Direction",
                "Notes",
                "Colour",
                "Quantity",
                "Status",
            ]))?;
            let visible = filter.apply(&stats.signs);
            for row in &visible {
                let mut record = vec![
                    row.type_name.clone(),
                    row.sub_type_name.clone().unwrap_or_default(),
                    row.direction.name().to_string(),
                    row.notes.clone().unwrap_or_default(),
                    row.color.clone(),
                    row.quantity.to_string(),
                    row.status().label().to_string(),
                ];
                record.extend(status_counts(&row.statuses));
                writer.write_record(&record)?;
            }
            rows = visible.len();
        }
        DashboardTab::Stands => {
            writer.write_record(header(&["Holder", "Sides", "Quantity", "Faces", "Status"]))?;
            let visible = filter.apply(&stats.stands);
            for row in &visible {
                let mut record = vec![
                    row.holder_name.clone(),
                    row.sides.to_string(),
                    row.quantity.to_string(),
                    row.faces.to_string(),
                    row.status().label().to_string(),
                ];
                record.extend(status_counts(&row.statuses));
                writer.write_record(&record)?;
            }
            rows = visible.len();
        }
        DashboardTab::Designs => {
            writer.write_record(header(&[
                "Type", "Sub-type", "Colour", "Icon", "Artwork", "Quantity", "Status",
            ]))?;
            let visible = filter.apply(&stats.designs);
            for row in &visible {
                if !row.has_artwork() {
                    let name = match &row.sub_type_name {
                        Some(sub) => format!("{} / {}", row.type_name, sub),
                        None => row.type_name.clone(),
                    };
                    warnings.push(FormatWarning::warning(format!(
                        "design '{}' has no artwork",
                        name
                    )));
                }
                let mut record = vec![
                    row.type_name.clone(),
                    row.sub_type_name.clone().unwrap_or_default(),
                    row.color.clone(),
                    row.icon.clone().unwrap_or_default(),
                    row.image_url.clone().unwrap_or_default(),
                    row.quantity.to_string(),
                    row.status().label().to_string(),
                ];
                record.extend(status_counts(&row.statuses));
                writer.write_record(&record)?;
            }
            rows = visible.len();
        }
    }

    if rows == 0 {
        warnings.push(FormatWarning::info(format!(
            "{} table is empty",
            tab.name()
        )));
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FormatError::Io(e.into_error()))?;
    log::debug!("Encoded {} {} rows as CSV", rows, tab.name());

    Ok(CsvTable {
        bytes,
        rows,
        warnings,
    })
}

fn header(columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|c| c.to_string())
        .chain(AssetStatus::all().iter().map(|s| s.name().to_string()))
        .collect()
}

fn status_counts(statuses: &StatusHistogram) -> Vec<String> {
    AssetStatus::all()
        .iter()
        .map(|s| statuses.get(*s).to_string())
        .collect()
}
