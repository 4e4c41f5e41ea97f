//! Plain-text rendering of a snapshot for the console.

use std::collections::BTreeMap;
use std::fmt::Write;

use healthsnap_types::{Catalog, Section, Snapshot, INCOMPATIBLE_UNIT, NO_DATA};

/// Counts shown in the report footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub with_data: usize,
    pub no_data: usize,
    pub incompatible: usize,
}

impl Summary {
    pub fn of(snapshot: &Snapshot) -> Self {
        let mut summary = Summary {
            total: snapshot.len(),
            ..Default::default()
        };
        for (_, text) in snapshot.iter() {
            match text {
                NO_DATA => summary.no_data += 1,
                INCOMPATIBLE_UNIT => summary.incompatible += 1,
                _ => summary.with_data += 1,
            }
        }
        summary
    }
}

/// Render the snapshot grouped by section, identifiers sorted within each.
///
/// Entries the catalog does not describe are listed under "Other".
pub fn render(snapshot: &Snapshot, catalog: &Catalog) -> String {
    let mut sections: BTreeMap<Section, Vec<(&str, &str)>> = BTreeMap::new();
    for (identifier, text) in snapshot.iter() {
        let section = catalog
            .get(identifier)
            .map(|d| d.section)
            .unwrap_or(Section::Other);
        sections.entry(section).or_default().push((identifier, text));
    }

    let width = snapshot.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
    let mut out = String::new();

    for (section, entries) in &sections {
        let _ = writeln!(out, "{section}");
        for (identifier, text) in entries {
            let _ = writeln!(out, "  {identifier:<width$}  {text}");
        }
        out.push('\n');
    }

    let summary = Summary::of(snapshot);
    let _ = writeln!(
        out,
        "{} metrics: {} with data, {} without, {} incompatible",
        summary.total, summary.with_data, summary.no_data, summary.incompatible
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthsnap_types::{CatalogSettings, Reading, ECG_IDENTIFIER};

    fn snapshot() -> Snapshot {
        Snapshot::builder()
            .timestamp_ms(1)
            .reading("HKQuantityTypeIdentifierStepCount", Reading::Cumulative { sum: 9000.0, average: 300.0 })
            .reading("HKQuantityTypeIdentifierHeartRate", Reading::NoData)
            .reading("HKQuantityTypeIdentifierBodyMass", Reading::IncompatibleUnit)
            .reading(ECG_IDENTIFIER, Reading::Count(3))
            .build()
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::of(&snapshot());
        assert_eq!(
            summary,
            Summary {
                total: 4,
                with_data: 2,
                no_data: 1,
                incompatible: 1,
            }
        );
    }

    #[test]
    fn test_render_groups_by_section() {
        let catalog = Catalog::standard(CatalogSettings::default());
        let text = render(&snapshot(), &catalog);

        let activity = text.find("Activity\n").unwrap();
        let body = text.find("Body Measurements\n").unwrap();
        let heart = text.find("Heart\n").unwrap();
        let ecg = text.find("Electrocardiogram\n").unwrap();
        assert!(activity < body && body < heart && heart < ecg);

        assert!(text.contains("9000.00 (avg: 300.00)"));
        assert!(text.contains("No Data"));
        assert!(text.lines().any(|l| l.trim_start().starts_with(ECG_IDENTIFIER) && l.ends_with(" 3")));
        assert!(text.ends_with("4 metrics: 2 with data, 1 without, 1 incompatible\n"));
    }

    #[test]
    fn test_unknown_identifier_goes_to_other() {
        let catalog = Catalog::standard(CatalogSettings::default());
        let snapshot = Snapshot::builder().entry("Custom", "1.00").build();
        let text = render(&snapshot, &catalog);
        assert!(text.starts_with("Other\n  Custom  1.00\n"));
    }
}
