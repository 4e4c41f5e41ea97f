//! The metric catalog - every supported measurement and how to aggregate it.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Unit;

/// Milliseconds in one day.
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Default lookback window, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Identifier of the electrocardiogram entry.
pub const ECG_IDENTIFIER: &str = "Electrocardiogram (ECG)";

/// How a metric is aggregated over its window.
///
/// Cumulative metrics are summed and reported with a per-day average.
/// Discrete metrics are averaged by the store. The electrocardiogram is
/// neither: its value is the number of recorded samples, with no window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Cumulative(Unit),
    DiscreteAverage(Unit),
    SampleCount,
}

impl MetricKind {
    /// The declared unit, if this kind has one.
    pub const fn unit(&self) -> Option<Unit> {
        match self {
            MetricKind::Cumulative(unit) | MetricKind::DiscreteAverage(unit) => Some(*unit),
            MetricKind::SampleCount => None,
        }
    }

    pub const fn is_cumulative(&self) -> bool {
        matches!(self, MetricKind::Cumulative(_))
    }
}

/// Display grouping of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Activity,
    BodyMeasurements,
    Heart,
    Vitals,
    Respiratory,
    Nutrition,
    Other,
    Electrocardiogram,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Activity => "Activity",
            Section::BodyMeasurements => "Body Measurements",
            Section::Heart => "Heart",
            Section::Vitals => "Vitals",
            Section::Respiratory => "Respiratory",
            Section::Nutrition => "Nutrition",
            Section::Other => "Other",
            Section::Electrocardiogram => "Electrocardiogram",
        };
        f.write_str(name)
    }
}

/// Sampling granularity passed to statistics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Length of one interval in milliseconds. A month counts as 30 days.
    pub const fn millis(self) -> u64 {
        match self {
            Granularity::Day => DAY_MS,
            Granularity::Week => 7 * DAY_MS,
            Granularity::Month => 30 * DAY_MS,
        }
    }
}

/// The catalog-wide tunables.
///
/// Changing these affects every windowed descriptor uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogSettings {
    pub lookback_days: u32,
    pub granularity: Granularity,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            granularity: Granularity::Day,
        }
    }
}

/// A half-open `[start_ms, end_ms)` range of Unix milliseconds.
///
/// Samples starting before `start_ms` are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl QueryWindow {
    pub fn contains(&self, timestamp_ms: u64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms < self.end_ms
    }
}

/// One supported measurement type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub identifier: String,
    pub section: Section,
    pub kind: MetricKind,
    /// `None` exactly for [`MetricKind::SampleCount`].
    pub lookback_days: Option<u32>,
}

impl MetricDescriptor {
    /// The window ending at `end_ms`, or `None` for an unbounded query.
    pub fn window_ending(&self, end_ms: u64) -> Option<QueryWindow> {
        self.lookback_days.map(|days| QueryWindow {
            start_ms: end_ms.saturating_sub(u64::from(days) * DAY_MS),
            end_ms,
        })
    }

    /// Per-day average of a cumulative sum.
    ///
    /// Discrete values pass through unchanged.
    pub fn average(&self, sum: f64) -> f64 {
        match (self.kind, self.lookback_days) {
            (MetricKind::Cumulative(_), Some(days)) if days > 0 => sum / f64::from(days),
            _ => sum,
        }
    }
}

use MetricKind::{Cumulative, DiscreteAverage};

const STANDARD_METRICS: &[(&str, Section, MetricKind)] = &[
    // Activity
    ("HKQuantityTypeIdentifierStepCount", Section::Activity, Cumulative(Unit::Count)),
    ("HKQuantityTypeIdentifierDistanceWalkingRunning", Section::Activity, Cumulative(Unit::Meter)),
    ("HKQuantityTypeIdentifierDistanceCycling", Section::Activity, Cumulative(Unit::Meter)),
    ("HKQuantityTypeIdentifierFlightsClimbed", Section::Activity, Cumulative(Unit::Count)),
    ("HKQuantityTypeIdentifierActiveEnergyBurned", Section::Activity, Cumulative(Unit::Kilocalorie)),
    ("HKQuantityTypeIdentifierAppleExerciseTime", Section::Activity, Cumulative(Unit::Minute)),
    ("HKQuantityTypeIdentifierAppleStandTime", Section::Activity, Cumulative(Unit::Minute)),
    // Body measurements
    ("HKQuantityTypeIdentifierHeight", Section::BodyMeasurements, DiscreteAverage(Unit::Meter)),
    ("HKQuantityTypeIdentifierBodyMass", Section::BodyMeasurements, DiscreteAverage(Unit::Kilogram)),
    ("HKQuantityTypeIdentifierBodyMassIndex", Section::BodyMeasurements, DiscreteAverage(Unit::Count)),
    ("HKQuantityTypeIdentifierBodyFatPercentage", Section::BodyMeasurements, DiscreteAverage(Unit::Percent)),
    ("HKQuantityTypeIdentifierLeanBodyMass", Section::BodyMeasurements, DiscreteAverage(Unit::Kilogram)),
    ("HKQuantityTypeIdentifierWaistCircumference", Section::BodyMeasurements, DiscreteAverage(Unit::Meter)),
    // Heart
    ("HKQuantityTypeIdentifierHeartRate", Section::Heart, DiscreteAverage(Unit::CountPerMinute)),
    ("HKQuantityTypeIdentifierRestingHeartRate", Section::Heart, DiscreteAverage(Unit::CountPerMinute)),
    ("HKQuantityTypeIdentifierWalkingHeartRateAverage", Section::Heart, DiscreteAverage(Unit::CountPerMinute)),
    ("HKQuantityTypeIdentifierHeartRateVariabilitySDNN", Section::Heart, DiscreteAverage(Unit::Second)),
    // Vitals
    ("HKQuantityTypeIdentifierBloodPressureSystolic", Section::Vitals, DiscreteAverage(Unit::MillimeterOfMercury)),
    ("HKQuantityTypeIdentifierBloodPressureDiastolic", Section::Vitals, DiscreteAverage(Unit::MillimeterOfMercury)),
    ("HKQuantityTypeIdentifierBodyTemperature", Section::Vitals, DiscreteAverage(Unit::DegreeCelsius)),
    ("HKQuantityTypeIdentifierOxygenSaturation", Section::Vitals, DiscreteAverage(Unit::Percent)),
    ("HKQuantityTypeIdentifierBloodGlucose", Section::Vitals, DiscreteAverage(Unit::GramPerDeciliter)),
    // Respiratory
    ("HKQuantityTypeIdentifierRespiratoryRate", Section::Respiratory, DiscreteAverage(Unit::CountPerMinute)),
    ("HKQuantityTypeIdentifierPeakExpiratoryFlowRate", Section::Respiratory, DiscreteAverage(Unit::LiterPerMinute)),
    // Nutrition
    ("HKQuantityTypeIdentifierDietaryEnergyConsumed", Section::Nutrition, Cumulative(Unit::Kilocalorie)),
    ("HKQuantityTypeIdentifierDietaryCarbohydrates", Section::Nutrition, Cumulative(Unit::Gram)),
    ("HKQuantityTypeIdentifierDietaryProtein", Section::Nutrition, Cumulative(Unit::Gram)),
    ("HKQuantityTypeIdentifierDietaryFatTotal", Section::Nutrition, Cumulative(Unit::Gram)),
    ("HKQuantityTypeIdentifierDietaryFiber", Section::Nutrition, Cumulative(Unit::Gram)),
    ("HKQuantityTypeIdentifierDietarySugar", Section::Nutrition, Cumulative(Unit::Gram)),
    ("HKQuantityTypeIdentifierDietarySodium", Section::Nutrition, Cumulative(Unit::Gram)),
    ("HKQuantityTypeIdentifierDietaryWater", Section::Nutrition, Cumulative(Unit::Liter)),
    // Other
    ("HKQuantityTypeIdentifierUVExposure", Section::Other, DiscreteAverage(Unit::Count)),
    ("HKQuantityTypeIdentifierTimeInDaylight", Section::Other, Cumulative(Unit::Minute)),
    (ECG_IDENTIFIER, Section::Electrocardiogram, MetricKind::SampleCount),
];

/// An ordered, immutable list of metric descriptors.
///
/// Build one at startup and share it by reference; there is no way to
/// mutate a catalog after construction.
///
/// # Example
///
/// ```rust
/// use healthsnap_types::{Catalog, CatalogSettings, MetricKind};
///
/// let catalog = Catalog::standard(CatalogSettings::default());
/// let steps = catalog.get("HKQuantityTypeIdentifierStepCount").unwrap();
/// assert!(steps.kind.is_cumulative());
/// assert_eq!(steps.lookback_days, Some(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    settings: CatalogSettings,
    descriptors: Vec<MetricDescriptor>,
}

impl Catalog {
    /// The built-in catalog of supported measurements.
    pub fn standard(settings: CatalogSettings) -> Self {
        let descriptors = STANDARD_METRICS
            .iter()
            .map(|&(identifier, section, kind)| MetricDescriptor {
                identifier: identifier.into(),
                section,
                kind,
                lookback_days: match kind {
                    MetricKind::SampleCount => None,
                    _ => Some(settings.lookback_days),
                },
            })
            .collect();

        Self {
            settings,
            descriptors,
        }
    }

    /// Build a catalog from explicit descriptors.
    ///
    /// Later duplicates of an identifier are dropped so every identifier
    /// appears once.
    pub fn new(settings: CatalogSettings, descriptors: impl IntoIterator<Item = MetricDescriptor>) -> Self {
        let mut unique: Vec<MetricDescriptor> = Vec::new();
        for descriptor in descriptors {
            if !unique.iter().any(|d| d.identifier == descriptor.identifier) {
                unique.push(descriptor);
            }
        }
        Self {
            settings,
            descriptors: unique,
        }
    }

    pub fn settings(&self) -> CatalogSettings {
        self.settings
    }

    pub fn granularity(&self) -> Granularity {
        self.settings.granularity
    }

    pub fn get(&self, identifier: &str) -> Option<&MetricDescriptor> {
        self.descriptors.iter().find(|d| d.identifier == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.descriptors.iter()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MetricDescriptor;
    type IntoIter = core::slice::Iter<'a, MetricDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_unique_identifiers() {
        let catalog = Catalog::standard(CatalogSettings::default());
        assert_eq!(catalog.len(), STANDARD_METRICS.len());

        for descriptor in &catalog {
            let count = catalog
                .identifiers()
                .filter(|id| *id == descriptor.identifier)
                .count();
            assert_eq!(count, 1, "duplicate {}", descriptor.identifier);
        }
    }

    #[test]
    fn ecg_has_no_unit_and_no_window() {
        let catalog = Catalog::standard(CatalogSettings::default());
        let ecg = catalog.get(ECG_IDENTIFIER).unwrap();
        assert_eq!(ecg.kind, MetricKind::SampleCount);
        assert_eq!(ecg.kind.unit(), None);
        assert_eq!(ecg.lookback_days, None);
        assert_eq!(ecg.window_ending(10 * DAY_MS), None);
    }

    #[test]
    fn settings_apply_to_every_windowed_descriptor() {
        let settings = CatalogSettings {
            lookback_days: 7,
            granularity: Granularity::Week,
        };
        let catalog = Catalog::standard(settings);
        assert_eq!(catalog.granularity(), Granularity::Week);

        for descriptor in catalog.iter().filter(|d| d.kind != MetricKind::SampleCount) {
            assert_eq!(descriptor.lookback_days, Some(7));
        }
    }

    #[test]
    fn window_spans_lookback_days() {
        let catalog = Catalog::standard(CatalogSettings::default());
        let steps = catalog.get("HKQuantityTypeIdentifierStepCount").unwrap();

        let end = 100 * DAY_MS;
        let window = steps.window_ending(end).unwrap();
        assert_eq!(window.end_ms, end);
        assert_eq!(window.start_ms, 70 * DAY_MS);
        assert!(window.contains(70 * DAY_MS));
        assert!(!window.contains(70 * DAY_MS - 1));
        assert!(!window.contains(end));
    }

    #[test]
    fn window_saturates_at_epoch() {
        let catalog = Catalog::standard(CatalogSettings::default());
        let steps = catalog.get("HKQuantityTypeIdentifierStepCount").unwrap();
        let window = steps.window_ending(DAY_MS).unwrap();
        assert_eq!(window.start_ms, 0);
    }

    #[test]
    fn average_divides_cumulative_only() {
        let catalog = Catalog::standard(CatalogSettings::default());
        let steps = catalog.get("HKQuantityTypeIdentifierStepCount").unwrap();
        let heart = catalog.get("HKQuantityTypeIdentifierHeartRate").unwrap();

        assert_eq!(steps.average(9000.0), 300.0);
        assert_eq!(heart.average(72.0), 72.0);
    }

    #[test]
    fn custom_catalog_drops_duplicates() {
        let descriptor = MetricDescriptor {
            identifier: "steps".into(),
            section: Section::Activity,
            kind: MetricKind::Cumulative(Unit::Count),
            lookback_days: Some(30),
        };
        let catalog = Catalog::new(
            CatalogSettings::default(),
            [descriptor.clone(), descriptor],
        );
        assert_eq!(catalog.len(), 1);
    }
}
