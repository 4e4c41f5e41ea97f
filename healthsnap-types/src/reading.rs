//! Rendering of a single query outcome into its snapshot string.

use core::fmt;

use crate::{MetricDescriptor, MetricKind, Quantity};

/// Marker for a query that returned no samples.
pub const NO_DATA: &str = "No Data";

/// Marker for a sample whose unit cannot be expressed in the declared unit.
pub const INCOMPATIBLE_UNIT: &str = "Incompatible Unit";

/// The outcome of one per-descriptor query.
///
/// `Display` yields the snapshot string:
///
/// ```rust
/// use healthsnap_types::Reading;
///
/// let steps = Reading::Cumulative { sum: 9000.0, average: 300.0 };
/// assert_eq!(steps.to_string(), "9000.00 (avg: 300.00)");
/// assert_eq!(Reading::Discrete(72.5).to_string(), "72.50");
/// assert_eq!(Reading::Count(3).to_string(), "3");
/// assert_eq!(Reading::NoData.to_string(), "No Data");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Cumulative { sum: f64, average: f64 },
    Discrete(f64),
    Count(u64),
    NoData,
    IncompatibleUnit,
}

impl Reading {
    /// Interpret a statistics result for `descriptor`.
    ///
    /// For cumulative descriptors `quantity` is the window sum, for discrete
    /// ones it is the window average.
    pub fn from_statistics(descriptor: &MetricDescriptor, quantity: Option<Quantity>) -> Self {
        let Some(quantity) = quantity else {
            return Reading::NoData;
        };

        match descriptor.kind {
            MetricKind::Cumulative(unit) => match quantity.value_in(unit) {
                Some(sum) => Reading::Cumulative {
                    sum,
                    average: descriptor.average(sum),
                },
                None => Reading::IncompatibleUnit,
            },
            MetricKind::DiscreteAverage(unit) => match quantity.value_in(unit) {
                Some(value) => Reading::Discrete(value),
                None => Reading::IncompatibleUnit,
            },
            MetricKind::SampleCount => Reading::NoData,
        }
    }

    /// Whether the reading carries a value.
    pub fn has_data(&self) -> bool {
        !matches!(self, Reading::NoData | Reading::IncompatibleUnit)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Cumulative { sum, average } => write!(f, "{:.2} (avg: {:.2})", sum, average),
            Reading::Discrete(value) => write!(f, "{:.2}", value),
            Reading::Count(count) => write!(f, "{}", count),
            Reading::NoData => f.write_str(NO_DATA),
            Reading::IncompatibleUnit => f.write_str(INCOMPATIBLE_UNIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{Catalog, CatalogSettings, Unit, ECG_IDENTIFIER};

    fn catalog() -> Catalog {
        Catalog::standard(CatalogSettings::default())
    }

    #[test]
    fn cumulative_renders_sum_and_average() {
        let catalog = catalog();
        let steps = catalog.get("HKQuantityTypeIdentifierStepCount").unwrap();

        let reading = Reading::from_statistics(steps, Some(Quantity::new(9000.0, Unit::Count)));
        assert_eq!(reading.to_string(), "9000.00 (avg: 300.00)");
    }

    #[test]
    fn cumulative_average_matches_sum_over_days() {
        let catalog = catalog();
        let cumulative: alloc::vec::Vec<_> = catalog
            .iter()
            .filter(|d| matches!(d.kind, MetricKind::Cumulative(_)))
            .collect();
        assert!(!cumulative.is_empty());

        for descriptor in cumulative {
            let unit = descriptor.kind.unit().unwrap();
            for sum in [0.0, 1.0, 12_345.67, 999.99] {
                let reading = Reading::from_statistics(descriptor, Some(Quantity::new(sum, unit)));
                assert_eq!(
                    reading,
                    Reading::Cumulative {
                        sum,
                        average: sum / 30.0
                    },
                    "{}",
                    descriptor.identifier
                );
                let expected = alloc::format!("{:.2} (avg: {:.2})", sum, sum / 30.0);
                assert_eq!(reading.to_string(), expected, "{}", descriptor.identifier);
            }
        }
    }

    #[test]
    fn discrete_renders_single_value() {
        let catalog = catalog();
        let heart = catalog.get("HKQuantityTypeIdentifierHeartRate").unwrap();

        let reading =
            Reading::from_statistics(heart, Some(Quantity::new(61.456, Unit::CountPerMinute)));
        assert_eq!(reading, Reading::Discrete(61.456));
        assert_eq!(reading.to_string(), "61.46");
    }

    #[test]
    fn every_discrete_metric_renders_one_number() {
        let catalog = catalog();
        let discrete: alloc::vec::Vec<_> = catalog
            .iter()
            .filter(|d| matches!(d.kind, MetricKind::DiscreteAverage(_)))
            .collect();
        assert!(!discrete.is_empty());

        for descriptor in discrete {
            let unit = descriptor.kind.unit().unwrap();
            let text = Reading::from_statistics(descriptor, Some(Quantity::new(61.5, unit))).to_string();

            let tokens: alloc::vec::Vec<&str> = text.split(' ').collect();
            assert_eq!(tokens, ["61.50"], "{}", descriptor.identifier);
            assert_eq!(tokens[0].parse::<f64>().ok(), Some(61.5));
        }
    }

    #[test]
    fn converts_compatible_units() {
        let catalog = catalog();
        let walking = catalog
            .get("HKQuantityTypeIdentifierDistanceWalkingRunning")
            .unwrap();

        let reading = Reading::from_statistics(walking, Some(Quantity::new(3.0, Unit::Kilometer)));
        assert_eq!(reading.to_string(), "3000.00 (avg: 100.00)");
    }

    #[test]
    fn missing_quantity_is_no_data() {
        let catalog = catalog();
        let heart = catalog.get("HKQuantityTypeIdentifierHeartRate").unwrap();
        let reading = Reading::from_statistics(heart, None);
        assert_eq!(reading.to_string(), NO_DATA);
        assert!(!reading.has_data());
    }

    #[test]
    fn incompatible_unit_is_flagged() {
        let catalog = catalog();
        let mass = catalog.get("HKQuantityTypeIdentifierBodyMass").unwrap();
        let reading = Reading::from_statistics(mass, Some(Quantity::new(1.8, Unit::Meter)));
        assert_eq!(reading.to_string(), INCOMPATIBLE_UNIT);
    }

    #[test]
    fn sample_count_ignores_statistics() {
        let catalog = catalog();
        let ecg = catalog.get(ECG_IDENTIFIER).unwrap();
        let reading = Reading::from_statistics(ecg, Some(Quantity::new(3.0, Unit::Count)));
        assert_eq!(reading, Reading::NoData);
    }
}
