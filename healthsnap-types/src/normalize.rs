//! Flattening a snapshot into a [`NormalizedRecord`].

use crate::record::{Activity, BodyMeasurements, Heart, Nutrition, OtherData, Respiratory, Vitals};
use crate::{Catalog, MetricDescriptor, MetricKind, NormalizedRecord, Snapshot};

type Assign = fn(&mut NormalizedRecord, f64);

/// Which record field each metric identifier feeds.
///
/// Oxygen saturation feeds both vitals and respiratory. Handwashing has no
/// catalog entry and therefore never gets a value.
const FIELD_MAP: &[(&str, Assign)] = &[
    // Activity
    ("HKQuantityTypeIdentifierStepCount", |r, v| activity(r).step_count = Some(v)),
    ("HKQuantityTypeIdentifierDistanceWalkingRunning", |r, v| activity(r).walking_distance = Some(v)),
    ("HKQuantityTypeIdentifierDistanceCycling", |r, v| activity(r).running_distance = Some(v)),
    ("HKQuantityTypeIdentifierFlightsClimbed", |r, v| activity(r).flights_climbed = Some(v)),
    ("HKQuantityTypeIdentifierActiveEnergyBurned", |r, v| activity(r).active_energy_burned = Some(v)),
    ("HKQuantityTypeIdentifierAppleExerciseTime", |r, v| activity(r).exercise_minutes = Some(v)),
    ("HKQuantityTypeIdentifierAppleStandTime", |r, v| activity(r).stand_hours = Some(v)),
    // Body measurements
    ("HKQuantityTypeIdentifierHeight", |r, v| body(r).height = Some(v)),
    ("HKQuantityTypeIdentifierBodyMass", |r, v| body(r).weight = Some(v)),
    ("HKQuantityTypeIdentifierBodyMassIndex", |r, v| body(r).body_mass_index = Some(v)),
    ("HKQuantityTypeIdentifierBodyFatPercentage", |r, v| body(r).body_fat_percentage = Some(v)),
    ("HKQuantityTypeIdentifierLeanBodyMass", |r, v| body(r).lean_body_mass = Some(v)),
    ("HKQuantityTypeIdentifierWaistCircumference", |r, v| body(r).waist_circumference = Some(v)),
    // Heart
    ("HKQuantityTypeIdentifierHeartRate", |r, v| heart(r).heart_rate = Some(v)),
    ("HKQuantityTypeIdentifierRestingHeartRate", |r, v| heart(r).resting_heart_rate = Some(v)),
    ("HKQuantityTypeIdentifierWalkingHeartRateAverage", |r, v| heart(r).walking_heart_rate_average = Some(v)),
    ("HKQuantityTypeIdentifierHeartRateVariabilitySDNN", |r, v| heart(r).heart_rate_variability = Some(v)),
    // Vitals
    ("HKQuantityTypeIdentifierBloodPressureSystolic", |r, v| {
        blood_pressure(r).systolic = Some(v)
    }),
    ("HKQuantityTypeIdentifierBloodPressureDiastolic", |r, v| {
        blood_pressure(r).diastolic = Some(v)
    }),
    ("HKQuantityTypeIdentifierBodyTemperature", |r, v| vitals(r).body_temperature = Some(v)),
    ("HKQuantityTypeIdentifierOxygenSaturation", |r, v| {
        vitals(r).blood_oxygen_saturation = Some(v);
        respiratory(r).oxygen_saturation = Some(v);
    }),
    // Respiratory
    ("HKQuantityTypeIdentifierRespiratoryRate", |r, v| respiratory(r).respiratory_rate = Some(v)),
    ("HKQuantityTypeIdentifierPeakExpiratoryFlowRate", |r, v| {
        respiratory(r).peak_expiratory_flow_rate = Some(v)
    }),
    // Nutrition
    ("HKQuantityTypeIdentifierDietaryEnergyConsumed", |r, v| nutrition(r).calories = Some(v)),
    ("HKQuantityTypeIdentifierDietaryCarbohydrates", |r, v| nutrition(r).carbohydrates = Some(v)),
    ("HKQuantityTypeIdentifierDietaryProtein", |r, v| nutrition(r).protein = Some(v)),
    ("HKQuantityTypeIdentifierDietaryFatTotal", |r, v| nutrition(r).fat = Some(v)),
    ("HKQuantityTypeIdentifierDietaryFiber", |r, v| nutrition(r).fiber = Some(v)),
    ("HKQuantityTypeIdentifierDietarySugar", |r, v| nutrition(r).sugar = Some(v)),
    ("HKQuantityTypeIdentifierDietarySodium", |r, v| nutrition(r).sodium = Some(v)),
    ("HKQuantityTypeIdentifierDietaryWater", |r, v| nutrition(r).water = Some(v)),
    // Other
    ("HKQuantityTypeIdentifierHandwashingEventDuration", |r, v| other(r).handwashing_duration = Some(v)),
    ("HKQuantityTypeIdentifierTimeInDaylight", |r, v| other(r).time_in_daylight = Some(v)),
    ("HKQuantityTypeIdentifierUVExposure", |r, v| other(r).uv_exposure = Some(v)),
];

fn activity(r: &mut NormalizedRecord) -> &mut Activity {
    r.activity.get_or_insert_with(Default::default)
}

fn body(r: &mut NormalizedRecord) -> &mut BodyMeasurements {
    r.body_measurements.get_or_insert_with(Default::default)
}

fn heart(r: &mut NormalizedRecord) -> &mut Heart {
    r.heart.get_or_insert_with(Default::default)
}

fn vitals(r: &mut NormalizedRecord) -> &mut Vitals {
    r.vitals.get_or_insert_with(Default::default)
}

fn blood_pressure(r: &mut NormalizedRecord) -> &mut crate::record::BloodPressure {
    vitals(r).blood_pressure.get_or_insert_with(Default::default)
}

fn respiratory(r: &mut NormalizedRecord) -> &mut Respiratory {
    r.respiratory.get_or_insert_with(Default::default)
}

fn nutrition(r: &mut NormalizedRecord) -> &mut Nutrition {
    r.nutrition.get_or_insert_with(Default::default)
}

fn other(r: &mut NormalizedRecord) -> &mut OtherData {
    r.other_data.get_or_insert_with(Default::default)
}

/// Derive the nested record from a snapshot.
///
/// Pure and infallible: entries that are missing or carry no number leave
/// their field unset. The mapped sections (activity, body measurements,
/// heart, vitals, respiratory, nutrition, other) are always present, even
/// when empty; blood pressure appears only when one of its values does.
///
/// ```rust
/// use healthsnap_types::{normalize, Catalog, CatalogSettings, Snapshot};
///
/// let catalog = Catalog::standard(CatalogSettings::default());
/// let snapshot = Snapshot::builder()
///     .timestamp_ms(0)
///     .entry("HKQuantityTypeIdentifierStepCount", "9000.00 (avg: 300.00)")
///     .entry("HKQuantityTypeIdentifierHeartRate", "No Data")
///     .build();
///
/// let record = normalize(&snapshot, &catalog);
/// assert_eq!(record.activity.unwrap().step_count, Some(300.0));
/// assert_eq!(record.heart.unwrap().heart_rate, None);
/// ```
pub fn normalize(snapshot: &Snapshot, catalog: &Catalog) -> NormalizedRecord {
    let mut record = NormalizedRecord {
        activity: Some(Activity::default()),
        body_measurements: Some(BodyMeasurements::default()),
        heart: Some(Heart::default()),
        vitals: Some(Vitals::default()),
        respiratory: Some(Respiratory::default()),
        nutrition: Some(Nutrition::default()),
        other_data: Some(OtherData::default()),
        ..Default::default()
    };

    for (identifier, assign) in FIELD_MAP {
        let value = catalog
            .get(identifier)
            .zip(snapshot.get(identifier))
            .and_then(|(descriptor, text)| metric_value(descriptor, text));

        if let Some(value) = value {
            assign(&mut record, value);
        }
    }

    record
}

/// Parse the number a snapshot string contributes to the record.
///
/// Cumulative entries yield the `(avg: ...)` value, falling back to the
/// first number divided by the lookback window. Discrete entries yield
/// their first number. Sample counts never contribute.
pub fn metric_value(descriptor: &MetricDescriptor, text: &str) -> Option<f64> {
    match descriptor.kind {
        MetricKind::Cumulative(_) => parenthesized_average(text)
            .or_else(|| first_number(text).map(|sum| descriptor.average(sum))),
        MetricKind::DiscreteAverage(_) => first_number(text),
        MetricKind::SampleCount => None,
    }
}

fn parenthesized_average(text: &str) -> Option<f64> {
    const MARKER: &str = "(avg: ";

    let start = text.find(MARKER)? + MARKER.len();
    let rest = &text[start..];
    let end = rest.find(')')?;
    parse_finite(rest[..end].trim())
}

fn first_number(text: &str) -> Option<f64> {
    text.split(' ').find_map(parse_finite)
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}
