//! The nested health record uploaded to the backend.
//!
//! Every leaf is optional. Serialized as camelCase JSON with unset fields
//! omitted.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

macro_rules! record_section {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident: $ty:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
        pub struct $name {
            $(
                #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
                pub $field: Option<$ty>,
            )*
        }
    };
}

record_section!(
    /// Steps, distances and energy, as per-day averages.
    Activity {
        step_count: f64,
        walking_distance: f64,
        running_distance: f64,
        flights_climbed: f64,
        active_energy_burned: f64,
        exercise_minutes: f64,
        stand_hours: f64,
    }
);

record_section!(BodyMeasurements {
    height: f64,
    weight: f64,
    body_mass_index: f64,
    body_fat_percentage: f64,
    lean_body_mass: f64,
    waist_circumference: f64,
});

record_section!(CycleTracking {
    menstrual_flow: String,
    basal_body_temperature: f64,
    ovulation_test_result: String,
    cervical_mucus_quality: String,
    sexual_activity: bool,
});

record_section!(Hearing {
    headphone_audio_levels: f64,
    environmental_sound_levels: f64,
    hearing_device_audio_levels: f64,
});

record_section!(Electrocardiogram {
    classification: String,
    average_heart_rate: f64,
    sampling_frequency: f64,
    voltage_measurements: Vec<f64>,
});

record_section!(Heart {
    heart_rate: f64,
    resting_heart_rate: f64,
    walking_heart_rate_average: f64,
    heart_rate_variability: f64,
    electrocardiogram: Electrocardiogram,
});

record_section!(Medication {
    medication_name: String,
    dosage: String,
    frequency: String,
    route: String,
    start_date: String,
    end_date: String,
});

record_section!(MentalWellbeing {
    mindfulness_minutes: f64,
    mood_tracking: String,
    stress_level: String,
    anxiety_test_result: String,
    depression_test_result: String,
});

record_section!(Mobility {
    walking_speed: f64,
    step_length: f64,
    double_support_time: f64,
    walking_asymmetry: f64,
    walking_steadiness: String,
});

record_section!(Nutrition {
    calories: f64,
    carbohydrates: f64,
    protein: f64,
    fat: f64,
    fiber: f64,
    sugar: f64,
    sodium: f64,
    water: f64,
});

record_section!(Respiratory {
    respiratory_rate: f64,
    oxygen_saturation: f64,
    peak_expiratory_flow_rate: f64,
});

record_section!(SleepStages {
    core: f64,
    deep: f64,
    rem: f64,
    awake: f64,
});

record_section!(Sleep {
    in_bed_time: String,
    asleep_time: String,
    sleep_duration: f64,
    sleep_stages: SleepStages,
});

record_section!(Symptoms {
    headache: bool,
    fatigue: bool,
    fever: bool,
    chills: bool,
    cough: bool,
    shortness_of_breath: bool,
    nausea: bool,
    diarrhea: bool,
});

record_section!(BloodPressure {
    systolic: f64,
    diastolic: f64,
});

record_section!(Vitals {
    blood_pressure: BloodPressure,
    body_temperature: f64,
    blood_oxygen_saturation: f64,
    blood_glucose: Vec<BTreeMap<String, f64>>,
});

record_section!(OtherData {
    handwashing_duration: f64,
    time_in_daylight: f64,
    uv_exposure: f64,
});

record_section!(
    /// The full record derived from a snapshot.
    ///
    /// Sections the catalog has no descriptors for (cycle tracking, hearing,
    /// medications, mental wellbeing, mobility, sleep, symptoms) are always
    /// unset after normalization.
    NormalizedRecord {
        activity: Activity,
        body_measurements: BodyMeasurements,
        cycle_tracking: CycleTracking,
        hearing: Hearing,
        heart: Heart,
        medications: Vec<Medication>,
        mental_wellbeing: MentalWellbeing,
        mobility: Mobility,
        nutrition: Nutrition,
        respiratory: Respiratory,
        sleep: Sleep,
        symptoms: Symptoms,
        vitals: Vitals,
        other_data: OtherData,
    }
);

/// Patient insurance details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Insurance {
    pub provider: String,
    pub insurance_number: String,
}

/// Patient identity, uploaded alongside the health record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GeneralInformation {
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub insurance: Insurance,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let record = NormalizedRecord {
            activity: Some(Activity {
                step_count: Some(300.0),
                ..Default::default()
            }),
            vitals: Some(Vitals {
                blood_pressure: Some(BloodPressure {
                    systolic: Some(120.0),
                    diastolic: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "activity": { "stepCount": 300.0 },
                "vitals": { "bloodPressure": { "systolic": 120.0 } }
            })
        );
    }

    #[test]
    fn general_information_uses_camel_case() {
        let info = GeneralInformation {
            name: "Ada Lovelace".into(),
            date_of_birth: "1815-12-10".into(),
            gender: "female".into(),
            address: "London".into(),
            insurance: Insurance {
                provider: "TK".into(),
                insurance_number: "A123".into(),
            },
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["dateOfBirth"], "1815-12-10");
        assert_eq!(json["insurance"]["insuranceNumber"], "A123");
    }
}
