//! Remote record shapes.
//!
//! These mirror the JSON documents stored by Nightscout in its `entries`
//! and `treatments` collections. Optional fields are omitted on encode.

use crate::event::{EventType, PumpHistoryEvent, TempType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `eventType` the remote store uses for overrides.
///
/// Differs from the `Exercice` spelling of [`EventType::NsExercise`]; the
/// remote filters match this exact value.
pub const OVERRIDE_EVENT_TYPE: &str = "Exercise";

/// A sensor glucose entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGlucose {
    /// Remote document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Sensor glucose value as stored remotely (mg/dL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgv: Option<i32>,
    /// Canonical glucose value (mg/dL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose: Option<i32>,
    /// Trend arrow name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Reading time as Unix milliseconds.
    pub date: i64,
    /// Reading time.
    #[serde(with = "crate::time::iso8601")]
    pub date_string: DateTime<Utc>,
    /// Filtered raw sensor value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<f64>,
    /// Unfiltered raw sensor value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfiltered: Option<f64>,
    /// Sensor noise level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<i32>,
    /// Entry type (`sgv`, `mbg`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl BloodGlucose {
    /// Creates a sensor glucose entry at `at`.
    pub fn sgv(value: i32, at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            sgv: Some(value),
            glucose: Some(value),
            direction: None,
            date: at.timestamp_millis(),
            date_string: at,
            filtered: None,
            unfiltered: None,
            noise: None,
            kind: Some("sgv".into()),
        }
    }

    /// Copies the `sgv` alias into the canonical `glucose` value.
    pub fn normalized(mut self) -> Self {
        self.glucose = self.sgv;
        self
    }
}

/// A carbohydrate treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbsEntry {
    /// Remote document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation time.
    #[serde(rename = "created_at", with = "crate::time::iso8601")]
    pub created_at: DateTime<Utc>,
    /// Carbohydrates in grams.
    pub carbs: f64,
    /// Fat in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    /// Protein in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    /// Origin marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
}

/// A temporary glucose target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempTarget {
    /// Remote document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Preset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time.
    #[serde(rename = "created_at", with = "crate::time::iso8601")]
    pub created_at: DateTime<Utc>,
    /// Upper bound (mg/dL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_top: Option<f64>,
    /// Lower bound (mg/dL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_bottom: Option<f64>,
    /// Duration in minutes; zero cancels an active target.
    pub duration: f64,
    /// Origin marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    /// Reason text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// An override (exercise) treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideTreatment {
    /// Remote document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation time.
    #[serde(rename = "created_at", with = "crate::time::iso8601")]
    pub created_at: DateTime<Utc>,
    /// Always [`OVERRIDE_EVENT_TYPE`] for records this app writes.
    pub event_type: String,
    /// Duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Origin marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    /// Override description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OverrideTreatment {
    /// Creates an override record entered by `entered_by`.
    pub fn new(created_at: DateTime<Utc>, entered_by: impl Into<String>) -> Self {
        Self {
            id: None,
            created_at,
            event_type: OVERRIDE_EVENT_TYPE.to_string(),
            duration: None,
            entered_by: Some(entered_by.into()),
            notes: None,
        }
    }
}

/// An uploadable treatment.
///
/// Overrides are not treatments in this sense: use [`OverrideTreatment`],
/// whose tag matches the override fetch and delete filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    /// Remote event tag.
    pub event_type: EventType,
    /// Creation time; also the deletion key.
    #[serde(rename = "created_at", with = "crate::time::iso8601")]
    pub created_at: DateTime<Utc>,
    /// Origin marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    /// Duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    /// Basal rate in units per hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Absolute basal rate in units per hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute: Option<f64>,
    /// Basal rate as percent of schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    /// Insulin in units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulin: Option<f64>,
    /// Carbohydrates in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    /// Upper target bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_top: Option<f64>,
    /// Lower target bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_bottom: Option<f64>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Treatment {
    /// Creates a treatment with no optional attributes.
    pub fn new(event_type: EventType, created_at: DateTime<Utc>) -> Self {
        Self {
            event_type,
            created_at,
            entered_by: None,
            duration: None,
            rate: None,
            absolute: None,
            percent: None,
            insulin: None,
            carbs: None,
            target_top: None,
            target_bottom: None,
            notes: None,
        }
    }

    /// Maps a recorded pump event onto the remote treatment vocabulary.
    ///
    /// Returns `None` for events the remote store has no treatment for, and
    /// for dose or carb events missing the attribute that carries the dose.
    pub fn from_pump_event(event: &PumpHistoryEvent, entered_by: &str) -> Option<Treatment> {
        let mut treatment = match event.event_type {
            t if t.is_bolus() => {
                let event_type = if t == EventType::NsExternalInsulin
                    || event.is_external_insulin == Some(true)
                {
                    EventType::NsExternalInsulin
                } else {
                    EventType::CorrectionBolus
                };
                let mut treatment = Treatment::new(event_type, event.timestamp);
                treatment.insulin = Some(event.amount?);
                treatment
            }
            EventType::TempBasal | EventType::NsTempBasal => {
                let rate = event.rate?;
                let mut treatment = Treatment::new(EventType::NsTempBasal, event.timestamp);
                match event.temp {
                    Some(TempType::Percent) => treatment.percent = Some(rate),
                    _ => {
                        treatment.rate = Some(rate);
                        treatment.absolute = Some(rate);
                    }
                }
                treatment.duration = event.duration_minutes();
                treatment
            }
            EventType::NsCarbCorrection | EventType::JournalEntryMealMarker => {
                let mut treatment = Treatment::new(EventType::NsCarbCorrection, event.timestamp);
                treatment.carbs = Some(f64::from(event.carb_input?));
                treatment
            }
            EventType::Rewind => Treatment::new(EventType::NsInsulinChange, event.timestamp),
            EventType::Prime => Treatment::new(EventType::NsSiteChange, event.timestamp),
            EventType::PumpBattery => Treatment::new(EventType::NsBatteryChange, event.timestamp),
            t @ (EventType::NsInsulinChange
            | EventType::NsSiteChange
            | EventType::NsBatteryChange
            | EventType::NsSensorChange) => Treatment::new(t, event.timestamp),
            _ => return None,
        };

        treatment.entered_by = Some(entered_by.to_string());
        treatment.notes = event.note.clone();
        Some(treatment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::TREATMENT_ENTERED_BY;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 8, 30, 0).unwrap()
    }

    #[test]
    fn glucose_normalization_copies_sgv() {
        let json = r#"[{"_id":"a","sgv":112,"date":1792312200000,"dateString":"2026-10-18T08:30:00.000Z","direction":"Flat"}]"#;
        let entries: Vec<BloodGlucose> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].glucose, None);

        let normalized = entries[0].clone().normalized();
        assert_eq!(normalized.glucose, Some(112));
        assert_eq!(normalized.direction.as_deref(), Some("Flat"));
    }

    #[test]
    fn carbs_decode() {
        let json = r#"{"_id":"c1","created_at":"2026-10-18T08:30:00.000Z","carbs":30,"enteredBy":"Loop"}"#;
        let entry: CarbsEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.carbs, 30.0);
        assert_eq!(entry.created_at, at());
        assert_eq!(entry.entered_by.as_deref(), Some("Loop"));
        assert_eq!(entry.fat, None);
    }

    #[test]
    fn override_uses_remote_spelling() {
        let record = OverrideTreatment::new(at(), TREATMENT_ENTERED_BY);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["eventType"], "Exercise");
        assert_eq!(json["created_at"], "2026-10-18T08:30:00.000Z");
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn exercise_treatment_keeps_historical_tag() {
        let treatment = Treatment::new(EventType::NsExercise, at());
        let record = OverrideTreatment::new(at(), TREATMENT_ENTERED_BY);
        let treatment = serde_json::to_value(&treatment).unwrap();
        let record = serde_json::to_value(&record).unwrap();

        assert_eq!(treatment["eventType"], "Exercice");
        assert_ne!(treatment["eventType"], OVERRIDE_EVENT_TYPE);
        assert_eq!(record["eventType"], OVERRIDE_EVENT_TYPE);
    }

    #[test]
    fn bolus_maps_to_correction_bolus() {
        let event = PumpHistoryEvent::new("b", EventType::Bolus, at())
            .with_amount(2.25)
            .with_smb(true);
        let treatment = Treatment::from_pump_event(&event, TREATMENT_ENTERED_BY).unwrap();

        assert_eq!(treatment.event_type, EventType::CorrectionBolus);
        assert_eq!(treatment.insulin, Some(2.25));
        assert_eq!(treatment.entered_by.as_deref(), Some(TREATMENT_ENTERED_BY));
        assert_eq!(treatment.carbs, None);
    }

    #[test]
    fn external_insulin_keeps_its_tag() {
        let event = PumpHistoryEvent::new("b", EventType::Bolus, at())
            .with_amount(4.0)
            .with_external_insulin(true);
        let treatment = Treatment::from_pump_event(&event, TREATMENT_ENTERED_BY).unwrap();
        assert_eq!(treatment.event_type, EventType::NsExternalInsulin);
    }

    #[test]
    fn bolus_without_amount_is_skipped() {
        let event = PumpHistoryEvent::new("b", EventType::Bolus, at());
        assert!(Treatment::from_pump_event(&event, TREATMENT_ENTERED_BY).is_none());
    }

    #[test]
    fn temp_basal_modes() {
        let absolute = PumpHistoryEvent::new("t", EventType::TempBasal, at())
            .with_rate(0.65, TempType::Absolute)
            .with_duration_min(30);
        let treatment = Treatment::from_pump_event(&absolute, TREATMENT_ENTERED_BY).unwrap();
        assert_eq!(treatment.event_type, EventType::NsTempBasal);
        assert_eq!(treatment.absolute, Some(0.65));
        assert_eq!(treatment.rate, Some(0.65));
        assert_eq!(treatment.percent, None);
        assert_eq!(treatment.duration, Some(30));

        let percent = PumpHistoryEvent::new("t", EventType::TempBasal, at())
            .with_rate(120.0, TempType::Percent)
            .with_duration(60);
        let treatment = Treatment::from_pump_event(&percent, TREATMENT_ENTERED_BY).unwrap();
        assert_eq!(treatment.percent, Some(120.0));
        assert_eq!(treatment.absolute, None);
        assert_eq!(treatment.duration, Some(60));
    }

    #[test]
    fn lifecycle_events_map_to_remote_vocabulary() {
        let cases = [
            (EventType::Rewind, EventType::NsInsulinChange),
            (EventType::Prime, EventType::NsSiteChange),
            (EventType::PumpBattery, EventType::NsBatteryChange),
            (EventType::NsSensorChange, EventType::NsSensorChange),
        ];
        for (local, remote) in cases {
            let event = PumpHistoryEvent::new("e", local, at()).with_note("swap");
            let treatment = Treatment::from_pump_event(&event, TREATMENT_ENTERED_BY).unwrap();
            assert_eq!(treatment.event_type, remote);
            assert_eq!(treatment.notes.as_deref(), Some("swap"));
        }
    }

    #[test]
    fn unmapped_events() {
        for event_type in [
            EventType::PumpSuspend,
            EventType::PumpAlarm,
            EventType::BolusWizard,
            EventType::TempBasalDuration,
        ] {
            let event = PumpHistoryEvent::new("e", event_type, at());
            assert!(Treatment::from_pump_event(&event, TREATMENT_ENTERED_BY).is_none());
        }
    }

    #[test]
    fn treatment_encode_shape() {
        let event = PumpHistoryEvent::new("c", EventType::JournalEntryMealMarker, at())
            .with_carb_input(45);
        let treatment = Treatment::from_pump_event(&event, "freeaps-x").unwrap();
        let json = serde_json::to_value(&treatment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "eventType": "Carb Correction",
                "created_at": "2026-10-18T08:30:00.000Z",
                "enteredBy": "freeaps-x",
                "carbs": 45.0,
            })
        );
    }
}
