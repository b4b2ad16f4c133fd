//! Pump history events and the event type taxonomy.

use crate::error::ProtocolError;
use crate::lifecycle::{ComponentKind, DeviceLifecycle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which vocabulary an event tag comes from.
///
/// Pump telemetry and the remote store name the same physical actions
/// differently; both vocabularies live in one closed [`EventType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// Tags emitted by the pump telemetry protocol.
    Pump,
    /// Human-readable tags used by the remote store.
    Remote,
}

/// Kind of a recorded pump or device action.
///
/// The set is closed. Each variant has exactly one wire tag, see
/// [`EventType::as_str`]; adding a physical action means extending this
/// enum and [`EventType::lifecycle`] together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventType {
    /// `Bolus`
    Bolus,
    /// `Meal Bolus`
    MealBolus,
    /// `Correction Bolus`
    CorrectionBolus,
    /// `Snack Bolus`
    SnackBolus,
    /// `BolusWizard`
    BolusWizard,
    /// `TempBasal`
    TempBasal,
    /// `TempBasalDuration`
    TempBasalDuration,
    /// `PumpSuspend`
    PumpSuspend,
    /// `PumpResume`
    PumpResume,
    /// `PumpAlarm`
    PumpAlarm,
    /// `PumpBattery`
    PumpBattery,
    /// `Rewind`
    Rewind,
    /// `Prime`
    Prime,
    /// `JournalEntryMealMarker`
    JournalEntryMealMarker,
    /// `Temp Basal`
    NsTempBasal,
    /// `Carb Correction`
    NsCarbCorrection,
    /// `Temporary Target`
    NsTempTarget,
    /// `Insulin Change`
    NsInsulinChange,
    /// `Site Change`
    NsSiteChange,
    /// `Pump Battery Change`
    NsBatteryChange,
    /// `Announcement`
    NsAnnouncement,
    /// `Sensor Start`
    NsSensorChange,
    /// `External Insulin`
    NsExternalInsulin,
    /// `Exercice`
    ///
    /// Historical spelling. Override filters and deletes match
    /// [`OVERRIDE_EVENT_TYPE`](crate::OVERRIDE_EVENT_TYPE) instead, so a
    /// `Treatment` carrying this tag is never read back as an override.
    /// Write overrides as [`OverrideTreatment`](crate::OverrideTreatment).
    NsExercise,
}

impl EventType {
    /// Every event type, pump vocabulary first.
    pub const ALL: [EventType; 24] = [
        EventType::Bolus,
        EventType::MealBolus,
        EventType::CorrectionBolus,
        EventType::SnackBolus,
        EventType::BolusWizard,
        EventType::TempBasal,
        EventType::TempBasalDuration,
        EventType::PumpSuspend,
        EventType::PumpResume,
        EventType::PumpAlarm,
        EventType::PumpBattery,
        EventType::Rewind,
        EventType::Prime,
        EventType::JournalEntryMealMarker,
        EventType::NsTempBasal,
        EventType::NsCarbCorrection,
        EventType::NsTempTarget,
        EventType::NsInsulinChange,
        EventType::NsSiteChange,
        EventType::NsBatteryChange,
        EventType::NsAnnouncement,
        EventType::NsSensorChange,
        EventType::NsExternalInsulin,
        EventType::NsExercise,
    ];

    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Bolus => "Bolus",
            EventType::MealBolus => "Meal Bolus",
            EventType::CorrectionBolus => "Correction Bolus",
            EventType::SnackBolus => "Snack Bolus",
            EventType::BolusWizard => "BolusWizard",
            EventType::TempBasal => "TempBasal",
            EventType::TempBasalDuration => "TempBasalDuration",
            EventType::PumpSuspend => "PumpSuspend",
            EventType::PumpResume => "PumpResume",
            EventType::PumpAlarm => "PumpAlarm",
            EventType::PumpBattery => "PumpBattery",
            EventType::Rewind => "Rewind",
            EventType::Prime => "Prime",
            EventType::JournalEntryMealMarker => "JournalEntryMealMarker",
            EventType::NsTempBasal => "Temp Basal",
            EventType::NsCarbCorrection => "Carb Correction",
            EventType::NsTempTarget => "Temporary Target",
            EventType::NsInsulinChange => "Insulin Change",
            EventType::NsSiteChange => "Site Change",
            EventType::NsBatteryChange => "Pump Battery Change",
            EventType::NsAnnouncement => "Announcement",
            EventType::NsSensorChange => "Sensor Start",
            EventType::NsExternalInsulin => "External Insulin",
            EventType::NsExercise => "Exercice",
        }
    }

    /// Returns the vocabulary this tag belongs to.
    pub fn vocabulary(&self) -> Vocabulary {
        match self {
            EventType::NsTempBasal
            | EventType::NsCarbCorrection
            | EventType::NsTempTarget
            | EventType::NsInsulinChange
            | EventType::NsSiteChange
            | EventType::NsBatteryChange
            | EventType::NsAnnouncement
            | EventType::NsSensorChange
            | EventType::NsExternalInsulin
            | EventType::NsExercise => Vocabulary::Remote,
            _ => Vocabulary::Pump,
        }
    }

    /// Classifies this event type into a device lifecycle signal.
    ///
    /// Returns `None` for event types that do not affect device lifecycle
    /// state. Both vocabularies collapse into the same signal.
    pub fn lifecycle(&self) -> Option<DeviceLifecycle> {
        match self {
            EventType::Prime => Some(DeviceLifecycle::Prime),
            EventType::PumpResume => Some(DeviceLifecycle::Resume),
            EventType::Rewind => Some(DeviceLifecycle::Rewind),
            EventType::PumpSuspend => Some(DeviceLifecycle::Suspend),
            EventType::NsBatteryChange | EventType::PumpBattery => {
                Some(DeviceLifecycle::ReplaceComponent(ComponentKind::Pump))
            }
            EventType::NsInsulinChange => {
                Some(DeviceLifecycle::ReplaceComponent(ComponentKind::Reservoir))
            }
            EventType::NsSiteChange => {
                Some(DeviceLifecycle::ReplaceComponent(ComponentKind::InfusionSet))
            }
            EventType::PumpAlarm => Some(DeviceLifecycle::Alarm),
            _ => None,
        }
    }

    /// Returns true for the bolus family of tags.
    pub fn is_bolus(&self) -> bool {
        matches!(
            self,
            EventType::Bolus
                | EventType::MealBolus
                | EventType::CorrectionBolus
                | EventType::SnackBolus
                | EventType::NsExternalInsulin
        )
    }
}

impl FromStr for EventType {
    type Err = ProtocolError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        // The remote store spells the override tag both ways.
        if tag == "Exercise" {
            return Ok(EventType::NsExercise);
        }
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| ProtocolError::UnknownEventType(tag.to_string()))
    }
}

impl TryFrom<String> for EventType {
    type Error = ProtocolError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basal delivery mode of a temp basal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempType {
    /// Rate in units per hour.
    Absolute,
    /// Rate as a percentage of the scheduled basal.
    Percent,
}

/// One recorded pump or device action.
///
/// Attributes that do not apply to `event_type` are `None` and are left out
/// of the encoded form entirely; a present field is the signal that the
/// attribute applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpHistoryEvent {
    /// Identifier assigned by the recording source.
    pub id: String,
    /// Event kind.
    #[serde(rename = "_type")]
    pub event_type: EventType,
    /// When the event occurred.
    #[serde(with = "crate::time::iso8601")]
    pub timestamp: DateTime<Utc>,
    /// Dose in units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    /// Duration in minutes, historical encoding.
    #[serde(rename = "duration (min)", default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<i32>,
    /// Basal rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Basal delivery mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<TempType>,
    /// Carbohydrates in grams.
    #[serde(rename = "carb_input", default, skip_serializing_if = "Option::is_none")]
    pub carb_input: Option<i32>,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Super-micro-bolus flag.
    #[serde(rename = "isSMB", default, skip_serializing_if = "Option::is_none")]
    pub is_smb: Option<bool>,
    /// Insulin not delivered by the pump.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_external_insulin: Option<bool>,
}

impl PumpHistoryEvent {
    /// Creates an event with no optional attributes.
    pub fn new(id: impl Into<String>, event_type: EventType, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            event_type,
            timestamp,
            amount: None,
            duration: None,
            duration_min: None,
            rate: None,
            temp: None,
            carb_input: None,
            note: None,
            is_smb: None,
            is_external_insulin: None,
        }
    }

    /// Sets the dose amount.
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the raw duration.
    pub fn with_duration(mut self, minutes: i32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Sets the historical `duration (min)` field.
    pub fn with_duration_min(mut self, minutes: i32) -> Self {
        self.duration_min = Some(minutes);
        self
    }

    /// Sets the temp basal rate and its delivery mode.
    pub fn with_rate(mut self, rate: f64, temp: TempType) -> Self {
        self.rate = Some(rate);
        self.temp = Some(temp);
        self
    }

    /// Sets the carbohydrate amount.
    pub fn with_carb_input(mut self, grams: i32) -> Self {
        self.carb_input = Some(grams);
        self
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Marks the event as a super-micro-bolus.
    pub fn with_smb(mut self, is_smb: bool) -> Self {
        self.is_smb = Some(is_smb);
        self
    }

    /// Marks the insulin as not delivered by the pump.
    pub fn with_external_insulin(mut self, external: bool) -> Self {
        self.is_external_insulin = Some(external);
        self
    }

    /// Duration in minutes, preferring the historical field when both exist.
    pub fn duration_minutes(&self) -> Option<i32> {
        self.duration_min.or(self.duration)
    }

    /// Lifecycle classification of this event.
    pub fn lifecycle(&self) -> Option<DeviceLifecycle> {
        self.event_type.lifecycle()
    }
}
