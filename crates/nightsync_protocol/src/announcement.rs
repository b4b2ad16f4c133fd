//! Announcements used as remote commands.
//!
//! A caregiver can post an `Announcement` treatment whose notes encode a
//! command, e.g. `bolus:1.5` or `tempbasal:0.8,30`. Only announcements
//! entered by the designated remote-origin marker are fetched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An announcement treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Creation time.
    #[serde(rename = "created_at", with = "crate::time::iso8601")]
    pub created_at: DateTime<Utc>,
    /// Origin marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
    /// Command text.
    #[serde(default)]
    pub notes: String,
}

/// Pump delivery command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCommand {
    /// Suspend delivery.
    Suspend,
    /// Resume delivery.
    Resume,
}

/// Command carried by an announcement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnouncementAction {
    /// Deliver a bolus of the given units.
    Bolus(f64),
    /// Suspend or resume the pump.
    Pump(PumpCommand),
    /// Enable or disable closed-loop operation.
    Looping(bool),
    /// Set a temp basal.
    TempBasal {
        /// Units per hour.
        rate: f64,
        /// Duration in minutes.
        duration: i32,
    },
    /// Record a meal.
    Meal {
        /// Carbohydrates in grams.
        carbs: f64,
        /// Fat in grams.
        fat: f64,
        /// Protein in grams.
        protein: f64,
    },
}

impl Announcement {
    /// Parses the notes into a command.
    ///
    /// Returns `None` when the notes are not a recognized command, when an
    /// amount is negative or not finite, or when a duration is not positive.
    pub fn action(&self) -> Option<AnnouncementAction> {
        let (command, argument) = self.notes.split_once(':')?;
        let argument = argument.trim();

        match command.trim().to_ascii_lowercase().as_str() {
            "bolus" => parse_amount(argument).map(AnnouncementAction::Bolus),
            "pump" => match argument {
                "suspend" => Some(AnnouncementAction::Pump(PumpCommand::Suspend)),
                "resume" => Some(AnnouncementAction::Pump(PumpCommand::Resume)),
                _ => None,
            },
            "looping" => argument.parse().ok().map(AnnouncementAction::Looping),
            "tempbasal" => {
                let (rate, duration) = argument.split_once(',')?;
                let duration: i32 = duration.trim().parse().ok()?;
                if duration <= 0 {
                    return None;
                }
                Some(AnnouncementAction::TempBasal {
                    rate: parse_amount(rate)?,
                    duration,
                })
            }
            "meal" => {
                let mut parts = argument.split(',');
                let carbs = parse_amount(parts.next()?)?;
                let fat = parts.next().map_or(Some(0.0), parse_amount)?;
                let protein = parts.next().map_or(Some(0.0), parse_amount)?;
                Some(AnnouncementAction::Meal {
                    carbs,
                    fat,
                    protein,
                })
            }
            _ => None,
        }
    }
}

/// Parses a dose, rate or macro amount: finite and not negative.
fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note(text: &str) -> Announcement {
        Announcement {
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 8, 30, 0).unwrap(),
            entered_by: Some("remote".into()),
            notes: text.into(),
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(note("bolus:1.5").action(), Some(AnnouncementAction::Bolus(1.5)));
        assert_eq!(
            note("pump: suspend").action(),
            Some(AnnouncementAction::Pump(PumpCommand::Suspend))
        );
        assert_eq!(note("Looping:false").action(), Some(AnnouncementAction::Looping(false)));
        assert_eq!(
            note("tempbasal:0.8, 30").action(),
            Some(AnnouncementAction::TempBasal {
                rate: 0.8,
                duration: 30
            })
        );
        assert_eq!(
            note("meal:40,10").action(),
            Some(AnnouncementAction::Meal {
                carbs: 40.0,
                fat: 10.0,
                protein: 0.0
            })
        );
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(note("hello there").action(), None);
        assert_eq!(note("bolus:lots").action(), None);
        assert_eq!(note("pump:explode").action(), None);
        assert_eq!(note("tempbasal:0.8").action(), None);
        assert_eq!(note("meal:").action(), None);
    }

    #[test]
    fn rejects_unsafe_amounts() {
        for text in [
            "bolus:inf",
            "bolus:NaN",
            "bolus:-5",
            "meal:infinity",
            "meal:40,-10",
            "meal:40,10,NaN",
            "tempbasal:NaN,30",
            "tempbasal:-0.5,30",
            "tempbasal:0.8,0",
            "tempbasal:0.8,-30",
        ] {
            assert_eq!(note(text).action(), None, "{text}");
        }
    }

    #[test]
    fn zero_amounts_are_allowed() {
        assert_eq!(note("bolus:0").action(), Some(AnnouncementAction::Bolus(0.0)));
        assert_eq!(
            note("tempbasal:0,30").action(),
            Some(AnnouncementAction::TempBasal {
                rate: 0.0,
                duration: 30
            })
        );
    }

    #[test]
    fn decodes_wire_shape() {
        let json = r#"{"created_at":"2026-10-18T08:30:00.000Z","enteredBy":"remote","notes":"bolus:0.5","eventType":"Announcement"}"#;
        let announcement: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(announcement.action(), Some(AnnouncementAction::Bolus(0.5)));
    }
}
