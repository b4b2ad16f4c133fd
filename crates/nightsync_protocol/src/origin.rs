//! Local-origin markers.
//!
//! Records uploaded by this app carry one of these values in `enteredBy`.
//! Fetches use them as exclusion or inclusion filters so the app never
//! re-imports its own uploads as remote data.

/// `enteredBy` of carb entries recorded through the carb-entry path.
pub const CARBS_ENTERED_BY: &str = "freeaps-x";

/// `enteredBy` of treatments uploaded through the generic treatment path.
pub const TREATMENT_ENTERED_BY: &str = "freeaps-x-local";

/// `enteredBy` of announcements that act as remote commands.
pub const ANNOUNCEMENT_ENTERED_BY: &str = "remote";
