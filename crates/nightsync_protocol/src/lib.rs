//! # nightsync protocol
//!
//! Pump event taxonomy and Nightscout wire types.
//!
//! This crate provides:
//! - `EventType`, the closed set of pump-native and remote-native event tags
//! - `PumpHistoryEvent`, one recorded pump/device action
//! - `DeviceLifecycle`, the coarse classification derived from an event type
//! - Remote record shapes (glucose entries, carbs, temp targets, overrides,
//!   announcements, uploadable treatments)
//! - Local-origin markers used for duplicate-ingestion filtering
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod announcement;
mod error;
mod event;
mod lifecycle;
pub mod origin;
mod records;
pub mod time;

pub use announcement::{Announcement, AnnouncementAction, PumpCommand};
pub use error::{ProtocolError, ProtocolResult};
pub use event::{EventType, PumpHistoryEvent, TempType, Vocabulary};
pub use lifecycle::{ComponentKind, DeviceLifecycle};
pub use records::{
    BloodGlucose, CarbsEntry, OverrideTreatment, TempTarget, Treatment, OVERRIDE_EVENT_TYPE,
};
