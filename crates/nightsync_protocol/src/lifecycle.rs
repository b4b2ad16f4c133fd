//! Device lifecycle classification.

use std::fmt;

/// A physical component that can be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// The pump itself (including its battery).
    Pump,
    /// The insulin reservoir.
    Reservoir,
    /// The infusion set / cannula site.
    InfusionSet,
}

impl ComponentKind {
    /// Returns the lowercase name used in logs and displays.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Pump => "pump",
            ComponentKind::Reservoir => "reservoir",
            ComponentKind::InfusionSet => "infusion-set",
        }
    }
}

/// Coarse lifecycle signal derived from an event type.
///
/// Produced by [`EventType::lifecycle`](crate::EventType::lifecycle); an
/// unclassified event type has no `DeviceLifecycle` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceLifecycle {
    /// Tubing or cannula was primed.
    Prime,
    /// Delivery resumed after a suspend.
    Resume,
    /// Reservoir plunger was rewound.
    Rewind,
    /// Delivery was suspended.
    Suspend,
    /// A component was replaced.
    ReplaceComponent(ComponentKind),
    /// The pump raised an alarm.
    Alarm,
}

impl DeviceLifecycle {
    /// Returns true if delivery state changes (suspend or resume).
    pub fn affects_delivery(&self) -> bool {
        matches!(self, DeviceLifecycle::Suspend | DeviceLifecycle::Resume)
    }
}

impl fmt::Display for DeviceLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceLifecycle::Prime => f.write_str("prime"),
            DeviceLifecycle::Resume => f.write_str("resume"),
            DeviceLifecycle::Rewind => f.write_str("rewind"),
            DeviceLifecycle::Suspend => f.write_str("suspend"),
            DeviceLifecycle::ReplaceComponent(kind) => {
                write!(f, "replace-component({})", kind.as_str())
            }
            DeviceLifecycle::Alarm => f.write_str("alarm"),
        }
    }
}
