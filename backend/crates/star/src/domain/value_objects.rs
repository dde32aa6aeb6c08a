//! Domain Value Objects
//!
//! Immutable value types for the delegation domain.

use kernel::id::{SerialId, markers};
use std::fmt;
use std::time::Duration;

/// Delegation identifier, allocated by the storage engine
pub type DelegationId = SerialId<markers::Delegation>;

// ============================================================================
// DelegationStatus
// ============================================================================

/// Lifecycle state of a delegation
///
/// ```text
/// new -> wip -> success
///            \-> failed
/// ```
///
/// Only `New` is ever assigned by this crate (at creation). The other
/// transitions belong to the issuance worker; the rules are exposed here so
/// that every writer agrees on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelegationStatus {
    /// Submitted, not yet picked up
    #[default]
    New,
    /// Being worked on by the issuance worker
    Wip,
    /// Certificate issued (see `cert-url`)
    Success,
    /// Issuance failed (see `details`)
    Failed,
}

impl DelegationStatus {
    pub const ALL: [DelegationStatus; 4] = [Self::New, Self::Wip, Self::Success, Self::Failed];

    /// String code used in storage and on the wire
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Wip => "wip",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "new" => Some(Self::New),
            "wip" => Some(Self::Wip),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Check if this is a terminal state (cannot transition out)
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Check whether moving from `self` to `next` is a legal transition
    #[inline]
    pub const fn can_transition_to(&self, next: DelegationStatus) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Wip) | (Self::Wip, Self::Success) | (Self::Wip, Self::Failed)
        )
    }
}

impl fmt::Display for DelegationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// DelegationBounds
// ============================================================================

/// Ceilings applied to client-requested durations, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationBounds {
    max_duration_secs: i64,
    max_cert_lifetime_secs: i64,
}

impl DelegationBounds {
    /// 365 days
    pub const DEFAULT_MAX_DURATION_SECS: i64 = 365 * 24 * 3600;
    /// 7 days
    pub const DEFAULT_MAX_CERT_LIFETIME_SECS: i64 = 7 * 24 * 3600;

    /// Both ceilings must be at least one second and fit the storage column
    pub fn new(max_duration: Duration, max_cert_lifetime: Duration) -> Option<Self> {
        let max_duration_secs = i64::try_from(max_duration.as_secs()).ok()?;
        let max_cert_lifetime_secs = i64::try_from(max_cert_lifetime.as_secs()).ok()?;
        if max_duration_secs < 1 || max_cert_lifetime_secs < 1 {
            return None;
        }
        Some(Self {
            max_duration_secs,
            max_cert_lifetime_secs,
        })
    }

    pub fn max_duration_secs(&self) -> i64 {
        self.max_duration_secs
    }

    pub fn max_cert_lifetime_secs(&self) -> i64 {
        self.max_cert_lifetime_secs
    }
}

impl Default for DelegationBounds {
    fn default() -> Self {
        Self {
            max_duration_secs: Self::DEFAULT_MAX_DURATION_SECS,
            max_cert_lifetime_secs: Self::DEFAULT_MAX_CERT_LIFETIME_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod delegation_status {
        use super::*;

        #[test]
        fn test_code_roundtrip() {
            for status in DelegationStatus::ALL {
                assert_eq!(DelegationStatus::from_code(status.code()), Some(status));
            }
            assert_eq!(DelegationStatus::from_code("done"), None);
            assert_eq!(DelegationStatus::from_code(""), None);
            assert_eq!(DelegationStatus::from_code("NEW"), None);
        }

        #[test]
        fn test_default_is_new() {
            assert_eq!(DelegationStatus::default(), DelegationStatus::New);
        }

        #[test]
        fn test_transitions() {
            use DelegationStatus::*;
            assert!(New.can_transition_to(Wip));
            assert!(Wip.can_transition_to(Success));
            assert!(Wip.can_transition_to(Failed));

            assert!(!New.can_transition_to(Success));
            assert!(!New.can_transition_to(Failed));
            assert!(!Wip.can_transition_to(New));
            assert!(!Success.can_transition_to(Wip));
            assert!(!Failed.can_transition_to(New));
            for status in DelegationStatus::ALL {
                assert!(!status.can_transition_to(status));
            }
        }

        #[test]
        fn test_is_terminal() {
            assert!(!DelegationStatus::New.is_terminal());
            assert!(!DelegationStatus::Wip.is_terminal());
            assert!(DelegationStatus::Success.is_terminal());
            assert!(DelegationStatus::Failed.is_terminal());
        }
    }

    mod delegation_bounds {
        use super::*;

        #[test]
        fn test_defaults() {
            let bounds = DelegationBounds::default();
            assert_eq!(bounds.max_duration_secs(), 31_536_000);
            assert_eq!(bounds.max_cert_lifetime_secs(), 604_800);
        }

        #[test]
        fn test_new_validates() {
            let bounds =
                DelegationBounds::new(Duration::from_secs(3600), Duration::from_secs(60)).unwrap();
            assert_eq!(bounds.max_duration_secs(), 3600);
            assert_eq!(bounds.max_cert_lifetime_secs(), 60);

            assert!(DelegationBounds::new(Duration::ZERO, Duration::from_secs(60)).is_none());
            assert!(
                DelegationBounds::new(Duration::from_secs(60), Duration::from_millis(999))
                    .is_none()
            );
            assert!(DelegationBounds::new(Duration::MAX, Duration::from_secs(60)).is_none());
        }
    }
}
