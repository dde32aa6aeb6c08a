//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities, and the [`IdCodec`] contract
//! that converts them to and from their external string form (URL path
//! segments, JSON fields).
//!
//! Storage engines decide which wrapper they allocate: auto-increment
//! engines hand out [`SerialId`]s, UUID-keyed engines hand out [`Id`]s.
//! Callers only ever see the encoded string.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// Failure to decode an identifier from its string form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdDecodeError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier is malformed: {0:?}")]
    Malformed(String),

    #[error("identifier is out of range: {0:?}")]
    OutOfRange(String),
}

/// Lossless conversion between an identifier and its external string form
///
/// `decode(&id.encode())` must yield `id` for every allocated identifier.
pub trait IdCodec: Sized {
    /// Render the identifier. Total: never fails.
    fn encode(&self) -> String;

    /// Parse an identifier previously produced by [`IdCodec::encode`].
    fn decode(s: &str) -> Result<Self, IdDecodeError>;
}

// ============================================================================
// SerialId - engine-allocated, monotonically increasing
// ============================================================================

/// Unsigned serial identifier allocated by a storage engine sequence
///
/// Rendered as a canonical base-10 string. Decoding accepts ASCII digits
/// only (no sign, no whitespace).
///
/// Usage:
/// ```
/// use kernel::id::{IdCodec, SerialId, markers};
/// type DelegationId = SerialId<markers::Delegation>;
///
/// let id = DelegationId::from_u64(42);
/// assert_eq!(id.encode(), "42");
/// assert_eq!(DelegationId::decode("42").unwrap(), id);
/// assert!(DelegationId::decode("forty-two").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerialId<T> {
    value: u64,
    _marker: PhantomData<T>,
}

impl<T> SerialId<T> {
    /// Wrap a value produced by the storage engine
    pub const fn from_u64(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the underlying value
    pub const fn get(&self) -> u64 {
        self.value
    }
}

impl<T> IdCodec for SerialId<T> {
    fn encode(&self) -> String {
        self.value.to_string()
    }

    fn decode(s: &str) -> Result<Self, IdDecodeError> {
        if s.is_empty() {
            return Err(IdDecodeError::Empty);
        }
        // u64::from_str tolerates a leading '+', which is not canonical
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdDecodeError::Malformed(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self::from_u64)
            .map_err(|_| IdDecodeError::OutOfRange(s.to_string()))
    }
}

impl<T> FromStr for SerialId<T> {
    type Err = IdDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl<T> fmt::Debug for SerialId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerialId({})", self.value)
    }
}

impl<T> fmt::Display for SerialId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

// ============================================================================
// Id - UUID based
// ============================================================================

/// Generic typed UUID wrapper, for engines keyed by UUID
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IdCodec for Id<T> {
    fn encode(&self) -> String {
        self.value.hyphenated().to_string()
    }

    fn decode(s: &str) -> Result<Self, IdDecodeError> {
        if s.is_empty() {
            return Err(IdDecodeError::Empty);
        }
        Uuid::parse_str(s)
            .map(Self::from_uuid)
            .map_err(|_| IdDecodeError::Malformed(s.to_string()))
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for Delegation IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Delegation;
}

#[cfg(test)]
mod tests {
    use super::*;

    type DelegationId = SerialId<markers::Delegation>;
    type DelegationUuid = Id<markers::Delegation>;

    #[test]
    fn test_serial_id_roundtrip() {
        for value in [1u64, 42, 1_000_000, u64::MAX] {
            let id = DelegationId::from_u64(value);
            assert_eq!(DelegationId::decode(&id.encode()).unwrap(), id);
        }
    }

    #[test]
    fn test_serial_id_display_matches_encode() {
        let id = DelegationId::from_u64(7);
        assert_eq!(id.to_string(), id.encode());
    }

    #[test]
    fn test_serial_id_rejects_non_numeric() {
        assert_eq!(DelegationId::decode(""), Err(IdDecodeError::Empty));
        assert!(matches!(
            DelegationId::decode("not-a-number"),
            Err(IdDecodeError::Malformed(_))
        ));
        assert!(matches!(
            DelegationId::decode("+5"),
            Err(IdDecodeError::Malformed(_))
        ));
        assert!(matches!(
            DelegationId::decode("-5"),
            Err(IdDecodeError::Malformed(_))
        ));
        assert!(matches!(
            DelegationId::decode(" 5"),
            Err(IdDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_serial_id_rejects_out_of_range() {
        assert!(matches!(
            DelegationId::decode("18446744073709551616"),
            Err(IdDecodeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_serial_id_from_str_trait() {
        let id: DelegationId = "123".parse().unwrap();
        assert_eq!(id.get(), 123);
    }

    #[test]
    fn test_uuid_id_roundtrip() {
        let id = DelegationUuid::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert_eq!(DelegationUuid::decode(&id.encode()).unwrap(), id);
    }

    #[test]
    fn test_uuid_id_rejects_garbage() {
        assert_eq!(DelegationUuid::decode(""), Err(IdDecodeError::Empty));
        assert!(matches!(
            DelegationUuid::decode("999999999"),
            Err(IdDecodeError::Malformed(_))
        ));
    }
}
