//! Delegation Validator
//!
//! Turns an untrusted [`RawDelegation`] into a [`NewDelegation`]:
//! 1. allow-list: only `csr`, `duration` and `certificate-lifetime` survive;
//!    id, status, timestamps, cert URL and details are dropped so a client
//!    cannot inject server-owned state
//! 2. `csr` is mandatory
//! 3. durations that are absent, negative or above their ceiling are replaced
//!    by the ceiling (clamp, not reject)
//! 4. the certificate lifetime may not exceed the delegation duration
//!
//! Pure: no I/O, output depends only on the input and the bounds.

use crate::domain::entities::{NewDelegation, RawDelegation};
use crate::domain::value_objects::{DelegationBounds, DelegationStatus};
use crate::error::{StarError, StarResult};

/// Replace an absent or out-of-range value by `max`
pub fn normalize_duration(requested: Option<i64>, max: i64) -> i64 {
    match requested {
        Some(secs) if (0..=max).contains(&secs) => secs,
        _ => max,
    }
}

/// Sanitize a creation request against the configured bounds
pub fn sanitize(raw: RawDelegation, bounds: &DelegationBounds) -> StarResult<NewDelegation> {
    let dropped = raw.server_owned_fields();
    if !dropped.is_empty() {
        tracing::debug!(fields = ?dropped, "Dropping server-owned fields from delegation request");
    }

    let csr = raw.csr.ok_or(StarError::MissingParameter("csr"))?;

    let duration_secs = normalize_duration(raw.duration_secs, bounds.max_duration_secs());
    let cert_lifetime_secs =
        normalize_duration(raw.cert_lifetime_secs, bounds.max_cert_lifetime_secs());

    if cert_lifetime_secs > duration_secs {
        return Err(StarError::BadParameter(format!(
            "certificate-lifetime ({cert_lifetime_secs}s) exceeds duration ({duration_secs}s)"
        )));
    }

    Ok(NewDelegation {
        csr,
        duration_secs,
        cert_lifetime_secs,
        status: DelegationStatus::New,
    })
}
