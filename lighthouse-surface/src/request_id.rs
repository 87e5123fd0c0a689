//! Request identity: client-supplied `X-Request-Id` or an 8-character
//! random fallback (`spec.md` §4.8).

use lighthouse_types::RequestId;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of a generated request id, per the "8-character random
/// identifier" contract. Distinct from the full UUIDs used elsewhere for
/// chunk/article ids — this one is short because it rides in a response
/// header and in logs on every request.
pub const GENERATED_ID_LEN: usize = 8;

/// Resolve the request id for an inbound request: the client-supplied
/// `X-Request-Id` header value if non-empty, else a freshly generated id.
pub fn resolve_request_id(header_value: Option<&str>) -> RequestId {
    match header_value {
        Some(value) if !value.trim().is_empty() => RequestId::new(value.trim()),
        _ => generate_request_id(),
    }
}

/// Generate a new 8-character alphanumeric request id.
pub fn generate_request_id() -> RequestId {
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LEN)
        .map(char::from)
        .collect();
    RequestId::new(id)
}
