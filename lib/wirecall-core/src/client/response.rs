use http::StatusCode;
use serde::de::DeserializeOwned;

use super::error::DispatchError;

/// Maps a transport outcome into a decoded value or a taxonomy error.
///
/// Total over every status value: 2xx requires a non-empty payload and a
/// successful decode, 4xx/5xx preserve the raw bytes for caller inspection
/// without attempting a decode, and anything else (1xx, 3xx surfaced without
/// redirect handling, out-of-range codes) is [`DispatchError::Unknown`].
pub(super) fn classify<T>(status: StatusCode, body: &[u8]) -> Result<T, DispatchError>
where
    T: DeserializeOwned,
{
    match status.as_u16() {
        200..=299 => {
            if body.is_empty() {
                return Err(DispatchError::NoData);
            }
            decode_json(body)
        }
        status @ 400..=499 => Err(DispatchError::Client {
            status,
            body: body.to_vec(),
        }),
        status @ 500..=599 => Err(DispatchError::Server {
            status,
            body: body.to_vec(),
        }),
        _ => Err(DispatchError::Unknown),
    }
}

// serde_path_to_error pinpoints which JSON path failed, which beats a bare
// offset when the payload is large.
fn decode_json<T>(body: &[u8]) -> Result<T, DispatchError>
where
    T: DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        DispatchError::Decoding {
            path,
            error: error.into_inner(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    })
}
