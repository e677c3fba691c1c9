use headers::ContentType;
use indexmap::IndexMap;
use serde_json::Value;

use super::descriptor::{ContentKind, MultipartPart};

/// An encoded request body together with its negotiated `Content-Type`.
#[derive(Clone, derive_more::Debug)]
pub(super) struct EncodedBody {
    pub(super) content_type: ContentType,
    #[debug(ignore)]
    pub(super) data: Vec<u8>,
}

/// Errors produced while encoding a request body.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum EncodeError {
    /// JSON serialization of the merged field map failed.
    Json(serde_json::Error),

    /// URL-encoded serialization of the merged field map failed.
    Form(serde_urlencoded::ser::Error),

    /// A field value has no string representation for form or query encoding.
    ///
    /// Only strings, numbers and booleans can be stringified; nulls, arrays
    /// and objects are rejected.
    #[display("Unsupported value for field '{field}': {value}")]
    #[from(skip)]
    UnsupportedValue {
        /// Name of the offending field.
        field: String,
        /// The value that could not be stringified.
        value: Value,
    },

    /// A multipart body was requested without any parts.
    #[display("A multipart body requires at least one part")]
    NoParts,

    /// The boundary token does not form a valid `multipart/form-data` MIME type.
    #[display("Invalid multipart boundary: {boundary}")]
    #[from(skip)]
    InvalidBoundary {
        /// The rejected boundary token.
        boundary: String,
    },
}

/// Encodes the merged body fields (or multipart parts) into a byte payload
/// and its `Content-Type` header value.
pub(super) fn encode(
    content_kind: ContentKind,
    fields: &IndexMap<String, Value>,
    parts: Option<&[MultipartPart]>,
    boundary: &str,
) -> Result<EncodedBody, EncodeError> {
    match content_kind {
        ContentKind::Json => encode_json(fields),
        ContentKind::UrlEncoded => encode_form(fields),
        ContentKind::Multipart => encode_multipart(parts.unwrap_or_default(), boundary),
    }
}

fn encode_json(fields: &IndexMap<String, Value>) -> Result<EncodedBody, EncodeError> {
    let data = serde_json::to_vec(fields)?;
    Ok(EncodedBody {
        content_type: ContentType::json(),
        data,
    })
}

fn encode_form(fields: &IndexMap<String, Value>) -> Result<EncodedBody, EncodeError> {
    let data = query_string(fields)?.into_bytes();
    Ok(EncodedBody {
        content_type: ContentType::form_url_encoded(),
        data,
    })
}

/// Serializes the merged field map as `key=value` pairs joined by `&`.
///
/// Percent-encoding of reserved characters is delegated to
/// `serde_urlencoded`. Pair order follows the merged map, so the output is
/// deterministic for a given descriptor.
pub(super) fn query_string(fields: &IndexMap<String, Value>) -> Result<String, EncodeError> {
    let pairs = fields
        .iter()
        .map(|(name, value)| Ok((name.as_str(), stringify(name, value)?)))
        .collect::<Result<Vec<_>, EncodeError>>()?;
    let encoded = serde_urlencoded::to_string(&pairs)?;
    Ok(encoded)
}

fn stringify(field: &str, value: &Value) -> Result<String, EncodeError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(EncodeError::UnsupportedValue {
            field: field.to_string(),
            value: value.clone(),
        }),
    }
}

fn encode_multipart(parts: &[MultipartPart], boundary: &str) -> Result<EncodedBody, EncodeError> {
    if parts.is_empty() {
        return Err(EncodeError::NoParts);
    }

    let mime_type = format!("multipart/form-data; boundary={boundary}")
        .parse::<mime::Mime>()
        .map_err(|_| EncodeError::InvalidBoundary {
            boundary: boundary.to_string(),
        })?;

    let mut data = Vec::new();
    for part in parts {
        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field_name, part.file_name
            )
            .as_bytes(),
        );
        data.extend_from_slice(format!("Content-Type: {}\r\n", part.mime_type).as_bytes());
        data.extend_from_slice(b"\r\n");
        data.extend_from_slice(&part.bytes);
        data.extend_from_slice(b"\r\n");
    }
    data.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(EncodedBody {
        content_type: ContentType::from(mime_type),
        data,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields() -> IndexMap<String, Value> {
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), json!("test user"));
        fields.insert("value".to_string(), json!(42));
        fields
    }

    #[test]
    fn test_encode_json_round_trips() {
        let body = encode(ContentKind::Json, &fields(), None, "b").expect("should encode");

        assert_eq!(body.content_type, ContentType::json());
        let parsed: Value = serde_json::from_slice(&body.data).expect("should parse");
        assert_eq!(parsed, json!({"name": "test user", "value": 42}));
    }

    #[test]
    fn test_encode_form_percent_encodes() {
        let body = encode(ContentKind::UrlEncoded, &fields(), None, "b").expect("should encode");

        assert_eq!(body.content_type, ContentType::form_url_encoded());
        let form = String::from_utf8(body.data).expect("should be valid UTF-8");
        insta::assert_snapshot!(form, @"name=test+user&value=42");
    }

    #[test]
    fn test_encode_form_rejects_nested_values() {
        let mut fields = IndexMap::new();
        fields.insert("filters".to_string(), json!({"a": 1}));

        let error = encode(ContentKind::UrlEncoded, &fields, None, "b").unwrap_err();

        assert!(matches!(error, EncodeError::UnsupportedValue { field, .. } if field == "filters"));
    }

    #[test]
    fn test_encode_multipart_layout() {
        let bytes = vec![0xFF, 0xD8, 0xFF];
        let parts = vec![MultipartPart::new(
            "file",
            "file.jpg",
            mime::IMAGE_JPEG,
            bytes.clone(),
        )];

        let body =
            encode(ContentKind::Multipart, &fields(), Some(&parts), "token").expect("should encode");

        assert_eq!(
            body.content_type,
            ContentType::from(
                "multipart/form-data; boundary=token"
                    .parse::<mime::Mime>()
                    .expect("valid mime")
            )
        );

        let opening = b"--token\r\n";
        let closing = b"--token--\r\n";
        let count_opening = body
            .data
            .windows(opening.len())
            .filter(|window| *window == opening)
            .count();
        assert_eq!(count_opening, 1);
        assert!(body.data.ends_with(closing));

        // Part bytes appear verbatim between the blank line and the next boundary.
        let payload = b"\r\n\r\n\xFF\xD8\xFF\r\n--token--\r\n";
        assert!(
            body.data
                .windows(payload.len())
                .any(|window| window == payload)
        );

        let text = String::from_utf8_lossy(&body.data);
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"file\"; filename=\"file.jpg\"\r\n"
        ));
        assert!(text.contains("Content-Type: image/jpeg\r\n"));
    }

    #[test]
    fn test_encode_multipart_without_parts_fails() {
        let error = encode(ContentKind::Multipart, &fields(), None, "token").unwrap_err();
        assert!(matches!(error, EncodeError::NoParts));

        let error = encode(ContentKind::Multipart, &fields(), Some(&[]), "token").unwrap_err();
        assert!(matches!(error, EncodeError::NoParts));
    }

    #[test]
    fn test_query_string_orders_by_merged_map() {
        let query = query_string(&fields()).expect("should encode");
        insta::assert_snapshot!(query, @"name=test+user&value=42");
    }
}
