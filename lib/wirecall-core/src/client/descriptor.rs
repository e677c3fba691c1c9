use http::Method;
use indexmap::IndexMap;
use serde_json::Value;

/// How the merged body fields of a descriptor are put on the wire.
///
/// For `GET` requests the content kind is irrelevant: merged body fields are
/// always folded into the URL query string and no body is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    /// `application/json` — the merged field map serialized as a JSON object.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded` — `key=value` pairs, percent-encoded.
    UrlEncoded,
    /// `multipart/form-data` — built from [`MultipartPart`]s, body fields are ignored.
    Multipart,
}

/// One part of a `multipart/form-data` body.
///
/// Immutable once constructed; owned by the descriptor that references it.
#[derive(Clone, PartialEq, derive_more::Debug)]
pub struct MultipartPart {
    pub(super) field_name: String,
    pub(super) file_name: String,
    pub(super) mime_type: mime::Mime,
    #[debug(ignore)]
    pub(super) bytes: Vec<u8>,
}

impl MultipartPart {
    /// Creates a part from a form field name, a file name, a MIME type and raw content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wirecall_core::MultipartPart;
    ///
    /// let part = MultipartPart::new("file", "photo.jpg", mime::IMAGE_JPEG, vec![0xFF, 0xD8]);
    /// ```
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: mime::Mime,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }
}

/// Data-only declaration of one logical HTTP request.
///
/// A descriptor carries no behavior beyond its merging rules: default
/// headers/fields describe what every request of this shape sends, extra
/// headers/fields are per-call overrides, and on a key collision the extra
/// value wins.
///
/// # Examples
///
/// ```rust
/// use wirecall_core::{ContentKind, RequestDescriptor};
///
/// let descriptor = RequestDescriptor::post("/users")
///     .with_content_kind(ContentKind::Json)
///     .with_default_header("accept", "application/json")
///     .with_field("name", "Alice")
///     .with_field("age", 30);
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub(super) path: String,
    pub(super) method: Method,
    pub(super) content_kind: ContentKind,
    pub(super) default_headers: IndexMap<String, String>,
    pub(super) extra_headers: Option<IndexMap<String, String>>,
    pub(super) default_body_fields: IndexMap<String, Value>,
    pub(super) extra_body_fields: Option<IndexMap<String, Value>>,
    pub(super) multipart_parts: Option<Vec<MultipartPart>>,
}

impl RequestDescriptor {
    /// Creates a descriptor for the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            content_kind: ContentKind::default(),
            default_headers: IndexMap::new(),
            extra_headers: None,
            default_body_fields: IndexMap::new(),
            extra_body_fields: None,
            multipart_parts: None,
        }
    }

    /// Creates a `GET` descriptor; body fields become URL query parameters.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` descriptor.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a `PUT` descriptor.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a `DELETE` descriptor.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets the body representation used when the method transmits a body.
    pub fn with_content_kind(mut self, content_kind: ContentKind) -> Self {
        self.content_kind = content_kind;
        self
    }

    /// Adds a default header, sent with every dispatch of this descriptor.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Adds an extra header; overrides a default header with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Adds a default body field.
    pub fn with_default_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_body_fields.insert(name.into(), value.into());
        self
    }

    /// Adds an extra body field; overrides a default field with the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_body_fields
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Appends a multipart part; only used when the content kind is [`ContentKind::Multipart`].
    pub fn with_part(mut self, part: MultipartPart) -> Self {
        self.multipart_parts.get_or_insert_with(Vec::new).push(part);
        self
    }

    /// Left-biased union of default and extra headers; extra wins on collision.
    pub(super) fn merged_headers(&self) -> IndexMap<String, String> {
        merge(&self.default_headers, self.extra_headers.as_ref())
    }

    /// Left-biased union of default and extra body fields; extra wins on collision.
    pub(super) fn merged_fields(&self) -> IndexMap<String, Value> {
        merge(&self.default_body_fields, self.extra_body_fields.as_ref())
    }
}

// IndexMap keeps the original position on override, so merge order is
// deterministic: defaults in declaration order, then unseen extras.
fn merge<V: Clone>(
    defaults: &IndexMap<String, V>,
    extras: Option<&IndexMap<String, V>>,
) -> IndexMap<String, V> {
    let mut merged = defaults.clone();
    if let Some(extras) = extras {
        for (key, value) in extras {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_override_biased() {
        let descriptor = RequestDescriptor::post("/things")
            .with_default_field("a", 1)
            .with_default_field("b", 2)
            .with_field("b", 3)
            .with_field("c", 4);

        let merged = descriptor.merged_fields();

        let entries = merged
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>();
        assert_eq!(entries, vec!["a=1", "b=3", "c=4"]);
    }

    #[test]
    fn test_merged_headers_extra_wins() {
        let descriptor = RequestDescriptor::get("/things")
            .with_default_header("accept", "application/json")
            .with_default_header("x-tenant", "default")
            .with_header("x-tenant", "acme");

        let merged = descriptor.merged_headers();

        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.get("x-tenant").map(String::as_str),
            Some("acme")
        );
    }

    #[test]
    fn test_merge_without_extras_is_defaults() {
        let descriptor = RequestDescriptor::get("/things").with_default_field("q", "x");

        let merged = descriptor.merged_fields();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("q"), Some(&Value::String("x".to_string())));
    }

    #[test]
    fn test_multipart_part_debug_hides_bytes() {
        let part = MultipartPart::new("file", "file.jpg", mime::IMAGE_JPEG, vec![1, 2, 3]);

        let debug = format!("{part:?}");

        assert!(debug.contains("file.jpg"));
        assert!(!debug.contains("[1, 2, 3]"));
    }
}
