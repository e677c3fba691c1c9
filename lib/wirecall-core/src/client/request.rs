use headers::HeaderMapExt;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

use super::body;
use super::descriptor::RequestDescriptor;
use super::error::BuildError;

/// The fully resolved, transport-ready request.
///
/// Built once per dispatch, immutable afterwards, and owned solely by the
/// dispatch invocation that created it. Building the same descriptor against
/// the same base endpoint twice yields identical wire requests.
#[derive(Clone, PartialEq, derive_more::Debug)]
pub struct WireRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    #[debug(ignore)]
    body: Option<Vec<u8>>,
}

impl WireRequest {
    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute URL, including the query string for `GET` requests.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The final header set; no duplicate names.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The encoded body bytes; `None` for `GET` requests.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Renders a shell-style `curl` invocation reproducing this request,
    /// suitable for manual replay. Non-UTF-8 body bytes are rendered lossily.
    pub fn curl_command(&self) -> String {
        let mut command = format!("curl -X {} '{}'", self.method, self.url);
        for (name, value) in &self.headers {
            let value = value.to_str().unwrap_or("<binary>");
            command.push_str(&format!(" -H '{name}: {value}'"));
        }
        if let Some(body) = &self.body {
            command.push_str(&format!(" --data-binary '{}'", String::from_utf8_lossy(body)));
        }
        command
    }

    #[cfg(test)]
    pub(super) fn for_tests(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Composes a descriptor and a base endpoint into a [`WireRequest`].
///
/// `GET` requests fold the merged body fields into the query string and never
/// carry a body (multipart parts included). For every other method the merged
/// headers are set first, then the encoder's `Content-Type` overwrites any
/// caller-supplied value, then the encoded body is attached.
pub(super) fn build(
    descriptor: &RequestDescriptor,
    base_url: &Url,
    boundary: &str,
) -> Result<WireRequest, BuildError> {
    let mut url = join_url(base_url, &descriptor.path)?;
    let mut headers = build_headers(descriptor)?;

    let body = if descriptor.method == Method::GET {
        let fields = descriptor.merged_fields();
        if !fields.is_empty() {
            let query = body::query_string(&fields).map_err(BuildError::Encode)?;
            url.set_query(Some(&query));
        }
        None
    } else {
        let fields = descriptor.merged_fields();
        let encoded = body::encode(
            descriptor.content_kind,
            &fields,
            descriptor.multipart_parts.as_deref(),
            boundary,
        )?;
        headers.typed_insert(encoded.content_type);
        Some(encoded.data)
    };

    Ok(WireRequest {
        method: descriptor.method.clone(),
        url,
        headers,
        body,
    })
}

fn join_url(base_url: &Url, path: &str) -> Result<Url, BuildError> {
    let joined = format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let url = joined.parse::<Url>()?;
    Ok(url)
}

fn build_headers(descriptor: &RequestDescriptor) -> Result<HeaderMap, BuildError> {
    let mut headers = HeaderMap::new();
    for (name, value) in descriptor.merged_headers() {
        headers.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(&value)?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use headers::ContentType;

    use crate::client::descriptor::{ContentKind, MultipartPart};

    use super::*;

    fn base() -> Url {
        Url::parse("http://api.example.com/v1/").expect("valid base")
    }

    #[test]
    fn test_get_folds_fields_into_query_and_has_no_body() {
        let descriptor = RequestDescriptor::get("/search")
            .with_content_kind(ContentKind::Multipart)
            .with_default_field("q", "rust http")
            .with_field("page", 2);

        let wire = build(&descriptor, &base(), "token").expect("should build");

        assert_eq!(wire.method(), &Method::GET);
        assert_eq!(
            wire.url().as_str(),
            "http://api.example.com/v1/search?q=rust+http&page=2"
        );
        assert!(wire.body().is_none());
        assert!(wire.headers().get(http::header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_post_json_sets_content_type_and_body() {
        let descriptor = RequestDescriptor::post("/users").with_field("name", "Alice");

        let wire = build(&descriptor, &base(), "token").expect("should build");

        assert_eq!(
            wire.headers().typed_get::<ContentType>(),
            Some(ContentType::json())
        );
        let parsed: serde_json::Value =
            serde_json::from_slice(wire.body().expect("body")).expect("valid json");
        assert_eq!(parsed, serde_json::json!({"name": "Alice"}));
    }

    #[test]
    fn test_encoder_content_type_overwrites_caller_header() {
        let descriptor = RequestDescriptor::put("/users/1")
            .with_default_header("content-type", "text/plain")
            .with_field("name", "Alice");

        let wire = build(&descriptor, &base(), "token").expect("should build");

        assert_eq!(
            wire.headers().typed_get::<ContentType>(),
            Some(ContentType::json())
        );
    }

    #[test]
    fn test_header_merge_has_no_duplicates() {
        let descriptor = RequestDescriptor::delete("/users/1")
            .with_default_header("x-tenant", "default")
            .with_header("x-tenant", "acme");

        let wire = build(&descriptor, &base(), "token").expect("should build");

        let values = wire
            .headers()
            .get_all("x-tenant")
            .iter()
            .collect::<Vec<_>>();
        assert_eq!(values.len(), 1);
        assert_eq!(
            values.first().and_then(|value| value.to_str().ok()),
            Some("acme")
        );
    }

    #[test]
    fn test_multipart_without_parts_is_a_build_error() {
        let descriptor =
            RequestDescriptor::post("/upload").with_content_kind(ContentKind::Multipart);

        let error = build(&descriptor, &base(), "token").unwrap_err();

        assert!(matches!(error, BuildError::Encode(_)));
    }

    #[test]
    fn test_multipart_body_carries_boundary() {
        let descriptor = RequestDescriptor::post("/upload")
            .with_content_kind(ContentKind::Multipart)
            .with_part(MultipartPart::new(
                "file",
                "file.jpg",
                mime::IMAGE_JPEG,
                vec![1, 2, 3],
            ));

        let wire = build(&descriptor, &base(), "token").expect("should build");

        let content_type = wire
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .expect("content type");
        assert_eq!(content_type, "multipart/form-data; boundary=token");
        let body = String::from_utf8_lossy(wire.body().expect("body"));
        assert!(body.starts_with("--token\r\n"));
        assert!(body.ends_with("--token--\r\n"));
    }

    #[test]
    fn test_invalid_header_name_fails() {
        let descriptor = RequestDescriptor::get("/ping").with_default_header("bad header", "x");

        let error = build(&descriptor, &base(), "token").unwrap_err();

        assert!(matches!(error, BuildError::InvalidHeaderName(_)));
    }

    #[test]
    fn test_build_is_deterministic() {
        let descriptor = RequestDescriptor::post("/users")
            .with_default_header("accept", "application/json")
            .with_default_field("b", 2)
            .with_default_field("a", 1)
            .with_field("b", 3);

        let first = build(&descriptor, &base(), "token").expect("should build");
        let second = build(&descriptor, &base(), "token").expect("should build");

        assert_eq!(first, second);
        assert_eq!(first.body(), second.body());
    }

    #[test]
    fn test_curl_command_renders_method_url_headers_and_body() {
        let descriptor = RequestDescriptor::post("/users")
            .with_default_header("accept", "application/json")
            .with_field("name", "Alice");

        let wire = build(&descriptor, &base(), "token").expect("should build");

        let curl = wire.curl_command();
        assert!(curl.starts_with("curl -X POST 'http://api.example.com/v1/users'"));
        assert!(curl.contains("-H 'accept: application/json'"));
        assert!(curl.contains("-H 'content-type: application/json'"));
        assert!(curl.contains(r#"--data-binary '{"name":"Alice"}'"#));
    }
}
