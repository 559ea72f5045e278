//! HTTP request and response types.
//!
//! # Design
//! `ApiRequest` is what resource operations hand to the client: a method, a
//! URI relative to the API base, and an optional JSON payload or file
//! attachment. The client resolves it into an `HttpRequest` (absolute URL,
//! headers, encoded body) which a `Transport` executes and answers with an
//! `HttpResponse`. Both wire types are plain owned data so transports and
//! tests can build them by hand.

use std::io::{self, Cursor, Read};
use std::time::Duration;

use mime::Mime;
use multipart::client::lazy::Multipart;
use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file sent as a multipart form part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// One logical API call, before URL resolution and header generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub json: Option<Value>,
    pub attachment: Option<FileAttachment>,
    /// Drops `Content-Type: application/json` so the body can be multipart.
    pub file_upload: bool,
    /// Overrides the client's `total_timeout` for this call.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            json: None,
            attachment: None,
            file_upload: false,
            timeout: None,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, uri)
    }

    pub fn put(uri: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, uri)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, uri)
    }

    pub fn json(mut self, payload: Value) -> Self {
        self.json = Some(payload);
        self
    }

    pub fn attachment(mut self, attachment: FileAttachment) -> Self {
        self.attachment = Some(attachment);
        self.file_upload = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The JSON payload, if one is present and non-empty.
    pub(crate) fn payload(&self) -> Option<&Value> {
        self.json.as_ref().filter(|value| !is_empty_json(value))
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup; the first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Anything below 400; a 429 is not ok.
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Join the API base URL and a relative URI with exactly one slash.
pub(crate) fn join_url(base: &str, uri: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), uri.trim_start_matches('/'))
}

/// A `multipart/form-data` body and the boundary that frames its parts.
#[derive(Debug)]
pub(crate) struct MultipartBody {
    pub(crate) boundary: String,
    pub(crate) bytes: Vec<u8>,
}

impl MultipartBody {
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Encode one text part per field of `fields`, then the file under the
/// `attachment` part name.
pub(crate) fn encode_multipart(fields: Option<&Value>, file: &FileAttachment) -> io::Result<MultipartBody> {
    let mut form = Multipart::new();
    if let Some(Value::Object(map)) = fields {
        for (name, value) in map {
            let text = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            form.add_text(disposition_param(name), text);
        }
    }
    let mime = file
        .content_type
        .as_deref()
        .and_then(|content_type| content_type.parse::<Mime>().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);
    form.add_stream(
        "attachment",
        Cursor::new(file.bytes.as_slice()),
        Some(disposition_param(&file.file_name)),
        Some(mime),
    );

    let mut prepared = form.prepare().map_err(|err| err.error)?;
    let boundary = prepared.boundary().to_string();
    let mut bytes = Vec::with_capacity(file.bytes.len() + 256);
    prepared.read_to_end(&mut bytes)?;
    Ok(MultipartBody { boundary, bytes })
}

/// Percent-encode the characters that would end a quoted
/// `Content-Disposition` parameter or the header line itself.
fn disposition_param(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_url_collapses_slashes() {
        assert_eq!(
            join_url("https://api.clickup.com/api/v2/", "/task/abc"),
            "https://api.clickup.com/api/v2/task/abc"
        );
        assert_eq!(join_url("http://localhost:3000", "team"), "http://localhost:3000/team");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(200, "{}").with_header("X-RateLimit-Remaining", "99");
        assert_eq!(response.header("x-ratelimit-remaining"), Some("99"));
        assert!(response.header("x-ratelimit-reset").is_none());
    }

    #[test]
    fn statuses_from_400_are_not_ok() {
        assert!(HttpResponse::new(204, "").is_ok());
        assert!(HttpResponse::new(399, "").is_ok());
        assert!(!HttpResponse::new(400, "").is_ok());
        assert!(!HttpResponse::new(429, "").is_ok());
    }

    #[test]
    fn empty_payloads_are_not_sent() {
        assert!(ApiRequest::post("list/1/task/2").payload().is_none());
        assert!(ApiRequest::post("x").json(json!({})).payload().is_none());
        assert!(ApiRequest::post("x").json(Value::Null).payload().is_none());
        assert!(ApiRequest::post("x").json(json!({"name": "a"})).payload().is_some());
    }

    #[test]
    fn attachment_turns_on_file_upload() {
        let req = ApiRequest::post("task/1/attachment").attachment(FileAttachment::new("a.txt", "hi"));
        assert!(req.file_upload);
        assert_eq!(req.method, HttpMethod::Post);
    }

    #[test]
    fn multipart_body_has_fields_and_file() {
        let file = FileAttachment::new("notes.txt", b"hello".to_vec()).content_type("text/plain");
        let form = encode_multipart(Some(&json!({"filename": "notes.txt"})), &file).unwrap();
        assert!(!form.boundary.is_empty());
        assert_eq!(form.content_type(), format!("multipart/form-data; boundary={}", form.boundary));

        let text = String::from_utf8(form.bytes).unwrap();
        assert!(text.contains(&format!("--{}", form.boundary)));
        assert!(text.contains("name=\"filename\""));
        assert!(text.contains("\r\n\r\nnotes.txt\r\n"));
        assert!(text.contains("name=\"attachment\"; filename=\"notes.txt\""));
        assert!(text.contains("Content-Type: text/plain\r\n\r\nhello"));
        assert!(text.contains(&format!("--{}--", form.boundary)));
    }

    #[test]
    fn multipart_defaults_content_type() {
        let file = FileAttachment::new("blob.bin", vec![0u8, 1, 2]);
        let form = encode_multipart(None, &file).unwrap();
        let text = String::from_utf8_lossy(&form.bytes);
        assert!(text.contains("Content-Type: application/octet-stream"));

        let garbled = FileAttachment::new("blob.bin", vec![0u8]).content_type("text/plain\r\nX-Injected: 1");
        let form = encode_multipart(None, &garbled).unwrap();
        let text = String::from_utf8_lossy(&form.bytes);
        assert!(text.contains("Content-Type: application/octet-stream"));
        assert!(!text.contains("X-Injected"));
    }

    #[test]
    fn file_name_cannot_inject_part_headers() {
        let file = FileAttachment::new("a.txt\"\r\nX-Injected: 1\r\n\r\nevil", b"hi".to_vec());
        let fields = json!({"na\"me\r\nX-Field: 1": "v"});
        let form = encode_multipart(Some(&fields), &file).unwrap();
        let text = String::from_utf8(form.bytes).unwrap();
        assert!(!text.contains("\r\nX-Injected: 1\r\n"));
        assert!(!text.contains("\r\nX-Field: 1"));
        assert!(text.contains("filename=\"a.txt%22%0D%0AX-Injected: 1%0D%0A%0D%0Aevil\""));
        assert!(text.contains("name=\"na%22me%0D%0AX-Field: 1\""));
    }
}
