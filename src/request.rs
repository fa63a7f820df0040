// Request descriptors
// An outbound call is described immutably; a retry re-issues the same
// descriptor under a new attempt marker instead of mutating shared state.

use reqwest::Method;
use serde_json::Value;

/// Description of one outbound API call.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Create a descriptor for the given verb and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach an extra header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Retry bookkeeping for one logical request.
///
/// The marker only ever moves from "not retried" to "retried"; it is never
/// cleared. A request with no marker history counts as not yet retried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attempt {
    retried: bool,
}

impl Attempt {
    /// The first attempt of a logical request.
    pub fn first() -> Self {
        Self { retried: false }
    }

    /// The attempt after the single permitted refresh-retry.
    pub fn retried(self) -> Self {
        Self { retried: true }
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let descriptor = RequestDescriptor::new(Method::POST, "/users")
            .with_body(serde_json::json!({"name": "Ada"}))
            .with_header("If-Match", "\"etag\"");

        assert_eq!(descriptor.method(), &Method::POST);
        assert_eq!(descriptor.path(), "/users");
        assert_eq!(
            descriptor.body(),
            Some(&serde_json::json!({"name": "Ada"}))
        );
        assert_eq!(
            descriptor.headers(),
            &[("If-Match".to_string(), "\"etag\"".to_string())]
        );
    }

    #[test]
    fn test_attempt_marker_is_one_way() {
        let attempt = Attempt::first();
        assert!(!attempt.is_retried());

        let attempt = attempt.retried();
        assert!(attempt.is_retried());

        // Marking again keeps the marker set
        assert!(attempt.retried().is_retried());
    }

    #[test]
    fn test_default_attempt_counts_as_not_retried() {
        assert!(!Attempt::default().is_retried());
    }

    #[test]
    fn test_retry_clones_descriptor() {
        let descriptor =
            RequestDescriptor::new(Method::GET, "/users/1").with_header("X-Debug", "1");
        let replay = descriptor.clone();

        assert_eq!(replay.path(), descriptor.path());
        assert_eq!(replay.headers(), descriptor.headers());
    }
}
