//! In-process test client.
//!
//! Drives an [`App`] without a transport: requests are assembled as raw
//! input sets and dispatched directly. The client keeps a cookie jar that
//! is applied to every request it sends, so cookie-bound parameters can be
//! tested the same way query and header parameters are.

use crate::app::App;
use crate::request::{parse_cookie_header, RawRequest};
use crate::response::{Response, StatusCode};
use crate::schema::Location;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

/// Test client wrapping an [`App`].
#[derive(Clone)]
pub struct TestClient {
    app: Arc<App>,
    cookies: Arc<Mutex<IndexMap<String, String>>>,
}

impl TestClient {
    /// Wrap an app.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            app: Arc::new(app),
            cookies: Arc::new(Mutex::new(IndexMap::new())),
        }
    }

    /// Set a cookie that persists across requests from this client.
    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies
            .lock()
            .expect("cookie jar poisoned")
            .insert(name.into(), value.into());
    }

    /// Drop all persistent cookies.
    pub fn clear_cookies(&self) {
        self.cookies.lock().expect("cookie jar poisoned").clear();
    }

    /// Start a GET request. A query string embedded in the path is parsed.
    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, path)
    }
}

/// Fluent builder for one test request.
#[must_use]
pub struct RequestBuilder<'a> {
    client: &'a TestClient,
    path: String,
    raw: RawRequest,
}

impl<'a> RequestBuilder<'a> {
    fn new(client: &'a TestClient, path: &str) -> Self {
        let (path, raw) = match path.split_once('?') {
            Some((path, query)) => {
                let mut raw = RawRequest::new();
                raw.set_query_string(query);
                (path.to_owned(), raw)
            }
            None => (path.to_owned(), RawRequest::new()),
        };
        Self { client, path, raw }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.raw.insert(Location::Query, key, value);
        self
    }

    /// Append a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.raw.insert(Location::Header, name, value);
        self
    }

    /// Set a cookie for this request only.
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.raw.insert(Location::Cookie, name, value);
        self
    }

    /// Supply a raw `Cookie` header value, as a browser would send it.
    pub fn cookie_header(mut self, header: &str) -> Self {
        let parsed = parse_cookie_header(header);
        for name in parsed.keys() {
            if let Some(value) = parsed.get(name) {
                self.raw
                    .insert(Location::Cookie, name, value.as_scalar().to_owned());
            }
        }
        self
    }

    /// Send the request and return the response.
    pub fn send(mut self) -> TestResponse {
        // Jar cookies apply unless the request set the same name itself.
        {
            let jar = self.client.cookies.lock().expect("cookie jar poisoned");
            for (name, value) in jar.iter() {
                if self.raw.section(Location::Cookie).get(name).is_none() {
                    self.raw.insert(Location::Cookie, name.clone(), value.clone());
                }
            }
        }

        TestResponse {
            inner: self.client.app.dispatch(&self.path, &self.raw),
        }
    }
}

/// Response from a test request, with assertion helpers.
#[derive(Debug)]
pub struct TestResponse {
    inner: Response,
}

impl TestResponse {
    /// Status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Status code as a bare number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code())
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.inner.body_bytes()).into_owned()
    }

    /// Deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.inner.body_bytes())
    }

    /// The underlying response.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, ParamSource, TypeSpec};
    use serde_json::{json, Value};

    fn cookie_app() -> App {
        App::new()
            .get(
                "/session/",
                vec![ParamSource::scalar(
                    Location::Cookie,
                    FieldSpec::new("session", TypeSpec::String).with_default("anonymous"),
                )],
                |params| json!({ "session": params.get("session") }),
            )
            .unwrap()
    }

    #[test]
    fn path_embedded_query_strings_are_parsed() {
        let app = App::new()
            .get(
                "/items/",
                vec![ParamSource::scalar(
                    Location::Query,
                    FieldSpec::new("limit", TypeSpec::Integer).with_default(10),
                )],
                |params| json!({ "limit": params.get("limit") }),
            )
            .unwrap();

        let response = TestClient::new(app).get("/items/?limit=3").send();
        assert_eq!(response.json::<Value>().unwrap(), json!({"limit": 3}));
    }

    #[test]
    fn jar_cookies_persist_across_requests() {
        let client = TestClient::new(cookie_app());
        client.set_cookie("session", "abc");

        for _ in 0..2 {
            let response = client.get("/session/").send();
            assert_eq!(response.json::<Value>().unwrap(), json!({"session": "abc"}));
        }

        client.clear_cookies();
        let response = client.get("/session/").send();
        assert_eq!(
            response.json::<Value>().unwrap(),
            json!({"session": "anonymous"})
        );
    }

    #[test]
    fn raw_cookie_headers_are_parsed() {
        let client = TestClient::new(cookie_app());
        let response = client
            .get("/session/")
            .cookie_header("theme=dark; session=abc")
            .send();
        assert_eq!(response.json::<Value>().unwrap(), json!({"session": "abc"}));
    }

    #[test]
    fn request_cookies_override_the_jar() {
        let client = TestClient::new(cookie_app());
        client.set_cookie("session", "jar");

        let response = client.get("/session/").cookie("session", "explicit").send();
        assert_eq!(
            response.json::<Value>().unwrap(),
            json!({"session": "explicit"})
        );
    }
}
