use crate::Error;
use http::Method;
use serde::Serialize;

/// Route-level description of a call, before the base URL is applied.
#[derive(Clone, Debug)]
pub(crate) struct Request {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    #[must_use]
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    #[must_use]
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    #[must_use]
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    #[must_use]
    pub fn query_pair(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Serialize `payload` as the request body.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(payload).map_err(|source| Error::Decode {
            status: None,
            method: self.method.clone(),
            path: self.display_path().into_boxed_str(),
            request_id: None,
            body_snippet: None,
            source: Box::new(source),
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub(crate) fn display_path(&self) -> String {
        let mut path = String::new();
        for seg in &self.segments {
            path.push('/');
            path.push_str(seg);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_delete_with_version_query() {
        let req = Request::delete(["v1", "organisation", "accounts", "abc"]).query_pair("version", 3u64);
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.display_path(), "/v1/organisation/accounts/abc");
        assert_eq!(req.query, vec![("version".to_string(), "3".to_string())]);
        assert!(req.body.is_none());
    }

    #[test]
    fn json_body_is_serialized_eagerly() {
        let req = Request::post(["v1", "organisation", "accounts"])
            .json(&json!({"data": {"id": "abc"}}))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(br#"{"data":{"id":"abc"}}"#.as_slice()));
    }

    #[test]
    fn unserializable_payload_is_a_decode_error() {
        use std::collections::BTreeMap;

        // JSON object keys must be strings.
        let mut payload = BTreeMap::new();
        payload.insert(vec![1u8], "x");

        let err = Request::post(["v1", "organisation", "accounts"])
            .json(&payload)
            .unwrap_err();
        assert!(matches!(err, Error::Decode { status: None, .. }));
    }
}
