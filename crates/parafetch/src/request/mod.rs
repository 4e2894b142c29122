//! Request descriptions: what the caller enqueues and what the transport runs.
//!
//! A [`RequestSpec`] is immutable once enqueued. At admission it is resolved
//! against the batch configuration into a [`TransferRequest`], which carries
//! the merged headers and options the transport actually applies.

mod headers;
mod options;
mod resolve;

use std::collections::HashMap;

use crate::scheduler::Callback;

pub use headers::merge_headers;
pub use options::RequestOptions;
pub use resolve::TransferRequest;

/// HTTP method. Implied by the presence of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request body. A body always turns the request into a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Sent as-is.
    Raw(Vec<u8>),
    /// Key/value pairs sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

impl Body {
    /// Bytes put on the wire for this body.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Body::Raw(bytes) => bytes.clone(),
            Body::Form(pairs) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish()
                .into_bytes(),
        }
    }
}

/// One request to perform, as enqueued by the caller.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    pub(crate) url: String,
    pub(crate) body: Option<Body>,
    pub(crate) headers: Option<HashMap<String, String>>,
    pub(crate) options: Option<RequestOptions>,
    pub(crate) callback: Option<Callback>,
    pub(crate) user_data: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.body = Some(Body::Form(pairs));
        self
    }

    /// Opaque value handed back unchanged in the request's [`ResultInfo`](crate::ResultInfo).
    pub fn user_data(mut self, data: serde_json::Value) -> Self {
        self.user_data = Some(data);
        self
    }

    /// Per-request options; set fields override the batch-wide shared options.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Per-request headers; each key overrides the same key in the shared headers.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Callback for this request only. Without one the batch default is used.
    pub fn callback(mut self, callback: impl Into<Callback>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        if self.body.is_some() {
            Method::Post
        } else {
            Method::Get
        }
    }
}
