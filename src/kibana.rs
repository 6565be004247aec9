use base64::prelude::*;
use http::{
    Method,
    header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use log::{debug, info, warn};
use serde_json::Value;
use std::{future::Future, time::Duration};
use url::Url;

use crate::error::{RelayError, Result};

/// Kibana endpoint that forwards requests to the Elasticsearch backend
pub const PROXY_ENDPOINT: &str = "api/console/proxy";

/// Timeout applied to one-shot search calls. Dump paging calls have none.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(100);

/// Immutable connection settings shared by every operation
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    base_url: Url,
    headers: HeaderMap,
    verify_tls: bool,
}

impl ProxyConfig {
    pub fn new(
        server_url: &str,
        username: Option<&str>,
        password: Option<&str>,
        verify_tls: bool,
    ) -> Result<Self> {
        let base_url = Url::parse(server_url)?;
        debug!("Parsed server URL: {}", base_url);

        Ok(Self {
            base_url,
            headers: build_headers(username, password)?,
            verify_tls,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }
}

/// Build the header set sent with every proxy call
pub fn build_headers(username: Option<&str>, password: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let (Some(user), Some(pass)) = (username, password) {
        info!("Using basic authentication for user: {}", user);
        let auth_str = format!("{}:{}", user, pass);
        let auth_val = format!("Basic {}", BASE64_STANDARD.encode(auth_str));
        let mut auth_header = HeaderValue::from_str(&auth_val)?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);
        debug!("Adding authorization header");
    } else if username.is_some() || password.is_some() {
        warn!("Partial basic auth credentials provided (username or password missing), ignoring.");
    }

    // Kibana rejects proxied writes without an XSRF marker header
    headers.insert(
        HeaderName::from_static("kbn-xsrf"),
        HeaderValue::from_static("kibana"),
    );

    Ok(headers)
}

/// Console-proxy URL forwarding `method path` to the backend
pub fn proxy_url(base_url: &Url, path: &str, method: &Method) -> Result<Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    let mut url = base.join(PROXY_ENDPOINT)?;
    url.query_pairs_mut()
        .clear()
        .append_pair("path", path)
        .append_pair("method", method.as_str());
    Ok(url)
}

/// A single call to be forwarded through the proxy
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    pub text: String,
}

impl ProxyResponse {
    /// Parse the body as JSON, `path` is only used for error reporting
    pub fn json(&self, path: &str) -> Result<Value> {
        serde_json::from_str(&self.text).map_err(|e| {
            RelayError::malformed(path, format!("response body is not valid JSON: {}", e))
        })
    }
}

/// Anything able to forward a request through the console proxy
pub trait ProxyTransport {
    fn send(&self, request: ProxyRequest) -> impl Future<Output = Result<ProxyResponse>> + Send;
}

/// reqwest-backed transport talking to a real Kibana instance
#[derive(Debug, Clone)]
pub struct KibanaProxy {
    config: ProxyConfig,
    client: reqwest::Client,
}

impl KibanaProxy {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        debug!(
            "Setting up HTTP client for Kibana at {}",
            config.base_url().as_str()
        );
        if !config.verify_tls() {
            debug!("TLS certificate verification disabled");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls())
            .default_headers(config.headers().clone())
            .build()
            .map_err(|source| RelayError::Transport {
                path: PROXY_ENDPOINT.to_string(),
                source,
            })?;

        Ok(Self { config, client })
    }
}

impl ProxyTransport for KibanaProxy {
    async fn send(&self, request: ProxyRequest) -> Result<ProxyResponse> {
        let url = proxy_url(self.config.base_url(), &request.path, &request.method)?;
        debug!("Proxying {} {} via {}", request.method, request.path, url);

        let mut builder = self.client.post(url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let transport_err = |source| RelayError::Transport {
            path: request.path.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport_err)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_err)?;
        debug!("Proxy answered {} with {} bytes", status, text.len());

        if !status.is_success() {
            return Err(RelayError::Status {
                path: request.path,
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(ProxyResponse {
            status: status.as_u16(),
            text,
        })
    }
}
