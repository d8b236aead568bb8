//! Registry credentials and the auth header derived from them.

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://a2a.veritrust.vc";
pub const DEFAULT_AUTH_HEADER: &str = "Authorization";

/// Connection settings for a registry instance.
///
/// Supplied by the caller on every invocation; the client never stores or
/// refreshes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    /// Registry root, e.g. `https://a2a.veritrust.vc`.
    pub base_url: String,
    /// Optional key. An empty string is treated as absent.
    pub api_key: Option<String>,
    /// Header carrying the key.
    pub custom_header: String,
    /// Prefix the key with `Bearer `.
    pub use_bearer: bool,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            custom_header: DEFAULT_AUTH_HEADER.to_string(),
            use_bearer: true,
        }
    }
}

impl Credentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn custom_header(mut self, header: impl Into<String>) -> Self {
        self.custom_header = header.into();
        self
    }

    pub fn use_bearer(mut self, use_bearer: bool) -> Self {
        self.use_bearer = use_bearer;
        self
    }

    /// Base URL with every trailing `/` removed.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Header name for the key, falling back to `Authorization` when blank.
    pub fn header_name(&self) -> &str {
        match self.custom_header.trim() {
            "" => DEFAULT_AUTH_HEADER,
            name => name,
        }
    }

    /// The auth header to attach, or `None` when no key is configured.
    pub fn auth_header(&self) -> Result<Option<(HeaderName, HeaderValue)>> {
        let Some(key) = self.api_key.as_deref().filter(|key| !key.is_empty()) else {
            return Ok(None);
        };

        let name = match self.header_name() {
            DEFAULT_AUTH_HEADER => AUTHORIZATION,
            other => HeaderName::from_bytes(other.as_bytes())
                .map_err(|_| Error::InvalidHeader(format!("bad header name '{other}'")))?,
        };

        let raw = if self.use_bearer {
            format!("Bearer {key}")
        } else {
            key.to_string()
        };
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|_| Error::InvalidHeader(format!("bad value for header '{name}'")))?;
        value.set_sensitive(true);

        Ok(Some((name, value)))
    }
}
