//! Maps a resolved [`Operation`] to the HTTP request the registry expects.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};

use crate::credentials::Credentials;
use crate::error::Result;
use crate::operation::{Operation, SearchFilters};

const AGENTS_PATH: &str = "/api/agents.php";
const SEARCH_PATH: &str = "/api/search.php";
const REGISTER_PATH: &str = "/api/register.php";
const REVERIFY_PATH: &str = "/api/reverify.php";

/// A single registry call, built fresh for each item.
#[derive(Debug, Clone)]
pub struct RegistryRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RegistryRequest {
    pub fn build(credentials: &Credentials, operation: &Operation) -> Result<Self> {
        let base = credentials.base();
        let headers = headers(credentials)?;

        let (method, url, body) = match operation {
            Operation::List { verified } => {
                let url = if *verified {
                    format!("{base}{AGENTS_PATH}?verified=true")
                } else {
                    format!("{base}{AGENTS_PATH}")
                };
                (Method::GET, url, None)
            }
            Operation::Get { uuid } => (
                Method::GET,
                format!("{base}{AGENTS_PATH}?id={}", encode_component(uuid)),
                None,
            ),
            Operation::Search(filters) => (
                Method::POST,
                format!("{base}{SEARCH_PATH}"),
                Some(search_body(filters)),
            ),
            Operation::Register { agent_card_url } => (
                Method::POST,
                format!("{base}{REGISTER_PATH}"),
                Some(json!({ "agent_card_url": agent_card_url })),
            ),
            Operation::Reverify { uuid } => (
                Method::POST,
                format!("{base}{REVERIFY_PATH}"),
                Some(json!({ "id": uuid })),
            ),
        };

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }
}

fn headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some((name, value)) = credentials.auth_header()? {
        headers.insert(name, value);
    }
    Ok(headers)
}

fn search_body(filters: &SearchFilters) -> Value {
    let mut body = Map::new();
    if !filters.query.is_empty() {
        body.insert("query".into(), filters.query.clone().into());
    }
    if !filters.owner_did.is_empty() {
        body.insert("owner_did".into(), filters.owner_did.clone().into());
    }
    if filters.verified {
        body.insert("verified".into(), true.into());
    }
    for (key, values) in [
        ("skills", &filters.skills),
        ("protocols", &filters.protocols),
        ("tags", &filters.tags),
    ] {
        if let Some(values) = values {
            body.insert(key.into(), values.clone().into());
        }
    }
    Value::Object(body)
}

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, as `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single query component. Spaces become `%20`, not `+`.
fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}
