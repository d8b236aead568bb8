//! Registry operations and the per-item parameters that resolve them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// The operations the registry exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    List,
    Get,
    Search,
    Register,
    Reverify,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::List,
        OperationKind::Get,
        OperationKind::Search,
        OperationKind::Register,
        OperationKind::Reverify,
    ];

    /// Stable identifier (e.g. `"list"` or `"reverify"`).
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::List => "list",
            OperationKind::Get => "get",
            OperationKind::Search => "search",
            OperationKind::Register => "register",
            OperationKind::Reverify => "reverify",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// Filters accepted by the search endpoint. Empty strings and `None` lists are
/// omitted from the request body; `Some(vec![])` is sent as an empty array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub query: String,
    pub owner_did: String,
    pub verified: bool,
    pub skills: Option<Vec<String>>,
    pub protocols: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self == &SearchFilters::default()
    }
}

/// A fully resolved operation, ready to be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    List { verified: bool },
    Get { uuid: String },
    Search(SearchFilters),
    Register { agent_card_url: String },
    Reverify { uuid: String },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::List { .. } => OperationKind::List,
            Operation::Get { .. } => OperationKind::Get,
            Operation::Search(_) => OperationKind::Search,
            Operation::Register { .. } => OperationKind::Register,
            Operation::Reverify { .. } => OperationKind::Reverify,
        }
    }

    /// Resolve `kind` against one item's parameters, enforcing the parameters
    /// the operation requires.
    pub fn resolve(kind: OperationKind, params: &ItemParameters) -> Result<Self> {
        let op = match kind {
            OperationKind::List => Operation::List {
                verified: params.verified.unwrap_or(false),
            },
            OperationKind::Get => Operation::Get {
                uuid: required(kind, "uuid", &params.uuid)?,
            },
            OperationKind::Search => Operation::Search(SearchFilters {
                query: params.query.clone(),
                owner_did: params.owner_did.clone(),
                verified: params.verified_search.or(params.verified).unwrap_or(false),
                skills: csv_filter(&params.skills),
                protocols: csv_filter(&params.protocols),
                tags: csv_filter(&params.tags),
            }),
            OperationKind::Register => Operation::Register {
                agent_card_url: required(kind, "agentCardUrl", &params.agent_card_url)?,
            },
            OperationKind::Reverify => Operation::Reverify {
                uuid: required(kind, "uuid", &params.uuid)?,
            },
        };
        Ok(op)
    }
}

fn required(kind: OperationKind, parameter: &'static str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::MissingParameter {
            operation: kind.as_str(),
            parameter,
        });
    }
    Ok(value.to_string())
}

/// Split a comma-separated list, trimming tokens and dropping empty ones.
pub fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// A CSV filter field: `None` when the raw value is empty, otherwise its
/// tokens. A value holding only separators yields an empty list.
pub fn csv_filter(csv: &str) -> Option<Vec<String>> {
    if csv.is_empty() {
        return None;
    }
    Some(split_csv(csv))
}

/// Flat parameters read from one input item.
///
/// Keys follow the registry node's field names; absent keys take their
/// defaults. List reads `verified`; search reads `verifiedSearch`, falling
/// back to `verified` when the item only carries that one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemParameters {
    pub verified: Option<bool>,
    pub verified_search: Option<bool>,
    pub uuid: String,
    #[serde(alias = "agent_card_url")]
    pub agent_card_url: String,
    pub query: String,
    pub skills: String,
    pub protocols: String,
    pub tags: String,
    #[serde(alias = "owner_did")]
    pub owner_did: String,
}

impl ItemParameters {
    /// Read parameters from an item's JSON object. Unknown keys are ignored.
    pub fn from_json(item: &Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(item.clone()))?)
    }
}
