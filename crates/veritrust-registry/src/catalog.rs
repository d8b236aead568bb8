//! Static description of each operation and the item parameters it reads.

use serde::Serialize;

use crate::operation::OperationKind;

/// Value type of an item parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    String,
    Boolean,
    /// Comma-separated list, sent as a JSON array.
    Csv,
}

/// Value a parameter takes when the item does not carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterDefault {
    Text(&'static str),
    Flag(bool),
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterDescriptor {
    /// Key read from the input item.
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: ParameterKind,
    pub required: bool,
    pub default: ParameterDefault,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub display_name: &'static str,
    pub description: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub parameters: &'static [ParameterDescriptor],
}

impl OperationDescriptor {
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| p.required)
    }
}

const fn param(
    name: &'static str,
    display_name: &'static str,
    kind: ParameterKind,
) -> ParameterDescriptor {
    let default = match kind {
        ParameterKind::Boolean => ParameterDefault::Flag(false),
        ParameterKind::String | ParameterKind::Csv => ParameterDefault::Text(""),
    };
    ParameterDescriptor {
        name,
        display_name,
        kind,
        required: false,
        default,
        placeholder: None,
    }
}

const UUID: ParameterDescriptor = ParameterDescriptor {
    name: "uuid",
    display_name: "Agent UUID",
    kind: ParameterKind::String,
    required: true,
    default: ParameterDefault::Text(""),
    placeholder: Some("xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"),
};

static LIST: OperationDescriptor = OperationDescriptor {
    kind: OperationKind::List,
    display_name: "List Agents",
    description: "List agents",
    method: "GET",
    path: "/api/agents.php",
    parameters: &[param("verified", "Verified Only", ParameterKind::Boolean)],
};

static GET: OperationDescriptor = OperationDescriptor {
    kind: OperationKind::Get,
    display_name: "Get Agent",
    description: "Get one agent by UUID",
    method: "GET",
    path: "/api/agents.php",
    parameters: &[UUID],
};

static SEARCH: OperationDescriptor = OperationDescriptor {
    kind: OperationKind::Search,
    display_name: "Search Agents",
    description: "Search agents",
    method: "POST",
    path: "/api/search.php",
    parameters: &[
        param("query", "Query", ParameterKind::String),
        param("skills", "Skills (CSV)", ParameterKind::Csv),
        param("protocols", "Protocols (CSV)", ParameterKind::Csv),
        param("tags", "Tags (CSV)", ParameterKind::Csv),
        param("ownerDid", "Owner DID", ParameterKind::String),
        param("verifiedSearch", "Verified Only", ParameterKind::Boolean),
    ],
};

static REGISTER: OperationDescriptor = OperationDescriptor {
    kind: OperationKind::Register,
    display_name: "Register Agent",
    description: "Register an agent by Agent Card URL",
    method: "POST",
    path: "/api/register.php",
    parameters: &[ParameterDescriptor {
        name: "agentCardUrl",
        display_name: "Agent Card URL",
        kind: ParameterKind::String,
        required: true,
        default: ParameterDefault::Text(""),
        placeholder: Some("https://agent.example.com/.well-known/agent.json"),
    }],
};

static REVERIFY: OperationDescriptor = OperationDescriptor {
    kind: OperationKind::Reverify,
    display_name: "Re-verify Agent",
    description: "Re-verify an existing agent by UUID",
    method: "POST",
    path: "/api/reverify.php",
    parameters: &[UUID],
};

/// All operations, in display order.
pub fn operations() -> [&'static OperationDescriptor; 5] {
    OperationKind::ALL.map(OperationKind::descriptor)
}

impl OperationKind {
    pub fn descriptor(self) -> &'static OperationDescriptor {
        match self {
            OperationKind::List => &LIST,
            OperationKind::Get => &GET,
            OperationKind::Search => &SEARCH,
            OperationKind::Register => &REGISTER,
            OperationKind::Reverify => &REVERIFY,
        }
    }
}
