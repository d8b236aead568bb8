//! Per-item execution loop: one request and one output record per input item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::RegistryClient;
use crate::error::{Error, Result};
use crate::operation::{ItemParameters, OperationKind};

/// One input item. Its JSON object holds the operation parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub json: Map<String, Value>,
}

impl InputItem {
    pub fn new(json: Map<String, Value>) -> Self {
        Self { json }
    }
}

impl From<Map<String, Value>> for InputItem {
    fn from(json: Map<String, Value>) -> Self {
        Self::new(json)
    }
}

/// The parsed registry response for one input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub json: Value,
}

/// Run `kind` once per item, in order, awaiting each call before the next.
///
/// The first failure aborts the run and is returned wrapped in
/// [`Error::Item`] with the failing item's index.
pub async fn execute_items(
    client: &RegistryClient,
    kind: OperationKind,
    items: &[InputItem],
) -> Result<Vec<OutputRecord>> {
    let mut out = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        tracing::debug!(index, operation = %kind, "executing item");
        let json = execute_item(client, kind, item)
            .await
            .map_err(|source| Error::Item {
                index,
                source: Box::new(source),
            })?;
        out.push(OutputRecord { json });
    }

    Ok(out)
}

async fn execute_item(
    client: &RegistryClient,
    kind: OperationKind,
    item: &InputItem,
) -> Result<Value> {
    let params = ItemParameters::from_json(&item.json)?;
    client.run(kind, &params).await
}
