use std::io::Read;
use std::path::Path;

use serde_json::Value;
use veritrust_registry::InputItem;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input json on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("input item {0} is not a json object")]
    NotAnObject(usize),
}

/// Read items from `path`, or stdin when `None`.
pub fn read_items(path: Option<&Path>) -> Result<Vec<InputItem>, Error> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_items(&text)
}

/// Accepts a JSON array of objects or newline-delimited JSON
/// objects. Objects may be bare parameters or wrapped as `{"json": {...}}`.
pub fn parse_items(text: &str) -> Result<Vec<InputItem>, Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let values = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<Value>>(trimmed)
            .map_err(|source| Error::Json { line: 1, source })?
    } else {
        trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| Error::Json {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<Value>, _>>()?
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| into_item(index, value))
        .collect()
}

fn into_item(index: usize, value: Value) -> Result<InputItem, Error> {
    let Value::Object(mut map) = value else {
        return Err(Error::NotAnObject(index));
    };
    if map.len() == 1
        && map.get("json").is_some_and(Value::is_object)
        && let Some(Value::Object(inner)) = map.remove("json")
    {
        return Ok(InputItem::new(inner));
    }
    Ok(InputItem::new(map))
}
