//! Channel config inspection.
//!
//! Reads a channel configuration that has been decoded to JSON, flattens it
//! into dotted keys and lists the MSP identifiers named by the `Admins`
//! policy of every Application-group organization. The result is the set of
//! organizations currently joined to the channel.

use crate::error::{GeneratorError, Result};
use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const APPLICATION_GROUP: &str = "channel_group.groups.Application.groups";
pub const MSP_IDENTIFIER: &str = "principal.msp_identifier";
pub const ADMIN_POLICY: &str = "Admins.policy";

/// Default decoded channel config location inside the CLI container
pub const DEFAULT_CONFIG_PATH: &str =
    "/opt/gopath/src/github.com/hyperledger/fabric/peer/config.json";
/// Default output location for the extracted identifiers
pub const DEFAULT_OUTPUT_PATH: &str =
    "/opt/gopath/src/github.com/hyperledger/fabric/peer/channel_orgs.txt";

/// Flatten a JSON document into `a.b.0.c` keys with stringified leaf values
pub fn flatten(value: &Value) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flatten_into(value, String::new(), &mut flat);
    flat
}

fn flatten_into(value: &Value, prefix: String, flat: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                flatten_into(v, child_key(&prefix, key), flat);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(v, child_key(&prefix, &i.to_string()), flat);
            }
        }
        Value::String(s) => {
            flat.insert(prefix, s.clone());
        }
        Value::Null => {
            flat.insert(prefix, String::new());
        }
        other => {
            flat.insert(prefix, other.to_string());
        }
    }
}

fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// MSP identifiers of Application-group admin principals, in key order
pub fn admin_msp_identifiers(flat: &BTreeMap<String, String>) -> Vec<String> {
    flat.iter()
        .filter(|(key, _)| {
            key.contains(APPLICATION_GROUP)
                && key.contains(MSP_IDENTIFIER)
                && key.contains(ADMIN_POLICY)
        })
        .map(|(_, value)| value.clone())
        .collect()
}

/// Parse channel config JSON text and extract the admin MSP identifiers
pub fn inspect_str(content: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| GeneratorError::Config(format!("malformed channel config: {}", e)))?;
    let flat = flatten(&value);
    debug!("Channel config flattened to {} keys", flat.len());
    Ok(admin_msp_identifiers(&flat))
}

/// Read `input`, write one identifier per line to `output`
pub fn inspect_file(input: &Path, output: &Path) -> Result<Vec<String>> {
    info!("Inspecting channel config {:?}", input);
    let content = std::fs::read_to_string(input).map_err(|e| GeneratorError::io(input, e))?;
    let identifiers = inspect_str(&content)?;

    let body: String = identifiers.iter().map(|id| format!("{}\n", id)).collect();
    std::fs::write(output, body).map_err(|e| GeneratorError::io(output, e))?;
    info!("Wrote {} organizations to {:?}", identifiers.len(), output);
    Ok(identifiers)
}
