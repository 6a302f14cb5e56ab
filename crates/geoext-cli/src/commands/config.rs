//! Config command implementation

use crate::output::OutputWriter;
use anyhow::Result;
use geoext_core::config::LayeredConfig;
use std::collections::BTreeMap;

/// Execute the config command
pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let entries: BTreeMap<String, _> = config.to_inspection_map().into_iter().collect();

    if output.is_json() {
        let data: BTreeMap<&String, serde_json::Value> = entries
            .iter()
            .map(|(key, (value, source))| (key, serde_json::json!({ "value": value, "source": source })))
            .collect();
        return output.result(data);
    }

    output.section("Configuration");
    for (key, (value, source)) in &entries {
        output.kv(key, format!("{} ({:?})", value, source));
    }
    Ok(())
}
