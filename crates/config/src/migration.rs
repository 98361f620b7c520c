//! Upgrades of older config layouts
//!
//! Steps run on the raw TOML tree before it is deserialized, so values under
//! renamed keys survive.

use crate::{ConfigError, ConfigResult, CONFIG_VERSION};
use toml::Value;

/// One upgrade, from `to - 1` to `to`
struct Step {
    to: u32,
    apply: fn(&mut toml::Table),
}

const STEPS: &[Step] = &[Step {
    to: 2,
    apply: rename_v1_fields,
}];

/// Files written before versioning was added count as version 1
pub fn version_of(value: &Value) -> u32 {
    value
        .get("version")
        .and_then(Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
}

/// Brings `value` up to `CONFIG_VERSION`; true if anything changed
///
/// A file from a newer release is left as it is.
pub fn migrate_to_latest(value: &mut Value) -> ConfigResult<bool> {
    let from = version_of(value);
    if from >= CONFIG_VERSION {
        if from > CONFIG_VERSION {
            log::warn!(
                "Config version {} is newer than {}, reading it unchanged",
                from,
                CONFIG_VERSION
            );
        }
        return Ok(false);
    }

    let table = value.as_table_mut().ok_or_else(|| ConfigError::MigrationError {
        version: CONFIG_VERSION,
        reason: "top level is not a table".to_string(),
    })?;

    for step in STEPS.iter().filter(|s| s.to > from && s.to <= CONFIG_VERSION) {
        (step.apply)(table);
        log::info!("Upgraded config to version {}", step.to);
    }
    table.insert("version".to_string(), Value::Integer(i64::from(CONFIG_VERSION)));

    Ok(true)
}

/// v1 called these `narration.speech_rate` and `reader.font_size`
fn rename_v1_fields(root: &mut toml::Table) {
    rename(root, "narration", "speech_rate", "default_rate");
    rename(root, "reader", "font_size", "default_font_size");
}

fn rename(root: &mut toml::Table, section: &str, from: &str, to: &str) {
    let Some(table) = root.get_mut(section).and_then(Value::as_table_mut) else {
        return;
    };
    if let Some(old) = table.remove(from) {
        table.entry(to.to_string()).or_insert(old);
    }
}
