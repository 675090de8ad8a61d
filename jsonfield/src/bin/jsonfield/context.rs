use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jsonfield::{FormSchema, PathFieldGroup, Record, SubmittedForm};

/// Files a command works on, loaded up front
pub struct CommandContext {
    /// Path of the schema file the groups were built from
    pub schema_path: PathBuf,
    /// Field groups with working paths assigned
    pub groups: Vec<PathFieldGroup>,
}

impl CommandContext {
    pub fn load(schema_path: &Path) -> Result<Self> {
        let schema = FormSchema::from_path(schema_path)
            .with_context(|| format!("Failed to load schema {}", schema_path.display()))?;
        if schema.groups.is_empty() {
            anyhow::bail!("Schema {} declares no groups", schema_path.display());
        }
        Ok(Self {
            schema_path: schema_path.to_path_buf(),
            groups: schema.build(),
        })
    }
}

/// Read a record (attributes + casts) from a JSON file
pub fn load_record(path: &Path) -> Result<Record> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read record {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse record {}", path.display()))
}

/// Read submitted form values from a flat JSON object keyed by path
pub fn load_form(path: &Path) -> Result<SubmittedForm> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read input {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse input {}", path.display()))?;
    SubmittedForm::from_json(&value).with_context(|| format!("Invalid input {}", path.display()))
}

pub fn write_record(path: &Path, record: &Record) -> Result<()> {
    let mut content = serde_json::to_string_pretty(record)?;
    content.push('\n');
    std::fs::write(path, content).with_context(|| format!("Failed to write record {}", path.display()))
}
