//! Declarative field trees loaded from TOML or JSON.
//!
//! ```toml
//! [[groups]]
//! label = "Address"
//!
//! [[groups.fields]]
//! type = "text"
//! label = "Street"
//! rules = [{ rule = "required" }, { rule = "length", max = 255 }]
//!
//! [[groups.fields]]
//! type = "group"
//! label = "Location"
//!
//! [[groups.fields.fields]]
//! type = "text"
//! label = "Latitude"
//! ```

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;
use crate::field::{Field, LeafField, PathFieldGroup};
use crate::rules::ValidationRule;

/// Top-level schema: one entry per structured attribute shown on a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafDefinition {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldDefinition {
    Text(LeafDefinition),
    Group(GroupDefinition),
}

impl FormSchema {
    pub fn from_toml_str(raw: &str) -> Result<Self, SchemaError> {
        let schema: FormSchema = toml::from_str(raw)?;
        schema.check()?;
        Ok(schema)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let schema: FormSchema = serde_json::from_str(raw)?;
        schema.check()?;
        Ok(schema)
    }

    /// Loads a schema file; `.json` files are read as JSON, anything else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_toml_str(&raw),
        }
    }

    /// Builds the field trees with working paths assigned.
    pub fn build(&self) -> Vec<PathFieldGroup> {
        self.groups.iter().map(|group| group.to_group().bound()).collect()
    }

    fn check(&self) -> Result<(), SchemaError> {
        for group in &self.groups {
            group.check()?;
        }
        Ok(())
    }
}

impl GroupDefinition {
    fn to_group(&self) -> PathFieldGroup {
        let children = self.fields.iter().map(FieldDefinition::to_field).collect();
        match &self.attribute {
            Some(attribute) => PathFieldGroup::with_attribute(&self.label, attribute, children),
            None => PathFieldGroup::make(&self.label, children),
        }
    }

    fn check(&self) -> Result<(), SchemaError> {
        for field in &self.fields {
            match field {
                FieldDefinition::Text(leaf) => leaf.check()?,
                FieldDefinition::Group(group) => group.check()?,
            }
        }
        Ok(())
    }
}

impl LeafDefinition {
    fn to_leaf(&self) -> LeafField {
        let leaf = match &self.attribute {
            Some(attribute) => LeafField::with_attribute(&self.label, attribute),
            None => LeafField::new(&self.label),
        };
        let leaf = leaf.rules(self.rules.iter().cloned());
        if self.nullable { leaf.nullable() } else { leaf }
    }

    fn check(&self) -> Result<(), SchemaError> {
        for rule in &self.rules {
            if let ValidationRule::Regex { pattern } = rule
                && let Err(err) = Regex::new(pattern)
            {
                return Err(SchemaError::InvalidDefinition {
                    field: self.label.clone(),
                    message: format!("regex rule does not compile: {err}"),
                });
            }
        }
        Ok(())
    }
}

impl FieldDefinition {
    fn to_field(&self) -> Field {
        match self {
            FieldDefinition::Text(leaf) => leaf.to_leaf().into(),
            FieldDefinition::Group(group) => group.to_group().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = r#"
[[groups]]
label = "Address"

[[groups.fields]]
type = "text"
label = "Street"
rules = [{ rule = "required" }]

[[groups.fields]]
type = "group"
label = "Location"

[[groups.fields.fields]]
type = "text"
label = "Latitude"
rules = [{ rule = "range", min = -90.0, max = 90.0 }]
"#;

    #[test]
    fn builds_bound_groups_from_toml() {
        let schema = FormSchema::from_toml_str(ADDRESS).unwrap();
        let groups = schema.build();
        assert_eq!(groups.len(), 1);
        let paths: Vec<String> = groups[0]
            .leaves()
            .iter()
            .map(|leaf| leaf.working_path().unwrap().to_string())
            .collect();
        assert_eq!(paths, ["address->street", "address->location->latitude"]);
    }

    #[test]
    fn rejects_uncompilable_regex() {
        let raw = r#"
[[groups]]
label = "Address"

[[groups.fields]]
type = "text"
label = "Zip"
rules = [{ rule = "regex", pattern = "([0-9" }]
"#;
        let err = FormSchema::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefinition { ref field, .. } if field == "Zip"));
    }

    #[test]
    fn rejects_unknown_field_type() {
        let raw = r#"
[[groups]]
label = "Address"

[[groups.fields]]
type = "wysiwyg"
label = "Notes"
"#;
        assert!(matches!(FormSchema::from_toml_str(raw), Err(SchemaError::Toml(_))));
    }
}
