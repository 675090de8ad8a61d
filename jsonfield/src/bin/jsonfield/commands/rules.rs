use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use jsonfield::ValidationRule;
use serde::Serialize;

use crate::context::CommandContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Validation Rule Keys",
    commands: &[
        "jsonfield rules --schema fields.toml",
        "jsonfield --output json rules --schema fields.toml",
    ],
}];

#[derive(Args)]
pub struct RulesArgs {
    /// Field schema (TOML, or JSON with a .json extension)
    #[arg(long, env = "JSONFIELD_SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RulesView {
    pub rules: BTreeMap<String, Vec<ValidationRule>>,
}

impl RulesView {
    fn render(rules: &[ValidationRule]) -> String {
        rules.iter().map(ToString::to_string).collect::<Vec<_>>().join("|")
    }
}

impl TableDisplay for RulesView {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["Path", "Rules"]);
        for (path, rules) in &self.rules {
            table.add_row(vec![Cell::new(path), Cell::new(Self::render(rules))]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.rules
            .iter()
            .map(|(path, rules)| format!("{path}={}", Self::render(rules)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_rules(args: RulesArgs, output: &OutputManager) -> Result<()> {
    let ctx = CommandContext::load(&args.schema)?;
    output.heading("Validation Rules");

    let mut rules = BTreeMap::new();
    for group in &ctx.groups {
        rules.extend(group.rules());
    }
    if rules.is_empty() {
        output.warning("No field declares validation rules");
    }
    output.display(&RulesView { rules })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_joins_rules_per_path() {
        let mut rules = BTreeMap::new();
        rules.insert(
            "address->street".to_string(),
            vec![ValidationRule::Required, ValidationRule::Length { min: None, max: Some(255) }],
        );
        let view = RulesView { rules };
        assert_eq!(view.to_compact(), "address->street=required|length:*..255");
    }
}
