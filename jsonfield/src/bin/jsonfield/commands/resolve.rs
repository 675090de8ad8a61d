use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use jsonfield::AttributePath;
use serde::Serialize;
use serde_json::Value;

use crate::context::{CommandContext, load_record};
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Resolve Values",
        commands: &[
            "jsonfield resolve --schema fields.toml --record user.json",
            "jsonfield resolve --schema fields.toml --record user.json --path 'address->location'",
        ],
    },
    ExampleGroup {
        title: "Scripting",
        commands: &["jsonfield --output json resolve --schema fields.toml --record user.json"],
    },
];

#[derive(Args)]
pub struct ResolveArgs {
    /// Field schema (TOML, or JSON with a .json extension)
    #[arg(long, env = "JSONFIELD_SCHEMA")]
    pub schema: PathBuf,

    /// Record file: {"attributes": {...}, "casts": {...}}
    #[arg(long)]
    pub record: PathBuf,

    /// Only resolve fields at or below this path
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedRow {
    pub path: String,
    pub label: String,
    pub value: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedView {
    pub values: Vec<ResolvedRow>,
}

impl TableDisplay for ResolvedView {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["Path", "Label", "Value"]);
        for row in &self.values {
            table.add_row(vec![
                Cell::new(&row.path),
                Cell::new(&row.label),
                output.value_cell(row.value.as_ref()),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.values
            .iter()
            .map(|row| match &row.value {
                Some(Value::String(text)) => format!("{}={text}", row.path),
                Some(other) => format!("{}={other}", row.path),
                None => format!("{}=", row.path),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_resolve(args: ResolveArgs, output: &OutputManager) -> Result<()> {
    let mut ctx = CommandContext::load(&args.schema)?;
    let record = load_record(&args.record)?;
    let filter = args.path.as_deref().map(AttributePath::parse).transpose()?;

    output.verbose(&format!("schema: {}", ctx.schema_path.display()));
    output.heading("Resolved Values");

    let mut values = Vec::new();
    for group in &mut ctx.groups {
        match &filter {
            Some(path) => group.resolve(&record, path),
            None => group.resolve_all(&record),
        }
        for leaf in group.leaves() {
            let Some(path) = leaf.working_path() else {
                continue;
            };
            if filter.as_ref().is_some_and(|filter| !filter.is_prefix_of(path)) {
                continue;
            }
            values.push(ResolvedRow {
                path: path.to_string(),
                label: leaf.label().to_string(),
                value: leaf.value().cloned(),
            });
        }
    }

    if values.is_empty() {
        output.warning("No fields matched");
    }
    output.display(&ResolvedView { values })
}
