use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use jsonfield::{HostEntity, ValidationIssue};
use serde::Serialize;
use serde_json::Value;

use crate::context::{CommandContext, load_form, load_record, write_record};
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Preview a Submission",
        commands: &["jsonfield fill --schema fields.toml --record user.json --input form.json"],
    },
    ExampleGroup {
        title: "Apply a Submission",
        commands: &[
            "jsonfield fill --schema fields.toml --record user.json --input form.json --write",
            "jsonfield fill --schema fields.toml --record user.json --input form.json --skip-validation --write",
        ],
    },
];

#[derive(Args)]
pub struct FillArgs {
    /// Field schema (TOML, or JSON with a .json extension)
    #[arg(long, env = "JSONFIELD_SCHEMA")]
    pub schema: PathBuf,

    /// Record file: {"attributes": {...}, "casts": {...}}
    #[arg(long)]
    pub record: PathBuf,

    /// Submitted values: flat JSON object keyed by path
    #[arg(long)]
    pub input: PathBuf,

    /// Fill without checking validation rules
    #[arg(long)]
    pub skip_validation: bool,

    /// Write the updated record back to its file
    #[arg(long)]
    pub write: bool,
}

#[derive(Debug, Serialize)]
pub struct FilledAttribute {
    pub attribute: String,
    pub value: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct FilledView {
    pub filled: usize,
    pub attributes: Vec<FilledAttribute>,
}

impl TableDisplay for FilledView {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table(&["Attribute", "Value"]);
        for entry in &self.attributes {
            let rendered = match &entry.value {
                Some(value) => Cell::new(serde_json::to_string_pretty(value).unwrap_or_default()),
                None => output.value_cell(None),
            };
            table.add_row(vec![Cell::new(&entry.attribute), rendered]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.attributes
            .iter()
            .map(|entry| {
                let value = entry.value.as_ref().map(Value::to_string).unwrap_or_default();
                format!("{}={value}", entry.attribute)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_fill(args: FillArgs, output: &OutputManager) -> Result<()> {
    let ctx = CommandContext::load(&args.schema)?;
    let mut record = load_record(&args.record)?;
    let form = load_form(&args.input)?;
    output.verbose(&format!("{} submitted value(s)", form.len()));

    if !args.skip_validation {
        let issues: Vec<ValidationIssue> = ctx
            .groups
            .iter()
            .filter_map(|group| group.validate(&form).err())
            .flat_map(|err| err.issues)
            .collect();
        if !issues.is_empty() {
            output.error("Submitted values failed validation");
            for issue in &issues {
                output.bullet(&issue.field, &issue.message);
            }
            anyhow::bail!("{} validation issue(s)", issues.len());
        }
    }

    let mut bound = BTreeSet::new();
    let mut attributes = BTreeSet::new();
    let mut filled = 0;
    for group in &ctx.groups {
        filled += group
            .fill_all(&form, &mut record)
            .with_context(|| format!("Failed to fill group `{}`", group.label()))?;
        for leaf in group.leaves() {
            if let Some(path) = leaf.working_path() {
                bound.insert(path.to_string());
                attributes.insert(path.top_level().to_string());
            }
        }
    }

    for key in form.keys().filter(|key| !bound.contains(*key)) {
        output.warning(&format!("No field is bound to `{key}`"));
    }
    if filled == 0 {
        output.warning("Nothing was filled");
    }

    if args.write {
        write_record(&args.record, &record)?;
        output.success(&format!("Updated {}", args.record.display()));
    }

    output.heading("Filled Attributes");
    let attributes = attributes
        .into_iter()
        .map(|attribute| FilledAttribute {
            value: record.attribute(&attribute),
            attribute,
        })
        .collect();
    output.display(&FilledView { filled, attributes })
}
