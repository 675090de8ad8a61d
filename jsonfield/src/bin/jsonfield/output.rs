use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// One `path=value` line per entry
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Data that can be displayed as a table or compact lines
pub trait TableDisplay {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                println!("{}", data.to_table(self));
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// True when human-oriented messages should be printed alongside data.
    fn chatty(&self) -> bool {
        !self.options.quiet && self.options.output_format != OutputFormat::Json
    }

    fn decorate(&self, icon: &str, message: &str, color: colored::Color) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }

    pub fn success(&self, message: &str) {
        if self.chatty() {
            println!("{}", self.decorate(ICONS.success, message, THEME.success));
        }
    }

    /// Errors always print, to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.decorate(ICONS.error, message, THEME.error));
    }

    pub fn warning(&self, message: &str) {
        if self.chatty() {
            println!("{}", self.decorate(ICONS.warning, message, THEME.warning));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.decorate(ICONS.arrow, message, THEME.muted));
        }
    }

    pub fn heading(&self, text: &str) {
        if self.chatty() {
            let output = if self.options.no_color {
                format!("\n{text}\n{}", "=".repeat(text.chars().count()))
            } else {
                format!("\n{}", text.color(THEME.heading).bold())
            };
            println!("{output}");
        }
    }

    /// Bullet line on stderr, used to list issues under an error
    pub fn bullet(&self, key: &str, text: &str) {
        let output = if self.options.no_color {
            format!("  {} {key}: {text}", ICONS.bullet)
        } else {
            format!(
                "  {} {}: {}",
                ICONS.bullet.color(THEME.muted),
                key.color(THEME.path).bold(),
                text
            )
        };
        eprintln!("{output}");
    }

    /// Create a themed table with a bold header row
    pub fn create_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();

        if self.options.no_color {
            table.load_preset(comfy_table::presets::ASCII_FULL);
        } else {
            table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        }

        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|header| {
                let cell = Cell::new(header).add_attribute(Attribute::Bold);
                if self.options.no_color { cell } else { cell.fg(TableColor::Cyan) }
            })
            .collect();
        table.set_header(header_cells);
        table
    }

    /// Cell text for a resolved value; absent values render as a muted marker.
    pub fn value_cell(&self, value: Option<&serde_json::Value>) -> Cell {
        match value {
            Some(serde_json::Value::String(text)) => Cell::new(text),
            Some(other) => Cell::new(other.to_string()),
            None if self.options.no_color => Cell::new(ICONS.missing),
            None => Cell::new(ICONS.missing).fg(TableColor::DarkGrey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        path: String,
        value: String,
    }

    impl TableDisplay for Row {
        fn to_table(&self, output: &OutputManager) -> Table {
            let mut table = output.create_table(&["Path", "Value"]);
            table.add_row(vec![Cell::new(&self.path), Cell::new(&self.value)]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{}={}", self.path, self.value)
        }
    }

    fn row() -> Row {
        Row {
            path: "address->street".to_string(),
            value: "main".to_string(),
        }
    }

    #[test]
    fn displays_json() {
        let manager = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        assert!(manager.display(&row()).is_ok());
    }

    #[test]
    fn quiet_suppresses_display() {
        let manager = OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        });
        assert!(manager.display(&row()).is_ok());
        assert!(!manager.chatty());
    }

    #[test]
    fn compact_renders_path_value() {
        assert_eq!(row().to_compact(), "address->street=main");
    }
}
