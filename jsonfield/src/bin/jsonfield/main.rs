mod commands;
mod context;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::builder::{Styles, styling::AnsiColor};
use clap::error::ErrorKind;
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand};

use colored::{control::ShouldColorize, Color as ThemeColor, Colorize};
use std::fmt::Write;
use std::io;

use commands::{
    fill::{handle_fill, FillArgs},
    resolve::{handle_resolve, ResolveArgs},
    rules::{handle_rules, RulesArgs},
};
use examples::{COMMAND_EXAMPLES, ExampleGroup};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("JSONFIELD_SCHEMA", "Default field schema for every command"),
    ("RUST_LOG", "Log filter, e.g. jsonfield=debug"),
];

#[derive(Parser)]
#[command(name = "jsonfield")]
#[command(version)]
#[command(
    about = "Resolve and fill nested JSON attributes through field groups",
    long_about = r#"Works with structured (JSON-cast) attributes through a declared field tree:

• Resolve the display value of every field from a record
• Validate and fill submitted form values back into the nested attribute
• List validation rules keyed by full attribute path

Commands:
  resolve   Show the value each field resolves to
  fill      Validate a submission and write it into the record
  rules     Show validation rule keys
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let command = build_cli_command();
        let matches = command.styles(help_styles()).try_get_matches().unwrap_or_else(|err| exit_with(err));
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| exit_with(err))
    }
}

fn exit_with(err: clap::error::Error) -> ! {
    let to_stdout = matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    if let Err(print_err) = err.print()
        && print_err.kind() != io::ErrorKind::BrokenPipe
    {
        eprintln!("Failed to display {}: {print_err}", if to_stdout { "help" } else { "error" });
    }
    std::process::exit(err.exit_code());
}

fn build_cli_command() -> Command {
    let use_color = detect_color_support();
    let appendix = render_top_level_appendix(use_color);
    let mut command = Cli::command().after_long_help(appendix);
    command = command.color(if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    });
    attach_command_examples(&mut command, use_color);
    command
}

fn attach_command_examples(command: &mut Command, use_color: bool) {
    for (name, groups) in COMMAND_EXAMPLES {
        if let Some(subcommand) = command.find_subcommand_mut(name) {
            let help_text = render_examples(groups, use_color);
            *subcommand = subcommand.clone().after_long_help(help_text);
        }
    }
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let blocks: Vec<String> = groups
        .iter()
        .map(|group| {
            let mut block = format!("  {}\n", paint(group.title, THEME.heading, true, use_color));
            for command in group.commands {
                let arrow = paint(ICONS.arrow, THEME.command, false, use_color);
                let _ = writeln!(block, "    {arrow} {}", paint(command, THEME.command, false, use_color));
            }
            block
        })
        .collect();
    format!("{}\n{}", paint("Examples:", THEME.accent, true, use_color), blocks.join("\n"))
}

fn render_top_level_appendix(use_color: bool) -> String {
    let mut buffer = format!("{}\n", paint("Environment Variables:", THEME.accent, true, use_color));
    let width = ENVIRONMENT_VARIABLES.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in ENVIRONMENT_VARIABLES {
        let name = paint(&format!("{name:<width$}"), THEME.path, true, use_color);
        let _ = writeln!(buffer, "  {name}  {description}");
    }

    let tip = paint(
        "Use 'jsonfield <command> --help' to view examples for each command.",
        THEME.muted,
        false,
        use_color,
    );
    let _ = writeln!(buffer, "\n{} {tip}", paint("Tip:", THEME.accent, true, use_color));
    buffer
}

fn paint(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, false) => text.color(color).to_string(),
        (true, true) => text.color(color).bold().to_string(),
    }
}

fn detect_color_support() -> bool {
    ShouldColorize::from_env().should_colorize()
}

fn help_styles() -> Styles {
    Styles::styled()
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .header(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

#[derive(Subcommand)]
enum Commands {
    /// Show the value each field resolves to from a record
    Resolve(ResolveArgs),

    /// Validate submitted values and fill them into a record
    Fill(FillArgs),

    /// Show validation rules keyed by full attribute path
    Rules(RulesArgs),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse_with_styles();

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color || !detect_color_support(),
    });

    if let Err(err) = execute(cli.command, &output) {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn execute(command: Commands, output: &OutputManager) -> Result<()> {
    match command {
        Commands::Resolve(args) => handle_resolve(args, output),
        Commands::Fill(args) => handle_fill(args, output),
        Commands::Rules(args) => handle_rules(args, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_examples_list_every_command() {
        let rendered = render_examples(commands::rules::EXAMPLES, false);
        assert!(rendered.starts_with("Examples:\n  Validation Rule Keys\n"));
        assert!(rendered.contains("    → jsonfield rules --schema fields.toml\n"));
    }

    #[test]
    fn plain_appendix_aligns_variable_names() {
        let rendered = render_top_level_appendix(false);
        assert!(rendered.contains("  JSONFIELD_SCHEMA  Default field schema"));
        assert!(rendered.contains("  RUST_LOG          Log filter"));
        assert!(rendered.contains("Tip: Use 'jsonfield <command> --help'"));
    }

    #[test]
    fn every_example_table_entry_names_a_subcommand() {
        let command = Cli::command();
        for (name, _) in COMMAND_EXAMPLES {
            assert!(command.find_subcommand(name).is_some(), "unknown subcommand {name}");
        }
    }
}
