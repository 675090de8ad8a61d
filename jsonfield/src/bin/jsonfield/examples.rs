use crate::commands::{fill, resolve, rules};

/// Titled block of sample invocations shown under a subcommand's `--help`
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

/// Subcommand name paired with its example blocks
pub const COMMAND_EXAMPLES: &[(&str, &[ExampleGroup])] = &[
    ("resolve", resolve::EXAMPLES),
    ("fill", fill::EXAMPLES),
    ("rules", rules::EXAMPLES),
];
