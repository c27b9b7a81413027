//! Configuration and constants for the CLI.

/// Program name used when neither `--pmccabe` nor `PMCCABE_BIN` is given
pub const DEFAULT_PMCCABE_PROGRAM: &str = "pmccabe";

/// Number of whitespace-separated fields in a pmccabe record
pub const RECORD_FIELD_COUNT: usize = 7;

/// Attribute names accepted for filtering and stack collapsing
pub const SUPPORTED_ATTRIBUTES: &[&str] = &["mmcc", "tmcc", "sif", "lif"];

// Range hint shown in the help text: lower bound 1, no upper bound
pub const DEFAULT_RANGE_HINT: &str = "1,";

// Source discovery defaults (the pmccabe driver only looks at C++ sources
// and skips vendored or generated trees)
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["cpp"];
pub const DEFAULT_EXCLUDED_FRAGMENTS: &[&str] = &["thirdparty", "build"];

/// Frame separator of the collapsed-stack format
pub const STACK_FRAME_SEPARATOR: char = ';';

/// Human readable description of every tracked attribute (see `man pmccabe`)
pub const ATTRIBUTE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("mmcc", "Modified McCabe Cyclomatic Complexity"),
    ("tmcc", "Traditional McCabe Cyclomatic Complexity"),
    ("sif", "# Statements in function"),
    ("lif", "# lines in function"),
];

/// Build the attribute help block used by the CLI
pub fn attributes_help() -> String {
    let mut help = String::from("Parameters value description (see `man pmccabe`):");
    for (name, description) in ATTRIBUTE_DESCRIPTIONS {
        help.push_str(&format!("\n\t{}\t\t{}", name, description));
    }
    help
}
