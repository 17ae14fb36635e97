//! Immutable run configuration. Resolved once
//! from CLI flags in `main.rs` and threaded through the rest of the run;
//! mutable counters live separately in [`crate::orchestrator::Run`] while
//! the configuration itself never changes once built.

use crate::error::OperatorError;
use crate::range::Range;

/// Expands the `--prefix` shortcuts:
/// `tab` → ASCII tab, `0` → empty, an integer 1..99 → that many spaces,
/// anything containing `\` → backslash-escape expansion.
pub fn expand_prefix(raw: &str) -> String {
    if raw == "tab" {
        "\t".to_string()
    } else if raw == "0" {
        String::new()
    } else if let Ok(n) = raw.parse::<u32>() {
        if (1..=99).contains(&n) {
            " ".repeat(n as usize)
        } else {
            unescape(raw)
        }
    } else if raw.contains('\\') {
        unescape(raw)
    } else {
        raw.to_string()
    }
}

/// A small backslash-escape expander: `\t`, `\n`, `\\`, and otherwise the
/// literal character following the backslash.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Listing-only modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Execute every selected block normally.
    Off,
    /// List blocks only; never execute.
    List,
    /// List blocks, execute them, and annotate with OK/FAIL.
    ListRun,
}

pub struct Config {
    pub prefix: String,
    pub prompt: String,
    pub inline_prefix: String,
    pub diff_options: String,
    pub range: Range,
    pub stop_on_first_error: bool,
    pub list_mode: ListMode,
    pub verbose: bool,
    pub quiet: bool,
    pub use_colors: bool,
    /// The shell binary used to execute each command.
    pub shell: String,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prefix: String,
        prompt: String,
        inline_prefix: String,
        diff_options: String,
        range_expr: &str,
        stop_on_first_error: bool,
        list_mode: ListMode,
        verbose: bool,
        quiet: bool,
        use_colors: bool,
        shell: String,
    ) -> Result<Config, OperatorError> {
        let range = Range::parse(range_expr)?;
        Ok(Config {
            prefix: expand_prefix(&prefix),
            prompt,
            inline_prefix,
            diff_options,
            range,
            stop_on_first_error,
            list_mode,
            verbose,
            quiet,
            use_colors,
            shell,
        })
    }
}
