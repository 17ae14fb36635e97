//! The Comparator: mode-dispatched comparison between captured output and
//! a block's expectation.

use crate::block::{Mode, TestBlock};
use crate::diff_printer::{self, DiffPrinter};
use crate::error::OperatorError;
use regex::Regex;
use std::path::Path;

/// A diff artifact produced on failure. Owns both texts so it can be
/// rendered lazily by the Orchestrator's reporting step.
pub struct Diff {
    expected_display: String,
    actual_display: String,
    use_colors: bool,
    context: usize,
}

impl Diff {
    /// The body with the two unified-diff header lines stripped, as the
    /// failure report format requires.
    pub fn body_without_header(&self) -> String {
        DiffPrinter::new(&self.expected_display, &self.actual_display, self.use_colors, self.context)
            .body_without_header()
    }
}

pub enum Outcome {
    Pass,
    Fail(Diff),
}

/// Compares `captured` against `block.expected` per `block.mode`.
pub fn compare(
    block: &TestBlock,
    captured: &[u8],
    diff_options: &str,
    use_colors: bool,
) -> Result<Outcome, OperatorError> {
    let context = diff_printer::context_radius(diff_options);
    let actual = String::from_utf8_lossy(captured).into_owned();

    match block.mode {
        Mode::Text => {
            // An empty expected string means "no output at all", distinct from the usual "append a terminating LF" rule.
            let expected = if block.expected.is_empty() { String::new() } else { format!("{}\n", block.expected) };
            if expected.as_bytes() == captured {
                Ok(Outcome::Pass)
            } else {
                Ok(Outcome::Fail(Diff { expected_display: expected, actual_display: actual, use_colors, context }))
            }
        }
        Mode::Output => {
            if block.expected.as_bytes() == captured {
                Ok(Outcome::Pass)
            } else {
                Ok(Outcome::Fail(Diff {
                    expected_display: block.expected.clone(),
                    actual_display: actual,
                    use_colors,
                    context,
                }))
            }
        }
        Mode::File => {
            let reference = Path::new(&block.expected);
            let expected = std::fs::read(reference).map_err(|source| OperatorError::ReferenceFileUnreadable {
                file: block.source_file.clone(),
                line: block.source_line,
                reference: reference.to_owned(),
                source,
            })?;
            if expected == captured {
                Ok(Outcome::Pass)
            } else {
                Ok(Outcome::Fail(Diff {
                    expected_display: String::from_utf8_lossy(&expected).into_owned(),
                    actual_display: actual,
                    use_colors,
                    context,
                }))
            }
        }
        Mode::Regex => {
            let re = Regex::new(&block.expected).map_err(|source| OperatorError::RegexCompile {
                file: block.source_file.clone(),
                line: block.source_line,
                source,
            })?;
            if actual.lines().any(|line| re.is_match(line)) {
                Ok(Outcome::Pass)
            } else {
                // Synthesize a diff treating the regex source as "expected"
                // so the user sees their pattern against the actual output.
                Ok(Outcome::Fail(Diff {
                    expected_display: block.expected.clone(),
                    actual_display: actual,
                    use_colors,
                    context,
                }))
            }
        }
    }
}
