//! The Orchestrator: drives input files in order, numbers tests globally,
//! consults the Range Parser, invokes the Executor and Comparator, and
//! produces the final report and exit code.
//!
//! Every piece of mutable state for a run lives in [`Run`] rather than in
//! process-wide statics.

use crate::block::TestBlock;
use crate::comparator::{self, Outcome};
use crate::config::{Config, ListMode};
use crate::error::OperatorError;
use crate::executor;
use crate::scanner;

use colored::Colorize;
use std::path::{Path, PathBuf};

const SEPARATOR_WIDTH: usize = 50;

/// Final pass/fail counters and the exit code they imply.
pub struct RunSummary {
    pub total_tests: usize,
    pub total_failures: usize,
    pub exit_code: i32,
}

struct FileStats {
    tests: usize,
    failures: usize,
}

/// All per-run mutable state: counters, the assigned-ordinal cursor, and
/// the private temp workspace. Scanning and diffing both
/// work entirely in memory, but the workspace is still created and held
/// for the run's lifetime so its `Drop` impl guarantees cleanup on every
/// exit path, including the `stop_on_first_error` early return and any
/// `?`-propagated operator error.
pub struct Run<'a> {
    config: &'a Config,
    _workspace: tempfile::TempDir,
    ordinal: usize,
    total_tests: usize,
    total_failures: usize,
}

impl<'a> Run<'a> {
    pub fn new(config: &'a Config) -> Result<Run<'a>, OperatorError> {
        let workspace = tempfile::Builder::new().prefix("clitest-").tempdir().map_err(OperatorError::TempDir)?;
        Ok(Run { config, _workspace: workspace, ordinal: 0, total_tests: 0, total_failures: 0 })
    }

    /// Drives every input file in argv order and returns the final summary.
    pub fn run_files(mut self, files: &[PathBuf]) -> Result<RunSummary, OperatorError> {
        let multi = files.len() > 1;

        for path in files {
            if !path.exists() {
                return Err(OperatorError::FileNotFound(path.clone()));
            }

            let contents = scanner::read_normalized(path)?;
            let blocks = scanner::scan(path, &contents, self.config)?;

            if blocks.is_empty() && !self.config.range.is_filtering() {
                return Err(OperatorError::NoTestsFound(path.clone()));
            }

            if multi && !self.config.quiet {
                println!("=== {} ===", path.display());
            }

            let stats = self.run_blocks(blocks)?;

            if multi && !self.config.quiet {
                print_file_stats(path, &stats, self.config.use_colors);
            }

            if self.config.stop_on_first_error && self.total_failures > 0 {
                break;
            }
        }

        if self.config.range.is_filtering() && self.total_tests == 0 {
            return Err(OperatorError::NoTestsInRange);
        }

        let exit_code = if self.total_failures == 0 { 0 } else { 1 };
        if !self.config.quiet && !matches!(self.config.list_mode, ListMode::List) {
            print_summary(self.total_tests, self.total_failures, self.config.use_colors);
        }

        Ok(RunSummary { total_tests: self.total_tests, total_failures: self.total_failures, exit_code })
    }

    fn run_blocks(&mut self, blocks: Vec<TestBlock>) -> Result<FileStats, OperatorError> {
        let mut stats = FileStats { tests: 0, failures: 0 };

        for mut block in blocks {
            self.ordinal += 1;
            block.ordinal = self.ordinal;

            if !self.config.range.member(block.ordinal) {
                continue;
            }

            stats.tests += 1;
            self.total_tests += 1;

            if matches!(self.config.list_mode, ListMode::List) {
                println!("{}", list_line(block.ordinal, &block.command, None, self.config.use_colors));
                continue;
            }

            if self.config.verbose {
                println!("$ {}", block.command);
            }

            let captured = executor::execute(&self.config.shell, &block.command)?;
            let outcome = comparator::compare(&block, &captured.bytes, &self.config.diff_options, false)?;

            let passed = matches!(outcome, Outcome::Pass);
            if matches!(self.config.list_mode, ListMode::ListRun) {
                println!("{}", list_line(block.ordinal, &block.command, Some(passed), self.config.use_colors));
            }

            if let Outcome::Fail(diff) = outcome {
                stats.failures += 1;
                self.total_failures += 1;

                if !self.config.quiet && !matches!(self.config.list_mode, ListMode::ListRun) {
                    print_failure_report(
                        block.ordinal,
                        &block.command,
                        &diff.body_without_header(),
                        self.config.use_colors,
                    );
                }

                if self.config.stop_on_first_error {
                    break;
                }
            }
        }

        Ok(stats)
    }
}

fn list_line(ordinal: usize, command: &str, status: Option<bool>, use_colors: bool) -> String {
    let plain = match status {
        Some(true) => format!("{ordinal}\tOK\t{command}"),
        Some(false) => format!("{ordinal}\tFAIL\t{command}"),
        None => format!("{ordinal}\t{command}"),
    };

    if !use_colors {
        return plain;
    }

    match status {
        Some(true) => plain.green().to_string(),
        Some(false) => plain.red().to_string(),
        None => plain.normal().to_string(),
    }
}

fn print_failure_report(ordinal: usize, command: &str, diff_body: &str, use_colors: bool) {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let header = format!("[FAILED #{ordinal}] {command}");
    let report = format!("{separator}\n{header}\n{diff_body}\n{separator}");

    if use_colors {
        println!("{}", report.red());
    } else {
        println!("{report}");
    }
}

fn print_file_stats(path: &Path, stats: &FileStats, use_colors: bool) {
    let passed = stats.tests - stats.failures;
    let line = format!("{}: {}/{} passed", path.display(), passed, stats.tests);
    if use_colors && stats.failures == 0 {
        println!("{}", line.green());
    } else if use_colors {
        println!("{}", line.red());
    } else {
        println!("{line}");
    }
}

fn summary_message(total: usize, failures: usize) -> String {
    if total == 1 {
        return if failures == 0 {
            "OK! The single test has passed.".to_string()
        } else {
            "FAIL: The single test has failed.".to_string()
        };
    }

    if failures == 0 {
        return if total < 50 {
            format!("OK! All {total} tests have passed.")
        } else if total < 100 {
            format!("YOU WIN! All {total} tests have passed.")
        } else {
            format!("YOU WIN! PERFECT! All {total} tests have passed.")
        };
    }

    if failures == total {
        return if total < 50 {
            format!("COMPLETE FAIL! All {total} tests have failed.")
        } else {
            format!("EPIC FAIL! All {total} tests have failed.")
        };
    }

    format!("FAIL: {failures} of {total} tests have failed.")
}

fn print_summary(total: usize, failures: usize, use_colors: bool) {
    let message = summary_message(total, failures);
    if use_colors && failures == 0 {
        println!("{}", message.green());
    } else if use_colors {
        println!("{}", message.red());
    } else {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pass_message() {
        assert_eq!(summary_message(1, 0), "OK! The single test has passed.");
    }

    #[test]
    fn single_fail_message() {
        assert_eq!(summary_message(1, 1), "FAIL: The single test has failed.");
    }

    #[test]
    fn small_all_pass_message() {
        assert_eq!(summary_message(10, 0), "OK! All 10 tests have passed.");
    }

    #[test]
    fn win_threshold_message() {
        assert_eq!(summary_message(50, 0), "YOU WIN! All 50 tests have passed.");
        assert_eq!(summary_message(99, 0), "YOU WIN! All 99 tests have passed.");
    }

    #[test]
    fn perfect_threshold_message() {
        assert_eq!(summary_message(100, 0), "YOU WIN! PERFECT! All 100 tests have passed.");
    }

    #[test]
    fn small_all_fail_message() {
        assert_eq!(summary_message(10, 10), "COMPLETE FAIL! All 10 tests have failed.");
    }

    #[test]
    fn epic_fail_message() {
        assert_eq!(summary_message(50, 50), "EPIC FAIL! All 50 tests have failed.");
    }

    #[test]
    fn mixed_message() {
        assert_eq!(summary_message(10, 3), "FAIL: 3 of 10 tests have failed.");
    }
}
