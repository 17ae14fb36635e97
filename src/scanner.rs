//! The Block Scanner: consumes an input file line by line and emits a
//! stream of [`TestBlock`]s. The scanner never executes
//! anything; it only recognizes blocks. Keeping scanning and execution
//! strictly separate is what lets `--list`/`--list-run` work and keeps
//! ordinal assignment deterministic before any command runs.

use crate::block::{Mode, TestBlock};
use crate::config::Config;
use crate::error::OperatorError;
use std::path::{Path, PathBuf};

/// Normalizes CRLF line endings to LF.
pub fn normalize_newlines(contents: &str) -> String {
    contents.replace("\r\n", "\n")
}

enum State {
    Idle,
    Collecting { command: String, expected: String, start_line: usize },
}

/// Scans one already CRLF-normalized file's contents and returns every
/// block found, in file order. Ordinals are left at `0`; the Orchestrator
/// assigns them globally across all input files.
pub fn scan(path: &Path, contents: &str, config: &Config) -> Result<Vec<TestBlock>, OperatorError> {
    let mut blocks = Vec::new();
    let mut state = State::Idle;

    let full_prompt = format!("{}{}", config.prefix, config.prompt);
    let alone_variants = prompt_alone_variants(&config.prefix, &config.prompt);

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        process_line(path, raw_line, line_no, &full_prompt, &alone_variants, &mut state, &mut blocks, config)?;
    }

    if let State::Collecting { command, expected, start_line } = state {
        blocks.push(TestBlock {
            ordinal: 0,
            command,
            expected,
            mode: Mode::Output,
            source_file: path.to_owned(),
            source_line: start_line,
        });
    }

    Ok(blocks)
}

#[allow(clippy::too_many_arguments)]
fn process_line(
    path: &Path,
    raw_line: &str,
    line_no: usize,
    full_prompt: &str,
    alone_variants: &[String],
    state: &mut State,
    blocks: &mut Vec<TestBlock>,
    config: &Config,
) -> Result<(), OperatorError> {
    let is_alone = alone_variants.iter().any(|v| raw_line == v);
    let starts_cmd = raw_line.starts_with(full_prompt);

    match state {
        State::Idle => {
            if is_alone {
                // A blank prompt with nothing following; no-op.
            } else if starts_cmd {
                open_or_emit(path, raw_line, line_no, full_prompt, state, blocks, config)?;
            }
            // Any other line is ordinary surrounding text; ignored.
        }
        State::Collecting { command, expected, start_line } => {
            if is_alone {
                blocks.push(TestBlock {
                    ordinal: 0,
                    command: std::mem::take(command),
                    expected: std::mem::take(expected),
                    mode: Mode::Output,
                    source_file: path.to_owned(),
                    source_line: *start_line,
                });
                *state = State::Idle;
            } else if starts_cmd {
                blocks.push(TestBlock {
                    ordinal: 0,
                    command: std::mem::take(command),
                    expected: std::mem::take(expected),
                    mode: Mode::Output,
                    source_file: path.to_owned(),
                    source_line: *start_line,
                });
                *state = State::Idle;
                open_or_emit(path, raw_line, line_no, full_prompt, state, blocks, config)?;
            } else if !config.prefix.is_empty() && !raw_line.starts_with(config.prefix.as_str()) {
                blocks.push(TestBlock {
                    ordinal: 0,
                    command: std::mem::take(command),
                    expected: std::mem::take(expected),
                    mode: Mode::Output,
                    source_file: path.to_owned(),
                    source_line: *start_line,
                });
                *state = State::Idle;
                // Line is surrounding text, not reprocessed: it is neither a
                // prompt-alone nor a command-introducing line.
            } else {
                let content = raw_line.strip_prefix(config.prefix.as_str()).unwrap_or(raw_line);
                expected.push_str(content);
                expected.push('\n');
            }
        }
    }

    Ok(())
}

fn open_or_emit(
    path: &Path,
    raw_line: &str,
    line_no: usize,
    full_prompt: &str,
    state: &mut State,
    blocks: &mut Vec<TestBlock>,
    config: &Config,
) -> Result<(), OperatorError> {
    let rest = &raw_line[full_prompt.len()..];

    if let Some(first) = rest.find(&config.inline_prefix) {
        let last = rest.rfind(&config.inline_prefix).unwrap_or(first);
        let command = rest[..first].trim_end().to_string();
        let inline = &rest[last + config.inline_prefix.len()..];

        let (mode, expected) = classify_inline(inline);
        if mode != Mode::Text && expected.trim().is_empty() {
            let mode_name = match mode {
                Mode::Regex => "regex",
                Mode::File => "file",
                Mode::Output => "output",
                Mode::Text => unreachable!(),
            };
            return Err(OperatorError::MissingInlinePayload { file: path.to_owned(), line: line_no, mode: mode_name });
        }

        blocks.push(TestBlock {
            ordinal: 0,
            command,
            expected,
            mode,
            source_file: path.to_owned(),
            source_line: line_no,
        });
    } else {
        *state = State::Collecting { command: rest.to_string(), expected: String::new(), start_line: line_no };
    }

    Ok(())
}

fn classify_inline(inline: &str) -> (Mode, String) {
    if let Some(rest) = inline.strip_prefix("--regex ") {
        (Mode::Regex, rest.to_string())
    } else if let Some(rest) = inline.strip_prefix("--file ") {
        (Mode::File, rest.to_string())
    } else if let Some(rest) = inline.strip_prefix("--text ") {
        (Mode::Text, rest.to_string())
    } else {
        (Mode::Text, inline.to_string())
    }
}

/// The three literal forms accepted as "prompt alone":
/// the exact prompt, the prompt with its trailing space trimmed, and the
/// prompt followed by an extra space — each still preceded by `prefix`.
fn prompt_alone_variants(prefix: &str, prompt: &str) -> Vec<String> {
    let trimmed = prompt.trim_end();
    let extra = format!("{prompt} ");
    let mut variants = vec![format!("{prefix}{prompt}"), format!("{prefix}{trimmed}"), format!("{prefix}{extra}")];
    variants.dedup();
    variants
}

pub fn read_normalized(path: &PathBuf) -> Result<String, OperatorError> {
    let raw = std::fs::read_to_string(path).map_err(|e| OperatorError::Unreadable(path.clone(), e))?;
    Ok(normalize_newlines(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListMode;

    fn config() -> Config {
        Config::new(
            String::new(),
            "$ ".to_string(),
            "#→ ".to_string(),
            "-u".to_string(),
            "",
            false,
            ListMode::Off,
            false,
            false,
            false,
            "/bin/sh".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn single_output_block() {
        let src = "$ echo hi\nhi\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].command, "echo hi");
        assert_eq!(blocks[0].expected, "hi\n");
        assert_eq!(blocks[0].mode, Mode::Output);
    }

    #[test]
    fn consecutive_blocks_split_on_next_prompt() {
        let src = "$ echo 1\n1\n$ echo 2\n2\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].command, "echo 1");
        assert_eq!(blocks[0].expected, "1\n");
        assert_eq!(blocks[1].command, "echo 2");
        assert_eq!(blocks[1].expected, "2\n");
    }

    #[test]
    fn blank_prompt_closes_block() {
        let src = "$ echo hi\nhi\n$ \nsome prose after\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].expected, "hi\n");
    }

    #[test]
    fn non_prefixed_line_closes_block_in_prefix_mode() {
        let mut cfg = config();
        cfg.prefix = "    ".to_string();
        let src = "    $ echo hi\n    hi\nEnglish prose here.\n";
        let blocks = scan(Path::new("t"), src, &cfg).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].expected, "hi\n");
    }

    #[test]
    fn inline_text_block() {
        let src = "$ printf foo  #→ foo\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].command, "printf foo");
        assert_eq!(blocks[0].mode, Mode::Text);
        assert_eq!(blocks[0].expected, "foo");
    }

    #[test]
    fn inline_regex_block() {
        let src = "$ date  #→ --regex ^[A-Z][a-z]{2}\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks[0].mode, Mode::Regex);
        assert_eq!(blocks[0].expected, "^[A-Z][a-z]{2}");
    }

    #[test]
    fn inline_file_block() {
        let src = "$ cat foo.txt  #→ --file expected/foo.txt\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks[0].mode, Mode::File);
        assert_eq!(blocks[0].expected, "expected/foo.txt");
    }

    #[test]
    fn empty_inline_text_means_no_output() {
        let src = "$ true  #→ \n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks[0].mode, Mode::Text);
        assert_eq!(blocks[0].expected, "");
    }

    #[test]
    fn empty_inline_regex_is_fatal() {
        let src = "$ true  #→ --regex \n";
        let err = scan(Path::new("t"), src, &config()).unwrap_err();
        assert!(matches!(err, OperatorError::MissingInlinePayload { .. }));
    }

    #[test]
    fn inline_split_uses_first_and_last_occurrence() {
        // asymmetric on purpose: command ends at the FIRST inline_prefix,
        // expected begins after the LAST inline_prefix.
        let src = "$ echo a #→ #→ --text b\n";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks[0].command, "echo a");
        assert_eq!(blocks[0].expected, "b");
    }

    #[test]
    fn crlf_normalized_before_scanning() {
        let src = "$ echo hi\r\nhi\r\n";
        let normalized = normalize_newlines(src);
        let blocks = scan(Path::new("t"), &normalized, &config()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].expected, "hi\n");
    }

    #[test]
    fn tab_prefix_mode() {
        let mut cfg = config();
        cfg.prefix = "\t".to_string();
        let src = "\t$ echo hi\n\thi\nnot indented\n";
        let blocks = scan(Path::new("t"), src, &cfg).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].expected, "hi\n");
    }

    #[test]
    fn end_of_file_closes_pending_block() {
        let src = "$ echo hi\nhi";
        let blocks = scan(Path::new("t"), src, &config()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].expected, "hi\n");
    }
}
