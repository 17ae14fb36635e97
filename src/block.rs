//! The data model shared by the Block Scanner, Executor, Comparator and
//! Orchestrator.

use std::path::PathBuf;

/// A closed sum type for the comparison strategies a block can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Expected is a single line; a terminating LF is appended before compare.
    Text,
    /// Expected is an extended-regex source; pass iff some output line matches.
    Regex,
    /// Expected is a path to a reference file compared byte-for-byte.
    File,
    /// Expected is the concatenation of collected multiline output.
    Output,
}

/// An executable unit discovered by the Block Scanner.
#[derive(Debug, Clone)]
pub struct TestBlock {
    /// 1-based global index, assigned by the Orchestrator in discovery order.
    pub ordinal: usize,
    /// The exact command text to execute (prompt/prefix already stripped).
    pub command: String,
    /// The comparison payload: literal text, regex source, or a reference path.
    pub expected: String,
    pub mode: Mode,
    pub source_file: PathBuf,
    pub source_line: usize,
}
