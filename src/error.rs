use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub type TestResult<T> = Result<T, OperatorError>;

/// Errors that abort the run immediately.
///
/// These are distinct from test failures, which are accumulated data
/// ([`crate::comparator::Diff`]) rather than control flow, and from host
/// errors, which are never surfaced as Rust errors at all (only as
/// captured output).
#[derive(Debug)]
pub enum OperatorError {
    InvalidRange(String),
    FileNotFound(PathBuf),
    Unreadable(PathBuf, std::io::Error),
    MissingInlinePayload { file: PathBuf, line: usize, mode: &'static str },
    ReferenceFileUnreadable { file: PathBuf, line: usize, reference: PathBuf, source: std::io::Error },
    RegexCompile { file: PathBuf, line: usize, source: regex::Error },
    TempDir(std::io::Error),
    NoTestsFound(PathBuf),
    NoTestsInRange,
    ShellSpawn(std::io::Error),
}

impl fmt::Display for OperatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use OperatorError::*;
        match self {
            InvalidRange(raw) => write!(f, "invalid argument for -n or --number: '{raw}'"),
            FileNotFound(path) => write!(f, "no such file: {}", path.display()),
            Unreadable(path, err) => write!(f, "cannot read {}: {err}", path.display()),
            MissingInlinePayload { file, line, mode } => {
                write!(f, "{}:{line}: empty expected payload for --{mode}", file.display())
            }
            ReferenceFileUnreadable { file, line, reference, source } => {
                write!(f, "{}:{line}: cannot read reference file {}: {source}", file.display(), reference.display())
            }
            RegexCompile { file, line, source } => {
                write!(f, "{}:{line}: invalid regular expression: {source}", file.display())
            }
            TempDir(err) => write!(f, "cannot create temp directory: {err}"),
            NoTestsFound(path) => write!(f, "no test found in input file {}", path.display()),
            NoTestsInRange => write!(f, "no test found for the specified number or range"),
            ShellSpawn(err) => write!(f, "cannot spawn shell: {err}"),
        }
    }
}

impl Error for OperatorError {}
