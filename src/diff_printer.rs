//! Renders a [`similar::TextDiff`] as a colored unified diff, the
//! presentation layer for [`crate::comparator::Diff`].

use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fmt::{self, Display, Formatter};

/// Parses the context-line count out of a `--diff-options` string such as
/// `"-u"` or `"-U5"`. Falls back to 3, `diff -u`'s own default.
pub fn context_radius(diff_options: &str) -> usize {
    for token in diff_options.split_whitespace() {
        if let Some(digits) = token.strip_prefix("-U") {
            if let Ok(n) = digits.parse() {
                return n;
            }
        }
    }
    3
}

pub struct DiffPrinter<'a> {
    diff: TextDiff<'a, 'a, 'a, str>,
    use_colors: bool,
    context: usize,
}

impl<'a> DiffPrinter<'a> {
    pub fn new(expected: &'a str, actual: &'a str, use_colors: bool, context: usize) -> Self {
        DiffPrinter { diff: TextDiff::from_lines(expected, actual), use_colors, context }
    }

    /// The body with the two unified-diff file-header lines stripped, as
    /// the failure report format requires.
    pub fn body_without_header(&self) -> String {
        self.render().lines().skip(2).collect::<Vec<_>>().join("\n")
    }

    fn render(&self) -> String {
        let unified = self.diff.unified_diff().context_radius(self.context).header("expected", "actual").to_string();

        if !self.use_colors {
            return unified;
        }

        unified
            .lines()
            .map(|line| {
                if line.starts_with('-') && !line.starts_with("---") {
                    line.red().to_string()
                } else if line.starts_with('+') && !line.starts_with("+++") {
                    line.green().to_string()
                } else {
                    line.normal().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True iff the two texts have any differing line.
    pub fn has_differences(&self) -> bool {
        self.diff.iter_all_changes().any(|c| c.tag() != ChangeTag::Equal)
    }
}

impl Display for DiffPrinter<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_no_differences() {
        let d = DiffPrinter::new("a\nb\n", "a\nb\n", false, 3);
        assert!(!d.has_differences());
    }

    #[test]
    fn differing_text_is_detected() {
        let d = DiffPrinter::new("bye\n", "hi\n", false, 3);
        assert!(d.has_differences());
        let body = d.render();
        assert!(body.contains("-bye"));
        assert!(body.contains("+hi"));
    }

    #[test]
    fn header_lines_are_stripped() {
        let d = DiffPrinter::new("bye\n", "hi\n", false, 3);
        let stripped = d.body_without_header();
        assert!(!stripped.starts_with("---"));
        assert!(stripped.contains("-bye"));
    }

    #[test]
    fn context_radius_parsing() {
        assert_eq!(context_radius("-u"), 3);
        assert_eq!(context_radius("-U5"), 5);
        assert_eq!(context_radius("-U1 --ignore-space"), 1);
    }
}
