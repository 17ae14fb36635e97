//! Translates a human range expression ("1,3,5-8") into a membership
//! predicate over test ordinals.

use crate::error::OperatorError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Single(usize),
    Span(usize, usize),
}

impl Part {
    fn contains(&self, k: usize) -> bool {
        match *self {
            Part::Single(n) => n == k,
            Part::Span(a, b) => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                k >= lo && k <= hi
            }
        }
    }
}

/// A parsed `-n`/`--number` expression. `Range::all()` matches every ordinal
/// (the "no filter" case: an empty string or the literal `"0"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    parts: Vec<Part>,
}

impl Range {
    pub fn all() -> Range {
        Range { parts: Vec::new() }
    }

    /// Parses a range expression. Any character outside `[0-9,-]`, or a
    /// malformed part, is an operator error.
    pub fn parse(raw: &str) -> Result<Range, OperatorError> {
        if raw.is_empty() || raw == "0" {
            return Ok(Range::all());
        }

        if raw.chars().any(|c| !(c.is_ascii_digit() || c == ',' || c == '-')) {
            return Err(OperatorError::InvalidRange(raw.to_string()));
        }

        let mut parts = Vec::new();
        for token in raw.split(',') {
            if token.is_empty() || token == "0" {
                // The token "0" is silently ignored for compatibility.
                continue;
            }

            if let Some((lhs, rhs)) = token.split_once('-') {
                let a: usize = lhs.parse().map_err(|_| OperatorError::InvalidRange(raw.to_string()))?;
                let b: usize = rhs.parse().map_err(|_| OperatorError::InvalidRange(raw.to_string()))?;
                if a == 0 || b == 0 {
                    return Err(OperatorError::InvalidRange(raw.to_string()));
                }
                parts.push(Part::Span(a, b));
            } else {
                let n: usize = token.parse().map_err(|_| OperatorError::InvalidRange(raw.to_string()))?;
                if n == 0 {
                    continue;
                }
                parts.push(Part::Single(n));
            }
        }

        Ok(Range { parts })
    }

    /// True for every ordinal when no filter is active, otherwise true iff
    /// `k` belongs to the union of all parsed parts.
    pub fn member(&self, k: usize) -> bool {
        self.parts.is_empty() || self.parts.iter().any(|p| p.contains(k))
    }

    pub fn is_filtering(&self) -> bool {
        !self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_zero_mean_no_filter() {
        assert_eq!(Range::parse("").unwrap(), Range::all());
        assert_eq!(Range::parse("0").unwrap(), Range::all());
        assert!(Range::parse("").unwrap().member(1));
        assert!(Range::parse("").unwrap().member(9999));
    }

    #[test]
    fn single_and_span() {
        let r = Range::parse("1,3,5-8").unwrap();
        assert!(r.member(1));
        assert!(!r.member(2));
        assert!(r.member(3));
        assert!(!r.member(4));
        for k in 5..=8 {
            assert!(r.member(k));
        }
        assert!(!r.member(9));
    }

    #[test]
    fn reverse_span_is_same_set() {
        let forward = Range::parse("5-8").unwrap();
        let backward = Range::parse("8-5").unwrap();
        for k in 1..=10 {
            assert_eq!(forward.member(k), backward.member(k));
        }
    }

    #[test]
    fn leading_zero_token_is_ignored() {
        let r = Range::parse("0,2").unwrap();
        assert!(!r.member(1));
        assert!(r.member(2));
    }

    #[test]
    fn invalid_characters_are_rejected() {
        assert!(Range::parse("abc").is_err());
        assert!(Range::parse("1..3").is_err());
        assert!(Range::parse("1,").is_ok()); // trailing empty token is simply skipped
    }

    #[test]
    fn malformed_span_is_rejected() {
        assert!(Range::parse("1-").is_err());
        assert!(Range::parse("-1").is_err());
    }

    #[test]
    fn range_filtering_is_idempotent() {
        // -n 1,2,3 on a 3-test run matches the unfiltered predicate.
        let filtered = Range::parse("1,2,3").unwrap();
        let unfiltered = Range::all();
        for k in 1..=3 {
            assert_eq!(filtered.member(k), unfiltered.member(k));
        }
    }
}
