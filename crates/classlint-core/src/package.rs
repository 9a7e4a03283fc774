//! Package patterns with the `..` any-depth wildcard.
//!
//! - literal segments match exactly
//! - `*` matches exactly one segment
//! - `..` matches zero or more segments
//!
//! ```
//! use classlint_core::PackagePattern;
//!
//! let p = PackagePattern::parse("..controller").unwrap();
//! assert!(p.matches("com.example.app.controller"));
//! assert!(!p.matches("com.example.app.controller.request"));
//! ```

use std::fmt;
use std::str::FromStr;

/// Error compiling a package pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid package pattern '{pattern}': {reason}")]
pub struct PatternError {
    /// The offending pattern.
    pub pattern: String,
    /// What is wrong with it.
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    AnySegment,
    Gap,
}

/// A compiled package pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePattern {
    source: String,
    tokens: Vec<Token>,
}

impl PackagePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for empty patterns and empty segments
    /// (`a...b`, `a.`, `.a`).
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let error = |reason: &str| PatternError {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern.is_empty() {
            return Err(error("pattern is empty"));
        }

        let pieces: Vec<&str> = pattern.split("..").collect();
        let last = pieces.len() - 1;
        let mut tokens = Vec::new();

        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 && tokens.last() != Some(&Token::Gap) {
                tokens.push(Token::Gap);
            }
            if piece.is_empty() {
                if i != 0 && i != last {
                    return Err(error("consecutive '..' wildcards"));
                }
                continue;
            }
            for segment in piece.split('.') {
                match segment {
                    "" => return Err(error("empty package segment")),
                    "*" => tokens.push(Token::AnySegment),
                    s if s.contains('*') => {
                        return Err(error("'*' must stand for a whole segment"));
                    }
                    s => tokens.push(Token::Literal(s.to_string())),
                }
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Checks a fully qualified package name against the pattern.
    #[must_use]
    pub fn matches(&self, package: &str) -> bool {
        let segments: Vec<&str> = if package.is_empty() {
            Vec::new()
        } else {
            package.split('.').collect()
        };
        match_tokens(&segments, &self.tokens)
    }
}

fn match_tokens(segments: &[&str], tokens: &[Token]) -> bool {
    let Some((first, rest)) = tokens.split_first() else {
        return segments.is_empty();
    };

    match first {
        // Non-greedy: try the shortest gap first
        Token::Gap => (0..=segments.len()).any(|i| match_tokens(&segments[i..], rest)),
        Token::AnySegment => !segments.is_empty() && match_tokens(&segments[1..], rest),
        Token::Literal(literal) => {
            segments.first() == Some(&literal.as_str()) && match_tokens(&segments[1..], rest)
        }
    }
}

impl FromStr for PackagePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PackagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Returns true if the package matches at least one of the patterns.
#[must_use]
pub fn matches_any(patterns: &[PackagePattern], package: &str) -> bool {
    patterns.iter().any(|p| p.matches(package))
}

/// Compiles a list of patterns, failing on the first invalid one.
///
/// # Errors
///
/// Returns the first [`PatternError`].
pub fn parse_all<I, S>(patterns: I) -> Result<Vec<PackagePattern>, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| PackagePattern::parse(p.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, package: &str) -> bool {
        match PackagePattern::parse(pattern) {
            Ok(p) => p.matches(package),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn leading_gap_matches_suffix_only() {
        assert!(matches("..controller", "com.example.app.controller"));
        assert!(matches("..controller", "controller"));
        assert!(!matches("..controller", "com.example.app.controller.request"));
    }

    #[test]
    fn inner_gap_absorbs_segments() {
        assert!(matches("a..b", "a.x.y.b"));
        assert!(matches("a..b", "a.b"));
        assert!(!matches("a..b", "a.x.c"));
    }

    #[test]
    fn literal_pattern_requires_equality() {
        assert!(matches("a.b", "a.b"));
        assert!(!matches("a.b", "a.c"));
        assert!(!matches("a.b", "a.b.c"));
    }

    #[test]
    fn multiple_gaps_and_single_segment_wildcard() {
        assert!(matches("..service.impl..", "com.example.service.impl"));
        assert!(matches("..service.impl..", "com.example.service.impl.v2"));
        assert!(!matches("..service.impl..", "com.example.service"));
        assert!(matches("com.*.web", "com.shop.web"));
        assert!(!matches("com.*.web", "com.web"));
        assert!(matches("com.example..", "com.example"));
    }

    #[test]
    fn gap_only_pattern_matches_default_package() {
        assert!(matches("..", ""));
        assert!(matches("..", "a.b"));
    }

    #[test]
    fn rejects_malformed_patterns() {
        for bad in ["", "a...b", "a.", ".a", "a.b*", "a....b"] {
            assert!(PackagePattern::parse(bad).is_err(), "{bad} accepted");
        }
    }
}
