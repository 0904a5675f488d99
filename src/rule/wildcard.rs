//! Wildcard pattern compilation.

use regex::Regex;

/// A rule containing `*` tokens, compiled to an anchored regex.
///
/// Every `*` matches any run of characters, dots included, so
/// `*.example.com` also matches `a.b.example.com`. Everything else is matched
/// literally.
///
/// # Examples
/// ```
/// use hostscope::rule::WildcardPattern;
///
/// let pattern = WildcardPattern::new("*.example.*.test").unwrap();
/// assert!(pattern.is_match("foo.example.bar.test"));
/// assert!(!pattern.is_match("foo.bar.baz.test"));
/// ```
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compile `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{}$", body))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether the whole of `input` matches.
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}
