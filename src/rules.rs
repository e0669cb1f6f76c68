//! Ordered literal substitution rules
//!
//! Each rule replaces the *first* occurrence of its pattern in a line. Rules
//! run in table order and every rule sees the line as left by the previous
//! one, so a narrow pattern listed before a broader one consumes the text the
//! broader one would otherwise match.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A single `pattern -> replacement` literal pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl SubstitutionRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Replace the first occurrence of the pattern, if any.
    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match line.find(self.pattern.as_str()) {
            Some(start) => {
                let end = start + self.pattern.len();
                let mut out =
                    String::with_capacity(line.len() - self.pattern.len() + self.replacement.len());
                out.push_str(&line[..start]);
                out.push_str(&self.replacement);
                out.push_str(&line[end..]);
                Cow::Owned(out)
            }
            None => Cow::Borrowed(line),
        }
    }

    /// Byte-level [`apply`](Self::apply). Bytes outside the match are kept
    /// as-is, so lines that are not valid UTF-8 survive unchanged.
    pub fn replace_first(&self, line: &[u8]) -> Option<Vec<u8>> {
        let pattern = self.pattern.as_bytes();
        let start = find_bytes(line, pattern)?;
        let mut out = Vec::with_capacity(line.len() - pattern.len() + self.replacement.len());
        out.extend_from_slice(&line[..start]);
        out.extend_from_slice(self.replacement.as_bytes());
        out.extend_from_slice(&line[start + pattern.len()..]);
        Some(out)
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Rule pairs for the LPK comment convention.
const BUILTIN_RULES: &[(&str, &str)] = &[
    // file header block
    ("File:", "\\file"),
    ("Authors:", "\\author"),
    ("Last Updated:", "\\date"),
    ("Last Version:", "\\version"),
    ("Description:", "\\brief"),
    ("Copyright", "\\copyright"),
    // class block
    ("CLASS NAME  :", "\\class"),
    ("DESCRIPTION :", "\\brief"),
    // function block
    ("FUNCTION NAME:", "\\fn"),
    ("DESCRIPTION  :", "\\brief"),
    ("INPUTS       : None", ""),
    ("INPUTS       :", "\\param"),
    ("OUTPUTS      : None", ""),
    ("OUTPUTS      :", "\\return"),
];

/// An ordered, immutable list of substitution rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<SubstitutionRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        Self { rules }
    }

    /// The built-in LPK to Doxygen table.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_RULES
                .iter()
                .map(|(pattern, replacement)| SubstitutionRule::new(*pattern, *replacement))
                .collect(),
        )
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule, in order, to one line.
    pub fn rewrite_line(&self, line: &str) -> String {
        let mut current = line.to_string();
        for rule in &self.rules {
            if let Cow::Owned(next) = rule.apply(&current) {
                current = next;
            }
        }
        current
    }

    /// Apply every rule, in order, to one raw line. `on_hit` receives the
    /// index of each rule that matched.
    pub fn rewrite_bytes<'a>(
        &self,
        line: &'a [u8],
        mut on_hit: impl FnMut(usize),
    ) -> Cow<'a, [u8]> {
        let mut current = Cow::Borrowed(line);
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(next) = rule.replace_first(&current) {
                current = Cow::Owned(next);
                on_hit(index);
            }
        }
        current
    }

    /// Index of the first rule with an empty pattern.
    pub fn first_empty_pattern(&self) -> Option<usize> {
        self.rules.iter().position(|r| r.pattern.is_empty())
    }
}

impl From<Vec<SubstitutionRule>> for RuleTable {
    fn from(rules: Vec<SubstitutionRule>) -> Self {
        Self::new(rules)
    }
}
