//! Hierarchical key/value save tree.
//!
//! The host game persists module state as a tree of named nodes, each with
//! an ordered list of `key = value` pairs and child nodes. [`SaveNode`]
//! models that tree and provides a text codec for the host's
//! brace-delimited format:
//!
//! ```text
//! LOGPERIODS
//! {
//!     LOGPERIOD
//!     {
//!         StartUT = 0
//!         EndUT = 2678400
//!     }
//! }
//! ```
//!
//! Keys may repeat; lookups return the first match, like the host does.
//!
//! In the text form `//` starts a comment and values are trimmed, so the
//! codec escapes what would otherwise be lost: `\\` for a backslash, `\/`
//! for a slash next to another slash, `\s` and `\t` for a space or tab at
//! either edge of a value, and `\u{..}` for any other edge whitespace.
//! Values in memory are never escaped.

use core::fmt::Write as _;
use core::str::FromStr;

/// Errors that can occur when reading a save tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// The text form is not well formed.
    #[error("save syntax error on line {line}: {message}")]
    Syntax {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A required value is absent from a record node.
    #[error("{node} is missing value {key}")]
    MissingValue {
        /// Name of the node being read.
        node: String,
        /// Key that was expected.
        key: &'static str,
    },

    /// A value is present but cannot be parsed.
    #[error("{node}.{key} has invalid value {value:?}: {reason}")]
    InvalidValue {
        /// Name of the node being read.
        node: String,
        /// Key whose value was rejected.
        key: &'static str,
        /// The raw text.
        value: String,
        /// Parser error message.
        reason: String,
    },
}

/// One node of the save tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveNode {
    name: String,
    values: Vec<(String, String)>,
    nodes: Vec<SaveNode>,
}

impl SaveNode {
    /// Create an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// The node's name. The root of a parsed document has an empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All `key = value` pairs in order.
    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    /// All child nodes in order.
    pub fn nodes(&self) -> &[Self] {
        &self.nodes
    }

    /// Append a value. Line breaks are flattened to spaces because the text
    /// format is line oriented.
    pub fn add_value(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string().replace(['\r', '\n'], " ");
        self.values.push((key.to_owned(), value));
    }

    /// Replace the first value with `key`, or append it if absent.
    pub fn set_value(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string().replace(['\r', '\n'], " ");
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key.to_owned(), value)),
        }
    }

    /// First value stored under `key`.
    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a value with `key` exists.
    pub fn has_value(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// Append a child node and return it for filling in.
    // The slot was just pushed, so the index is in bounds.
    #[allow(clippy::indexing_slicing)]
    pub fn add_node(&mut self, name: impl Into<String>) -> &mut Self {
        self.nodes.push(Self::new(name));
        let last = self.nodes.len().saturating_sub(1);
        &mut self.nodes[last]
    }

    /// All children with the given name.
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// First child with the given name.
    pub fn get_node(&self, name: &str) -> Option<&Self> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Parse a required value.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::MissingValue`] if the key is absent and
    /// [`SaveError::InvalidValue`] if it does not parse as `T`.
    pub fn parse_value<T>(&self, key: &'static str) -> Result<T, SaveError>
    where
        T: FromStr,
        T::Err: core::fmt::Display,
    {
        let raw = self.get_value(key).ok_or_else(|| SaveError::MissingValue {
            node: self.name.clone(),
            key,
        })?;
        raw.trim().parse().map_err(|e: T::Err| SaveError::InvalidValue {
            node: self.name.clone(),
            key,
            value: raw.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Parse an optional value, falling back to `default` when the key is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::InvalidValue`] if the value is present but does
    /// not parse as `T`.
    pub fn parse_value_or<T>(&self, key: &'static str, default: T) -> Result<T, SaveError>
    where
        T: FromStr,
        T::Err: core::fmt::Display,
    {
        if self.has_value(key) {
            self.parse_value(key)
        } else {
            Ok(default)
        }
    }

    // -----------------------------------------------------------------------
    // Text codec
    // -----------------------------------------------------------------------

    /// Render the tree in the host's text format.
    ///
    /// A node with an empty name is treated as a document root: only its
    /// contents are written.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.name.is_empty() {
            self.write_contents(&mut out, 0);
        } else {
            self.write_node(&mut out, 0);
        }
        out
    }

    fn write_node(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        let _ = writeln!(out, "{indent}{}", self.name);
        let _ = writeln!(out, "{indent}{{");
        self.write_contents(out, depth.saturating_add(1));
        let _ = writeln!(out, "{indent}}}");
    }

    fn write_contents(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        for (key, value) in &self.values {
            let _ = writeln!(out, "{indent}{key} = {}", escape_value(value));
        }
        for node in &self.nodes {
            node.write_node(out, depth);
        }
    }

    /// Parse a document in the host's text format.
    ///
    /// The returned root node has an empty name and holds the top-level
    /// values and nodes. `//` starts a comment that runs to end of line.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Syntax`] on unbalanced braces, a node name that
    /// is not followed by `{`, or a line that is neither.
    pub fn parse(text: &str) -> Result<Self, SaveError> {
        let mut stack: Vec<Self> = vec![Self::default()];
        let mut pending: Option<(String, usize)> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx.saturating_add(1);
            let line = raw_line
                .split_once("//")
                .map_or(raw_line, |(before, _)| before)
                .trim();
            if line.is_empty() {
                continue;
            }

            if let Some((name, name_line)) = pending.take() {
                if line == "{" {
                    stack.push(Self::new(name));
                    continue;
                }
                return Err(SaveError::Syntax {
                    line: name_line,
                    message: format!("node {name:?} is not followed by '{{'"),
                });
            }

            if line == "}" {
                let done = stack.pop().ok_or_else(|| unbalanced(line_no))?;
                let parent = stack.last_mut().ok_or_else(|| unbalanced(line_no))?;
                parent.nodes.push(done);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let current = stack.last_mut().ok_or_else(|| unbalanced(line_no))?;
                current
                    .values
                    .push((key.trim().to_owned(), unescape_value(value.trim())));
                continue;
            }

            if let Some(name) = line.strip_suffix('{') {
                stack.push(Self::new(name.trim()));
                continue;
            }

            if line.contains(['{', '}']) {
                return Err(SaveError::Syntax {
                    line: line_no,
                    message: format!("unexpected brace in {line:?}"),
                });
            }
            pending = Some((line.to_owned(), line_no));
        }

        if let Some((name, line)) = pending {
            return Err(SaveError::Syntax {
                line,
                message: format!("node {name:?} is not followed by '{{'"),
            });
        }
        if stack.len() != 1 {
            return Err(SaveError::Syntax {
                line: text.lines().count(),
                message: "unexpected end of input: unclosed node".to_owned(),
            });
        }
        stack.pop().ok_or_else(|| unbalanced(0))
    }
}

/// Escape `value` for the text form so that parsing restores it exactly.
fn escape_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let leading = chars.iter().take_while(|c| c.is_whitespace()).count();
    let trailing_start = chars
        .len()
        .saturating_sub(chars.iter().rev().take_while(|c| c.is_whitespace()).count())
        .max(leading);

    let mut out = String::with_capacity(value.len());
    for (i, &c) in chars.iter().enumerate() {
        let at_edge = i < leading || i >= trailing_start;
        let prev = i.checked_sub(1).and_then(|p| chars.get(p));
        let next = chars.get(i.saturating_add(1));
        match c {
            '\\' => out.push_str("\\\\"),
            '/' if prev == Some(&'/') || next == Some(&'/') => out.push_str("\\/"),
            ' ' if at_edge => out.push_str("\\s"),
            '\t' if at_edge => out.push_str("\\t"),
            ws if at_edge && ws.is_whitespace() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(ws));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_value`]. Unknown escapes are kept as written.
fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('u') => {
                let rest = chars.as_str();
                let decoded = rest
                    .strip_prefix('{')
                    .and_then(|r| r.split_once('}'))
                    .and_then(|(hex, tail)| {
                        let ch = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)?;
                        Some((ch, tail))
                    });
                match decoded {
                    Some((ch, tail)) => {
                        out.push(ch);
                        chars = tail.chars();
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn unbalanced(line: usize) -> SaveError {
    SaveError::Syntax {
        line,
        message: "unbalanced '}'".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn sample() -> SaveNode {
        let mut root = SaveNode::default();
        root.add_value("CurPeriodStart", 0);
        let periods = root.add_node("LOGPERIODS");
        let period = periods.add_node("LOGPERIOD");
        period.add_value("StartUT", 0.0);
        period.add_value("EndUT", 2_678_400.0);
        root.add_node("TECHS");
        root
    }

    #[test]
    fn text_round_trip() {
        let root = sample();
        let text = root.to_text();
        let parsed = SaveNode::parse(&text).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn text_layout() {
        let text = sample().to_text();
        assert!(text.starts_with("CurPeriodStart = 0\nLOGPERIODS\n{\n\tLOGPERIOD\n\t{\n"));
        assert!(text.contains("\t\tEndUT = 2678400\n"));
        assert!(text.ends_with("TECHS\n{\n}\n"));
    }

    #[test]
    fn parse_accepts_inline_brace_and_comments() {
        let text = "SCENARIO {\n  name = CareerLog // module\n  TECHS\n  {\n  }\n}\n";
        let root = SaveNode::parse(text).unwrap();
        let scenario = root.get_node("SCENARIO").unwrap();
        assert_eq!(scenario.get_value("name"), Some("CareerLog"));
        assert_eq!(scenario.nodes_named("TECHS").count(), 1);
    }

    #[test]
    fn parse_rejects_unbalanced_input() {
        assert!(matches!(
            SaveNode::parse("A\n{\nx = 1\n"),
            Err(SaveError::Syntax { .. })
        ));
        assert!(matches!(
            SaveNode::parse("}\n"),
            Err(SaveError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            SaveNode::parse("A\nB\n{\n}\n"),
            Err(SaveError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn values_keep_equals_signs_after_the_first() {
        let root = SaveNode::parse("title = a = b\n").unwrap();
        assert_eq!(root.get_value("title"), Some("a = b"));
    }

    #[test]
    fn values_survive_comment_markers_and_edge_whitespace() {
        let titles = [
            "Relay // Phase 2",
            "  Padded ",
            "\tTabbed\t",
            "C:\\saves\\career",
            "a/b ///c",
            "ends with slash/",
            "\\s is not a space",
            "   ",
            "\u{a0}nbsp",
        ];
        let mut root = SaveNode::default();
        for title in titles {
            root.add_value("Title", title);
        }
        let text = root.to_text();
        assert!(!text.contains("//"), "{text}");

        let parsed = SaveNode::parse(&text).unwrap();
        let values: Vec<&str> = parsed.values().iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, titles);
    }

    #[test]
    fn escape_layout() {
        assert_eq!(escape_value("Relay // Phase 2"), "Relay \\/\\/ Phase 2");
        assert_eq!(escape_value(" x y "), "\\sx y\\s");
        assert_eq!(escape_value("a/b"), "a/b");
        assert_eq!(escape_value("\u{a0}x"), "\\u{a0}x");
        assert_eq!(unescape_value("C:\\q"), "C:\\q");
        assert_eq!(unescape_value("\\u{zz}"), "\\u{zz}");
    }

    #[test]
    fn line_breaks_in_values_are_flattened() {
        let mut node = SaveNode::new("LAUNCHEVENT");
        node.add_value("VesselName", "Two\nLines");
        assert_eq!(node.get_value("VesselName"), Some("Two Lines"));
    }

    #[test]
    fn typed_value_access() {
        let mut node = SaveNode::new("LOGPERIOD");
        node.add_value("StartUT", 12.5);
        node.add_value("VABUpgrades", "lots");
        assert_eq!(node.parse_value::<f64>("StartUT").unwrap(), 12.5);
        assert!(matches!(
            node.parse_value::<f64>("EndUT"),
            Err(SaveError::MissingValue { key: "EndUT", .. })
        ));
        assert!(matches!(
            node.parse_value::<i32>("VABUpgrades"),
            Err(SaveError::InvalidValue { .. })
        ));
        assert_eq!(node.parse_value_or("SPHUpgrades", 0_i32).unwrap(), 0);
    }

    #[test]
    fn set_value_replaces_first_match() {
        let mut node = SaveNode::new("SCENARIO");
        node.set_value("NextPeriodStart", 10);
        node.set_value("NextPeriodStart", 20);
        assert_eq!(node.values().len(), 1);
        assert_eq!(node.get_value("NextPeriodStart"), Some("20"));
    }
}
