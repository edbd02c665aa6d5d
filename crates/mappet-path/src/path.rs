//! Path types and parsing

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Largest array index a path may address. Writing through an index pads the
/// array up to it, so larger indices are rejected instead of allocated.
pub const MAX_INDEX: usize = (1 << 24) - 1;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object key (e.g. `card` in `card.number`)
    Key(String),

    /// Array index (e.g. `1` in `items[1]`)
    Index(usize),
}

/// A parsed location inside a value tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,

    /// Original text of a multi-segment string path, tried as a single
    /// top-level key when segment traversal finds nothing.
    literal: Option<String>,
}

impl Segment {
    /// Array index addressed by this segment, if any.
    ///
    /// Keys count as indices only in canonical decimal form, so `"0"` and
    /// `"12"` do but `"01"` and `"+1"` do not. Nothing above [`MAX_INDEX`]
    /// counts as an index.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index).filter(|index| *index <= MAX_INDEX),
            Segment::Key(key) => canonical_index(key),
        }
    }

    /// Object key addressed by this segment.
    #[must_use]
    pub fn to_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl Path {
    /// The empty path, addressing the root value itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from explicit segments.
    ///
    /// No splitting happens here: `Segment::Key("a.b")` addresses the single
    /// key `a.b`.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            literal: None,
        }
    }

    /// Parse dot/bracket notation.
    ///
    /// # Errors
    ///
    /// Returns an error for empty paths, empty segments (`a..b`, `a.`),
    /// unmatched brackets, empty brackets, and unterminated quoted keys.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::invalid_path(input, "path is empty"));
        }

        let chars: Vec<char> = input.chars().collect();
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut after_dot = false;
        let mut pos = 0;

        while pos < chars.len() {
            match chars[pos] {
                '.' => {
                    if current.is_empty() && (segments.is_empty() || after_dot) {
                        return Err(Error::invalid_path(
                            input,
                            format!("empty segment at offset {pos}"),
                        ));
                    }
                    if !current.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut current)));
                    }
                    after_dot = true;
                    pos += 1;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut current)));
                    } else if after_dot {
                        return Err(Error::invalid_path(
                            input,
                            format!("empty segment before '[' at offset {pos}"),
                        ));
                    }
                    let (segment, next) = parse_bracket(input, &chars, pos)?;
                    segments.push(segment);
                    after_dot = false;
                    pos = next;
                    match chars.get(pos) {
                        None | Some('.' | '[') => {}
                        Some(c) => {
                            return Err(Error::invalid_path(
                                input,
                                format!("unexpected '{c}' after ']' at offset {pos}"),
                            ));
                        }
                    }
                }
                ']' => {
                    return Err(Error::invalid_path(
                        input,
                        format!("unmatched ']' at offset {pos}"),
                    ));
                }
                c => {
                    current.push(c);
                    after_dot = false;
                    pos += 1;
                }
            }
        }

        if after_dot {
            return Err(Error::invalid_path(input, "path ends with '.'"));
        }
        if !current.is_empty() {
            segments.push(Segment::Key(current));
        }

        let literal = (segments.len() > 1).then(|| input.to_string());
        Ok(Self { segments, literal })
    }

    /// Segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Literal top-level key tried when segment traversal misses.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Check that every explicit index is within [`MAX_INDEX`].
    ///
    /// Parsed paths always pass; this matters for paths built from segments.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first oversized index.
    pub fn validate(&self) -> Result<()> {
        match self.segments.iter().find_map(|segment| match segment {
            Segment::Index(index) if *index > MAX_INDEX => Some(*index),
            _ => None,
        }) {
            Some(index) => Err(Error::invalid_path(
                self.to_string(),
                format!("index {index} exceeds maximum {MAX_INDEX}"),
            )),
            None => Ok(()),
        }
    }

    /// Whether this path addresses the root value.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the path by one segment.
    #[must_use]
    pub fn child(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self.literal = None;
        self
    }
}

/// Parse a bracket group starting at `open`, returning the segment and the
/// offset just past the closing `]`.
fn parse_bracket(input: &str, chars: &[char], open: usize) -> Result<(Segment, usize)> {
    let mut pos = open + 1;

    if let Some(&quote) = chars.get(pos).filter(|c| **c == '"' || **c == '\'') {
        let mut key = String::new();
        pos += 1;
        loop {
            match chars.get(pos) {
                None => {
                    return Err(Error::invalid_path(
                        input,
                        format!("unterminated quoted key starting at offset {open}"),
                    ));
                }
                Some('\\') => {
                    let escaped = chars.get(pos + 1).ok_or_else(|| {
                        Error::invalid_path(input, "dangling escape in quoted key")
                    })?;
                    key.push(*escaped);
                    pos += 2;
                }
                Some(&c) if c == quote => {
                    pos += 1;
                    break;
                }
                Some(&c) => {
                    key.push(c);
                    pos += 1;
                }
            }
        }
        return match chars.get(pos) {
            Some(']') => Ok((Segment::Key(key), pos + 1)),
            _ => Err(Error::invalid_path(
                input,
                format!("expected ']' after quoted key at offset {pos}"),
            )),
        };
    }

    let close = chars[pos..]
        .iter()
        .position(|c| *c == ']')
        .map(|offset| pos + offset)
        .ok_or_else(|| {
            Error::invalid_path(input, format!("unterminated '[' at offset {open}"))
        })?;
    let content: String = chars[pos..close].iter().collect();
    if content.is_empty() {
        return Err(Error::invalid_path(
            input,
            format!("empty brackets at offset {open}"),
        ));
    }

    let segment = match canonical_index(&content) {
        Some(index) => Segment::Index(index),
        None if is_canonical_number(&content) => {
            return Err(Error::invalid_path(
                input,
                format!("index {content} exceeds maximum {MAX_INDEX}"),
            ));
        }
        None => Segment::Key(content),
    };
    Ok((segment, close + 1))
}

fn is_canonical_number(text: &str) -> bool {
    let digits_only = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
    digits_only && !(text.len() > 1 && text.starts_with('0'))
}

fn canonical_index(text: &str) -> Option<usize> {
    if !is_canonical_number(text) {
        return None;
    }
    text.parse().ok().filter(|index| *index <= MAX_INDEX)
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty()
        || key
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"' | '\''))
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) if needs_quoting(key) => {
                    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[\"{escaped}\"]")?;
                }
                Segment::Key(key) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self::from_segments(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(path: &Path) -> Vec<String> {
        path.segments().iter().map(Segment::to_key).collect()
    }

    #[test]
    fn test_parse_dotted_path() {
        let path = Path::parse("card.number").unwrap();
        assert_eq!(
            path.segments(),
            &[Segment::from("card"), Segment::from("number")]
        );
        assert_eq!(path.literal(), Some("card.number"));
    }

    #[test]
    fn test_parse_single_key_has_no_literal() {
        let path = Path::parse("first_name").unwrap();
        assert_eq!(path.len(), 1);
        assert!(path.literal().is_none());
    }

    #[test]
    fn test_parse_bracket_indices() {
        let path = Path::parse("a.b[1].c").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::from("a"),
                Segment::from("b"),
                Segment::Index(1),
                Segment::from("c"),
            ]
        );

        let nested = Path::parse("matrix[0][2]").unwrap();
        assert_eq!(
            nested.segments(),
            &[Segment::from("matrix"), Segment::Index(0), Segment::Index(2)]
        );

        let leading = Path::parse("[3].name").unwrap();
        assert_eq!(leading.segments()[0], Segment::Index(3));
    }

    #[test]
    fn test_parse_quoted_keys() {
        let path = Path::parse(r#"meta["a.b"].value"#).unwrap();
        assert_eq!(keys(&path), vec!["meta", "a.b", "value"]);

        let single = Path::parse("meta['x[0]']").unwrap();
        assert_eq!(keys(&single), vec!["meta", "x[0]"]);

        let escaped = Path::parse(r#"meta["say \"hi\""]"#).unwrap();
        assert_eq!(keys(&escaped), vec!["meta", "say \"hi\""]);
    }

    #[test]
    fn test_non_canonical_bracket_is_key() {
        let path = Path::parse("codes[01]").unwrap();
        assert_eq!(path.segments()[1], Segment::from("01"));

        let named = Path::parse("items[last]").unwrap();
        assert_eq!(named.segments()[1], Segment::from("last"));
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", ".a", "a.", "a..b", "a[0", "a[]", "a]", "a.[0]", "a[0]b", "a[\"b]"] {
            let result = Path::parse(input);
            assert!(
                matches!(result, Err(Error::InvalidPath { .. })),
                "expected '{input}' to be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for input in ["a.b[1].c", "[0].x", r#"meta["a.b"]"#, "plain"] {
            let path = Path::parse(input).unwrap();
            let rendered = path.to_string();
            assert_eq!(Path::parse(&rendered).unwrap().segments(), path.segments());
        }
        assert_eq!(Path::parse("a.b[1].c").unwrap().to_string(), "a.b[1].c");
    }

    #[test]
    fn test_from_segments_does_not_split() {
        let path = Path::from_segments(["a.b"]);
        assert_eq!(path.len(), 1);
        assert_eq!(path.to_string(), r#"["a.b"]"#);
        assert!(path.literal().is_none());
    }

    #[test]
    fn test_child_builder() {
        let path = Path::root().child("users").child(2usize).child("email");
        assert_eq!(path.to_string(), "users[2].email");
        assert!(Path::root().is_root());
    }

    #[test]
    fn test_segment_index_detection() {
        assert_eq!(Segment::from("0").as_index(), Some(0));
        assert_eq!(Segment::from("42").as_index(), Some(42));
        assert_eq!(Segment::from("042").as_index(), None);
        assert_eq!(Segment::from("x").as_index(), None);
        assert_eq!(Segment::Index(7).to_key(), "7");
        assert_eq!(Segment::Index(MAX_INDEX + 1).as_index(), None);
        assert_eq!(Segment::from("99999999999").as_index(), None);
    }

    #[test]
    fn test_oversized_bracket_index_rejected() {
        for input in ["a[18446744073709551615]", "a[99999999999999999999]", "a[16777216]"] {
            let err = Path::parse(input).unwrap_err();
            assert!(err.to_string().contains("exceeds maximum"), "{input}: {err}");
        }
        let largest = format!("a[{MAX_INDEX}]");
        assert_eq!(Path::parse(&largest).unwrap().segments()[1], Segment::Index(MAX_INDEX));
    }

    #[test]
    fn test_validate_explicit_indices() {
        assert!(Path::from_segments([Segment::Index(MAX_INDEX)]).validate().is_ok());
        let oversized = Path::from_segments([Segment::from("a"), Segment::Index(usize::MAX)]);
        assert!(matches!(oversized.validate(), Err(Error::InvalidPath { .. })));
    }
}
