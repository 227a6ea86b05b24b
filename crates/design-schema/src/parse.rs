//! Tolerant parsing of raw model output
//!
//! Generative models wrap JSON in prose or code fences and, when they hit
//! their token budget, stop mid-document. The parser:
//!
//! 1. Extracts the fenced block, if any.
//! 2. Slices from the first `{` to the last `}` (or to the end of the text
//!    when no closing brace exists).
//! 3. Strictly parses the slice.
//! 4. Otherwise repairs it by cutting back to the last complete value and
//!    closing every open string, array and object.
//!
//! A parsed object must carry `name` or `children` to count as a document.

use serde_json::Value;

use crate::document::DesignDocument;

/// Maximum number of characters of raw output kept for diagnostics
const EXCERPT_CHARS: usize = 200;

/// Errors from turning raw text into a `DesignDocument`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("No JSON object found in response: {excerpt}")]
    NoJsonObject { excerpt: String },

    #[error("Response is not a design document (missing `name` and `children`): {excerpt}")]
    MissingRootFields { excerpt: String },

    #[error("Invalid design JSON ({reason}): {excerpt}")]
    Invalid { reason: String, excerpt: String },
}

impl ParseError {
    /// Short excerpt of the offending text
    pub fn excerpt(&self) -> &str {
        match self {
            ParseError::NoJsonObject { excerpt }
            | ParseError::MissingRootFields { excerpt }
            | ParseError::Invalid { excerpt, .. } => excerpt,
        }
    }
}

/// Parse raw model output into a design document, repairing truncation.
pub fn parse_design_document(raw: &str) -> Result<DesignDocument, ParseError> {
    let content = strip_code_fence(raw.trim());

    let Some(start) = content.find('{') else {
        return Err(ParseError::NoJsonObject {
            excerpt: excerpt(raw),
        });
    };
    let tail = &content[start..];
    let slice = match content.rfind('}') {
        Some(end) if end > start => &content[start..=end],
        _ => tail,
    };

    // Common case: the model finished and the JSON is intact
    let mut last_failure = match parse_candidate(slice) {
        Ok(doc) => return Ok(doc),
        Err(failure) => failure,
    };

    log::debug!(
        "Strict parse failed ({}), attempting truncation repair",
        last_failure
    );

    // A cut-off document may contain inner `}` characters, so the full tail
    // is repaired first and the braces slice is the fallback.
    let mut attempts = vec![tail];
    if tail.len() != slice.len() {
        attempts.push(slice);
    }

    for attempt in attempts {
        for repaired in repair_candidates(attempt) {
            match parse_candidate(&repaired) {
                Ok(doc) => {
                    log::info!(
                        "Recovered truncated design JSON ({} → {} chars)",
                        attempt.len(),
                        repaired.len()
                    );
                    return Ok(doc);
                }
                Err(failure) => last_failure = failure,
            }
        }
    }

    Err(last_failure.into_error(raw))
}

/// Why a candidate string failed
enum CandidateFailure {
    Syntax(String),
    NotADocument,
    Schema(String),
}

impl std::fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateFailure::Syntax(reason) => write!(f, "syntax: {}", reason),
            CandidateFailure::NotADocument => write!(f, "missing name/children"),
            CandidateFailure::Schema(reason) => write!(f, "schema: {}", reason),
        }
    }
}

impl CandidateFailure {
    fn into_error(self, raw: &str) -> ParseError {
        let excerpt = excerpt(raw);
        match self {
            CandidateFailure::NotADocument => ParseError::MissingRootFields { excerpt },
            CandidateFailure::Syntax(reason) | CandidateFailure::Schema(reason) => {
                ParseError::Invalid { reason, excerpt }
            }
        }
    }
}

fn parse_candidate(text: &str) -> Result<DesignDocument, CandidateFailure> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CandidateFailure::Syntax(e.to_string()))?;

    let is_document = value
        .as_object()
        .map(|obj| obj.contains_key("name") || obj.contains_key("children"))
        .unwrap_or(false);
    if !is_document {
        return Err(CandidateFailure::NotADocument);
    }

    serde_json::from_value(value).map_err(|e| CandidateFailure::Schema(e.to_string()))
}

/// Return the content of the first fenced code block, or the input itself.
///
/// Only a line that starts with a fence marker opens or closes a block, and
/// never one sitting inside a JSON string.
fn strip_code_fence(text: &str) -> &str {
    let Some(open) = fence_lines(text).next() else {
        return text;
    };
    let after_marker = &text[open + 3..];
    // Skip the info string (e.g. `json`)
    let body = match after_marker.find('\n') {
        Some(newline) => &after_marker[newline + 1..],
        None => after_marker.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    match fence_lines(body).next() {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Offsets of fence markers that begin a line outside any JSON string
fn fence_lines(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut offset = 0;
    text.split_inclusive('\n')
        .filter_map(move |line| {
            let start = offset;
            offset += line.len();
            let content = line.trim_start();
            content
                .starts_with("```")
                .then_some(start + line.len() - content.len())
        })
        .filter(|&at| !inside_json_string(text, at))
}

/// Whether `at` falls inside a string literal of the JSON starting at the
/// first `{` before it
fn inside_json_string(text: &str, at: usize) -> bool {
    let Some(start) = text[..at].find('{') else {
        return false;
    };
    let mut in_string = false;
    let mut escaped = false;
    for byte in text[start..at].bytes() {
        match byte {
            _ if escaped => escaped = false,
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            _ => {}
        }
    }
    in_string
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut)
}

// ─── TRUNCATION REPAIR ──────────────────────────────────────────────

/// Container on the scanner stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object(ObjectState),
    Array(ArrayState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    /// After `{` or `,`: a key (or `}` right after `{`) is next
    Key,
    /// After the key string
    Colon,
    /// After `:`
    Value,
    /// After a complete member value
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// After `[` or `,`
    Value,
    /// After a complete element
    Next,
}

/// A point where the text can be cut and closed into valid JSON
#[derive(Debug, Clone)]
struct CutPoint {
    /// Byte offset to keep up to (exclusive)
    end: usize,
    /// Text appended before the closers (e.g. a closing quote)
    suffix: &'static str,
    /// Closing characters, innermost first
    closers: String,
}

impl CutPoint {
    fn apply(&self, text: &str) -> String {
        let mut repaired = String::with_capacity(self.end + self.closers.len() + 1);
        repaired.push_str(&text[..self.end]);
        repaired.push_str(self.suffix);
        repaired.push_str(&self.closers);
        repaired
    }
}

struct Scanner {
    stack: Vec<Container>,
    /// Latest cut point, possibly closing a truncated string
    last_cut: Option<CutPoint>,
    /// Latest cut point that needs no closing quote
    last_clean_cut: Option<CutPoint>,
    complete: bool,
}

impl Scanner {
    fn closers(&self) -> String {
        self.stack
            .iter()
            .rev()
            .map(|c| match c {
                Container::Object(_) => '}',
                Container::Array(_) => ']',
            })
            .collect()
    }

    fn mark(&mut self, end: usize, suffix: &'static str) {
        let cut = CutPoint {
            end,
            suffix,
            closers: self.closers(),
        };
        if suffix.is_empty() {
            self.last_clean_cut = Some(cut.clone());
        }
        self.last_cut = Some(cut);
    }

    /// Whether the innermost container currently expects a value
    fn expects_value(&self) -> bool {
        match self.stack.last() {
            Some(Container::Object(ObjectState::Value)) => true,
            Some(Container::Array(ArrayState::Value)) => true,
            None => !self.complete,
            _ => false,
        }
    }

    /// Record that a value just finished at `end`
    fn value_done(&mut self, end: usize) {
        match self.stack.last_mut() {
            Some(Container::Object(state)) => *state = ObjectState::Next,
            Some(Container::Array(state)) => *state = ArrayState::Next,
            None => self.complete = true,
        }
        self.mark(end, "");
    }
}

/// Close a possibly-truncated JSON text so that it parses.
///
/// The text is cut back to the last position where a value was complete
/// (a trailing string value is closed instead of dropped), dangling keys and
/// separators are removed, and every open array/object is closed innermost
/// first. Input that never opens a value is returned unchanged.
pub fn repair_truncated_json(text: &str) -> String {
    repair_candidates(text)
        .into_iter()
        .next()
        .unwrap_or_else(|| text.to_string())
}

/// Repaired variants, best first: a trailing cut-off string value is closed
/// in the first and dropped in the second (it may be a truncated enum value
/// that would fail schema validation).
fn repair_candidates(text: &str) -> Vec<String> {
    let scanner = scan(text);
    let mut candidates = Vec::with_capacity(2);
    if let Some(cut) = &scanner.last_cut {
        candidates.push(cut.apply(text));
    }
    if let Some(clean) = &scanner.last_clean_cut {
        let repaired = clean.apply(text);
        if !candidates.contains(&repaired) {
            candidates.push(repaired);
        }
    }
    candidates
}

fn scan(text: &str) -> Scanner {
    let bytes = text.as_bytes();
    let mut scanner = Scanner {
        stack: Vec::new(),
        last_cut: None,
        last_clean_cut: None,
        complete: false,
    };

    let mut i = 0;
    'scan: while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
            }
            b'{' | b'[' => {
                if !scanner.expects_value() {
                    break 'scan;
                }
                scanner.stack.push(if b == b'{' {
                    Container::Object(ObjectState::Key)
                } else {
                    Container::Array(ArrayState::Value)
                });
                i += 1;
                scanner.mark(i, "");
            }
            b'}' | b']' => {
                let closes = match scanner.stack.last() {
                    Some(Container::Object(ObjectState::Key)) if b == b'}' => {
                        // Only valid directly after `{`
                        previous_significant(bytes, i) == Some(b'{')
                    }
                    Some(Container::Object(ObjectState::Next)) => b == b'}',
                    Some(Container::Array(ArrayState::Next)) => b == b']',
                    Some(Container::Array(ArrayState::Value)) if b == b']' => {
                        previous_significant(bytes, i) == Some(b'[')
                    }
                    _ => false,
                };
                if !closes {
                    break 'scan;
                }
                scanner.stack.pop();
                i += 1;
                scanner.value_done(i);
                if scanner.complete {
                    break 'scan;
                }
            }
            b':' => match scanner.stack.last_mut() {
                Some(Container::Object(state @ ObjectState::Colon)) => {
                    *state = ObjectState::Value;
                    i += 1;
                }
                _ => break 'scan,
            },
            b',' => match scanner.stack.last_mut() {
                Some(Container::Object(state @ ObjectState::Next)) => {
                    *state = ObjectState::Key;
                    i += 1;
                }
                Some(Container::Array(state @ ArrayState::Next)) => {
                    *state = ArrayState::Value;
                    i += 1;
                }
                _ => break 'scan,
            },
            b'"' => {
                let is_key = matches!(
                    scanner.stack.last(),
                    Some(Container::Object(ObjectState::Key))
                );
                if !is_key && !scanner.expects_value() {
                    break 'scan;
                }
                match scan_string(bytes, i + 1) {
                    StringEnd::Closed(end) => {
                        i = end;
                        if is_key {
                            if let Some(Container::Object(state)) = scanner.stack.last_mut() {
                                *state = ObjectState::Colon;
                            }
                        } else {
                            scanner.value_done(i);
                        }
                    }
                    StringEnd::Truncated(keep) => {
                        // A cut-off value string is kept and closed; a
                        // cut-off key is dropped with its member.
                        if !is_key {
                            if let Some(Container::Object(state)) = scanner.stack.last_mut() {
                                *state = ObjectState::Next;
                            } else if let Some(Container::Array(state)) =
                                scanner.stack.last_mut()
                            {
                                *state = ArrayState::Next;
                            }
                            scanner.mark(keep, "\"");
                        }
                        break 'scan;
                    }
                }
            }
            _ => {
                if !scanner.expects_value() {
                    break 'scan;
                }
                let end = scan_scalar(bytes, i);
                let token = &text[i..end];
                if !is_complete_scalar(token) {
                    break 'scan;
                }
                i = end;
                scanner.value_done(i);
            }
        }
    }

    scanner
}

enum StringEnd {
    /// Index just past the closing quote
    Closed(usize),
    /// Input ended inside the string; keep bytes up to this index
    Truncated(usize),
}

/// Scan a string body starting after the opening quote.
fn scan_string(bytes: &[u8], start: usize) -> StringEnd {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return StringEnd::Closed(i + 1),
            b'\\' => {
                let escape_start = i;
                if i + 1 >= bytes.len() {
                    return StringEnd::Truncated(escape_start);
                }
                if bytes[i + 1] == b'u' {
                    let hex_end = i + 6;
                    if hex_end > bytes.len()
                        || !bytes[i + 2..hex_end].iter().all(u8::is_ascii_hexdigit)
                    {
                        return StringEnd::Truncated(escape_start);
                    }
                    i = hex_end;
                } else {
                    i += 2;
                }
            }
            _ => i += 1,
        }
    }
    StringEnd::Truncated(bytes.len())
}

/// End index of a bare scalar token (number or literal)
fn scan_scalar(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b',' | b'}' | b']' | b':' | b'"' | b' ' | b'\t' | b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }
    i
}

fn is_complete_scalar(token: &str) -> bool {
    matches!(token, "true" | "false" | "null")
        || (token.ends_with(|c: char| c.is_ascii_digit()) && token.parse::<f64>().is_ok())
}

fn previous_significant(bytes: &[u8], before: usize) -> Option<u8> {
    bytes[..before]
        .iter()
        .rev()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_parses_plain_json() {
        let doc = parse_design_document(r#"{"name":"Login","children":[]}"#).unwrap();
        assert_eq!(doc.name, "Login");
    }

    #[test]
    fn test_strips_code_fence_and_prose() {
        let raw = "Sure! Here is the design:\n```json\n{\"name\":\"Card\",\"children\":[{\"type\":\"RECTANGLE\"}]}\n```\nEnjoy.";
        let doc = parse_design_document(raw).unwrap();
        assert_eq!(doc.name, "Card");
        assert_eq!(doc.children[0].kind, ElementKind::Rectangle);
    }

    #[test]
    fn test_fence_markers_inside_strings_are_content() {
        let raw = r#"{"name":"Snippet","children":[{"type":"TEXT","characters":"Wrap code in ``` blocks"}]}"#;
        let doc = parse_design_document(raw).unwrap();
        match &doc.children[0].kind {
            ElementKind::Text(text) => assert_eq!(text.characters, "Wrap code in ``` blocks"),
            other => panic!("expected text, got {:?}", other),
        }

        let fenced = "```json\n{\"name\":\"Docs\",\"children\":[{\"type\":\"TEXT\",\"characters\":\"```\"}]}\n```";
        let doc = parse_design_document(fenced).unwrap();
        assert_eq!(doc.name, "Docs");
        match &doc.children[0].kind {
            ElementKind::Text(text) => assert_eq!(text.characters, "```"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_fence_must_start_a_line() {
        assert_eq!(strip_code_fence("a ```b``` c"), "a ```b``` c");
        assert_eq!(strip_code_fence("Intro\n  ```json\n{}\n  ```\nOutro"), "{}");
        // A raw newline inside a string does not turn the marker into a fence
        let multiline = "{\"name\":\"X\",\"note\":\"one\n```\ntwo\"}";
        assert_eq!(strip_code_fence(multiline), multiline);
    }

    #[test]
    fn test_repairs_mid_string_truncation() {
        let raw = r#"{"name":"X","children":[{"type":"TEXT","characters":"Hel"#;
        assert_eq!(
            repair_truncated_json(raw),
            r#"{"name":"X","children":[{"type":"TEXT","characters":"Hel"}]}"#
        );

        let doc = parse_design_document(raw).unwrap();
        assert_eq!(doc.name, "X");
        match &doc.children[0].kind {
            ElementKind::Text(text) => assert_eq!(text.characters, "Hel"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_repair_drops_dangling_key_and_separator() {
        assert_eq!(
            repair_truncated_json(r#"{"name":"X","children":[{"type":"FRAME"},"#),
            r#"{"name":"X","children":[{"type":"FRAME"}]}"#
        );
        assert_eq!(
            repair_truncated_json(r#"{"name":"X","width":"#),
            r#"{"name":"X"}"#
        );
        assert_eq!(
            repair_truncated_json(r#"{"name":"X","wid"#),
            r#"{"name":"X"}"#
        );
    }

    #[test]
    fn test_repair_nested_arrays_close_innermost_first() {
        assert_eq!(
            repair_truncated_json(r#"{"a":[{"b":[1,2"#),
            r#"{"a":[{"b":[1,2]}]}"#
        );
    }

    #[test]
    fn test_repair_drops_partial_literals_and_escapes() {
        assert_eq!(repair_truncated_json(r#"{"name":"X","v":tru"#), r#"{"name":"X"}"#);
        assert_eq!(repair_truncated_json(r#"{"name":"X","n":1."#), r#"{"name":"X"}"#);
        assert_eq!(
            repair_truncated_json(r#"{"name":"a\"#),
            r#"{"name":"a"}"#
        );
        assert_eq!(
            repair_truncated_json(r#"{"name":"a\u00"#),
            r#"{"name":"a"}"#
        );
    }

    #[test]
    fn test_truncated_after_inner_brace_uses_full_tail() {
        let raw = r#"{"name":"X","children":[{"type":"FRAME","children":[]},{"type":"TEXT","characters":"Bye"#;
        let doc = parse_design_document(raw).unwrap();
        assert_eq!(doc.children.len(), 2);
    }

    #[test]
    fn test_truncated_enum_value_is_dropped() {
        let raw = r#"{"name":"X","children":[],"layoutMode":"HORIZ"#;
        let doc = parse_design_document(raw).unwrap();
        assert_eq!(doc.name, "X");
        assert_eq!(doc.layout.layout_mode, None);
    }

    #[test]
    fn test_object_without_root_fields_is_rejected() {
        let err = parse_design_document(r#"{"type":"FRAME","width":100}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingRootFields { .. }));
    }

    #[test]
    fn test_no_json_is_rejected() {
        let err = parse_design_document("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonObject { .. }));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let raw = format!("{{\"foo\": \"{}\"}}", "x".repeat(5000));
        let err = parse_design_document(&raw).unwrap_err();
        assert!(err.excerpt().chars().count() <= EXCERPT_CHARS + 1);
    }

    #[test]
    fn test_every_prefix_parses_or_errors() {
        let full = r#"{"name":"Card","layoutMode":"VERTICAL","itemSpacing":12,"children":[{"type":"TEXT","characters":"Title \"quoted\" é","fontSize":20},{"type":"RECTANGLE","width":40,"height":40,"fills":[{"type":"SOLID","color":{"r":0.2,"g":0.4,"b":1}}]},{"type":"FRAME","children":[{"type":"ELLIPSE"}]}]}"#;
        let original = parse_design_document(full).unwrap();

        for k in 1..full.len() {
            if !full.is_char_boundary(k) {
                continue;
            }
            match parse_design_document(&full[..k]) {
                Ok(doc) => {
                    // Whatever survived must be a prefix of the original tree
                    assert!(doc.children.len() <= original.children.len(), "prefix {}", k);
                    assert!(original.name.starts_with(&doc.name), "prefix {}", k);
                }
                Err(err) => {
                    assert!(!err.to_string().is_empty());
                }
            }
        }
    }
}
