//! Typed-placeholder templating over literal SQL strings.
//!
//! A template is plain statement text containing zero or more two-character
//! markers, each a `?` followed by a kind letter:
//!
//! * `?s` string: any scalar, stringified, escaped and single-quoted;
//!   `NULL` for a null argument
//! * `?i` integer: a native number or a plain decimal string, truncated
//!   at the decimal point; digit content is preserved textually so values
//!   wider than a machine integer pass through unchanged
//! * `?n` identifier: stringified, backticks doubled, wrapped in backticks
//! * `?a` array: a non-empty list, each element rendered per `?s` and
//!   joined with `, ` (for `IN (...)`)
//! * `?u` map: a non-empty column-to-value map rendered as
//!   `` `col`=value `` pairs joined with `, ` (for `SET ...`)
//! * `?p` raw part: a scalar spliced verbatim, trusted by the caller
//!
//! Markers are positional: the Nth marker in scan order consumes the Nth
//! argument, exactly once. There is no escape for literal marker text; any
//! occurrence of the two-character pattern is a marker. A caller that needs
//! the literal text `?s` in a statement produces it through `?p`.
//!
//! Rendering is pure and synchronous: one left-to-right pass over the
//! template, bounded by its length, with no state kept across calls.

use std::fmt::Write;
use std::ops::Range;

use crate::error::ParseError;
use crate::escape::Escaper;
use crate::value::Value;

/// The placeholder kinds, named by their marker letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `?s`
    Str,
    /// `?i`
    Int,
    /// `?n`
    Ident,
    /// `?a`
    List,
    /// `?u`
    Map,
    /// `?p`
    Raw,
}

impl MarkerKind {
    fn from_letter(letter: u8) -> Option<Self> {
        Some(match letter {
            b's' => MarkerKind::Str,
            b'i' => MarkerKind::Int,
            b'n' => MarkerKind::Ident,
            b'a' => MarkerKind::List,
            b'u' => MarkerKind::Map,
            b'p' => MarkerKind::Raw,

            _ => return None,
        })
    }

    /// The two-character marker text, e.g. `?s`.
    pub fn token(self) -> &'static str {
        match self {
            MarkerKind::Str => "?s",
            MarkerKind::Int => "?i",
            MarkerKind::Ident => "?n",
            MarkerKind::List => "?a",
            MarkerKind::Map => "?u",
            MarkerKind::Raw => "?p",
        }
    }
}

/// A single marker found in a template by [`parse_template()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The byte range in the source template covering the two-character
    /// marker text.
    pub token: Range<usize>,
    /// The placeholder kind.
    pub kind: MarkerKind,
}

/// A template scanned for markers with [`parse_template()`].
pub struct ParsedTemplate<'a> {
    template: &'a str,
    markers: Vec<Marker>,
}

/// Scans `template` for the six placeholder markers.
///
/// Scanning cannot fail: a `?` not followed by a kind letter is ordinary
/// text. The scan is byte-wise; both marker characters are ASCII so it can
/// never land inside a multi-byte sequence.
pub fn parse_template(template: &str) -> ParsedTemplate<'_> {
    let bytes = template.as_bytes();
    let mut markers = Vec::new();
    let mut pos = 0;

    while let Some(found) = memchr::memchr(b'?', &bytes[pos..]) {
        let at = pos + found;

        match bytes.get(at + 1).copied().and_then(MarkerKind::from_letter) {
            Some(kind) => {
                markers.push(Marker {
                    token: at..at + 2,
                    kind,
                });
                pos = at + 2;
            }

            None => {
                pos = at + 1;
            }
        }
    }

    ParsedTemplate { template, markers }
}

/// Scans `template` and renders it against `args` in one call.
///
/// This is the crate's core operation: the output is a fully literal
/// statement, ready for direct execution.
pub fn render(template: &str, args: &[Value], escaper: &dyn Escaper) -> Result<String, ParseError> {
    parse_template(template).render(args, escaper)
}

impl<'a> ParsedTemplate<'a> {
    /// The markers found in the template, in scan order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Renders the template against `args`, matching markers to arguments
    /// strictly in order.
    ///
    /// Arity is validated before any conversion, and the first argument that
    /// fails its kind's rule aborts the call; an `Err` never carries partial
    /// output.
    pub fn render(&self, args: &[Value], escaper: &dyn Escaper) -> Result<String, ParseError> {
        if self.markers.len() != args.len() {
            return Err(ParseError::ArityMismatch {
                markers: self.markers.len(),
                arguments: args.len(),
            });
        }

        if self.markers.is_empty() {
            return Ok(self.template.to_owned());
        }

        let mut out = String::with_capacity(self.template.len() + args.len() * 8);

        // copy `this .. template.len()` to the end of `out` after processing
        // the markers
        let mut last_marker_end = 0;

        for (index, (marker, arg)) in self.markers.iter().zip(args).enumerate() {
            // push the chunk of the template between the last marker and this one
            out.push_str(&self.template[last_marker_end..marker.token.start]);
            last_marker_end = marker.token.end;

            render_marker(index, marker.kind, arg, escaper, &mut out)?;
        }

        out.push_str(&self.template[last_marker_end..]);

        Ok(out)
    }
}

fn render_marker(
    index: usize,
    kind: MarkerKind,
    value: &Value,
    escaper: &dyn Escaper,
    out: &mut String,
) -> Result<(), ParseError> {
    match kind {
        MarkerKind::Str => quoted(index, kind, value, escaper, out),
        MarkerKind::Int => integer(index, value, out),
        MarkerKind::Ident => identifier(index, kind, value, out),
        MarkerKind::List => list(index, value, escaper, out),
        MarkerKind::Map => map(index, value, escaper, out),
        MarkerKind::Raw => raw(index, value, out),
    }
}

/// Appends the loose string form of a scalar. Callers have already rejected
/// `Null` and the container variants.
fn push_scalar(value: &Value, out: &mut String) {
    match value {
        Value::Bool(true) => out.push('1'),
        Value::Bool(false) => {}
        Value::Int(v) => out.push_str(itoa::Buffer::new().format(*v)),
        Value::UInt(v) => out.push_str(itoa::Buffer::new().format(*v)),
        Value::Float(v) => write!(out, "{}", v).expect("write!() to a string is infallible"),
        Value::Text(v) => out.push_str(v),

        Value::Null | Value::List(_) | Value::Map(_) => unreachable!(),
    }
}

// `?s`: any scalar, escaped and quoted; NULL stays unquoted. `marker` names
// the outer marker when invoked for `?a` elements and `?u` values.
fn quoted(
    index: usize,
    marker: MarkerKind,
    value: &Value,
    escaper: &dyn Escaper,
    out: &mut String,
) -> Result<(), ParseError> {
    match value {
        Value::Null => out.push_str("NULL"),

        Value::List(_) | Value::Map(_) => {
            return Err(ParseError::TypeMismatch {
                index,
                marker: marker.token(),
                expected: "a scalar or NULL",
                actual: value.type_name(),
            });
        }

        Value::Text(text) => {
            out.push('\'');
            escaper.escape_into(text, out);
            out.push('\'');
        }

        scalar => {
            out.push('\'');
            push_scalar(scalar, out);
            out.push('\'');
        }
    }

    Ok(())
}

// `?i`: NULL, a native number, or a plain decimal string. Validation is
// textual: the supplied form is checked, never a reparsed numeric value, so
// digit sequences wider than a machine integer survive unchanged and
// `0x`/`0b`/exponent/whitespace forms fail even though a numeric parse might
// accept them.
fn integer(index: usize, value: &Value, out: &mut String) -> Result<(), ParseError> {
    match value {
        Value::Null => out.push_str("NULL"),

        Value::Int(v) => out.push_str(itoa::Buffer::new().format(*v)),
        Value::UInt(v) => out.push_str(itoa::Buffer::new().format(*v)),

        Value::Float(v) => {
            if !v.is_finite() {
                return Err(ParseError::MalformedNumber {
                    index,
                    text: v.to_string(),
                });
            }

            // `Display` for floats is plain decimal, never exponent
            // notation, so truncating at the dot truncates toward zero and
            // keeps the sign.
            let text = v.to_string();
            let end = text.find('.').unwrap_or(text.len());
            out.push_str(&text[..end]);
        }

        Value::Text(text) => {
            let integral = check_decimal(text).ok_or_else(|| ParseError::MalformedNumber {
                index,
                text: text.clone(),
            })?;

            out.push_str(integral);
        }

        other => {
            return Err(ParseError::TypeMismatch {
                index,
                marker: MarkerKind::Int.token(),
                expected: "NULL, a number, or a plain decimal string",
                actual: other.type_name(),
            });
        }
    }

    Ok(())
}

/// Validates `^-?[0-9]+(\.[0-9]+)?$` and returns the integral part,
/// sign included.
fn check_decimal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));

    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }

    if i == digits_start {
        return None;
    }

    let integral_end = i;

    if i < bytes.len() {
        if bytes[i] != b'.' {
            return None;
        }

        i += 1;

        let fraction_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }

        if i == fraction_start || i != bytes.len() {
            return None;
        }
    }

    Some(&text[..integral_end])
}

// `?n` and `?u` keys: a non-null scalar in its string form.
fn identifier(
    index: usize,
    marker: MarkerKind,
    value: &Value,
    out: &mut String,
) -> Result<(), ParseError> {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => Err(ParseError::TypeMismatch {
            index,
            marker: marker.token(),
            expected: "a non-NULL scalar identifier",
            actual: value.type_name(),
        }),

        Value::Text(text) => push_identifier(index, marker, text, out),

        scalar => {
            let mut text = String::new();
            push_scalar(scalar, &mut text);
            push_identifier(index, marker, &text, out)
        }
    }
}

fn push_identifier(
    index: usize,
    marker: MarkerKind,
    name: &str,
    out: &mut String,
) -> Result<(), ParseError> {
    if name.is_empty() {
        return Err(ParseError::InvalidIdentifier {
            index,
            marker: marker.token(),
            reason: "name is empty".into(),
        });
    }

    // printable range only: no NUL, nothing beyond the basic plane
    if name.chars().any(|ch| !(0x0001..=0xFFFF).contains(&(ch as u32))) {
        return Err(ParseError::InvalidIdentifier {
            index,
            marker: marker.token(),
            reason: format!("name {:?} contains characters outside U+0001..=U+FFFF", name),
        });
    }

    out.push('`');

    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }

    out.push('`');

    Ok(())
}

// `?a`: a non-empty list, each element per the `?s` rule, comma-space joined.
fn list(
    index: usize,
    value: &Value,
    escaper: &dyn Escaper,
    out: &mut String,
) -> Result<(), ParseError> {
    let items = match value {
        Value::List(items) => items,

        other => {
            return Err(ParseError::TypeMismatch {
                index,
                marker: MarkerKind::List.token(),
                expected: "a non-empty list of scalars",
                actual: other.type_name(),
            });
        }
    };

    if items.is_empty() {
        return Err(ParseError::EmptyContainer {
            index,
            marker: MarkerKind::List.token(),
        });
    }

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }

        quoted(index, MarkerKind::List, item, escaper, out)?;
    }

    Ok(())
}

// `?u`: a non-empty map rendered as `` `key`=value `` pairs, comma-space
// joined; keys per the identifier rule, values per the `?s` rule.
fn map(
    index: usize,
    value: &Value,
    escaper: &dyn Escaper,
    out: &mut String,
) -> Result<(), ParseError> {
    let pairs = match value {
        Value::Map(pairs) => pairs,

        other => {
            return Err(ParseError::TypeMismatch {
                index,
                marker: MarkerKind::Map.token(),
                expected: "a non-empty map of scalars",
                actual: other.type_name(),
            });
        }
    };

    if pairs.is_empty() {
        return Err(ParseError::EmptyContainer {
            index,
            marker: MarkerKind::Map.token(),
        });
    }

    for (i, (key, val)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }

        push_identifier(index, MarkerKind::Map, key, out)?;
        out.push('=');
        quoted(index, MarkerKind::Map, val, escaper, out)?;
    }

    Ok(())
}

// `?p`: caller-trusted raw splice. The exercised three-way split is load
// bearing: an empty string or `false` renders as an empty fragment, while
// NULL and containers are rejected.
fn raw(index: usize, value: &Value, out: &mut String) -> Result<(), ParseError> {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => Err(ParseError::TypeMismatch {
            index,
            marker: MarkerKind::Raw.token(),
            expected: "a scalar",
            actual: value.type_name(),
        }),

        scalar => {
            push_scalar(scalar, out);
            Ok(())
        }
    }
}

#[test]
fn test_scan_markers() {
    let parsed = parse_template("SELECT * FROM ?n WHERE id IN (?a) AND flags = ?i -- ?x ? ?");

    assert_eq!(
        parsed.markers(),
        [
            Marker {
                token: 14..16,
                kind: MarkerKind::Ident
            },
            Marker {
                token: 30..32,
                kind: MarkerKind::List
            },
            Marker {
                token: 46..48,
                kind: MarkerKind::Int
            },
        ]
    );
}

#[test]
fn test_scan_has_no_escape_mechanism() {
    // marker text inside a quoted literal is still a marker
    let parsed = parse_template("SELECT '?s' FROM t");

    assert_eq!(parsed.markers().len(), 1);

    // a trailing `?` is ordinary text
    assert!(parse_template("SELECT 1 ?").markers().is_empty());
}

#[test]
fn test_check_decimal() {
    assert_eq!(check_decimal("42"), Some("42"));
    assert_eq!(check_decimal("-42"), Some("-42"));
    assert_eq!(check_decimal("3.999"), Some("3"));
    assert_eq!(check_decimal("-3.999"), Some("-3"));
    assert_eq!(check_decimal("007"), Some("007"));

    assert_eq!(check_decimal(""), None);
    assert_eq!(check_decimal("-"), None);
    assert_eq!(check_decimal("3."), None);
    assert_eq!(check_decimal(".5"), None);
    assert_eq!(check_decimal("+5"), None);
    assert_eq!(check_decimal(" 5"), None);
    assert_eq!(check_decimal("5 "), None);
    assert_eq!(check_decimal("0x1A"), None);
    assert_eq!(check_decimal("0b101"), None);
    assert_eq!(check_decimal("1e3"), None);
    assert_eq!(check_decimal("1.2.3"), None);
}
