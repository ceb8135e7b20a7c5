//! Line-oriented parser for INI text.
//!
//! Parsing happens in three passes over the source:
//! 1. comment and blank lines are dropped,
//! 2. everything before the first `[section]` header becomes the top-level block,
//! 3. each header collects the lines up to the next header; repeated sections
//!    merge into one object, later keys overwriting earlier ones.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::diagnostic::{Malformation, ParseError, ParseErrorKind};
use crate::{Document, Number, Object, Span, Value};

/// A line of source that survived comment stripping, trimmed of surrounding whitespace.
#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    text: &'src str,
    /// 1-based line number in the original source.
    number: usize,
    span: Span,
}

impl Line<'_> {
    fn is_section_header(&self) -> bool {
        self.text.starts_with('[')
    }

    fn malformed(&self, problem: Malformation) -> ParseError {
        ParseError::new(
            ParseErrorKind::MalformedData {
                fragment: self.text.to_owned(),
                problem,
            },
            self.span,
            self.number,
        )
    }
}

/// Parser for INI documents.
pub struct Parser<'src> {
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Parse the whole source into a [`Document`].
    ///
    /// Stops at the first malformed line; no partial document is returned.
    pub fn parse(self) -> Result<Document, ParseError> {
        let lines = self.significant_lines()?;
        let mut document = Document::default();
        if lines.is_empty() {
            return Ok(document);
        }

        let split = lines
            .iter()
            .position(Line::is_section_header)
            .unwrap_or(lines.len());
        let (top_level, mut rest) = lines.split_at(split);
        parse_block(top_level, &mut document.top_level)?;

        while let Some((header, tail)) = rest.split_first() {
            let name = section_name(header)?;
            let end = tail
                .iter()
                .position(Line::is_section_header)
                .unwrap_or(tail.len());
            let (body, next) = tail.split_at(end);
            trace!(section = name, lines = body.len(), "section body");
            let section = document.sections.entry(name.to_owned()).or_default();
            parse_block(body, section)?;
            rest = next;
        }

        debug!(
            top_level_keys = document.top_level.len(),
            sections = document.sections.len(),
            "parsed INI document"
        );
        Ok(document)
    }

    /// Split the source into lines, dropping blank and comment lines.
    fn significant_lines(&self) -> Result<Vec<Line<'src>>, ParseError> {
        let mut lines = Vec::new();
        let mut offset = 0;

        for (index, raw) in self.source.split_inclusive('\n').enumerate() {
            let content = raw.strip_suffix('\n').unwrap_or(raw);
            let content = content.strip_suffix('\r').unwrap_or(content);
            let leading = content.len() - content.trim_start().len();
            let start = offset + leading;
            let span = Span::new(start, start + content.trim().len());
            offset += raw.len();

            let text = span.slice(self.source).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::InternalParsingError {
                        cause: format!("line span {}..{} is outside the source", span.start, span.end),
                    },
                    Span::new(0, 0),
                    index + 1,
                )
            })?;

            if text.is_empty() || text.starts_with([';', '#']) {
                continue;
            }
            lines.push(Line {
                text,
                number: index + 1,
                span,
            });
        }

        Ok(lines)
    }
}

/// Extract `name` from a `[name]` header line.
fn section_name<'src>(line: &Line<'src>) -> Result<&'src str, ParseError> {
    line.text
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .filter(|name| !name.is_empty() && !name.contains(']'))
        .ok_or_else(|| line.malformed(Malformation::InvalidSectionHeader))
}

/// Parse `key=value` lines into `object`. Later keys overwrite earlier ones.
fn parse_block(lines: &[Line<'_>], object: &mut Object) -> Result<(), ParseError> {
    for line in lines {
        let (key, raw) = line
            .text
            .split_once('=')
            .ok_or_else(|| line.malformed(Malformation::MissingSeparator))?;
        let key = key.trim();
        let value = parse_literal(raw.trim());
        trace!(line = line.number, key, kind = value.kind_description(), "entry");
        object.insert(key, value);
    }
    Ok(())
}

/// Parse a single value literal.
///
/// Tried in order: empty (`Null`), `"quoted"`, `[array]`, boolean, number,
/// and finally the text itself as a string.
pub fn parse_literal(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    if enclosed(text, '"', '"').is_some() {
        return Value::String(unquote(text));
    }
    if let Some(inner) = enclosed(text, '[', ']') {
        return Value::Array(parse_array(inner));
    }
    if let Some(b) = parse_bool(text) {
        return Value::Bool(b);
    }
    if let Some(n) = parse_number(text) {
        return Value::Number(n);
    }
    Value::String(text.to_owned())
}

fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    text.strip_prefix(open)?.strip_suffix(close)
}

/// Strip every surrounding `"`. Content ending in `\` had its closing quote
/// escaped; put one back.
fn unquote(quoted: &str) -> String {
    let inner = quoted.trim_matches('"');
    if inner.ends_with('\\') {
        format!("{inner}\"")
    } else {
        inner.to_owned()
    }
}

/// Elements are split on every comma; brackets inside elements are not tracked.
fn parse_array(inner: &str) -> Vec<Value> {
    inner
        .split(',')
        .filter(|piece| !piece.is_empty())
        .map(|piece| parse_literal(piece.trim()))
        .collect()
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a number with a fixed grammar: `[+-]? (digits [. digits*] | . digits) ([eE] [+-]? digits)?`.
fn parse_number(text: &str) -> Option<Number> {
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (mantissa, None),
    };

    if !is_digits(int_part) || !frac_part.is_none_or(is_digits) {
        return None;
    }
    if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
        return None;
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !is_digits(digits) {
            return None;
        }
    }

    let literal = text.strip_prefix('+').unwrap_or(text);
    if frac_part.is_none() && exponent.is_none() {
        if let Ok(n) = literal.parse::<i64>() {
            return Some(Number::Int(n));
        }
        if let Ok(n) = literal.parse::<u64>() {
            return Some(Number::UInt(n));
        }
    }

    let approx: f64 = literal.parse().ok()?;
    if exponent.is_none()
        && frac_part.is_some()
        && let Ok(exact) = Decimal::from_str_exact(literal)
    {
        return Some(Number::Decimal { exact, approx });
    }
    Some(Number::Float(approx))
}
