//! Diagnostic rendering for parser errors.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::Span;

/// A parser error with source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (line {line})")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location of the offending line.
    pub span: Span,
    /// 1-based line number.
    pub line: usize,
}

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A line or group violates the grammar.
    #[error("Malformed data around '{fragment}'")]
    MalformedData {
        /// The offending text.
        fragment: String,
        /// What is wrong with it.
        problem: Malformation,
    },
    /// The parser itself failed.
    #[error("Internal parsing error: {cause}")]
    InternalParsingError {
        /// Description of the underlying failure.
        cause: String,
    },
}

/// The grammar rule a malformed line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
    /// A key/value line without `=`.
    MissingSeparator,
    /// A line starting with `[` that is not `[name]`.
    InvalidSectionHeader,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, line: usize) -> Self {
        Self { kind, span, line }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span.into();

        match &self.kind {
            ParseErrorKind::MalformedData {
                problem: Malformation::MissingSeparator,
                ..
            } => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("malformed entry on line {}", self.line))
                .with_label(
                    Label::new((filename, range))
                        .with_message("missing '='")
                        .with_color(Color::Red),
                )
                .with_help("entries must have the form key=value"),

            ParseErrorKind::MalformedData {
                problem: Malformation::InvalidSectionHeader,
                ..
            } => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("invalid section header on line {}", self.line))
                .with_label(
                    Label::new((filename, range))
                        .with_message("not a section header")
                        .with_color(Color::Red),
                )
                .with_help("section headers must have the form [name] on a line of their own"),

            ParseErrorKind::InternalParsingError { cause } => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("internal parsing error")
                    .with_label(
                        Label::new((filename, range))
                            .with_message(cause)
                            .with_color(Color::Red),
                    )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_stripped(source: &str) -> String {
        let err = crate::parse(source).unwrap_err();
        let rendered = err.render("test.ini", source);
        String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
    }

    #[test]
    fn test_missing_separator_diagnostic() {
        let rendered = render_stripped("name=\"Alice\"\nage 30\n");
        assert!(rendered.contains("malformed entry on line 2"), "{rendered}");
        assert!(rendered.contains("missing '='"), "{rendered}");
        assert!(rendered.contains("test.ini"), "{rendered}");
        assert!(rendered.contains("key=value"), "{rendered}");
    }

    #[test]
    fn test_invalid_header_diagnostic() {
        let rendered = render_stripped("[server\nport=80\n");
        assert!(rendered.contains("invalid section header on line 1"), "{rendered}");
        assert!(rendered.contains("[name]"), "{rendered}");
    }

    #[test]
    fn test_display() {
        let err = crate::parse("a=1\n\n; comment\noops\n").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Malformed data around 'oops' (line 4)");
    }
}
