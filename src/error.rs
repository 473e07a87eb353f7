use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

/// Byte range into the program source, used for diagnostics.
#[derive(Debug, Clone)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

/// Every error is fatal: the first one aborts the remaining statements of
/// the program. Output already printed before the error stands.
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Malformed markup rejected by the front end.
    ParseError,
    /// A recognized construct with the wrong shape (missing attribute,
    /// wrong child count, wrong root node).
    StructureError,
    /// A tag outside the recognized vocabulary at statement or expression
    /// position.
    UnknownConstruct,
    /// A failure while computing a value, e.g. a formula that is not
    /// well-formed arithmetic after substitution.
    EvalError,
}

#[derive(Debug, Clone)]
pub struct HtmlPlError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl HtmlPlError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn parse_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::ParseError, span, message)
    }

    pub fn structure_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::StructureError, span, message)
    }

    pub fn structure_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::StructureError, span, message, help)
    }

    pub fn unknown_construct(span: Span, message: String) -> Self {
        Self::new(ErrorKind::UnknownConstruct, span, message)
    }

    pub fn unknown_construct_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::UnknownConstruct, span, message, help)
    }

    pub fn eval_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::EvalError, span, message)
    }

    pub fn eval_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::EvalError, span, message, help)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<program>");

        let color = match self.kind {
            ErrorKind::ParseError => Color::Red,
            ErrorKind::StructureError => Color::Yellow,
            ErrorKind::UnknownConstruct => Color::Yellow,
            ErrorKind::EvalError => Color::Magenta,
        };

        let kind_str = match self.kind {
            ErrorKind::ParseError => "Parse Error",
            ErrorKind::StructureError => "Structure Error",
            ErrorKind::UnknownConstruct => "Unknown Construct",
            ErrorKind::EvalError => "Evaluation Error",
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        // Add help note if available
        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for HtmlPlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HtmlPlError {}
