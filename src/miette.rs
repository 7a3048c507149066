//! `miette` integration.
//!
//! This module is feature-gated behind the `miette` feature.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};

use crate::Error;
use crate::Location;

/// Convert a binding [`Error`] into a `miette::Report`.
///
/// This function takes the JSON `source` and a display `file` name/path.
///
/// # Example
///
/// ```rust,no_run
/// #[derive(Default)]
/// struct Conf {
///     port: u16,
/// }
/// json_source::record!(Conf { pub port(json = "port") });
///
/// let json = r#"{"port": "http"}"#;
/// let err = json_source::from_str::<Conf>(json).expect_err("type mismatch expected");
/// let report = json_source::miette::to_miette_report(&err, json, "config.json");
///
/// // `Debug` formatting uses miette's graphical reporter.
/// eprintln!("{report:?}");
/// ```
///
/// If the error has no known location, the report carries no labels.
pub fn to_miette_report(err: &Error, source: &str, file: &str) -> miette::Report {
    let src = Arc::new(NamedSource::new(file, source.to_owned()));
    let mut labels = Vec::new();
    if let Some(loc) = err.location()
        && let Some(span) = to_source_span(source, &loc)
    {
        labels.push(LabeledSpan::new_with_span(Some(label(err)), span));
    }
    miette::Report::new(ErrorDiagnostic {
        message: err.to_string(),
        src,
        labels,
    })
}

#[derive(Clone, Debug)]
struct ErrorDiagnostic {
    message: String,
    src: Arc<NamedSource<String>>,
    labels: Vec<LabeledSpan>,
}

impl fmt::Display for ErrorDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorDiagnostic {}

impl Diagnostic for ErrorDiagnostic {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }
}

/// Short label text placed under the offending span.
fn label(err: &Error) -> String {
    match err {
        Error::TypeMismatch { expected, found, .. } => format!("expected {expected}, found {found}"),
        Error::Conversion { expected, .. } => format!("not a valid {expected}"),
        Error::Unmarshal { cause, .. } => cause.to_string(),
        Error::Malformed { msg, .. } => msg.clone(),
        other => other.to_string(),
    }
}

fn to_source_span(source: &str, location: &Location) -> Option<SourceSpan> {
    let span = location.span();
    let start = span.offset();
    if !source.is_char_boundary(start) {
        return None;
    }
    // Point at one character when the span is empty (end of input, scan errors).
    let len = if span.is_empty() {
        source[start..].chars().next().map_or(0, char::len_utf8)
    } else {
        span.len().min(source.len() - start)
    };
    if !source.is_char_boundary(start + len) {
        return None;
    }
    Some(SourceSpan::new(start.into(), len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Conf {
        port: u16,
    }

    crate::record!(Conf { pub port(json = "port") });

    #[test]
    fn report_labels_the_offending_value() {
        let json = "{\n  \"port\": \"http\"\n}";
        let err = crate::from_str::<Conf>(json).unwrap_err();
        let report = to_miette_report(&err, json, "config.json");
        let labels: Vec<LabeledSpan> = report.labels().map(|l| l.collect()).unwrap_or_default();
        assert_eq!(labels.len(), 1);
        assert_eq!(&json[labels[0].offset()..labels[0].offset() + labels[0].len()], "http");
    }
}
