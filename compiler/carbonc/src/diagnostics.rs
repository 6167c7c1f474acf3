//! Error reports for the terminal.
//!
//! Parse errors carry a span and are rendered with `ariadne` as an
//! annotated source snippet. Runtime errors have no position and print as
//! a single line.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use carbon_parse::ParseError;

use crate::session::RunError;

/// Render an error from the unit `name` whose text is `source`.
pub fn render(name: &str, source: &str, err: &RunError, color: bool) -> String {
    match err {
        RunError::Parse(err) => render_parse_error(name, source, err, color),
        RunError::Runtime(err) => format!("error: {err}\n"),
    }
}

pub fn render_parse_error(name: &str, source: &str, err: &ParseError, color: bool) -> String {
    let mut out = Vec::new();
    let label = Label::new((name, err.span.clone()))
        .with_message(&err.message)
        .with_color(Color::Red);
    let written = Report::build(ReportKind::Error, name, err.span.start)
        .with_config(Config::default().with_color(color))
        .with_message("syntax error")
        .with_label(label)
        .finish()
        .write((name, Source::from(source)), &mut out);
    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("error: {}\n", err.message),
    }
}
