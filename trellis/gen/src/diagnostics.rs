//! Diagnostics collected during a generation batch.
//!
//! Unsupported accessors never abort generation. Each one is recorded here
//! with a stable [`DiagnosticCode`] and also logged through `tracing`; the
//! CLI prints the collected entries and build scripts forward them as
//! `cargo:warning` lines.

use std::fmt;

use colored::Colorize;
use strum::{Display, EnumIter};
use tracing::{info, warn};

/// Stable codes for unsupported accessor shapes.
///
/// The code is part of the panic message of the generated stub, so it must
/// not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DiagnosticCode {
    /// A recognised container holds something other than a schema object.
    #[strum(serialize = "001")]
    UnrecognizedElement,
    /// An adder whose parameter is not a vertex schema object, or an adder on an edge schema.
    #[strum(serialize = "002")]
    UnsupportedAdder,
    /// Any other unsupported accessor shape.
    #[strum(serialize = "003")]
    UnsupportedShape,
    /// A schema object held by a container outside the supported set.
    #[strum(serialize = "004")]
    UnrecognizedContainer,
    /// A supported container with the wrong number of type arguments.
    #[strum(serialize = "005")]
    TypeArgumentCount,
}

impl DiagnosticCode {
    pub fn summary(self) -> &'static str {
        match self {
            Self::UnrecognizedElement => "unrecognised collection element type",
            Self::UnsupportedAdder => "unsupported adder",
            Self::UnsupportedShape => "unsupported accessor shape",
            Self::UnrecognizedContainer => "unrecognised container type",
            Self::TypeArgumentCount => "unexpected number of type arguments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Note => f.write_str("note"),
        }
    }
}

/// One entry in the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<DiagnosticCode>,
    /// The schema whose adapter was being generated.
    pub schema: String,
    /// `Owner::method(params) -> Ret`
    pub descriptor: String,
    pub message: String,
}

impl Diagnostic {
    /// Renders the diagnostic with terminal colours.
    pub fn render_colored(&self) -> String {
        let severity = match self.severity {
            Severity::Warning => self.heading().yellow().bold(),
            Severity::Note => self.heading().cyan().bold(),
        };
        format!(
            "{}: {}: {}",
            severity,
            self.descriptor.bold(),
            self.message.dimmed()
        )
    }

    fn heading(&self) -> String {
        match self.code {
            Some(code) => format!("{}[{}]", self.severity, code),
            None => self.severity.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.heading(), self.descriptor, self.message)
    }
}

/// Append-only record of the diagnostics of one batch, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an unsupported accessor.
    pub fn warn(&mut self, code: DiagnosticCode, schema: &str, descriptor: &str, message: &str) {
        warn!(%code, schema, descriptor, "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            code: Some(code),
            schema: schema.to_string(),
            descriptor: descriptor.to_string(),
            message: message.to_string(),
        });
    }

    /// Records an informational note, such as an inferred edge label.
    pub fn note(&mut self, schema: &str, descriptor: &str, message: &str) {
        info!(schema, descriptor, "{message}");
        self.entries.push(Diagnostic {
            severity: Severity::Note,
            code: None,
            schema: schema.to_string(),
            descriptor: descriptor.to_string(),
            message: message.to_string(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == Severity::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_are_stable() {
        let codes: Vec<String> = DiagnosticCode::iter().map(|c| c.to_string()).collect();
        assert_eq!(codes, vec!["001", "002", "003", "004", "005"]);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(
            DiagnosticCode::UnsupportedShape,
            "Person",
            "Person::get_knows(&self, person: &dyn Person) -> bool",
            "keyed getters with parameters are not supported",
        );
        diagnostics.note("Person", "Person::get_friends(&self) -> Vec<Box<dyn Person>>", "edge label `friend` inferred");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        let severities: Vec<_> = diagnostics.iter().map(|d| d.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Note]);
    }

    #[test]
    fn display_includes_code_and_descriptor() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(
            DiagnosticCode::UnrecognizedContainer,
            "Person",
            "Person::get_queue(&self) -> VecDeque<Box<dyn Person>>",
            "container is not supported",
        );
        let rendered = diagnostics.iter().next().unwrap().to_string();
        assert_eq!(
            rendered,
            "warning[004]: Person::get_queue(&self) -> VecDeque<Box<dyn Person>>: container is not supported"
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn warnings_are_logged() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(
            DiagnosticCode::UnsupportedAdder,
            "Knows",
            "Knows::add_friend(&self, friend: &dyn Person)",
            "adders require a vertex schema",
        );
        assert!(logs_contain("adders require a vertex schema"));
    }
}
