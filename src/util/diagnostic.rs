//! User-friendly diagnostic messages.
//!
//! Fatal configuration errors are rendered through [`Diagnostic`] so that the
//! offending path and a suggested fix always reach the user.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the source root cannot be found.
    pub const SOURCE_DIR: &str =
        "Set `layout.source-dir` in trellis.toml or pass `--root` pointing at the project";

    /// Suggestion when a manifest line cannot be parsed.
    pub const MANIFEST_SYNTAX: &str =
        "Manifest lines take the form `KEY := value` (EXE, DEPENDS, INCLUDE_DIRS, CFLAGS, RUN_ARGS)";

    /// Suggestion when a manifest cannot be read.
    pub const MANIFEST_ENCODING: &str = "Check the file permissions and that it is valid UTF-8";

    /// Suggestion when two directories produce the same target name.
    pub const DUPLICATE_TARGET: &str =
        "Rename one directory or give one of them a distinct `EXE :=` name";

    /// Suggestion when a named target does not exist.
    pub const LIST_TARGETS: &str = "Run `trellis scan` to see available targets";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m".to_string(),
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m".to_string(),
            (false, severity) => severity.to_string(),
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("duplicate target name `tool`")
            .with_location("src/apps/tool")
            .with_context("`tool` is produced by src/legacy/tool")
            .with_suggestion("Rename one directory");

        let output = diag.format(false);
        assert!(output.starts_with("error: duplicate target name"));
        assert!(output.contains("  --> src/apps/tool"));
        assert!(output.contains("  = `tool` is produced by"));
        assert!(output.contains("  1. Rename one directory"));
    }

    #[test]
    fn test_warning_without_suggestions() {
        let output = Diagnostic::warning("dependency cycle").format(false);
        assert_eq!(output, "warning: dependency cycle\n");
    }

    #[test]
    fn test_colored_output_wraps_severity() {
        let output = Diagnostic::error("boom").format(true);
        assert!(output.starts_with("\x1b[1;31merror\x1b[0m: boom"));
    }
}
