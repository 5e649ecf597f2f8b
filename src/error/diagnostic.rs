//! Diagnostic formatting for better error messages
//!
//! Renders a [`FekalError`] with the offending source line, a caret under
//! the reported column and, for unclosed brackets, a note pointing back at
//! the opening one.

use super::{FekalError, ParseError, SourceLocation};
use colored::Colorize;

/// Diagnostic information for displaying errors with context
pub struct Diagnostic<'a> {
    error: &'a FekalError,
    source: Option<&'a str>,
}

impl<'a> Diagnostic<'a> {
    /// Create a new diagnostic from an error
    pub fn new(error: &'a FekalError) -> Self {
        Self {
            error,
            source: None,
        }
    }

    /// Create a diagnostic with source code context
    pub fn with_source(error: &'a FekalError, source: &'a str) -> Self {
        Self {
            error,
            source: Some(source),
        }
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();

        let kind = self.error.kind().red().bold();
        output.push_str(&format!("{}: {}\n", kind, self.error.message()));

        let location = self.error.location();
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));
        if let Some(source) = self.source {
            output.push_str(&format_source_context(source, location));
        }

        if let FekalError::Parse(ParseError::UnterminatedBlock {
            block, opened_at, ..
        }) = self.error
        {
            output.push_str(&format!(
                "  {} {} opened here\n",
                "note:".cyan().bold(),
                block
            ));
            output.push_str(&format!("  {} {}\n", "-->".blue().bold(), opened_at));
            if let Some(source) = self.source {
                output.push_str(&format_source_context(source, opened_at));
            }
        }

        output
    }
}

/// Format source code context around a location
fn format_source_context(source: &str, location: &SourceLocation) -> String {
    let mut output = String::new();
    let lines: Vec<&str> = source.lines().collect();

    if location.line == 0 || location.line > lines.len() {
        return output;
    }

    let line_idx = location.line - 1;
    let line_num_width = (location.line + 1).to_string().len();

    if line_idx > 0 {
        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", line_idx, width = line_num_width).blue(),
            lines[line_idx - 1]
        ));
    }

    output.push_str(&format!(
        "  {} {}\n",
        format!("{:width$}", location.line, width = line_num_width)
            .blue()
            .bold(),
        lines[line_idx]
    ));

    // "  " + number + " " puts column 1 at this offset; tabs are copied so
    // the caret lines up with the echoed line
    let mut indicator_padding = " ".repeat(line_num_width + 3);
    indicator_padding.extend(
        lines[line_idx]
            .chars()
            .take(location.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' }),
    );
    output.push_str(&format!("{}{}\n", indicator_padding, "^".red().bold()));

    if line_idx + 1 < lines.len() {
        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", line_idx + 2, width = line_num_width).blue(),
            lines[line_idx + 1]
        ));
    }

    output
}

impl std::fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Block, LexError};

    #[test]
    fn test_diagnostic_without_source() {
        let err = FekalError::Lex(LexError::UnexpectedCharacter {
            found: '@',
            location: SourceLocation::at(1, 1),
        });
        let formatted = Diagnostic::new(&err).format();

        assert!(formatted.contains("Lexer Error"));
        assert!(formatted.contains("unexpected character '@'"));
    }

    #[test]
    fn test_diagnostic_with_source() {
        colored::control::set_override(false);
        let source = "POLICY p 1 {\n  ALLOW { read @ }\n}";
        let err = FekalError::Lex(LexError::UnexpectedCharacter {
            found: '@',
            location: SourceLocation::at(2, 16),
        });
        let formatted = Diagnostic::with_source(&err, source).format();

        assert!(formatted.contains("  2   ALLOW { read @ }\n"));
        // caret sits under the '@'
        assert!(formatted.contains(&format!("{}^\n", " ".repeat(19))));
    }

    #[test]
    fn test_caret_follows_tabs() {
        colored::control::set_override(false);
        let source = "ALLOW {\n\t\tread @\n}";
        let err = FekalError::Lex(LexError::UnexpectedCharacter {
            found: '@',
            location: SourceLocation::at(2, 8),
        });
        let formatted = Diagnostic::with_source(&err, source).format();

        assert!(formatted.contains("  2 \t\tread @\n"));
        assert!(formatted.contains("    \t\t     ^\n"));
    }

    #[test]
    fn test_unterminated_block_points_at_opening() {
        colored::control::set_override(false);
        let source = "POLICY p 1 {\n  USE base 1\n";
        let err = FekalError::Parse(ParseError::UnterminatedBlock {
            block: Block::Policy,
            opened_at: SourceLocation::at(1, 12),
            location: SourceLocation::at(3, 1),
        });
        let formatted = Diagnostic::with_source(&err, source).format();

        assert!(formatted.contains("note: policy body opened here"));
        assert!(formatted.contains("  1 POLICY p 1 {\n"));
    }
}
