//! Error handling and diagnostics for the policy front end
//!
//! This module provides the error types produced by the lexer and the parser.
//! Neither stage panics on malformed input: every failure is returned as one
//! of the values below, carrying enough position information for
//! [`Diagnostic`] to render it against the source text.

use std::fmt;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for front-end operations
pub type FekalResult<T> = Result<T, FekalError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
    /// Byte offset into the source text
    pub offset: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, offset: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            offset,
            filename,
        }
    }

    /// Create a source location without a filename or byte offset
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, 0, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors raised while splitting source text into tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No token pattern matches at this position
    UnexpectedCharacter {
        found: char,
        location: SourceLocation,
    },
    /// `/*` without a matching `*/`
    UnterminatedComment { location: SourceLocation },
    /// A base prefix with no digits after it, e.g. `0x`
    MalformedInteger {
        text: String,
        location: SourceLocation,
    },
    /// An unsigned decimal literal written with a leading `0`, e.g. `0644`
    LeadingZero {
        text: String,
        location: SourceLocation,
    },
    /// A literal whose magnitude does not fit in 64 bits
    IntegerOutOfRange {
        text: String,
        location: SourceLocation,
    },
}

impl LexError {
    /// Human-readable description of the failure
    pub fn message(&self) -> String {
        match self {
            Self::UnexpectedCharacter { found, .. } => {
                format!("unexpected character '{}'", found.escape_default())
            }
            Self::UnterminatedComment { .. } => "unterminated block comment".to_string(),
            Self::MalformedInteger { text, .. } => {
                format!("malformed integer literal '{}': missing digits", text)
            }
            Self::LeadingZero { text, .. } => {
                let digits = match text.trim_start_matches('0') {
                    "" => "0",
                    digits => digits,
                };
                format!(
                    "integer literal '{}' has a leading zero (use `0o{}` for octal)",
                    text, digits
                )
            }
            Self::IntegerOutOfRange { text, .. } => {
                format!("integer literal '{}' does not fit in 64 bits", text)
            }
        }
    }

    /// Position of the offending input
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::UnexpectedCharacter { location, .. }
            | Self::UnterminatedComment { location }
            | Self::MalformedInteger { location, .. }
            | Self::LeadingZero { location, .. }
            | Self::IntegerOutOfRange { location, .. } => location,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message(), self.location())
    }
}

impl std::error::Error for LexError {}

/// Bracketed constructs the parser can report as left open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// `POLICY name version { ... }`
    Policy,
    /// `ALLOW { ... }`
    Action,
    /// `ERRNO( ... )`, `TRAP( ... )`, `TRACE( ... )`
    ActionArgument,
    /// `syscall( ... )`
    Parameters,
    /// `syscall(...) { ... }`
    Conditions,
    /// `( ... )` inside an expression
    Group,
}

impl Block {
    /// The token that closes this construct
    pub fn closing(&self) -> &'static str {
        match self {
            Self::Policy | Self::Action | Self::Conditions => "}",
            Self::ActionArgument | Self::Parameters | Self::Group => ")",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Policy => "policy body",
            Self::Action => "action block",
            Self::ActionArgument => "action argument",
            Self::Parameters => "parameter list",
            Self::Conditions => "condition block",
            Self::Group => "parenthesized expression",
        };
        f.write_str(name)
    }
}

/// Errors raised while building the syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The next token does not fit the grammar at this point
    UnexpectedToken {
        found: String,
        expected: Vec<String>,
        note: Option<String>,
        location: SourceLocation,
    },
    /// End of input reached before a closing bracket
    UnterminatedBlock {
        block: Block,
        opened_at: SourceLocation,
        location: SourceLocation,
    },
    /// A filter has a parameter list without a condition block, or the reverse
    InvalidFilterClause {
        syscall: String,
        message: String,
        location: SourceLocation,
    },
    /// Parentheses or `!` nested beyond the configured limit
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    /// Create an unexpected-token error
    pub fn unexpected(
        found: impl Into<String>,
        expected: &[&str],
        location: SourceLocation,
    ) -> Self {
        Self::UnexpectedToken {
            found: found.into(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            note: None,
            location,
        }
    }

    /// Attach an explanatory note to an unexpected-token error
    pub fn with_note(mut self, text: impl Into<String>) -> Self {
        if let Self::UnexpectedToken { ref mut note, .. } = self {
            *note = Some(text.into());
        }
        self
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected token",
            Self::UnterminatedBlock { .. } => "unterminated block",
            Self::InvalidFilterClause { .. } => "invalid filter clause",
            Self::NestingTooDeep { .. } => "nesting too deep",
        }
    }

    /// Human-readable description of the failure
    pub fn message(&self) -> String {
        match self {
            Self::UnexpectedToken {
                found,
                expected,
                note,
                ..
            } => {
                let mut text = match expected.as_slice() {
                    [] => format!("unexpected {}", found),
                    [one] => format!("expected {}, found {}", one, found),
                    many => format!("expected one of {}, found {}", many.join(", "), found),
                };
                if let Some(note) = note {
                    text.push_str(" (");
                    text.push_str(note);
                    text.push(')');
                }
                text
            }
            Self::UnterminatedBlock {
                block, opened_at, ..
            } => format!(
                "expected `{}` to close {} opened at line {}",
                block.closing(),
                block,
                opened_at.line
            ),
            Self::InvalidFilterClause {
                syscall, message, ..
            } => format!("filter for `{}` {}", syscall, message),
            Self::NestingTooDeep { limit, .. } => {
                format!("expression nesting exceeds the limit of {}", limit)
            }
        }
    }

    /// Position where the error was detected
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::UnexpectedToken { location, .. }
            | Self::UnterminatedBlock { location, .. }
            | Self::InvalidFilterClause { location, .. }
            | Self::NestingTooDeep { location, .. } => location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message(), self.location())
    }
}

impl std::error::Error for ParseError {}

/// Main error type for the policy front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FekalError {
    /// Lexical analysis error
    Lex(LexError),
    /// Parsing error
    Parse(ParseError),
}

impl FekalError {
    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::Lex(_) => "Lexer Error",
            Self::Parse(_) => "Parse Error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Lex(e) => e.message(),
            Self::Parse(e) => e.message(),
        }
    }

    /// Get the source location
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Lex(e) => e.location(),
            Self::Parse(e) => e.location(),
        }
    }
}

impl From<LexError> for FekalError {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl From<ParseError> for FekalError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl fmt::Display for FekalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.kind(), self.message(), self.location())
    }
}

impl std::error::Error for FekalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::at(10, 5);
        assert_eq!(loc.to_string(), "10:5");

        let loc_with_file = SourceLocation::new(10, 5, 120, Some("base.policy".to_string()));
        assert_eq!(loc_with_file.to_string(), "base.policy:10:5");
    }

    #[test]
    fn test_lex_error_wrapping() {
        let loc = SourceLocation::at(1, 1);
        let err: FekalError = LexError::UnexpectedCharacter {
            found: '@',
            location: loc.clone(),
        }
        .into();

        assert_eq!(err.kind(), "Lexer Error");
        assert_eq!(err.message(), "unexpected character '@'");
        assert_eq!(err.location(), &loc);
    }

    #[test]
    fn test_leading_zero_message() {
        let err = LexError::LeadingZero {
            text: "0644".to_string(),
            location: SourceLocation::at(1, 6),
        };
        assert_eq!(
            err.message(),
            "integer literal '0644' has a leading zero (use `0o644` for octal)"
        );
    }

    #[test]
    fn test_unexpected_token_message() {
        let err =
            ParseError::unexpected("keyword `ALLOW`", &["identifier"], SourceLocation::at(1, 8))
                .with_note("`ALLOW` is a reserved keyword");
        assert_eq!(
            err.message(),
            "expected identifier, found keyword `ALLOW` (`ALLOW` is a reserved keyword)"
        );

        let err = ParseError::unexpected("`,`", &["`}`", "identifier"], SourceLocation::at(2, 3));
        assert_eq!(err.message(), "expected one of `}`, identifier, found `,`");
    }

    #[test]
    fn test_unterminated_block_message() {
        let err = ParseError::UnterminatedBlock {
            block: Block::Action,
            opened_at: SourceLocation::at(3, 5),
            location: SourceLocation::at(9, 1),
        };
        assert_eq!(
            err.message(),
            "expected `}` to close action block opened at line 3"
        );
    }

    #[test]
    fn test_error_display() {
        let err: FekalError = ParseError::NestingTooDeep {
            limit: 64,
            location: SourceLocation::at(5, 10),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "Parse Error: expression nesting exceeds the limit of 64 at 5:10"
        );
    }
}
