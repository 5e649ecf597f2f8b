//! Token definitions for the policy language
//!
//! This module defines all token kinds produced by lexical analysis.

use crate::error::SourceLocation;
use std::fmt;

/// A token in the policy language
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, lexeme: String, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme,
            location,
        }
    }

    /// Describe the token for error messages, e.g. "identifier `fd`"
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Identifier => format!("identifier `{}`", self.lexeme),
            TokenKind::Integer { .. } => format!("integer `{}`", self.lexeme),
            TokenKind::Keyword(kw) => format!("keyword `{}`", kw),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("`{}`", other),
        }
    }

    /// Whether this token can end an integer operand
    pub(crate) fn ends_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Integer { .. } | TokenKind::Identifier | TokenKind::RightParen
        )
    }
}

/// Numeric base of an integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    /// Numeric value of the base
    pub fn base(&self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }

    /// Select the radix for a literal prefix character (`b`, `o`, `x`)
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'b' | 'B' => Some(Self::Binary),
            'o' | 'O' => Some(Self::Octal),
            'x' | 'X' => Some(Self::Hexadecimal),
            _ => None,
        }
    }
}

/// Token kinds in the policy language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals (decoded 64-bit word)
    Integer { radix: Radix, value: i64 },

    // Identifiers and keywords
    Identifier,
    Keyword(Keyword),

    // Delimiters
    LeftBrace,  // {
    RightBrace, // }
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Comparison
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=

    // Logical
    OrOr,   // ||
    AndAnd, // &&
    Bang,   // !

    // Integer
    Pipe,       // |
    Caret,      // ^
    Ampersand,  // &
    ShiftLeft,  // <<
    ShiftRight, // >>
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /

    // Special
    Eof,
}

impl TokenKind {
    /// Whether this kind is one of the six comparison operators
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::Greater
                | Self::LessEqual
                | Self::GreaterEqual
        )
    }

    /// Whether this kind is a binary integer operator
    pub fn is_int_operator(&self) -> bool {
        matches!(
            self,
            Self::Pipe
                | Self::Caret
                | Self::Ampersand
                | Self::ShiftLeft
                | Self::ShiftRight
                | Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Slash
        )
    }
}

/// Reserved words of the policy language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Policy,
    Use,
    Default,

    // Actions
    Allow,
    Log,
    KillProcess,
    KillThread,
    UserNotif,
    Errno,
    Trap,
    Trace,
}

impl Keyword {
    /// Get keyword from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "POLICY" => Some(Self::Policy),
            "USE" => Some(Self::Use),
            "DEFAULT" => Some(Self::Default),
            "ALLOW" => Some(Self::Allow),
            "LOG" => Some(Self::Log),
            "KILL_PROCESS" => Some(Self::KillProcess),
            "KILL_THREAD" => Some(Self::KillThread),
            "USER_NOTIF" => Some(Self::UserNotif),
            "ERRNO" => Some(Self::Errno),
            "TRAP" => Some(Self::Trap),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Get string representation of keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "POLICY",
            Self::Use => "USE",
            Self::Default => "DEFAULT",
            Self::Allow => "ALLOW",
            Self::Log => "LOG",
            Self::KillProcess => "KILL_PROCESS",
            Self::KillThread => "KILL_THREAD",
            Self::UserNotif => "USER_NOTIF",
            Self::Errno => "ERRNO",
            Self::Trap => "TRAP",
            Self::Trace => "TRACE",
        }
    }

    /// Whether the keyword introduces an action
    pub fn is_action(&self) -> bool {
        !matches!(self, Self::Policy | Self::Use | Self::Default)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer { .. } => write!(f, "integer"),
            Self::Identifier => write!(f, "identifier"),
            Self::Keyword(kw) => write!(f, "{}", kw),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::LessEqual => write!(f, "<="),
            Self::GreaterEqual => write!(f, ">="),
            Self::OrOr => write!(f, "||"),
            Self::AndAnd => write!(f, "&&"),
            Self::Bang => write!(f, "!"),
            Self::Pipe => write!(f, "|"),
            Self::Caret => write!(f, "^"),
            Self::Ampersand => write!(f, "&"),
            Self::ShiftLeft => write!(f, "<<"),
            Self::ShiftRight => write!(f, ">>"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}
