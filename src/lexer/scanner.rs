//! Lexer/Scanner implementation for the policy language
//!
//! The lexer is a lazy, single-pass iterator over the source text. Each call
//! to `next` skips whitespace and comments and yields one token; the stream
//! ends with a single `Eof` token. After the first error the iterator is
//! exhausted.

use super::token::{Keyword, Radix, Token, TokenKind};
use crate::error::{LexError, SourceLocation};

/// Lexer for policy source code
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    filename: Option<String>,
    /// Whether the last emitted token can end an integer operand
    after_operand: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(source: &'a str, filename: Option<&str>) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            filename: filename.map(|s| s.to_string()),
            after_operand: false,
            finished: false,
        }
    }

    /// Tokenize the whole source, stopping at the first error
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    /// Scan a single token, or `None` once only trivia remains
    fn scan_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;
        if self.is_at_end() {
            return Ok(None);
        }

        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;

        let c = self.advance();
        let kind = match c {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,

            '=' => {
                if self.match_char('=') {
                    TokenKind::Equal
                } else {
                    return Err(self.unexpected('='));
                }
            }
            '!' => self.either('=', TokenKind::NotEqual, TokenKind::Bang),
            '|' => self.either('|', TokenKind::OrOr, TokenKind::Pipe),
            '&' => self.either('&', TokenKind::AndAnd, TokenKind::Ampersand),
            '<' => {
                if self.match_char('<') {
                    TokenKind::ShiftLeft
                } else {
                    self.either('=', TokenKind::LessEqual, TokenKind::Less)
                }
            }
            '>' => {
                if self.match_char('>') {
                    TokenKind::ShiftRight
                } else {
                    self.either('=', TokenKind::GreaterEqual, TokenKind::Greater)
                }
            }

            // A '-' glued to a digit is a negative literal unless it follows
            // an operand, where it can only be subtraction.
            '-' if self.peek().is_ascii_digit() && !self.after_operand => self.scan_number(true)?,
            '-' => TokenKind::Minus,

            c if c.is_ascii_digit() => self.scan_number(false)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

            c => return Err(self.unexpected(c)),
        };

        Ok(Some(self.make_token(kind)))
    }

    /// Skip whitespace, `// line` comments and `/* block */` comments
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == '/' => {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == '*' => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Skip a block comment; the first `*/` closes it (no nesting)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let location = self.current_location();
        self.advance();
        self.advance();

        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::UnterminatedComment { location })
    }

    /// Scan an integer literal in any of the four bases
    fn scan_number(&mut self, negative: bool) -> Result<TokenKind, LexError> {
        if negative {
            // step from the '-' onto the first digit
            self.advance();
        }
        let first_digit = self.current - 1;

        let prefix = if self.source.as_bytes()[first_digit] == b'0' {
            Radix::from_prefix(self.peek())
        } else {
            None
        };

        let (radix, digits_start) = match prefix {
            Some(radix) => {
                self.advance();
                let digits_start = self.current;
                while self.peek().is_digit(radix.base()) {
                    self.advance();
                }
                if self.current == digits_start {
                    return Err(LexError::MalformedInteger {
                        text: self.lexeme().to_string(),
                        location: self.start_location(),
                    });
                }
                (radix, digits_start)
            }
            None => {
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
                // only the bare `0` may start with zero, unless negated
                let leading_zero = self.source.as_bytes()[first_digit] == b'0';
                if leading_zero && !negative && self.current - first_digit > 1 {
                    return Err(LexError::LeadingZero {
                        text: self.lexeme().to_string(),
                        location: self.start_location(),
                    });
                }
                (Radix::Decimal, first_digit)
            }
        };

        let digits = &self.source[digits_start..self.current];
        let magnitude = u64::from_str_radix(digits, radix.base()).map_err(|_| {
            LexError::IntegerOutOfRange {
                text: self.lexeme().to_string(),
                location: self.start_location(),
            }
        })?;

        // 64-bit word semantics: the magnitude is reinterpreted, then negated
        let value = magnitude as i64;
        let value = if negative { value.wrapping_neg() } else { value };

        Ok(TokenKind::Integer { radix, value })
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> TokenKind {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        match Keyword::from_str(self.lexeme()) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        }
    }

    fn make_token(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, self.lexeme().to_string(), self.start_location());
        self.after_operand = token.ends_operand();
        log::trace!("token {:?} {:?} at {}", token.kind, token.lexeme, token.location);
        token
    }

    /// Consume `expected` and return `matched`, or return `otherwise`
    fn either(&mut self, expected: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.match_char(expected) {
            matched
        } else {
            otherwise
        }
    }

    /// Advance to the next character
    fn advance(&mut self) -> char {
        let c = self.peek();
        if c == '\0' && self.is_at_end() {
            return c;
        }
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    /// Check if the next character matches and consume it if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected && !self.is_at_end() {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    /// Peek at the character after the current one
    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn start_location(&self) -> SourceLocation {
        SourceLocation::new(
            self.start_line,
            self.start_column,
            self.start,
            self.filename.clone(),
        )
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.current, self.filename.clone())
    }

    fn unexpected(&self, found: char) -> LexError {
        LexError::UnexpectedCharacter {
            found,
            location: self.start_location(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.scan_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                Some(Ok(Token::new(
                    TokenKind::Eof,
                    String::new(),
                    self.current_location(),
                )))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
