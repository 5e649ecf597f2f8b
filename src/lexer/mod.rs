//! Lexical analysis module
//!
//! This module handles tokenization of policy source code.

pub mod token;
pub mod scanner;

pub use token::{Token, TokenKind, Keyword, Radix};
pub use scanner::Lexer;
