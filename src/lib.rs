//! # Fekal
//!
//! Front end for a small seccomp policy description language:
//!
//! ```text
//! POLICY net 1 {
//!   USE base 1
//!   ERRNO(EPERM) { socket(domain) { domain != 1 && domain != 2 } }
//! }
//! DEFAULT KILL_PROCESS
//! ```
//!
//! ## Architecture
//!
//! The front end is organized into several modules:
//! - `lexer`: Tokenization of source code
//! - `parser`: Parsing tokens into an Abstract Syntax Tree (AST)
//! - `printer`: Rendering the AST as canonical source or as a tree dump
//! - `error`: Error handling and diagnostics
//!
//! Semantic checks (resolving `USE` targets, syscall and errno names) and
//! BPF code generation live downstream and consume the AST produced here.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;

// Re-export commonly used types
pub use error::{Diagnostic, FekalError, FekalResult, LexError, ParseError, SourceLocation};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, ParserOptions, Recovery, SourceFile};

/// Version of the fekal front end
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a policy file, stopping at the first error
///
/// # Arguments
///
/// * `source` - The policy source text
/// * `filename` - Optional filename for error reporting
pub fn parse_source(source: &str, filename: Option<&str>) -> Result<SourceFile, Vec<FekalError>> {
    parse_source_with(source, filename, &ParserOptions::default())
}

/// Parse a policy file with explicit parser options
///
/// Lexing stops at the first bad character, so a lexical error is always
/// reported alone. With [`Recovery::Resynchronize`] every statement-level
/// parse error is returned, up to [`ParserOptions::max_errors`].
pub fn parse_source_with(
    source: &str,
    filename: Option<&str>,
    options: &ParserOptions,
) -> Result<SourceFile, Vec<FekalError>> {
    // Phase 1: Lexical Analysis
    let tokens = Lexer::new(source, filename)
        .tokenize()
        .map_err(|e| vec![FekalError::from(e)])?;
    log::debug!("lexed {} tokens", tokens.len());

    // Phase 2: Parsing
    let (ast, errors) = Parser::with_options(tokens, options.clone()).parse();
    if errors.is_empty() {
        Ok(ast)
    } else {
        Err(errors.into_iter().map(FekalError::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_parse_source() {
        let ast = parse_source("DEFAULT ALLOW", Some("p.policy")).unwrap();
        assert_eq!(ast.statements.len(), 1);
        assert_eq!(ast.statements[0].location().to_string(), "p.policy:1:1");
    }

    #[test]
    fn test_lex_error_is_reported_alone() {
        let errors = parse_source("ALLOW { read } $ DEFAULT", None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), "Lexer Error");
    }

    #[test]
    fn test_recovery_collects_errors() {
        let source = "ALLOW { read(fd) }\nUSE 1 2\nDEFAULT LOG";
        let options = ParserOptions::default().with_recovery(Recovery::Resynchronize);

        let errors = parse_source_with(source, None, &options).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind() == "Parse Error"));

        assert_eq!(parse_source(source, None).unwrap_err().len(), 1);
    }
}
