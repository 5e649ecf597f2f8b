//! Parser implementation
//!
//! Recursive descent over the token stream, one function per grammar rule.
//! Statement-level rules live here; the two expression grammars are in
//! `expressions.rs`.

use super::ast::*;
use super::options::{ParserOptions, Recovery};
use crate::error::{Block, ParseError, SourceLocation};
use crate::lexer::{Keyword, Token, TokenKind};

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parser for policy source code
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    pub(super) options: ParserOptions,
    /// Current nesting of groups and `!`
    pub(super) depth: usize,
}

impl Parser {
    /// Create a new parser from tokens with default options
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParserOptions::default())
    }

    /// Create a new parser from tokens
    pub fn with_options(mut tokens: Vec<Token>, options: ParserOptions) -> Self {
        if !matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof) {
            let location = tokens
                .last()
                .map(|token| token.location.clone())
                .unwrap_or_else(|| SourceLocation::at(1, 1));
            tokens.push(Token::new(TokenKind::Eof, String::new(), location));
        }

        Self {
            tokens,
            current: 0,
            options,
            depth: 0,
        }
    }

    /// Parse tokens into a source file.
    ///
    /// Statements parsed before the first error are always returned. With
    /// [`Recovery::Resynchronize`] the parser keeps going after errors and
    /// returns every statement it could recover.
    pub fn parse(mut self) -> (SourceFile, Vec<ParseError>) {
        let location = self.peek().location.clone();
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            let start = self.current;
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    log::debug!("statement at {} failed: {}", self.tokens[start].location, err);
                    errors.push(err);
                    if self.options.recovery == Recovery::FailFast
                        || errors.len() >= self.options.max_errors
                    {
                        break;
                    }
                    self.synchronize(start);
                }
            }
        }

        (
            SourceFile {
                statements,
                location,
            },
            errors,
        )
    }

    // ===== Recovery =====

    /// Skip past a failed statement that began at token `start`.
    ///
    /// Braces are counted from the start of the statement so that action
    /// keywords nested inside a broken policy body are not mistaken for
    /// statement boundaries.
    fn synchronize(&mut self, start: usize) {
        let failed_at = self.current;
        let last = self.tokens.len() - 1;
        let mut depth: isize = 0;
        let mut index = start;

        while index < last {
            let kind = self.tokens[index].kind;
            if index > start && index >= failed_at && depth <= 0 && starts_statement(&kind) {
                break;
            }
            match kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => depth -= 1,
                _ => {}
            }
            index += 1;
        }

        log::debug!(
            "resynchronized at {} ({})",
            self.tokens[index].location,
            self.tokens[index].describe()
        );
        self.current = index;
        self.depth = 0;
    }

    // ===== Statements =====

    fn statement(&mut self) -> ParseResult<Statement> {
        log::debug!("statement {} at {}", self.peek().describe(), self.peek().location);

        match self.peek().kind {
            TokenKind::Keyword(Keyword::Policy) => self.policy_declaration().map(Statement::Policy),
            TokenKind::Keyword(Keyword::Default) => {
                self.default_statement().map(Statement::Default)
            }
            TokenKind::Keyword(Keyword::Use) => self.use_statement().map(Statement::Use),
            TokenKind::Keyword(keyword) if keyword.is_action() => {
                self.action_block().map(Statement::Action)
            }
            _ => Err(self.unexpected(&["`POLICY`", "`USE`", "`DEFAULT`", "action"])),
        }
    }

    fn policy_declaration(&mut self) -> ParseResult<PolicyDecl> {
        let location = self.advance().location.clone();
        let name = self.identifier("policy name")?;
        let version = self.scalar("policy version")?;
        let opened_at = self.consume(TokenKind::LeftBrace, &["`{`"])?.location.clone();

        let mut body = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RightBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => return Err(self.unterminated(Block::Policy, &opened_at)),
                TokenKind::Keyword(Keyword::Use) => {
                    body.push(PolicyStatement::Use(self.use_statement()?));
                }
                TokenKind::Keyword(keyword) if keyword.is_action() => {
                    body.push(PolicyStatement::Action(self.action_block()?));
                }
                TokenKind::Keyword(Keyword::Default) => {
                    return Err(self
                        .unexpected(&["`USE`", "action", "`}`"])
                        .with_note("`DEFAULT` is only allowed at top level"));
                }
                _ => return Err(self.unexpected(&["`USE`", "action", "`}`"])),
            }
        }

        Ok(PolicyDecl {
            name,
            version,
            body,
            location,
        })
    }

    fn use_statement(&mut self) -> ParseResult<UseStatement> {
        let location = self.advance().location.clone();
        let name = self.identifier("policy name")?;
        let version = self.scalar("policy version")?;

        Ok(UseStatement {
            name,
            version,
            location,
        })
    }

    fn default_statement(&mut self) -> ParseResult<DefaultStatement> {
        let location = self.advance().location.clone();
        let action = self.action()?;

        Ok(DefaultStatement { action, location })
    }

    fn action_block(&mut self) -> ParseResult<ActionBlock> {
        let action = self.action()?;
        let location = action.location.clone();
        let opened_at = self.consume(TokenKind::LeftBrace, &["`{`"])?.location.clone();
        let filters = self.braced_list(Block::Action, &opened_at, Self::syscall_filter)?;

        Ok(ActionBlock {
            action,
            filters,
            location,
        })
    }

    fn action(&mut self) -> ParseResult<Action> {
        let keyword = match self.peek().kind {
            TokenKind::Keyword(keyword) if keyword.is_action() => keyword,
            _ => return Err(self.unexpected(&["action"])),
        };
        let location = self.advance().location.clone();

        let kind = match keyword {
            Keyword::Allow => ActionKind::Allow,
            Keyword::Log => ActionKind::Log,
            Keyword::KillProcess => ActionKind::KillProcess,
            Keyword::KillThread => ActionKind::KillThread,
            Keyword::UserNotif => ActionKind::UserNotif,
            Keyword::Errno => ActionKind::Errno(self.action_argument(|p| p.scalar("errno value"))?),
            Keyword::Trap => {
                ActionKind::Trap(self.action_argument(|p| p.integer_literal("trap code"))?)
            }
            Keyword::Trace => {
                ActionKind::Trace(self.action_argument(|p| p.integer_literal("trace code"))?)
            }
            Keyword::Policy | Keyword::Use | Keyword::Default => {
                return Err(ParseError::unexpected(
                    format!("keyword `{}`", keyword),
                    &["action"],
                    location,
                ))
            }
        };

        Ok(Action { kind, location })
    }

    /// `( argument )` after `ERRNO`, `TRAP` or `TRACE`
    fn action_argument<T>(
        &mut self,
        argument: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let opened_at = self.consume(TokenKind::LeftParen, &["`(`"])?.location.clone();
        let value = argument(self)?;
        self.close(Block::ActionArgument, &opened_at)?;
        Ok(value)
    }

    fn syscall_filter(&mut self) -> ParseResult<SyscallFilter> {
        let syscall = self.identifier("syscall name")?;
        let location = syscall.location.clone();

        let clause = match self.peek().kind {
            TokenKind::LeftParen => Some(self.filter_clause(&syscall)?),
            TokenKind::LeftBrace => {
                return Err(ParseError::InvalidFilterClause {
                    syscall: syscall.name,
                    message: "has a condition block but no parameter list".to_string(),
                    location: self.peek().location.clone(),
                })
            }
            _ => None,
        };

        Ok(SyscallFilter {
            syscall,
            clause,
            location,
        })
    }

    /// `( params ) { conditions }`; the two bracket pairs come together
    fn filter_clause(&mut self, syscall: &Identifier) -> ParseResult<FilterClause> {
        let location = self.advance().location.clone();

        let mut parameters = Vec::new();
        loop {
            if self.is_at_end() {
                return Err(self.unterminated(Block::Parameters, &location));
            }
            parameters.push(self.identifier("parameter name")?);
            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RightParen => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => return Err(self.unterminated(Block::Parameters, &location)),
                _ => return Err(self.unexpected(&["`,`", "`)`"])),
            }
        }

        if !self.check(TokenKind::LeftBrace) {
            return Err(ParseError::InvalidFilterClause {
                syscall: syscall.name.clone(),
                message: "has a parameter list but no condition block".to_string(),
                location: self.peek().location.clone(),
            });
        }
        let opened_at = self.advance().location.clone();
        let conditions = self.braced_list(Block::Conditions, &opened_at, Self::bool_expr)?;

        Ok(FilterClause {
            parameters,
            conditions,
            location,
        })
    }

    /// Items up to the closing `}` of `block`, shaped `(item ',')* item?`
    fn braced_list<T>(
        &mut self,
        block: Block,
        opened_at: &SourceLocation,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut items = Vec::new();

        loop {
            match self.peek().kind {
                TokenKind::RightBrace => {
                    self.advance();
                    return Ok(items);
                }
                TokenKind::Eof => return Err(self.unterminated(block, opened_at)),
                _ => {}
            }

            items.push(item(self)?);

            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RightBrace => {
                    self.advance();
                    return Ok(items);
                }
                TokenKind::Eof => return Err(self.unterminated(block, opened_at)),
                _ => return Err(self.unexpected(&["`,`", "`}`"])),
            }
        }
    }

    // ===== Terminals =====

    pub(super) fn identifier(&mut self, what: &str) -> ParseResult<Identifier> {
        match self.peek().kind {
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Identifier {
                    name: token.lexeme.clone(),
                    location: token.location.clone(),
                })
            }
            TokenKind::Keyword(keyword) => Err(self
                .unexpected(&[what])
                .with_note(format!("`{}` is a reserved keyword", keyword))),
            _ => Err(self.unexpected(&[what])),
        }
    }

    pub(super) fn integer_literal(&mut self, what: &str) -> ParseResult<IntegerLiteral> {
        match self.peek().kind {
            TokenKind::Integer { radix, value } => {
                let token = self.advance();
                Ok(IntegerLiteral {
                    value,
                    radix,
                    raw: token.lexeme.clone(),
                    location: token.location.clone(),
                })
            }
            _ => Err(self.unexpected(&[what])),
        }
    }

    /// Integer literal or identifier
    fn scalar(&mut self, what: &str) -> ParseResult<Scalar> {
        match self.peek().kind {
            TokenKind::Integer { .. } => self.integer_literal(what).map(Scalar::Integer),
            _ => self.identifier(what).map(Scalar::Name),
        }
    }

    // ===== Helper Methods =====

    /// Consume the closing token of `block`
    pub(super) fn close(&mut self, block: Block, opened_at: &SourceLocation) -> ParseResult<()> {
        let closing = match block.closing() {
            "}" => TokenKind::RightBrace,
            _ => TokenKind::RightParen,
        };

        if self.match_token(closing) {
            Ok(())
        } else if self.is_at_end() {
            Err(self.unterminated(block, opened_at))
        } else {
            let expected = format!("`{}`", block.closing());
            Err(self.unexpected(&[expected.as_str()]))
        }
    }

    /// Run `inner` one nesting level deeper, failing past the configured limit
    pub(super) fn nested<T>(
        &mut self,
        location: &SourceLocation,
        inner: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.options.max_depth,
                location: location.clone(),
            });
        }
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(super) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Token `offset` positions ahead, clamped to the final `Eof`
    pub(super) fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, kind: TokenKind, expected: &[&str]) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(super) fn unexpected(&self, expected: &[&str]) -> ParseError {
        let token = self.peek();
        ParseError::unexpected(token.describe(), expected, token.location.clone())
    }

    fn unterminated(&self, block: Block, opened_at: &SourceLocation) -> ParseError {
        ParseError::UnterminatedBlock {
            block,
            opened_at: opened_at.clone(),
            location: self.peek().location.clone(),
        }
    }
}

/// Tokens the parser can resume at after an error
fn starts_statement(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_with(source: &str, options: ParserOptions) -> (SourceFile, Vec<ParseError>) {
        let tokens = Lexer::new(source, None).tokenize().unwrap();
        Parser::with_options(tokens, options).parse()
    }

    fn parse_ok(source: &str) -> SourceFile {
        let (ast, errors) = parse_with(source, ParserOptions::default());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        ast
    }

    fn parse_err(source: &str) -> ParseError {
        let (_, mut errors) = parse_with(source, ParserOptions::default());
        assert_eq!(errors.len(), 1, "expected exactly one error");
        errors.remove(0)
    }

    #[test]
    fn test_empty_source() {
        let ast = parse_ok("");
        assert!(ast.statements.is_empty());
        let ast = parse_ok("// nothing here\n/* at all */");
        assert!(ast.statements.is_empty());
    }

    #[test]
    fn test_policy_declaration() {
        let ast = parse_ok("POLICY my_policy 1 {\n  USE base_policy v2\n}");
        assert_eq!(ast.statements.len(), 1);

        let Statement::Policy(policy) = &ast.statements[0] else {
            panic!("expected policy, got {:?}", ast.statements[0]);
        };
        assert_eq!(policy.name.name, "my_policy");
        assert_eq!(policy.version.text(), "1");
        assert_eq!(policy.location, SourceLocation::new(1, 1, 0, None));

        let PolicyStatement::Use(use_stmt) = &policy.body[0] else {
            panic!("expected use statement");
        };
        assert_eq!(use_stmt.name.name, "base_policy");
        assert!(matches!(&use_stmt.version, Scalar::Name(v) if v.name == "v2"));
    }

    #[test]
    fn test_version_keeps_literal_text() {
        let ast = parse_ok("POLICY p 0x0A { }");
        let Statement::Policy(policy) = &ast.statements[0] else {
            panic!("expected policy");
        };
        match &policy.version {
            Scalar::Integer(lit) => {
                assert_eq!(lit.raw, "0x0A");
                assert_eq!(lit.value, 10);
            }
            other => panic!("expected integer version, got {:?}", other),
        }
    }

    #[test]
    fn test_top_level_statements() {
        let ast = parse_ok("USE base 1\nLOG { open }\nDEFAULT ERRNO(EPERM)");
        assert!(matches!(ast.statements[0], Statement::Use(_)));
        assert!(matches!(ast.statements[1], Statement::Action(_)));
        let Statement::Default(default) = &ast.statements[2] else {
            panic!("expected default statement");
        };
        assert!(matches!(&default.action.kind, ActionKind::Errno(Scalar::Name(n)) if n.name == "EPERM"));
    }

    #[test]
    fn test_all_actions() {
        let ast = parse_ok(
            "ALLOW {} LOG {} KILL_PROCESS {} KILL_THREAD {} USER_NOTIF {}
             ERRNO(1) {} TRAP(2) {} TRACE(0x10) {}",
        );
        let kinds: Vec<&ActionKind> = ast
            .statements
            .iter()
            .map(|stmt| match stmt {
                Statement::Action(block) => &block.action.kind,
                other => panic!("expected action block, got {:?}", other),
            })
            .collect();

        assert_eq!(kinds[0], &ActionKind::Allow);
        assert_eq!(kinds[1], &ActionKind::Log);
        assert_eq!(kinds[2], &ActionKind::KillProcess);
        assert_eq!(kinds[3], &ActionKind::KillThread);
        assert_eq!(kinds[4], &ActionKind::UserNotif);
        assert!(matches!(kinds[5], ActionKind::Errno(Scalar::Integer(lit)) if lit.value == 1));
        assert!(matches!(kinds[6], ActionKind::Trap(lit) if lit.value == 2));
        assert!(matches!(kinds[7], ActionKind::Trace(lit) if lit.value == 16));
    }

    #[test]
    fn test_trap_requires_integer() {
        let err = parse_err("TRAP(SIGSYS) { read }");
        assert!(matches!(err, ParseError::UnexpectedToken { ref expected, .. } if expected == &["trap code"]));
    }

    #[test]
    fn test_filter_order_is_preserved() {
        let ast = parse_ok("ALLOW { write, read, close, }");
        let Statement::Action(block) = &ast.statements[0] else {
            panic!("expected action block");
        };
        let names: Vec<&str> = block.filters.iter().map(|f| f.syscall.name.as_str()).collect();
        assert_eq!(names, vec!["write", "read", "close"]);
        assert!(block.filters.iter().all(|f| f.clause.is_none()));
    }

    #[test]
    fn test_bare_comma_is_rejected() {
        let err = parse_err("ALLOW { , }");
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "`,`"));

        let err = parse_err("ALLOW { read,, write }");
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "`,`"));
    }

    #[test]
    fn test_missing_comma_between_filters() {
        let err = parse_err("ALLOW { read write }");
        match err {
            ParseError::UnexpectedToken {
                found, expected, ..
            } => {
                assert_eq!(found, "identifier `write`");
                assert_eq!(expected, vec!["`,`", "`}`"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_filter_with_conditions() {
        let ast = parse_ok("ALLOW { mmap(addr, len, prot) { prot == 1, len < 4096, } }");
        let Statement::Action(block) = &ast.statements[0] else {
            panic!("expected action block");
        };
        let clause = block.filters[0].clause.as_ref().unwrap();
        let params: Vec<&str> = clause.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["addr", "len", "prot"]);
        assert_eq!(clause.conditions.len(), 2);
        assert_eq!(clause.conditions[1].to_sexpr(), "(< len 4096)");
    }

    #[test]
    fn test_empty_condition_block_is_unconditional() {
        let ast = parse_ok("ALLOW { read(fd) { } }");
        let Statement::Action(block) = &ast.statements[0] else {
            panic!("expected action block");
        };
        let filter = &block.filters[0];
        assert_eq!(filter.clause.as_ref().unwrap().parameters.len(), 1);
        assert!(filter.clause.as_ref().unwrap().conditions.is_empty());
        assert!(filter.is_unconditional());
    }

    #[test]
    fn test_parameters_without_conditions() {
        let err = parse_err("ALLOW { read(fd), write }");
        match err {
            ParseError::InvalidFilterClause {
                syscall, location, ..
            } => {
                assert_eq!(syscall, "read");
                assert_eq!(location.column, 17);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_conditions_without_parameters() {
        let err = parse_err("ALLOW { read { fd == 0 } }");
        assert!(matches!(err, ParseError::InvalidFilterClause { ref syscall, .. } if syscall == "read"));
    }

    #[test]
    fn test_empty_parameter_list() {
        let err = parse_err("ALLOW { read() { } }");
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "`)`"));
    }

    #[test]
    fn test_keyword_as_policy_name() {
        let err = parse_err("POLICY ALLOW 1 { }");
        match err {
            ParseError::UnexpectedToken {
                found,
                note,
                location,
                ..
            } => {
                assert_eq!(found, "keyword `ALLOW`");
                assert_eq!(note.as_deref(), Some("`ALLOW` is a reserved keyword"));
                assert_eq!(location.column, 8);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_keyword_as_syscall_name() {
        let err = parse_err("ALLOW { TRACE }");
        assert!(matches!(err, ParseError::UnexpectedToken { ref note, .. } if note.is_some()));
    }

    #[test]
    fn test_unterminated_policy() {
        let err = parse_err("POLICY p 1 { ALLOW { read(fd) { } }");
        match err {
            ParseError::UnterminatedBlock {
                block, opened_at, ..
            } => {
                assert_eq!(block, Block::Policy);
                assert_eq!(opened_at, SourceLocation::new(1, 12, 11, None));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_inner_blocks() {
        let cases = [
            ("ALLOW { read", Block::Action),
            ("ALLOW { read(fd", Block::Parameters),
            ("ALLOW { read(fd) { fd == 1", Block::Conditions),
            ("ERRNO(1", Block::ActionArgument),
            ("ALLOW { read(fd) { (fd == 1", Block::Group),
        ];
        for (source, expected) in cases {
            match parse_err(source) {
                ParseError::UnterminatedBlock { block, .. } => {
                    assert_eq!(block, expected, "for {:?}", source)
                }
                other => panic!("unexpected error {:?} for {:?}", other, source),
            }
        }
    }

    #[test]
    fn test_default_inside_policy_is_rejected() {
        let err = parse_err("POLICY p 1 { DEFAULT ALLOW }");
        match err {
            ParseError::UnexpectedToken { found, note, .. } => {
                assert_eq!(found, "keyword `DEFAULT`");
                assert_eq!(note.as_deref(), Some("`DEFAULT` is only allowed at top level"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_stray_token_at_top_level() {
        let err = parse_err("read");
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "identifier `read`"));
    }

    #[test]
    fn test_fail_fast_keeps_earlier_statements() {
        let (ast, errors) = parse_with(
            "USE a 1\nPOLICY 1 {}\nUSE b 2",
            ParserOptions::default(),
        );
        assert_eq!(ast.statements.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_resynchronize_skips_to_next_statement() {
        let options = ParserOptions::default().with_recovery(Recovery::Resynchronize);
        let (ast, errors) = parse_with(
            "POLICY p 1 { ALLOW { read(fd) { fd == } } }\n\
             POLICY q 1 { ERRNO(1) { write } }\n\
             DEFAULT ALLOW ALLOW\n\
             DEFAULT KILL_PROCESS",
            options,
        );

        // the broken policy and the action block missing its braces
        assert_eq!(errors.len(), 2);
        let names: Vec<String> = ast
            .statements
            .iter()
            .map(|stmt| match stmt {
                Statement::Policy(p) => format!("policy {}", p.name.name),
                Statement::Default(d) => format!("default {}", d.action.kind.keyword()),
                Statement::Use(_) => "use".to_string(),
                Statement::Action(b) => format!("action {}", b.action.kind.keyword()),
            })
            .collect();
        assert_eq!(
            names,
            vec!["policy q", "default ALLOW", "default KILL_PROCESS"]
        );
    }

    #[test]
    fn test_resynchronize_respects_error_cap() {
        let options = ParserOptions::default()
            .with_recovery(Recovery::Resynchronize)
            .with_max_errors(2);
        let (_, errors) = parse_with("USE 1 USE 2 USE 3 USE 4", options);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_parser_appends_missing_eof() {
        let parser = Parser::new(Vec::new());
        let (ast, errors) = parser.parse();
        assert!(ast.statements.is_empty());
        assert!(errors.is_empty());
    }
}
