//! Expression parsing implementation
//!
//! Filter conditions are two stacked grammars. Boolean expressions combine
//! comparisons with `||`, `&&` and `!`; each comparison binds exactly two
//! integer expressions, which are parsed by precedence climbing over the
//! nine binary integer operators.
//!
//! # Precedence (loosest first)
//!
//! - Boolean: `||`, `&&`, comparison, `!`, `( ... )`
//! - Integer: `|`, `^`, `&`, `<< >>`, `+ -`, `* /`
//!
//! All binary operators are left-associative. Comparisons do not chain.

use super::ast::{BoolExpr, CompareOp, IntExpr, IntOp};
use super::parser::{ParseResult, Parser};
use crate::error::Block;
use crate::lexer::TokenKind;

impl Parser {
    /// Parse a boolean expression (top-level entry point)
    pub(crate) fn bool_expr(&mut self) -> ParseResult<BoolExpr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> ParseResult<BoolExpr> {
        let mut expr = self.and_expr()?;

        while self.match_token(TokenKind::OrOr) {
            let location = expr.location().clone();
            let right = self.and_expr()?;
            expr = BoolExpr::Or {
                left: Box::new(expr),
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn and_expr(&mut self) -> ParseResult<BoolExpr> {
        let mut expr = self.not_expr()?;

        while self.match_token(TokenKind::AndAnd) {
            let location = expr.location().clone();
            let right = self.not_expr()?;
            expr = BoolExpr::And {
                left: Box::new(expr),
                right: Box::new(right),
                location,
            };
        }

        Ok(expr)
    }

    fn not_expr(&mut self) -> ParseResult<BoolExpr> {
        if self.check(TokenKind::Bang) {
            let location = self.advance().location.clone();
            let inner = self.nested(&location, Self::not_expr)?;
            return Ok(BoolExpr::Not {
                inner: Box::new(inner),
                location,
            });
        }

        self.bool_primary()
    }

    /// Parenthesised boolean expression or a comparison
    fn bool_primary(&mut self) -> ParseResult<BoolExpr> {
        if self.check(TokenKind::LeftParen) && self.group_is_boolean() {
            let opened_at = self.advance().location.clone();
            return self.nested(&opened_at, |p| {
                let expr = p.bool_expr()?;
                p.close(Block::Group, &opened_at)?;
                Ok(expr)
            });
        }

        self.comparison()
    }

    /// Decide what the `(` under the cursor opens.
    ///
    /// `(a + 1) == b` and `(a == 1) || b == 2` both start with `(`. The token
    /// after the matching `)` settles it: an operator that continues an
    /// integer expression means the group is an integer operand. A group
    /// with no matching `)` before the end of the condition is treated as
    /// boolean so the error names the open group.
    fn group_is_boolean(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;

        loop {
            let kind = self.peek_at(offset).kind;
            match kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        let after = self.peek_at(offset + 1).kind;
                        return !(after.is_comparison() || after.is_int_operator());
                    }
                }
                TokenKind::LeftBrace
                | TokenKind::RightBrace
                | TokenKind::Comma
                | TokenKind::Eof => return true,
                _ => {}
            }
            offset += 1;
        }
    }

    fn comparison(&mut self) -> ParseResult<BoolExpr> {
        let left = self.int_expr()?;
        let location = left.location().clone();

        let op = match CompareOp::from_token(&self.peek().kind) {
            Some(op) => op,
            None => return Err(self.unexpected(&["comparison operator"])),
        };
        self.advance();

        let right = self.int_expr()?;
        if self.peek().kind.is_comparison() {
            return Err(self
                .unexpected(&["`&&`", "`||`"])
                .with_note("comparison operators cannot be chained"));
        }

        Ok(BoolExpr::Compare {
            op,
            left,
            right,
            location,
        })
    }

    /// Parse an integer expression
    pub(crate) fn int_expr(&mut self) -> ParseResult<IntExpr> {
        self.int_binary(IntOp::MIN_PRECEDENCE)
    }

    /// Precedence climbing: fold operators binding at least `min_precedence`
    fn int_binary(&mut self, min_precedence: u8) -> ParseResult<IntExpr> {
        let mut left = self.int_primary()?;

        while let Some(op) = IntOp::from_token(&self.peek().kind) {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();

            // one level tighter on the right keeps equal operators left-associative
            let right = self.int_binary(op.precedence() + 1)?;
            let location = left.location().clone();
            left = IntExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    fn int_primary(&mut self) -> ParseResult<IntExpr> {
        match self.peek().kind {
            TokenKind::Integer { .. } => self.integer_literal("integer").map(IntExpr::Literal),
            TokenKind::Identifier => self.identifier("operand").map(IntExpr::Ident),
            TokenKind::LeftParen => {
                let opened_at = self.advance().location.clone();
                self.nested(&opened_at, |p| {
                    let expr = p.int_expr()?;
                    p.close(Block::Group, &opened_at)?;
                    Ok(expr)
                })
            }
            TokenKind::Keyword(keyword) => Err(self
                .unexpected(&["integer", "identifier", "`(`"])
                .with_note(format!("`{}` is a reserved keyword", keyword))),
            _ => Err(self.unexpected(&["integer", "identifier", "`(`"])),
        }
    }
}
