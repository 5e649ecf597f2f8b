//! Rendering the syntax tree back to policy source
//!
//! Output is canonical: one top-level statement per line, policy bodies
//! indented by two spaces, action blocks on a single line and only the
//! parentheses the grammar needs. Comments and original spacing are lost;
//! literal text is kept verbatim.

use std::fmt;

use crate::parser::ast::*;

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Policy(policy) => write!(f, "{}", policy),
            Statement::Use(stmt) => write!(f, "{}", stmt),
            Statement::Default(stmt) => write!(f, "DEFAULT {}", stmt.action),
            Statement::Action(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for PolicyDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            return write!(f, "POLICY {} {} {{}}", self.name.name, self.version.text());
        }

        writeln!(f, "POLICY {} {} {{", self.name.name, self.version.text())?;
        for stmt in &self.body {
            match stmt {
                PolicyStatement::Use(stmt) => writeln!(f, "  {}", stmt)?,
                PolicyStatement::Action(block) => writeln!(f, "  {}", block)?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for UseStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "USE {} {}", self.name.name, self.version.text())
    }
}

impl fmt::Display for ActionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return write!(f, "{} {{}}", self.action);
        }

        write!(f, "{} {{ ", self.action)?;
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", filter)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.kind.keyword();
        match &self.kind {
            ActionKind::Errno(value) => write!(f, "{}({})", keyword, value.text()),
            ActionKind::Trap(code) | ActionKind::Trace(code) => {
                write!(f, "{}({})", keyword, code.raw)
            }
            _ => write!(f, "{}", keyword),
        }
    }
}

impl fmt::Display for SyscallFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.syscall.name)?;

        let Some(clause) = &self.clause else {
            return Ok(());
        };

        let params: Vec<&str> = clause.parameters.iter().map(|p| p.name.as_str()).collect();
        write!(f, "({})", params.join(", "))?;
        if clause.conditions.is_empty() {
            return write!(f, " {{}}");
        }

        write!(f, " {{ ")?;
        for (i, condition) in clause.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", condition)?;
        }
        write!(f, " }}")
    }
}

impl BoolExpr {
    fn precedence(&self) -> u8 {
        match self {
            BoolExpr::Or { .. } => 1,
            BoolExpr::And { .. } => 2,
            BoolExpr::Compare { .. } | BoolExpr::Not { .. } => 3,
        }
    }

    fn write_operand(
        f: &mut fmt::Formatter<'_>,
        operand: &BoolExpr,
        parent: u8,
        right: bool,
    ) -> fmt::Result {
        let precedence = operand.precedence();
        if precedence < parent || (right && precedence == parent) {
            write!(f, "({})", operand)
        } else {
            write!(f, "{}", operand)
        }
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Or { left, right, .. } | BoolExpr::And { left, right, .. } => {
                let symbol = if matches!(self, BoolExpr::Or { .. }) { "||" } else { "&&" };
                Self::write_operand(f, left, self.precedence(), false)?;
                write!(f, " {} ", symbol)?;
                Self::write_operand(f, right, self.precedence(), true)
            }
            BoolExpr::Compare {
                op, left, right, ..
            } => write!(f, "{} {} {}", left, op.as_str(), right),
            BoolExpr::Not { inner, .. } => match inner.as_ref() {
                BoolExpr::Not { .. } => write!(f, "!{}", inner),
                _ => write!(f, "!({})", inner),
            },
        }
    }
}

impl fmt::Display for IntExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntExpr::Binary {
                op, left, right, ..
            } => {
                write_int_operand(f, left, op.precedence(), false)?;
                write!(f, " {} ", op.as_str())?;
                write_int_operand(f, right, op.precedence(), true)
            }
            IntExpr::Literal(lit) => write!(f, "{}", lit.raw),
            IntExpr::Ident(ident) => write!(f, "{}", ident.name),
        }
    }
}

fn write_int_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &IntExpr,
    parent: u8,
    right: bool,
) -> fmt::Result {
    match operand {
        IntExpr::Binary { op, .. }
            if op.precedence() < parent || (right && op.precedence() == parent) =>
        {
            write!(f, "({})", operand)
        }
        _ => write!(f, "{}", operand),
    }
}

/// Render a source file as canonical policy source
pub fn to_source(file: &SourceFile) -> String {
    file.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse(source: &str) -> SourceFile {
        let tokens = Lexer::new(source, None).tokenize().unwrap();
        let (ast, errors) = Parser::new(tokens).parse();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        ast
    }

    fn condition(source: &str) -> String {
        let ast = parse(&format!("ALLOW {{ f(x) {{ {} }} }}", source));
        match &ast.statements[0] {
            Statement::Action(block) => {
                block.filters[0].clause.as_ref().unwrap().conditions[0].to_string()
            }
            other => panic!("expected action block, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_parentheses() {
        assert_eq!(condition("(a + (b * c)) == 1"), "a + b * c == 1");
        assert_eq!(condition("(a + b) * c == 1"), "(a + b) * c == 1");
        assert_eq!(condition("a - (b - c) == 1"), "a - (b - c) == 1");
        assert_eq!(condition("(a - b) - c == 1"), "a - b - c == 1");
    }

    #[test]
    fn test_boolean_parentheses() {
        assert_eq!(
            condition("(a == 1 || b == 2) && c == 3"),
            "(a == 1 || b == 2) && c == 3"
        );
        assert_eq!(
            condition("a == 1 || (b == 2 && c == 3)"),
            "a == 1 || b == 2 && c == 3"
        );
        assert_eq!(condition("!a == 1"), "!(a == 1)");
        assert_eq!(condition("!!(a == 1 || b == 2)"), "!!(a == 1 || b == 2)");
    }

    #[test]
    fn test_literals_keep_their_spelling() {
        assert_eq!(condition("x & 0X0f == -0b1"), "x & 0X0f == -0b1");
        assert_eq!(condition("x - -1 > 0o17"), "x - -1 > 0o17");
    }

    #[test]
    fn test_statement_layout() {
        let source = "POLICY p 1 { USE base 2 ALLOW { read(fd) { fd >= 0 }, write, } }\n\
                      POLICY empty v1 {}\n\
                      TRAP(0x10) {}\n\
                      DEFAULT ERRNO(EPERM)";
        assert_eq!(
            to_source(&parse(source)),
            "POLICY p 1 {\n  USE base 2\n  ALLOW { read(fd) { fd >= 0 }, write }\n}\n\
             POLICY empty v1 {}\n\
             TRAP(0x10) {}\n\
             DEFAULT ERRNO(EPERM)\n"
        );
    }

    #[test]
    fn test_empty_condition_block() {
        let ast = parse("LOG { read(fd) {} }");
        assert_eq!(to_source(&ast), "LOG { read(fd) {} }\n");
    }
}
