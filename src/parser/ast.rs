//! Abstract Syntax Tree definitions
//!
//! This module defines the AST node types for the policy language. Every node
//! records the location of its first token. Parenthesised groups are folded
//! into the tree shape, so there is no dedicated parenthesis node.

use crate::error::SourceLocation;
use crate::lexer::{Keyword, Radix, TokenKind};

/// Root AST node representing a complete policy file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub statements: Vec<Statement>,
    pub location: SourceLocation,
}

/// Top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `POLICY name version { ... }`
    Policy(PolicyDecl),
    /// `USE name version`
    Use(UseStatement),
    /// `DEFAULT action`
    Default(DefaultStatement),
    /// `ACTION { filters }`
    Action(ActionBlock),
}

impl Statement {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Statement::Policy(policy) => &policy.location,
            Statement::Use(stmt) => &stmt.location,
            Statement::Default(stmt) => &stmt.location,
            Statement::Action(block) => &block.location,
        }
    }
}

impl From<PolicyStatement> for Statement {
    fn from(stmt: PolicyStatement) -> Self {
        match stmt {
            PolicyStatement::Use(stmt) => Statement::Use(stmt),
            PolicyStatement::Action(block) => Statement::Action(block),
        }
    }
}

/// Statement allowed inside a policy body
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyStatement {
    Use(UseStatement),
    Action(ActionBlock),
}

/// Named, versioned policy declaration
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDecl {
    pub name: Identifier,
    pub version: Scalar,
    pub body: Vec<PolicyStatement>,
    pub location: SourceLocation,
}

/// Inclusion of another policy; the name is not resolved here
#[derive(Debug, Clone, PartialEq)]
pub struct UseStatement {
    pub name: Identifier,
    pub version: Scalar,
    pub location: SourceLocation,
}

/// Action applied to any syscall no filter matches
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultStatement {
    pub action: Action,
    pub location: SourceLocation,
}

/// An action followed by the syscall filters it applies to, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBlock {
    pub action: Action,
    pub filters: Vec<SyscallFilter>,
    pub location: SourceLocation,
}

/// Seccomp disposition with its location
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub location: SourceLocation,
}

/// Seccomp disposition
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Allow,
    Log,
    KillProcess,
    KillThread,
    UserNotif,
    /// Fail the syscall with this errno (number or symbolic name)
    Errno(Scalar),
    Trap(IntegerLiteral),
    Trace(IntegerLiteral),
}

impl ActionKind {
    /// The keyword that introduces this action
    pub fn keyword(&self) -> Keyword {
        match self {
            ActionKind::Allow => Keyword::Allow,
            ActionKind::Log => Keyword::Log,
            ActionKind::KillProcess => Keyword::KillProcess,
            ActionKind::KillThread => Keyword::KillThread,
            ActionKind::UserNotif => Keyword::UserNotif,
            ActionKind::Errno(_) => Keyword::Errno,
            ActionKind::Trap(_) => Keyword::Trap,
            ActionKind::Trace(_) => Keyword::Trace,
        }
    }
}

/// A syscall, optionally gated on its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct SyscallFilter {
    pub syscall: Identifier,
    pub clause: Option<FilterClause>,
    pub location: SourceLocation,
}

impl SyscallFilter {
    /// True when the filter matches its syscall regardless of arguments.
    ///
    /// An explicit parameter list with an empty condition block counts as
    /// unconditional.
    pub fn is_unconditional(&self) -> bool {
        self.clause
            .as_ref()
            .map_or(true, |clause| clause.conditions.is_empty())
    }
}

/// `(params) { conditions }` attached to a syscall filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Names bound to the syscall arguments, never empty
    pub parameters: Vec<Identifier>,
    pub conditions: Vec<BoolExpr>,
    pub location: SourceLocation,
}

/// Boolean expression over syscall arguments
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    Or {
        left: Box<BoolExpr>,
        right: Box<BoolExpr>,
        location: SourceLocation,
    },
    And {
        left: Box<BoolExpr>,
        right: Box<BoolExpr>,
        location: SourceLocation,
    },
    /// Two integer operands; comparisons do not chain
    Compare {
        op: CompareOp,
        left: IntExpr,
        right: IntExpr,
        location: SourceLocation,
    },
    Not {
        inner: Box<BoolExpr>,
        location: SourceLocation,
    },
}

impl BoolExpr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            BoolExpr::Or { location, .. }
            | BoolExpr::And { location, .. }
            | BoolExpr::Compare { location, .. }
            | BoolExpr::Not { location, .. } => location,
        }
    }

    /// Fully bracketed prefix form, e.g. `(|| (== a 1) (! (< b 2)))`
    pub fn to_sexpr(&self) -> String {
        match self {
            BoolExpr::Or { left, right, .. } => {
                format!("(|| {} {})", left.to_sexpr(), right.to_sexpr())
            }
            BoolExpr::And { left, right, .. } => {
                format!("(&& {} {})", left.to_sexpr(), right.to_sexpr())
            }
            BoolExpr::Compare {
                op, left, right, ..
            } => format!("({} {} {})", op.as_str(), left.to_sexpr(), right.to_sexpr()),
            BoolExpr::Not { inner, .. } => format!("(! {})", inner.to_sexpr()),
        }
    }
}

/// Integer expression over syscall arguments and constants
#[derive(Debug, Clone, PartialEq)]
pub enum IntExpr {
    Binary {
        op: IntOp,
        left: Box<IntExpr>,
        right: Box<IntExpr>,
        location: SourceLocation,
    },
    Literal(IntegerLiteral),
    Ident(Identifier),
}

impl IntExpr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            IntExpr::Binary { location, .. } => location,
            IntExpr::Literal(lit) => &lit.location,
            IntExpr::Ident(ident) => &ident.location,
        }
    }

    /// Fully bracketed prefix form, e.g. `(+ 1 (* 2 3))`
    pub fn to_sexpr(&self) -> String {
        match self {
            IntExpr::Binary {
                op, left, right, ..
            } => format!("({} {} {})", op.as_str(), left.to_sexpr(), right.to_sexpr()),
            IntExpr::Literal(lit) => lit.raw.clone(),
            IntExpr::Ident(ident) => ident.name.clone(),
        }
    }
}

/// Binary integer operators, all left-associative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOp {
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl IntOp {
    /// Lowest binding level
    pub const MIN_PRECEDENCE: u8 = 1;

    /// Binding strength: `|` 1, `^` 2, `&` 3, shifts 4, `+ -` 5, `* /` 6
    pub fn precedence(&self) -> u8 {
        match self {
            IntOp::BitOr => 1,
            IntOp::BitXor => 2,
            IntOp::BitAnd => 3,
            IntOp::ShiftLeft | IntOp::ShiftRight => 4,
            IntOp::Add | IntOp::Subtract => 5,
            IntOp::Multiply | IntOp::Divide => 6,
        }
    }

    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Pipe => Some(IntOp::BitOr),
            TokenKind::Caret => Some(IntOp::BitXor),
            TokenKind::Ampersand => Some(IntOp::BitAnd),
            TokenKind::ShiftLeft => Some(IntOp::ShiftLeft),
            TokenKind::ShiftRight => Some(IntOp::ShiftRight),
            TokenKind::Plus => Some(IntOp::Add),
            TokenKind::Minus => Some(IntOp::Subtract),
            TokenKind::Star => Some(IntOp::Multiply),
            TokenKind::Slash => Some(IntOp::Divide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntOp::BitOr => "|",
            IntOp::BitXor => "^",
            IntOp::BitAnd => "&",
            IntOp::ShiftLeft => "<<",
            IntOp::ShiftRight => ">>",
            IntOp::Add => "+",
            IntOp::Subtract => "-",
            IntOp::Multiply => "*",
            IntOp::Divide => "/",
        }
    }
}

/// Comparison operators binding two integer operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl CompareOp {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Equal => Some(CompareOp::Equal),
            TokenKind::NotEqual => Some(CompareOp::NotEqual),
            TokenKind::Less => Some(CompareOp::Less),
            TokenKind::Greater => Some(CompareOp::Greater),
            TokenKind::LessEqual => Some(CompareOp::LessEqual),
            TokenKind::GreaterEqual => Some(CompareOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessEqual => "<=",
            CompareOp::GreaterEqual => ">=",
        }
    }
}

/// Integer literal with its decoded value and verbatim source text
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub radix: Radix,
    pub raw: String,
    pub location: SourceLocation,
}

/// Name that is not a reserved keyword
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub location: SourceLocation,
}

/// Integer-or-name operand used for versions and `ERRNO` values
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(IntegerLiteral),
    Name(Identifier),
}

impl Scalar {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Scalar::Integer(lit) => &lit.location,
            Scalar::Name(ident) => &ident.location,
        }
    }

    /// Source text of the operand
    pub fn text(&self) -> &str {
        match self {
            Scalar::Integer(lit) => &lit.raw,
            Scalar::Name(ident) => &ident.name,
        }
    }
}
