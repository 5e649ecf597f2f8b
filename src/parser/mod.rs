//! Parser module
//!
//! This module handles parsing tokens into an Abstract Syntax Tree (AST).

pub mod ast;
mod expressions;
pub mod options;
pub mod parser;

pub use ast::{
    Action, ActionBlock, ActionKind, BoolExpr, CompareOp, DefaultStatement, FilterClause,
    Identifier, IntExpr, IntOp, IntegerLiteral, PolicyDecl, PolicyStatement, Scalar, SourceFile,
    Statement, SyscallFilter, UseStatement,
};
pub use options::{ParserOptions, Recovery};
pub use parser::{ParseResult, Parser};
