//! Indented structural dump of the syntax tree
//!
//! Every node opens on its own line, children are indented by two spaces
//! and conditions are printed in prefix form:
//!
//! ```text
//! Program {
//!   Policy net 1 {
//!     UseStatement{base 1}
//!     ERRNO{1} {
//!       socket(domain) {
//!         (== domain 2),
//!       },
//!     },
//!   },
//! }
//! ```

use crate::parser::ast::*;

struct TreePrinter {
    out: String,
    level: usize,
}

impl TreePrinter {
    fn new() -> Self {
        Self {
            out: String::new(),
            level: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.level += 1;
    }

    fn close(&mut self, trailer: &str) {
        self.level -= 1;
        self.line(&format!("}}{}", trailer));
    }

    fn program(&mut self, file: &SourceFile) {
        self.open("Program");
        for statement in &file.statements {
            match statement {
                Statement::Policy(policy) => self.policy(policy),
                Statement::Use(stmt) => self.use_statement(stmt),
                Statement::Default(stmt) => {
                    self.line(&format!("DefaultAction{{{}}}", action_label(&stmt.action)))
                }
                Statement::Action(block) => self.action_block(block),
            }
        }
        self.close("");
    }

    fn policy(&mut self, policy: &PolicyDecl) {
        self.open(&format!(
            "Policy {} {}",
            policy.name.name,
            policy.version.text()
        ));
        for stmt in &policy.body {
            match stmt {
                PolicyStatement::Use(stmt) => self.use_statement(stmt),
                PolicyStatement::Action(block) => self.action_block(block),
            }
        }
        self.close(",");
    }

    fn use_statement(&mut self, stmt: &UseStatement) {
        self.line(&format!(
            "UseStatement{{{} {}}}",
            stmt.name.name,
            stmt.version.text()
        ));
    }

    fn action_block(&mut self, block: &ActionBlock) {
        self.open(&action_label(&block.action));
        for filter in &block.filters {
            self.filter(filter);
        }
        self.close(",");
    }

    fn filter(&mut self, filter: &SyscallFilter) {
        let Some(clause) = &filter.clause else {
            self.line(&format!("{},", filter.syscall.name));
            return;
        };

        let params: Vec<&str> = clause.parameters.iter().map(|p| p.name.as_str()).collect();
        self.open(&format!("{}({})", filter.syscall.name, params.join(", ")));
        for condition in &clause.conditions {
            self.line(&format!("{},", condition.to_sexpr()));
        }
        self.close(",");
    }
}

/// `ALLOW`, `ERRNO{1}`, `TRAP{0x10}`
fn action_label(action: &Action) -> String {
    let keyword = action.kind.keyword();
    match &action.kind {
        ActionKind::Errno(value) => format!("{}{{{}}}", keyword, value.text()),
        ActionKind::Trap(code) | ActionKind::Trace(code) => format!("{}{{{}}}", keyword, code.raw),
        _ => keyword.to_string(),
    }
}

/// Render a source file as an indented tree
pub fn to_tree(file: &SourceFile) -> String {
    let mut printer = TreePrinter::new();
    printer.program(file);
    printer.out
}
