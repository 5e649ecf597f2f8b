//! Parser configuration

/// What the parser does after a statement fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recovery {
    /// Stop at the first error
    #[default]
    FailFast,
    /// Skip to the next `POLICY`, `USE`, `DEFAULT` or action keyword at
    /// brace depth zero and keep parsing
    Resynchronize,
}

/// Limits and error policy for a single parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting of parenthesised groups and `!` operators
    pub max_depth: usize,
    pub recovery: Recovery,
    /// Parsing stops once this many errors have been collected
    pub max_errors: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_MAX_ERRORS: usize = 100;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors.max(1);
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            recovery: Recovery::default(),
            max_errors: Self::DEFAULT_MAX_ERRORS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.max_depth, 64);
        assert_eq!(options.recovery, Recovery::FailFast);
        assert_eq!(options.max_errors, 100);
    }

    #[test]
    fn test_builder() {
        let options = ParserOptions::default()
            .with_max_depth(8)
            .with_recovery(Recovery::Resynchronize)
            .with_max_errors(0);
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.recovery, Recovery::Resynchronize);
        // at least one error is always reported
        assert_eq!(options.max_errors, 1);
    }
}
