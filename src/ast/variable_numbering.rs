use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    analyzer::AnalyzerError,
    ast::{Expr, ExprKind},
    catalog::CompileConfig,
};

static NUMBERED_PARAMETER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\?(\d+)$").expect("parameter pattern"));

/// Assigns slots to host parameters in the order the parser meets them.
///
/// `?` takes the next free slot, `?NNN` takes slot NNN and `:name`, `$name`
/// or `@name` reuse the slot of an earlier parameter with the same name.
#[derive(Debug)]
pub struct VariableNumbering {
    count: usize,
    max: usize,
    named: IndexMap<String, usize>,
}

impl VariableNumbering {
    pub fn new(config: &CompileConfig) -> Self {
        Self { count: 0, max: config.max_variable_number, named: IndexMap::new() }
    }

    /// Highest slot handed out so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn assign(&mut self, expr: &mut Expr) -> Result<(), AnalyzerError> {
        let ExprKind::Variable { slot } = &mut expr.kind else {
            return Ok(());
        };
        let token = expr.token.as_deref().unwrap_or("?");
        if token == "?" {
            self.count += 1;
            *slot = self.count;
        } else if let Some(caps) = NUMBERED_PARAMETER.captures(token) {
            let n = caps[1].parse::<usize>().unwrap_or(0);
            if n < 1 || n > self.max {
                return Err(AnalyzerError::VariableOutOfRange { max: self.max });
            }
            self.count = self.count.max(n);
            *slot = n;
        } else if let Some(existing) = self.named.get(token) {
            *slot = *existing;
        } else {
            self.count += 1;
            *slot = self.count;
            self.named.insert(token.to_string(), self.count);
        }
        Ok(())
    }
}
