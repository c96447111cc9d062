//! Plural-form selection for printf-style messages.
//!
//! A [`RuleSet`] is a list of positional comparisons (`%[1]d=1`, `%[1]d>1`)
//! each paired with a template. [`resolve`] evaluates the rules against the
//! call arguments, swaps in the first matching template and trims the
//! argument list to what that template consumes.

mod resolve;
mod rule;

pub use resolve::{resolve, Resolved, RuleError};
pub use rule::{parse_rules, Operator, Rule, RuleSet};
