use l10n_format::{placeholder_count, Arg};
use thiserror::Error;
use tracing::trace;

use crate::{Rule, RuleSet};

/// Errors raised while evaluating a rule against the call arguments.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("rule position {position} is outside the {available} supplied argument(s)")]
    PositionOutOfRange { position: usize, available: usize },
    #[error("argument at position {position} is {found}, expected an integer")]
    ArgumentTypeMismatch {
        position: usize,
        found: &'static str,
    },
}

/// Template and argument slice to hand to the printer.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    pub template: &'a str,
    pub args: &'a [Arg],
}

impl<'a> Resolved<'a> {
    fn unchanged(template: &'a str, args: &'a [Arg]) -> Self {
        Self { template, args }
    }
}

/// Picks the template for this call and trims `args` to the placeholders it uses.
///
/// With no rule set the call passes through untouched. Otherwise the first
/// matching rule replaces the template (the original is kept when none
/// match) and the argument list is cut to the number of `%` markers in the
/// chosen template. When the template wants more than there are, every
/// argument is passed on and the printer marks the gap.
/// （依規則選擇樣板並裁切參數。）
pub fn resolve<'a>(
    template: &'a str,
    args: &'a [Arg],
    rules: Option<&'a RuleSet>,
) -> Result<Resolved<'a>, RuleError> {
    let Some(rules) = rules else {
        return Ok(Resolved::unchanged(template, args));
    };

    let mut selected = template;
    for rule in rules {
        let value = integer_at(args, rule)?;
        if rule.operator.matches(value, rule.threshold) {
            trace!(%rule, value, "plural rule matched");
            selected = rule.template.as_str();
            break;
        }
    }

    let wanted = placeholder_count(selected);
    Ok(Resolved {
        template: selected,
        args: &args[..wanted.min(args.len())],
    })
}

fn integer_at(args: &[Arg], rule: &Rule) -> Result<i64, RuleError> {
    let arg = rule
        .position
        .checked_sub(1)
        .and_then(|index| args.get(index))
        .ok_or(RuleError::PositionOutOfRange {
            position: rule.position,
            available: args.len(),
        })?;
    arg.as_int().ok_or(RuleError::ArgumentTypeMismatch {
        position: rule.position,
        found: arg.type_name(),
    })
}
