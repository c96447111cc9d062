use std::fmt;

use tracing::debug;

/// Comparison applied between the referenced argument and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `>`
    Gt,
}

impl Operator {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '=' => Some(Self::Eq),
            '>' => Some(Self::Gt),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Eq => '=',
            Self::Gt => '>',
        }
    }

    pub fn matches(self, value: i64, threshold: i64) -> bool {
        match self {
            Self::Eq => value == threshold,
            Self::Gt => value > threshold,
        }
    }
}

/// One conditional template-selection directive.
/// （單一條件式樣板選擇規則。）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// 1-based index into the call arguments.
    pub position: usize,
    pub operator: Operator,
    pub threshold: i64,
    pub template: String,
}

impl Rule {
    pub fn new(
        position: usize,
        operator: Operator,
        threshold: i64,
        template: impl Into<String>,
    ) -> Self {
        Self {
            position,
            operator,
            threshold,
            template: template.into(),
        }
    }

    /// Parses an expression such as `%[1]d=1` and pairs it with `template`.
    pub fn parse(expression: &str, template: impl Into<String>) -> Option<Self> {
        let (position, operator, threshold) = parse_expression(expression)?;
        Some(Self::new(position, operator, threshold, template))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]{}{} -> {:?}",
            self.position,
            self.operator.symbol(),
            self.threshold,
            self.template
        )
    }
}

/// Ordered rules, evaluated first-match-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from `(expression, template)` pairs; malformed
    /// expressions drop their pair.
    pub fn from_pairs<I, E, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, T)>,
        E: AsRef<str>,
        T: Into<String>,
    {
        let mut set = Self::new();
        for (expression, template) in pairs {
            set.push_parsed(expression.as_ref(), template.into());
        }
        set
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    fn push_parsed(&mut self, expression: &str, template: String) {
        match Rule::parse(expression, template) {
            Some(rule) => self.rules.push(rule),
            None => debug!(expression, "skipping malformed plural rule expression"),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Parses a flat `expression, template, expression, template, …` sequence.
///
/// Pairs whose expression is malformed are dropped. A trailing expression
/// without a template ends parsing; the rules gathered so far are returned.
/// （解析複數規則序列，格式錯誤的配對會被略過。）
pub fn parse_rules<I, S>(tokens: I) -> RuleSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = RuleSet::new();
    let mut tokens = tokens.into_iter();
    while let Some(expression) = tokens.next() {
        let Some(template) = tokens.next() else {
            debug!(
                expression = expression.as_ref(),
                "plural rule expression has no template, stopping"
            );
            break;
        };
        set.push_parsed(expression.as_ref(), template.as_ref().to_string());
    }
    set
}

/// Recognises `[pos]` + optional separator + `op` + `threshold` at the end of
/// `expression`. Leading text before the bracket is ignored, so `%[1]d>1`
/// and `[1]>1` are equivalent.
fn parse_expression(expression: &str) -> Option<(usize, Operator, i64)> {
    expression
        .match_indices('[')
        .find_map(|(start, _)| parse_from_bracket(&expression[start + 1..]))
}

fn parse_from_bracket(input: &str) -> Option<(usize, Operator, i64)> {
    let (position, rest) = split_digits(input)?;
    let rest = rest.strip_prefix(']')?;

    let mut chars = rest.chars();
    let rest = match chars.next() {
        Some(ch) if Operator::from_char(ch).is_none() => chars.as_str(),
        _ => rest,
    };

    let rest = trim_ascii_space(rest);
    let mut chars = rest.chars();
    let operator = Operator::from_char(chars.next()?)?;
    let rest = trim_ascii_space(chars.as_str());

    let (threshold, rest) = split_digits(rest)?;
    if !rest.is_empty() {
        return None;
    }
    Some((position.parse().ok()?, operator, threshold.parse().ok()?))
}

// Only ASCII whitespace separates the tokens.
fn trim_ascii_space(input: &str) -> &str {
    input.trim_start_matches(|c: char| c.is_ascii_whitespace())
}

fn split_digits(input: &str) -> Option<(&str, &str)> {
    let len = input.bytes().take_while(|byte| byte.is_ascii_digit()).count();
    if len == 0 {
        None
    } else {
        Some(input.split_at(len))
    }
}
