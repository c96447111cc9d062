use std::fmt;

/// A single value handed to the printf engine.
/// （傳入格式化引擎的單一參數值。）
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl Arg {
    /// Returns the value as a signed integer when it is integer-valued and fits in `i64`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(value) => Some(*value),
            Arg::Uint(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Type label used inside inline error markers such as `%!d(string=x)`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Str(_) => "string",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(value) => write!(f, "{value}"),
            Arg::Uint(value) => write!(f, "{value}"),
            Arg::Float(value) => write!(f, "{value}"),
            Arg::Bool(value) => write!(f, "{value}"),
            Arg::Char(value) => write!(f, "{value}"),
            Arg::Str(value) => f.write_str(value),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Arg {
                fn from(value: $source) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from!(Int as i64: i8, i16, i32, i64, isize);
impl_from!(Uint as u64: u8, u16, u32, u64, usize);
impl_from!(Float as f64: f32, f64);

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

/// Builds a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use l10n_format::{args, Arg};
/// let values = args!["tom", 3];
/// assert_eq!(values, vec![Arg::Str("tom".into()), Arg::Int(3)]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_values_convert_when_in_range() {
        assert_eq!(Arg::from(7u32).as_int(), Some(7));
        assert_eq!(Arg::Uint(u64::MAX).as_int(), None);
        assert_eq!(Arg::from("7").as_int(), None);
    }

    #[test]
    fn display_matches_plain_value() {
        assert_eq!(Arg::from(-3).to_string(), "-3");
        assert_eq!(Arg::from(2.5).to_string(), "2.5");
        assert_eq!(Arg::from("tom").to_string(), "tom");
    }
}
