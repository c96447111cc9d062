//! Printf-style substitution used by [`crate::Printer`].
//!
//! The verb set mirrors the classic C/Go family: `%v %s %d %f %e %g %q %x %X
//! %o %b %c %t` plus the `%%` escape. Flags (`- + # 0 space`), width,
//! `.precision` and explicit 1-based argument indexes (`%[2]d`) are accepted.
//! Problems never abort rendering; they are written inline instead:
//!
//! | situation | output |
//! |---|---|
//! | not enough arguments | `%!d(MISSING)` |
//! | verb does not fit the value | `%!d(string=tom)` |
//! | index outside the argument list | `%!d(BADINDEX)` |
//! | template ends after `%` | `%!(NOVERB)` |
//! | width above one million | `%!(BADWIDTH)`, value printed unpadded |
//! | precision above one million | `%!(BADPREC)`, default precision |
//! | unused arguments | `%!(EXTRA int=3, string=x)` |

use std::fmt::Write as _;

use crate::Arg;

/// Largest width or precision honoured.
const MAX_AMOUNT: usize = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    minus: bool,
    plus: bool,
    sharp: bool,
    zero: bool,
    space: bool,
}

#[derive(Debug, Clone, Copy)]
struct Directive {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

/// Outcome of a width or precision.
enum Amount {
    Valid(usize),
    TooLarge,
}

/// Outcome of an explicit `[n]` index.
enum Index {
    Valid(usize),
    Bad,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn flags(&mut self) -> Flags {
        let mut flags = Flags::default();
        loop {
            match self.peek() {
                Some('-') => flags.minus = true,
                Some('+') => flags.plus = true,
                Some('#') => flags.sharp = true,
                Some('0') => flags.zero = true,
                Some(' ') => flags.space = true,
                _ => return flags,
            }
            self.pos += 1;
        }
    }

    fn digits(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn number(&mut self) -> Option<Amount> {
        let digits = self.digits()?;
        Some(match digits.parse::<usize>() {
            Ok(n) if n <= MAX_AMOUNT => Amount::Valid(n),
            _ => Amount::TooLarge,
        })
    }

    /// Parses `[n]` when present; `None` means no bracket at all.
    fn index(&mut self, arg_count: usize) -> Option<Index> {
        if !self.eat('[') {
            return None;
        }
        let digits = self.digits();
        if !self.eat(']') {
            return Some(Index::Bad);
        }
        let index = digits
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|&n| n >= 1 && n <= arg_count)
            .map(|n| Index::Valid(n - 1))
            .unwrap_or(Index::Bad);
        Some(index)
    }
}

/// Substitutes `args` into `template`.
/// （將參數代入格式樣板。）
pub fn sprintf(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut next = 0usize;
    let mut reordered = false;
    let mut rest = template;

    while let Some(offset) = rest.find('%') {
        out.push_str(&rest[..offset]);
        let mut cursor = Cursor::new(&rest[offset + 1..]);

        let flags = cursor.flags();
        let mut index = cursor.index(args.len());
        let width = match cursor.number() {
            Some(Amount::Valid(n)) => Some(n),
            Some(Amount::TooLarge) => {
                out.push_str("%!(BADWIDTH)");
                None
            }
            None => None,
        };
        let precision = if cursor.eat('.') {
            match cursor.number() {
                Some(Amount::Valid(n)) => Some(n),
                Some(Amount::TooLarge) => {
                    out.push_str("%!(BADPREC)");
                    None
                }
                None => Some(0),
            }
        } else {
            None
        };
        if index.is_none() {
            index = cursor.index(args.len());
        }

        let Some(verb) = cursor.bump() else {
            out.push_str("%!(NOVERB)");
            rest = "";
            break;
        };
        rest = cursor.rest();

        if verb == '%' {
            out.push('%');
            continue;
        }

        let arg_num = match index {
            None => next,
            Some(Index::Valid(n)) => {
                reordered = true;
                n
            }
            Some(Index::Bad) => {
                reordered = true;
                let _ = write!(out, "%!{verb}(BADINDEX)");
                continue;
            }
        };

        let directive = Directive {
            flags,
            width,
            precision,
            verb,
        };
        match args.get(arg_num) {
            Some(arg) => {
                write_arg(&mut out, arg, &directive);
                next = arg_num + 1;
            }
            None => {
                let _ = write!(out, "%!{verb}(MISSING)");
            }
        }
    }
    out.push_str(rest);

    if !reordered && next < args.len() {
        out.push_str("%!(EXTRA ");
        for (idx, arg) in args[next..].iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={}", arg.type_name(), arg);
        }
        out.push(')');
    }
    out
}

fn write_arg(out: &mut String, arg: &Arg, directive: &Directive) {
    let rendered = match arg {
        Arg::Int(value) => integer(i128::from(*value), directive),
        Arg::Uint(value) => integer(i128::from(*value), directive),
        Arg::Float(value) => float(*value, directive),
        Arg::Bool(value) => match directive.verb {
            't' | 'v' => Some(pad(value.to_string(), directive)),
            _ => None,
        },
        Arg::Char(value) => match directive.verb {
            'c' | 'v' | 's' => Some(pad(value.to_string(), directive)),
            'q' => Some(pad(format!("{value:?}"), directive)),
            _ => integer(i128::from(u32::from(*value)), directive),
        },
        Arg::Str(value) => string(value, directive),
    };
    match rendered {
        Some(text) => out.push_str(&text),
        None => {
            let _ = write!(out, "%!{}({}={})", directive.verb, arg.type_name(), arg);
        }
    }
}

fn integer(value: i128, directive: &Directive) -> Option<String> {
    let magnitude = value.unsigned_abs();
    let (digits, prefix) = match directive.verb {
        'd' | 'v' => (magnitude.to_string(), ""),
        'x' => (format!("{magnitude:x}"), "0x"),
        'X' => (format!("{magnitude:X}"), "0X"),
        'o' => (format!("{magnitude:o}"), "0"),
        'b' => (format!("{magnitude:b}"), "0b"),
        'c' | 'q' => {
            let ch = u32::try_from(value)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            let text = if directive.verb == 'c' {
                ch.to_string()
            } else {
                format!("{ch:?}")
            };
            return Some(pad(text, directive));
        }
        _ => return None,
    };

    let mut digits = digits;
    if let Some(precision) = directive.precision {
        if digits.len() < precision {
            digits = format!("{}{digits}", "0".repeat(precision - digits.len()));
        }
    }

    let mut head = String::new();
    if value < 0 {
        head.push('-');
    } else if directive.flags.plus {
        head.push('+');
    } else if directive.flags.space {
        head.push(' ');
    }
    if directive.flags.sharp && directive.verb != 'd' && directive.verb != 'v' {
        head.push_str(prefix);
    }

    Some(pad_number(head, digits, directive))
}

fn float(value: f64, directive: &Directive) -> Option<String> {
    if value.is_nan() {
        return Some(pad("NaN".to_string(), directive));
    }
    if value.is_infinite() {
        let text = if value < 0.0 {
            "-Inf"
        } else if directive.flags.plus {
            "+Inf"
        } else {
            "Inf"
        };
        return Some(pad(text.to_string(), directive));
    }

    let magnitude = value.abs();
    let body = match directive.verb {
        'f' | 'F' => format!("{:.*}", directive.precision.unwrap_or(6), magnitude),
        'e' => exponent(magnitude, directive.precision.unwrap_or(6), false),
        'E' => exponent(magnitude, directive.precision.unwrap_or(6), true),
        'g' | 'G' | 'v' => general(magnitude, directive.precision, directive.verb == 'G'),
        _ => return None,
    };

    let mut head = String::new();
    if value.is_sign_negative() && value != 0.0 {
        head.push('-');
    } else if directive.flags.plus {
        head.push('+');
    } else if directive.flags.space {
        head.push(' ');
    }
    Some(pad_number(head, body, directive))
}

fn exponent(value: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, value);
    normalize_exponent(&raw, upper)
}

/// Rewrites Rust's `1.5e3` exponent notation to the `1.5e+03` form.
fn normalize_exponent(raw: &str, upper: bool) -> String {
    let Some((mantissa, exp)) = raw.split_once('e') else {
        return raw.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:02}", exp.abs())
}

fn general(value: f64, precision: Option<usize>, upper: bool) -> String {
    match precision {
        None => {
            if value == 0.0 || (1e-4..1e6).contains(&value) {
                format!("{value}")
            } else {
                normalize_exponent(&format!("{value:e}"), upper)
            }
        }
        Some(precision) => {
            let significant = precision.max(1);
            if value == 0.0 {
                return "0".to_string();
            }
            let exp = value.log10().floor() as i64;
            if exp < -4 || exp >= significant as i64 {
                let raw = format!("{:.*e}", significant - 1, value);
                let (mantissa, tail) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
                let trimmed = trim_fraction(mantissa);
                normalize_exponent(&format!("{trimmed}e{tail}"), upper)
            } else {
                let decimals = (significant as i64 - 1 - exp).max(0) as usize;
                trim_fraction(&format!("{:.*}", decimals, value)).to_string()
            }
        }
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn string(value: &str, directive: &Directive) -> Option<String> {
    let truncated: String = match directive.precision {
        Some(precision) => value.chars().take(precision).collect(),
        None => value.to_string(),
    };
    let text = match directive.verb {
        's' | 'v' => truncated,
        'q' => format!("{truncated:?}"),
        'x' => truncated.bytes().map(|byte| format!("{byte:02x}")).collect(),
        'X' => truncated.bytes().map(|byte| format!("{byte:02X}")).collect(),
        _ => return None,
    };
    Some(pad(text, directive))
}

fn pad_number(head: String, digits: String, directive: &Directive) -> String {
    let len = head.chars().count() + digits.chars().count();
    match directive.width {
        Some(width) if width > len && directive.flags.zero && !directive.flags.minus => {
            format!("{head}{}{digits}", "0".repeat(width - len))
        }
        _ => pad(format!("{head}{digits}"), directive),
    }
}

fn pad(text: String, directive: &Directive) -> String {
    let len = text.chars().count();
    match directive.width {
        Some(width) if width > len => {
            let fill = " ".repeat(width - len);
            if directive.flags.minus {
                format!("{text}{fill}")
            } else {
                format!("{fill}{text}")
            }
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn substitutes_sequential_arguments() {
        assert_eq!(
            sprintf("%s has %d cat.", &args!["tom", 3]),
            "tom has 3 cat."
        );
    }

    #[test]
    fn explicit_index_selects_argument() {
        assert_eq!(sprintf("you have %[1]d items", &args![5]), "you have 5 items");
        assert_eq!(sprintf("%[2]s/%[1]s", &args!["a", "b"]), "b/a");
    }

    #[test]
    fn percent_escape_consumes_nothing() {
        assert_eq!(sprintf("100%% of %d", &args![7]), "100% of 7");
    }

    #[test]
    fn missing_argument_is_marked_inline() {
        assert_eq!(sprintf("%s and %d", &args!["x"]), "x and %!d(MISSING)");
    }

    #[test]
    fn extra_arguments_are_reported() {
        assert_eq!(
            sprintf("only %d", &args![1, 2, "z"]),
            "only 1%!(EXTRA int=2, string=z)"
        );
        assert_eq!(sprintf("%[1]d", &args![1, 2]), "1");
    }

    #[test]
    fn wrong_verb_and_bad_index_are_marked() {
        assert_eq!(sprintf("%d", &args!["tom"]), "%!d(string=tom)");
        assert_eq!(sprintf("%[3]d", &args![1]), "%!d(BADINDEX)");
        assert_eq!(sprintf("tail %", &args![]), "tail %!(NOVERB)");
    }

    #[test]
    fn width_precision_and_flags() {
        assert_eq!(sprintf("[%5d]", &args![42]), "[   42]");
        assert_eq!(sprintf("[%-5d]", &args![42]), "[42   ]");
        assert_eq!(sprintf("[%05d]", &args![-42]), "[-0042]");
        assert_eq!(sprintf("[%+d]", &args![7]), "[+7]");
        assert_eq!(sprintf("%.2f", &args![3.14159]), "3.14");
        assert_eq!(sprintf("%#x", &args![255]), "0xff");
        assert_eq!(sprintf("%.3s", &args!["abcdef"]), "abc");
    }

    #[test]
    fn oversized_width_and_precision_are_marked() {
        assert_eq!(sprintf("[%99999999999d]", &args![1]), "[%!(BADWIDTH)1]");
        assert_eq!(sprintf("[%1000001s]", &args!["x"]), "[%!(BADWIDTH)x]");
        assert_eq!(
            sprintf("[%.99999999999f]", &args![1.5]),
            "[%!(BADPREC)1.500000]"
        );
        assert_eq!(
            sprintf("[%5.123456789012345678901234d]", &args![7]),
            "[%!(BADPREC)    7]"
        );
        assert_eq!(sprintf("%1000000d", &args![1]).len(), 1_000_000);
    }

    #[test]
    fn floats_follow_shortest_and_exponent_forms() {
        assert_eq!(sprintf("%v", &args![2.5]), "2.5");
        assert_eq!(sprintf("%e", &args![1500.0]), "1.500000e+03");
        assert_eq!(sprintf("%v", &args![1e21]), "1e+21");
        assert_eq!(sprintf("%v", &args![1234567.0]), "1.234567e+06");
        assert_eq!(sprintf("%g", &args![0.00001]), "1e-05");
    }

    #[test]
    fn quoting_and_booleans() {
        assert_eq!(sprintf("%q", &args!["hi"]), "\"hi\"");
        assert_eq!(sprintf("%t", &args![true]), "true");
        assert_eq!(sprintf("%c", &args![65]), "A");
    }
}
