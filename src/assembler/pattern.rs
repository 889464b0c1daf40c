use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

// Pattern fragments composed into the single directive pattern. A directive
// line is `[label:] [mnemonic [operand[, operand]]] [; comment]` followed by
// one or more newlines, matched case-insensitively.
const HWS: &str = r"(?:[\t ])*";
const RHWS: &str = r"(?:[\t ])+";
const DECNUM: &str = r"(?:[+-]?\d+)";
const HEXNUM: &str = r"(?:[+-]?0x[0-9a-f]+)";
const OCTNUM: &str = r"(?:[+-]?0[0-7]*)";
const NAME: &str = r"(?:[_a-z][_a-z0-9]*(?:\.[_a-z][_a-z0-9]*)*)";
const REG: &str = r"(?:%r\d{1,2})";
const STR1: &str = r#"(?:"(?:\\.|[^"\\\n])*")"#;
const STR2: &str = r"(?:'(?:\\.|[^'\\\n])*')";

lazy_static! {
    static ref ANYNUM: String = format!("(?:{}|{}|{})", HEXNUM, OCTNUM, DECNUM);
    static ref STR: String = format!("(?:{}|{})", STR1, STR2);
    static ref DATUM: String = format!(
        "(?:{hws}({num}|{name}|{str}|{reg}){hws})",
        hws = HWS,
        num = *ANYNUM,
        name = NAME,
        str = *STR,
        reg = REG,
    );
    static ref DATA: String = format!("(?:(?:{d}{hws},{hws})?{d})", d = *DATUM, hws = HWS);
    static ref LABEL: String = format!("(?:({}){}:{})", NAME, HWS, HWS);
    static ref INSTR: String = format!("(?:({})(?:{}({}))?)", NAME, RHWS, *DATA);
    static ref COMMENT: String = format!("(?:{};[^\n]*)", HWS);
    static ref DIRECTIVE: String = format!(
        "(?:{}{}?{}?{}?\n+)",
        HWS, *LABEL, *INSTR, *COMMENT
    );

    /// Matches one directive line; capture groups: 1 label, 2 mnemonic,
    /// 3 operand list.
    pub(crate) static ref DIRECTIVE_RE: Regex =
        Regex::new(&format!("(?i){}", *DIRECTIVE)).unwrap();
    /// Matches one operand within an operand list; capture group 1 is the
    /// operand text.
    pub(crate) static ref DATUM_RE: Regex =
        Regex::new(&format!("(?i){}", *DATUM)).unwrap();
    static ref CONSISTS_RE: Regex =
        Regex::new(&format!(r"(?i)\A(?:{})*\z", *DIRECTIVE)).unwrap();
    static ref REGISTER_RE: Regex = Regex::new(&format!(r"(?i)\A{}\z", REG)).unwrap();
    static ref STRING_RE: Regex = Regex::new(&format!(r"(?i)\A{}\z", *STR)).unwrap();
}

/// A missing final newline is treated as if one were present.
fn with_final_newline(text: &str) -> Cow<'_, str> {
    if text.is_empty() || text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{}\n", text))
    }
}

/// Returns whether the entire input consists of directive lines with no
/// leftover characters. Used as a pre-flight gate before per-line decoding.
#[tracing::instrument(skip_all)]
pub fn consists_of_directives(text: &str) -> bool {
    CONSISTS_RE.is_match(&with_final_newline(text))
}

/// Returns the byte offset of the first character that breaks directive
/// matching, or `text.len()` if the whole input is valid.
#[tracing::instrument(skip_all)]
pub fn find_first_nondirective(text: &str) -> usize {
    let normalized = with_final_newline(text);
    let mut pos = 0;

    while pos < normalized.len() {
        match DIRECTIVE_RE.find(&normalized[pos..]) {
            // Directive lines must tile the input; any gap before the next
            // match marks the offending character.
            Some(m) if m.start() == 0 => pos += m.end(),
            _ => return pos,
        }
    }

    text.len()
}

/// True iff `text` is a single register token (`%r` followed by 1-2 digits).
pub(crate) fn is_register(text: &str) -> bool {
    REGISTER_RE.is_match(text)
}

/// True iff `text` is a single quoted string operand.
pub(crate) fn is_string(text: &str) -> bool {
    STRING_RE.is_match(text)
}

/// Replaces the recognized backslash escapes (`\a \b \? \f \n \r \t \v \\`)
/// with their literal character. Unrecognized pairs pass through unchanged.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut rest = chars.clone();
        match rest.next() {
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('?') => out.push('?'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0b'),
            Some('\\') => out.push('\\'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars = rest;
    }

    out
}

/// Parses a C-style integer literal: `0x`-prefixed hex, leading-`0` octal or
/// decimal, with an optional sign. Returns `None` on malformed text so the
/// caller can fall back to label resolution.
pub fn parse_number(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.as_bytes().first()? {
        b'+' => (false, &trimmed[1..]),
        b'-' => (true, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };

    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}
