use std::str::FromStr;

use crate::assembler::{directive::Directive, error::AssemblyError, pattern};

/// The assembler's pseudo-ops. `res*` forms reserve space without writing;
/// `d*` forms define memory contents. The `*s` forms hold one ASCII code per
/// word and the `*sz` forms append a single zero cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PseudoOp {
    /// Reserves argument one (default 1) words.
    Resw,
    /// Reserves space for string argument one, repeated argument two
    /// (default 1) times.
    Ress,
    /// Like `ress` with one extra word for the zero terminator.
    Ressz,
    /// Defines argument two (default 1) words holding the value of argument
    /// one.
    Dw,
    /// Defines string argument one, repeated argument two (default 1) times.
    Ds,
    /// Like `ds` with a single zero cell appended after all repetitions.
    Dsz,
}

impl PseudoOp {
    pub fn from_mnemonic(mnemonic: &str) -> Option<PseudoOp> {
        PseudoOp::from_str(mnemonic).ok()
    }

    /// How many memory cells the directive occupies.
    ///
    /// This is the one and only size computation: the resolver calls it to
    /// advance addresses before labels are known, and the encoder calls it
    /// again to lay out writes. Keeping it in one place guarantees the two
    /// passes can never disagree.
    pub fn size(self, dir: &Directive) -> Result<u32, AssemblyError> {
        match self {
            PseudoOp::Resw => count_argument(dir, &dir.operands.0, "one"),
            PseudoOp::Dw => {
                if dir.operands.0.is_empty() {
                    Ok(1)
                } else {
                    count_argument(dir, &dir.operands.1, "two")
                }
            }
            PseudoOp::Ress | PseudoOp::Ds => string_size(dir),
            PseudoOp::Ressz | PseudoOp::Dsz => {
                let size = string_size(dir)?;
                size.checked_add(1).ok_or_else(|| {
                    AssemblyError::invalid_argument(dir, "argument two is too large")
                })
            }
        }
    }
}

/// Validates a repetition/count argument. Empty text means the default of 1.
pub(crate) fn count_argument(
    dir: &Directive,
    text: &str,
    which: &str,
) -> Result<u32, AssemblyError> {
    if text.is_empty() {
        return Ok(1);
    }
    let count = pattern::parse_number(text).ok_or_else(|| {
        AssemblyError::invalid_argument(dir, format!("argument {} is not a number", which))
    })?;
    if count < 0 {
        return Err(AssemblyError::underflow(
            dir,
            format!("argument {} must be at least 0", which),
        ));
    }

    Ok(count as u32)
}

/// Checks that operand one is a quoted string and returns its unescaped
/// contents. Zero-length strings are rejected outright.
pub(crate) fn string_contents(dir: &Directive, text: &str) -> Result<String, AssemblyError> {
    if !pattern::is_string(text) {
        return Err(AssemblyError::invalid_argument(
            dir,
            "argument one is not a string",
        ));
    }
    let contents = pattern::unescape(&text[1..text.len() - 1]);
    if contents.is_empty() {
        return Err(AssemblyError::invalid_argument(
            dir,
            "string operand must not be empty",
        ));
    }

    Ok(contents)
}

fn string_size(dir: &Directive) -> Result<u32, AssemblyError> {
    let length = string_contents(dir, &dir.operands.0)?.chars().count() as u32;
    let count = count_argument(dir, &dir.operands.1, "two")?;

    length.checked_mul(count).ok_or_else(|| {
        AssemblyError::invalid_argument(dir, "argument two is too large")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(mnemonic: &str, operands: (&str, &str)) -> Directive {
        Directive {
            original: format!("{} {}, {}", mnemonic, operands.0, operands.1),
            mnemonic: mnemonic.to_owned(),
            operands: (operands.0.to_owned(), operands.1.to_owned()),
            ..Directive::default()
        }
    }

    #[test]
    fn test_from_mnemonic() {
        assert_eq!(PseudoOp::from_mnemonic("resw"), Some(PseudoOp::Resw));
        assert_eq!(PseudoOp::from_mnemonic("dsz"), Some(PseudoOp::Dsz));
        assert_eq!(PseudoOp::from_mnemonic("add"), None);
        assert_eq!(PseudoOp::from_mnemonic(""), None);
    }

    #[test]
    fn test_sizes() {
        let tests = vec![
            (PseudoOp::Resw, ("", ""), 1),
            (PseudoOp::Resw, ("3", ""), 3),
            (PseudoOp::Resw, ("0", ""), 0),
            (PseudoOp::Dw, ("", ""), 1),
            (PseudoOp::Dw, ("7", ""), 1),
            (PseudoOp::Dw, ("7", "3"), 3),
            (PseudoOp::Ress, ("\"abc\"", ""), 3),
            (PseudoOp::Ress, ("\"ab\"", "4"), 8),
            (PseudoOp::Ressz, ("\"abc\"", ""), 4),
            (PseudoOp::Ds, ("\"ab\"", "2"), 4),
            (PseudoOp::Dsz, ("\"ab\"", "2"), 5),
            (PseudoOp::Ds, ("'a\\tb'", ""), 3), // escapes collapse
        ];
        for (op, operands, expected) in tests {
            let dir = directive(&op.to_string(), operands);
            assert_eq!(op.size(&dir), Ok(expected), "{op} {operands:?}");
        }
    }

    #[test]
    fn test_size_errors() {
        let negative = directive("resw", ("-1", ""));
        assert!(matches!(
            PseudoOp::Resw.size(&negative),
            Err(AssemblyError::Underflow { .. })
        ));

        let not_a_number = directive("dw", ("7", "many"));
        assert!(matches!(
            PseudoOp::Dw.size(&not_a_number),
            Err(AssemblyError::InvalidArgument { .. })
        ));

        let not_a_string = directive("ds", ("42", ""));
        assert!(matches!(
            PseudoOp::Ds.size(&not_a_string),
            Err(AssemblyError::InvalidArgument { .. })
        ));

        let empty_string = directive("ds", ("\"\"", ""));
        assert!(matches!(
            PseudoOp::Ds.size(&empty_string),
            Err(AssemblyError::InvalidArgument { .. })
        ));
    }
}
