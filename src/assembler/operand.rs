use crate::{
    assembler::{
        directive::Directive,
        error::AssemblyError,
        pattern,
        resolver::{LabelTable, HERE_LABEL},
    },
    isa::{Address, Immediate, Offset, Register, ShiftAmount, Target, Word},
};

// Numeric domains of the instruction fields, inclusive.
pub const REGISTER_MAX: i64 = (1 << 6) - 1;
pub const SHIFT_MAX: i64 = (1 << 6) - 1;
pub const IMMEDIATE_MAX: i64 = (1 << 21) - 1;
pub const IMMEDIATE_MIN: i64 = -(1 << 21);
pub const OFFSET_MAX: i64 = (1 << 16) - 1;
pub const OFFSET_MIN: i64 = -(1 << 16);
pub const TARGET_MAX: i64 = (1 << 27) - 1;

/// Resolves a label reference to its address. `_HERE` resolves to the
/// address of the directive under assembly; a label table entry of the same
/// name takes precedence.
fn label_addr(dir: &Directive, labels: &LabelTable, name: &str) -> Option<Address> {
    if let Some(addr) = labels.get(name) {
        Some(*addr)
    } else if name == HERE_LABEL {
        Some(dir.address)
    } else {
        None
    }
}

/// A register operand: `%r` followed by the register number, 0 through 63.
pub fn register(dir: &Directive, text: &str) -> Result<Register, AssemblyError> {
    if !pattern::is_register(text) {
        return Err(AssemblyError::invalid_argument(
            dir,
            format!("expected '{}' to be a register", text),
        ));
    }
    let number: i64 = text[2..].parse().map_err(|_| {
        AssemblyError::invalid_argument(dir, format!("expected '{}' to be a register", text))
    })?;
    if number > REGISTER_MAX {
        return Err(AssemblyError::invalid_argument(
            dir,
            format!("register number must be between 0 and {}", REGISTER_MAX),
        ));
    }

    Ok(number as Register)
}

/// A shift/rotate amount: a numeric literal, 0 through 63.
pub fn shift_amount(dir: &Directive, text: &str) -> Result<ShiftAmount, AssemblyError> {
    let number = pattern::parse_number(text).ok_or_else(|| {
        AssemblyError::invalid_argument(
            dir,
            format!("expected '{}' to be a shift/rotate amount", text),
        )
    })?;
    if !(0..=SHIFT_MAX).contains(&number) {
        return Err(AssemblyError::invalid_argument(
            dir,
            format!("shift/rotate amount must be between 0 and {}", SHIFT_MAX),
        ));
    }

    Ok(number as ShiftAmount)
}

/// An immediate: a numeric literal, or a label resolving to its address.
pub fn immediate(
    dir: &Directive,
    labels: &LabelTable,
    text: &str,
) -> Result<Immediate, AssemblyError> {
    let value = match pattern::parse_number(text) {
        Some(number) => number,
        None => label_addr(dir, labels, text).ok_or_else(|| {
            AssemblyError::invalid_argument(
                dir,
                format!("expected '{}' to be an immediate or label", text),
            )
        })? as i64,
    };
    if !(IMMEDIATE_MIN..=IMMEDIATE_MAX).contains(&value) {
        return Err(AssemblyError::invalid_argument(
            dir,
            format!(
                "immediate must be between {} and {}",
                IMMEDIATE_MIN, IMMEDIATE_MAX
            ),
        ));
    }

    Ok(value as Immediate)
}

/// A branch offset: a numeric literal, or a label resolving to the distance
/// from the directive under assembly.
pub fn offset(dir: &Directive, labels: &LabelTable, text: &str) -> Result<Offset, AssemblyError> {
    let value = match pattern::parse_number(text) {
        Some(number) => number,
        None => {
            let addr = label_addr(dir, labels, text).ok_or_else(|| {
                AssemblyError::invalid_argument(
                    dir,
                    format!("expected '{}' to be an offset or label", text),
                )
            })?;
            addr as i64 - dir.address as i64
        }
    };
    if !(OFFSET_MIN..=OFFSET_MAX).contains(&value) {
        return Err(AssemblyError::invalid_argument(
            dir,
            format!("offset must be between {} and {}", OFFSET_MIN, OFFSET_MAX),
        ));
    }

    Ok(value as Offset)
}

/// A jump target: a numeric literal, or a label resolving to its address
/// plus one.
pub fn target(dir: &Directive, labels: &LabelTable, text: &str) -> Result<Target, AssemblyError> {
    let value = match pattern::parse_number(text) {
        Some(number) => number,
        None => {
            let addr = label_addr(dir, labels, text).ok_or_else(|| {
                AssemblyError::invalid_argument(
                    dir,
                    format!("expected '{}' to be a target or label", text),
                )
            })?;
            addr as i64 + 1
        }
    };
    if !(0..=TARGET_MAX).contains(&value) {
        return Err(AssemblyError::invalid_argument(
            dir,
            format!("target must be between 0 and {}", TARGET_MAX),
        ));
    }

    Ok(value as Target)
}

/// The cell value for `dw`: a numeric literal truncated to 32 bits, or a
/// label resolving to the distance from the directive under assembly.
pub fn define_value(
    dir: &Directive,
    labels: &LabelTable,
    text: &str,
) -> Result<Word, AssemblyError> {
    if let Some(number) = pattern::parse_number(text) {
        return Ok(number as Word);
    }
    let addr = label_addr(dir, labels, text).ok_or_else(|| {
        AssemblyError::invalid_argument(dir, "argument one is not a number or label")
    })?;

    Ok(addr.wrapping_sub(dir.address))
}
