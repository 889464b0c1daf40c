use thiserror::Error;

use crate::assembler::directive::Directive;

/// Everything that can go wrong between raw source text and a finished
/// memory image. Each variant carries the offending source line so the
/// caller can print a useful diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("invalid argument in `{line}`: {reason}")]
    InvalidArgument { line: String, reason: String },

    /// A count or size argument was negative. A strict subtype of
    /// [`InvalidArgument`][AssemblyError::InvalidArgument].
    #[error("argument underflow in `{line}`: {reason}")]
    Underflow { line: String, reason: String },

    #[error("unknown instruction `{mnemonic}` in `{line}`")]
    UnknownInstruction { mnemonic: String, line: String },

    #[error("duplicate label `{label}`: defined in `{first}` and again in `{second}`")]
    DuplicateLabel {
        label: String,
        first: String,
        second: String,
    },

    /// Reserved for strict arity checking of operands.
    #[error("`{line}` takes {expected} argument(s)")]
    IncorrectArgumentCount { line: String, expected: usize },

    /// The input failed the directive-syntax gate before any per-line
    /// decoding was attempted.
    #[error("source is not valid directive syntax (first offending byte at offset {offset})")]
    NotDirectives { offset: usize },
}

impl AssemblyError {
    pub(crate) fn invalid_argument(dir: &Directive, reason: impl Into<String>) -> Self {
        AssemblyError::InvalidArgument {
            line: dir.source_line(),
            reason: reason.into(),
        }
    }

    pub(crate) fn underflow(dir: &Directive, reason: impl Into<String>) -> Self {
        AssemblyError::Underflow {
            line: dir.source_line(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_instruction(dir: &Directive) -> Self {
        AssemblyError::UnknownInstruction {
            mnemonic: dir.mnemonic.clone(),
            line: dir.source_line(),
        }
    }
}
