use std::fmt;

use crate::isa::Address;

/// One parsed source line: `[label:] [mnemonic [operand[, operand]]]`.
///
/// Lines with neither a label nor a mnemonic (blank or comment-only lines)
/// are folded away by the parser and never materialize as directives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directive {
    /// The exact source text the directive was decoded from, kept for
    /// diagnostics.
    pub original: String,
    /// Label defined at this directive's address. Empty means none.
    pub label: String,
    /// Instruction or pseudo-op name, lowercased by the parser.
    pub mnemonic: String,
    /// Up to two raw textual operands, in source order. Unused slots are
    /// empty strings.
    pub operands: (String, String),
    /// Resolved location, assigned exactly once by the resolver.
    pub address: Address,
}

/// The ordered directive sequence produced by the parser.
pub type ParseResults = Vec<Directive>;

impl Directive {
    /// True for directives that neither bind a label nor name an operation.
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.mnemonic.is_empty()
    }

    /// The source line without surrounding whitespace, as used in error
    /// messages.
    pub fn source_line(&self) -> String {
        self.original.trim().to_owned()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original.trim())
    }
}
