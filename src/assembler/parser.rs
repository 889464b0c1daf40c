use crate::assembler::{
    directive::{Directive, ParseResults},
    pattern,
};

/// Decodes one matched directive line. Mnemonics are lowercased here so the
/// rest of the pipeline can compare them directly; labels keep their case
/// (`_ENTRY` and `_HERE` are uppercase by convention).
fn decode_directive(caps: &regex::Captures) -> Directive {
    let original = caps
        .get(0)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .to_owned();
    let label = caps
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .to_owned();
    let mnemonic = caps
        .get(2)
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default();
    let operands = decode_operands(caps.get(3).map(|m| m.as_str()).unwrap_or_default());

    Directive {
        original,
        label,
        mnemonic,
        operands,
        address: 0,
    }
}

/// Splits the raw operand list into its (up to two) operands.
fn decode_operands(data: &str) -> (String, String) {
    let mut matches = pattern::DATUM_RE.captures_iter(data);
    let mut next = || {
        matches
            .next()
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
            .unwrap_or_default()
    };

    (next(), next())
}

/// Parses source text into an ordered sequence of directives.
///
/// If the input fails [`pattern::consists_of_directives`], an empty sequence
/// is returned; callers wanting a diagnostic should run the gate themselves
/// first. Blank and comment-only lines are folded away.
#[tracing::instrument(skip_all)]
pub fn parse_source(text: &str) -> ParseResults {
    if !pattern::consists_of_directives(text) {
        return ParseResults::new();
    }

    let mut normalized = text.to_owned();
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }

    pattern::DIRECTIVE_RE
        .captures_iter(&normalized)
        .map(|caps| decode_directive(&caps))
        .filter(|dir| !dir.is_empty())
        .collect()
}
