use std::collections::HashMap;

use crate::{
    assembler::{
        directive::{Directive, ParseResults},
        encoder,
        error::AssemblyError,
        pseudo::PseudoOp,
    },
    isa::Address,
};

/// Binds the initial program counter. Optional; the entry point defaults
/// to address 0.
pub const ENTRY_LABEL: &str = "_ENTRY";

/// Resolves, per use, to the address of the directive under assembly. Never
/// stored in the label table.
pub const HERE_LABEL: &str = "_HERE";

/// Mapping from label name to resolved address, complete after pass 1.
pub type LabelTable = HashMap<String, Address>;

/// How many memory cells a directive occupies: nothing for a bare label,
/// a computed delta for pseudo-ops, one word for any real instruction.
fn directive_size(dir: &Directive) -> Result<u32, AssemblyError> {
    if dir.mnemonic.is_empty() {
        Ok(0)
    } else if let Some(op) = PseudoOp::from_mnemonic(&dir.mnemonic) {
        op.size(dir)
    } else if encoder::is_real_instruction(&dir.mnemonic) {
        Ok(1)
    } else {
        Err(AssemblyError::unknown_instruction(dir))
    }
}

/// Up-front duplicate scan over the whole directive list, before any address
/// is assigned.
fn check_duplicate_labels(directives: &ParseResults) -> Result<(), AssemblyError> {
    let mut defined_at: HashMap<&str, &Directive> = HashMap::new();

    for dir in directives {
        if dir.label.is_empty() {
            continue;
        }
        if let Some(first) = defined_at.insert(&dir.label, dir) {
            return Err(AssemblyError::DuplicateLabel {
                label: dir.label.clone(),
                first: first.source_line(),
                second: dir.source_line(),
            });
        }
    }

    Ok(())
}

/// Pass 1: a single forward pass assigning each directive its address and
/// binding every label, before any operand is validated. A label may legally
/// point at a pseudo-op's reserved region.
#[tracing::instrument(skip_all)]
pub fn resolve_labels(directives: &mut ParseResults) -> Result<LabelTable, AssemblyError> {
    check_duplicate_labels(directives)?;

    let mut labels = LabelTable::new();
    let mut current_address: Address = 0;

    for dir in directives.iter_mut() {
        if !dir.label.is_empty() {
            labels.insert(dir.label.clone(), current_address);
        }
        dir.address = current_address;
        current_address = current_address.wrapping_add(directive_size(dir)?);
    }

    Ok(labels)
}

/// The initial program counter: the `_ENTRY` label if bound, else 0.
pub fn entry_point(labels: &LabelTable) -> Address {
    labels.get(ENTRY_LABEL).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::parser::parse_source;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_addresses_are_contiguous() {
        let input = "\
a: add %r1, %r2
b: resw 3
c: dw 7, 2
d: ds \"hi\"
e: cf
";
        let mut directives = parse_source(input);
        let labels = resolve_labels(&mut directives).unwrap();

        assert_eq!(labels["a"], 0);
        assert_eq!(labels["b"], 1); // add is one word
        assert_eq!(labels["c"], 4); // resw 3
        assert_eq!(labels["d"], 6); // dw 7, 2
        assert_eq!(labels["e"], 8); // "hi" is two words

        let addresses: Vec<u32> = directives.iter().map(|d| d.address).collect();
        assert_eq!(addresses, vec![0, 1, 4, 6, 8]);
    }

    #[test]
    fn test_bare_labels_share_an_address() {
        let mut directives = parse_source("a:\nb:\nadd %r1, %r2\n");
        let labels = resolve_labels(&mut directives).unwrap();
        assert_eq!(labels["a"], 0);
        assert_eq!(labels["b"], 0);
    }

    #[test]
    fn test_duplicate_label_names_both_lines() {
        let mut directives = parse_source("dup: cf\nother: cf\ndup: cf\n");
        let err = resolve_labels(&mut directives).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::DuplicateLabel {
                label: "dup".to_owned(),
                first: "dup: cf".to_owned(),
                second: "dup: cf".to_owned(),
            }
        );
    }

    #[test]
    fn test_unknown_instruction_fails_resolution() {
        let mut directives = parse_source("frobnicate %r1, %r2\n");
        assert!(matches!(
            resolve_labels(&mut directives).unwrap_err(),
            AssemblyError::UnknownInstruction { .. }
        ));
    }

    #[test]
    fn test_entry_point() {
        let mut directives = parse_source("resw 12\n_ENTRY: cf\n");
        let labels = resolve_labels(&mut directives).unwrap();
        assert_eq!(entry_point(&labels), 12);

        let mut no_entry = parse_source("cf\n");
        let labels = resolve_labels(&mut no_entry).unwrap();
        assert_eq!(entry_point(&labels), 0);
    }
}
