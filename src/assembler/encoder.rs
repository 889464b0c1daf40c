use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    assembler::{
        directive::{Directive, ParseResults},
        error::AssemblyError,
        operand,
        pseudo::{self, PseudoOp},
        resolver::{self, LabelTable},
    },
    isa::{
        encode,
        memory::{Image, MemoryMap},
        Address, Immediate, Offset, Register, ShiftAmount, Target, Word,
    },
};

/// The no-operand control-flush special form.
const CONTROL_FLUSH: &str = "cf";

type RegPairFn = fn(Register, Register) -> Word;
type RegShiftFn = fn(Register, ShiftAmount) -> Word;
type RegImmFn = fn(Register, Immediate) -> Word;
type RegOffsetFn = fn(Register, Offset) -> Word;
type JumpFn = fn(Target) -> Word;

// The five instruction format families. A mnemonic belongs to exactly one
// table; `test_family_tables_are_disjoint` enforces this.
lazy_static! {
    static ref REG_PAIR: HashMap<&'static str, RegPairFn> = HashMap::from([
        ("add", encode::add as RegPairFn),
        ("and", encode::and as RegPairFn),
        ("exch", encode::exchange as RegPairFn),
        ("exchange", encode::exchange as RegPairFn),
        ("jalr", encode::jalr as RegPairFn),
        ("nor", encode::nor as RegPairFn),
        ("or", encode::or as RegPairFn),
        ("rlv", encode::rlv as RegPairFn),
        ("rrv", encode::rrv as RegPairFn),
        ("sllv", encode::sllv as RegPairFn),
        ("slt", encode::slt as RegPairFn),
        ("srav", encode::srav as RegPairFn),
        ("srlv", encode::srlv as RegPairFn),
        ("sub", encode::sub as RegPairFn),
        ("xor", encode::xor as RegPairFn),
    ]);
    static ref REG_SHIFT: HashMap<&'static str, RegShiftFn> = HashMap::from([
        ("rl", encode::rl as RegShiftFn),
        ("rr", encode::rr as RegShiftFn),
        ("sll", encode::sll as RegShiftFn),
        ("sra", encode::sra as RegShiftFn),
        ("srl", encode::srl as RegShiftFn),
    ]);
    static ref REG_IMM: HashMap<&'static str, RegImmFn> = HashMap::from([
        ("addi", encode::addi as RegImmFn),
        ("andi", encode::andi as RegImmFn),
        ("ori", encode::ori as RegImmFn),
        ("slti", encode::slti as RegImmFn),
        ("xori", encode::xori as RegImmFn),
    ]);
    static ref REG_OFFSET: HashMap<&'static str, RegOffsetFn> = HashMap::from([
        ("bgez", encode::bgez as RegOffsetFn),
        ("bgezal", encode::bgezal as RegOffsetFn),
        ("bgtz", encode::bgtz as RegOffsetFn),
        ("blez", encode::blez as RegOffsetFn),
        ("bltz", encode::bltz as RegOffsetFn),
        ("bltzal", encode::bltzal as RegOffsetFn),
        ("jal", encode::jal as RegOffsetFn),
    ]);
    static ref JUMP: HashMap<&'static str, JumpFn> =
        HashMap::from([("j", encode::j as JumpFn)]);
}

/// Whether a mnemonic names a real (non-pseudo) instruction. The resolver
/// uses this to validate mnemonics before any operand is looked at.
pub(crate) fn is_real_instruction(mnemonic: &str) -> bool {
    REG_PAIR.contains_key(mnemonic)
        || REG_SHIFT.contains_key(mnemonic)
        || REG_IMM.contains_key(mnemonic)
        || REG_OFFSET.contains_key(mnemonic)
        || JUMP.contains_key(mnemonic)
        || mnemonic == CONTROL_FLUSH
}

/// Tracks where the next word goes. Reinitialized to 0 for pass 2; the size
/// rules guarantee it matches the resolver's addressing counter one-to-one.
struct Emitter {
    memory: MemoryMap,
    counter: Address,
}

impl Emitter {
    fn new() -> Self {
        Emitter {
            memory: MemoryMap::new(),
            counter: 0,
        }
    }

    fn emit(&mut self, word: Word) {
        self.memory.write(self.counter, word);
        self.counter = self.counter.wrapping_add(1);
    }

    fn skip(&mut self, cells: u32) {
        self.counter = self.counter.wrapping_add(cells);
    }
}

fn encode_reg_pair(
    dir: &Directive,
    pack: RegPairFn,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    let rd = operand::register(dir, &dir.operands.0)?;
    let rs = operand::register(dir, &dir.operands.1)?;
    if rd == rs {
        return Err(AssemblyError::invalid_argument(
            dir,
            "the two provided registers cannot be equal",
        ));
    }
    emitter.emit(pack(rd, rs));

    Ok(())
}

fn encode_reg_shift(
    dir: &Directive,
    pack: RegShiftFn,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    let rd = operand::register(dir, &dir.operands.0)?;
    let amount = operand::shift_amount(dir, &dir.operands.1)?;
    emitter.emit(pack(rd, amount));

    Ok(())
}

fn encode_reg_imm(
    dir: &Directive,
    labels: &LabelTable,
    pack: RegImmFn,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    let rd = operand::register(dir, &dir.operands.0)?;
    let imm = operand::immediate(dir, labels, &dir.operands.1)?;
    emitter.emit(pack(rd, imm));

    Ok(())
}

fn encode_reg_offset(
    dir: &Directive,
    labels: &LabelTable,
    pack: RegOffsetFn,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    let rd = operand::register(dir, &dir.operands.0)?;
    let offset = operand::offset(dir, labels, &dir.operands.1)?;
    emitter.emit(pack(rd, offset));

    Ok(())
}

fn encode_jump(
    dir: &Directive,
    labels: &LabelTable,
    pack: JumpFn,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    let target = operand::target(dir, labels, &dir.operands.0)?;
    emitter.emit(pack(target));

    Ok(())
}

fn encode_pseudo(
    op: PseudoOp,
    dir: &Directive,
    labels: &LabelTable,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    match op {
        // Reserves advance the counter without writing.
        PseudoOp::Resw | PseudoOp::Ress | PseudoOp::Ressz => emitter.skip(op.size(dir)?),
        PseudoOp::Dw => {
            let cells = op.size(dir)?;
            let value = operand::define_value(dir, labels, &dir.operands.0)?;
            for _ in 0..cells {
                emitter.emit(value);
            }
        }
        PseudoOp::Ds | PseudoOp::Dsz => {
            let contents = pseudo::string_contents(dir, &dir.operands.0)?;
            let count = pseudo::count_argument(dir, &dir.operands.1, "two")?;
            for _ in 0..count {
                for ch in contents.chars() {
                    emitter.emit(ch as Word);
                }
            }
            if op == PseudoOp::Dsz {
                emitter.emit(0);
            }
        }
    }

    Ok(())
}

fn encode_directive(
    dir: &Directive,
    labels: &LabelTable,
    emitter: &mut Emitter,
) -> Result<(), AssemblyError> {
    let mnemonic = dir.mnemonic.as_str();

    if mnemonic.is_empty() {
        Ok(())
    } else if let Some(pack) = REG_PAIR.get(mnemonic) {
        encode_reg_pair(dir, *pack, emitter)
    } else if let Some(pack) = REG_SHIFT.get(mnemonic) {
        encode_reg_shift(dir, *pack, emitter)
    } else if let Some(pack) = REG_IMM.get(mnemonic) {
        encode_reg_imm(dir, labels, *pack, emitter)
    } else if let Some(pack) = REG_OFFSET.get(mnemonic) {
        encode_reg_offset(dir, labels, *pack, emitter)
    } else if let Some(pack) = JUMP.get(mnemonic) {
        encode_jump(dir, labels, *pack, emitter)
    } else if let Some(op) = PseudoOp::from_mnemonic(mnemonic) {
        encode_pseudo(op, dir, labels, emitter)
    } else if mnemonic == CONTROL_FLUSH {
        emitter.emit(encode::cf());
        Ok(())
    } else {
        // The resolver validates every mnemonic, so reaching this arm means
        // the recognized sets of the two passes diverged.
        Err(AssemblyError::unknown_instruction(dir))
    }
}

/// Pass 2: walks the directive sequence with the completed label table,
/// validating operands and emitting words. Consumes the directives and
/// hands the finished image to the caller.
#[tracing::instrument(skip_all)]
pub fn assemble(mut directives: ParseResults) -> Result<Image, AssemblyError> {
    let labels = resolver::resolve_labels(&mut directives)?;
    let mut emitter = Emitter::new();

    for dir in &directives {
        encode_directive(dir, &labels, &mut emitter)?;
    }

    Ok(Image {
        memory: emitter.memory,
        entry_point: resolver::entry_point(&labels),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::parser::parse_source;
    use pretty_assertions::assert_eq;

    fn assemble_str(input: &str) -> Result<Image, AssemblyError> {
        assemble(parse_source(input))
    }

    #[test]
    fn test_family_tables_are_disjoint() {
        let mut seen: Vec<&str> = Vec::new();
        seen.extend(REG_PAIR.keys());
        seen.extend(REG_SHIFT.keys());
        seen.extend(REG_IMM.keys());
        seen.extend(REG_OFFSET.keys());
        seen.extend(JUMP.keys());
        seen.push(CONTROL_FLUSH);

        let mut unique = seen.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(seen.len(), unique.len(), "a mnemonic appears in two tables");
    }

    #[test]
    fn test_real_instructions_emit_one_word() {
        let tests = vec![
            ("add %r1, %r2\n", encode::add(1, 2)),
            ("EXCH %r3, %r4\n", encode::exchange(3, 4)),
            ("sll %r5, 12\n", encode::sll(5, 12)),
            ("addi %r6, -20\n", encode::addi(6, -20)),
            ("bltz %r7, -2\n", encode::bltz(7, -2)),
            ("jal %r8, 0x40\n", encode::jal(8, 0x40)),
            ("j 0x1000\n", encode::j(0x1000)),
            ("cf\n", encode::cf()),
        ];
        for (input, expected) in tests {
            let image = assemble_str(input).unwrap();
            assert_eq!(image.memory.get(0), Some(expected), "input: {input:?}");
            assert_eq!(image.memory.len(), 1, "input: {input:?}");
        }
    }

    #[test]
    fn test_equal_registers_are_rejected() {
        let err = assemble_str("exchange %r1, %r1\n").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::InvalidArgument {
                line: "exchange %r1, %r1".to_owned(),
                reason: "the two provided registers cannot be equal".to_owned(),
            }
        );
    }

    #[test]
    fn test_reserves_write_nothing() {
        let image = assemble_str("resw 3\ncf\n").unwrap();
        assert_eq!(image.memory.get(0), None);
        assert_eq!(image.memory.get(2), None);
        assert_eq!(image.memory.get(3), Some(encode::cf()));
    }

    #[test]
    fn test_define_words() {
        let image = assemble_str("dw 7, 3\n").unwrap();
        assert_eq!(image.memory.get(0), Some(7));
        assert_eq!(image.memory.get(1), Some(7));
        assert_eq!(image.memory.get(2), Some(7));
        assert_eq!(image.memory.len(), 3);
    }

    #[test]
    fn test_define_strings() {
        let image = assemble_str("ds \"ab\", 2\n").unwrap();
        let cells: Vec<Option<Word>> = (0..4).map(|a| image.memory.get(a)).collect();
        assert_eq!(
            cells,
            vec![Some('a' as Word), Some('b' as Word), Some('a' as Word), Some('b' as Word)]
        );
        assert_eq!(image.memory.len(), 4);

        let image = assemble_str("dsz \"ab\"\n").unwrap();
        assert_eq!(image.memory.get(0), Some('a' as Word));
        assert_eq!(image.memory.get(1), Some('b' as Word));
        assert_eq!(image.memory.get(2), Some(0));
        assert_eq!(image.memory.len(), 3);
    }

    #[test]
    fn test_bare_dw_is_rejected_at_encode_time() {
        // Resolution gives a bare `dw` a size of one word, but there is no
        // value to fill it with.
        let err = assemble_str("dw\n").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::InvalidArgument {
                line: "dw".to_owned(),
                reason: "argument one is not a number or label".to_owned(),
            }
        );
    }

    #[test]
    fn test_emission_counter_matches_resolver_addresses() {
        let input = "\
start: addi %r1, 0
msg: dsz \"ok\"
buf: resw 2
end: dw end
";
        let image = assemble_str(input).unwrap();
        // addi at 0, "ok\0" at 1..4, reserve at 4..6, dw at 6.
        assert_eq!(image.memory.get(0), Some(encode::addi(1, 0)));
        assert_eq!(image.memory.get(1), Some('o' as Word));
        assert_eq!(image.memory.get(3), Some(0));
        assert_eq!(image.memory.get(4), None);
        assert_eq!(image.memory.get(5), None);
        assert_eq!(image.memory.get(6), Some(0)); // end - end
    }
}
