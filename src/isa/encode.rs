//! Pure packing functions turning validated operand values into encoded
//! 32-bit instruction words.
//!
//! Field layout by format:
//!
//! ```text
//! register pair:   [31:26] opcode  [25:20] rd  [19:14] rs
//! register shift:  [31:26] opcode  [25:20] rd  [19:14] amount
//! register imm:    [31:28] opcode  [27:22] rd  [21:0]  immediate
//! register offset: [31:26] opcode  [22:17] rd  [16:0]  offset
//! jump:            [31:27] opcode  [26:0]  target
//! ```
//!
//! Immediates and offsets are stored two's-complement in their field width.
//! Callers are expected to pass values already validated against the operand
//! domains; out-of-range bits are masked off.

use crate::isa::{Immediate, Offset, Register, ShiftAmount, Target, Word};

const IMMEDIATE_MASK: Word = (1 << 22) - 1;
const OFFSET_MASK: Word = (1 << 17) - 1;
const TARGET_MASK: Word = (1 << 27) - 1;

// Register-pair opcodes (6 bits).
const OP_ADD: Word = 0x01;
const OP_AND: Word = 0x02;
const OP_EXCHANGE: Word = 0x03;
const OP_JALR: Word = 0x04;
const OP_NOR: Word = 0x05;
const OP_OR: Word = 0x06;
const OP_RLV: Word = 0x07;
const OP_RRV: Word = 0x08;
const OP_SLLV: Word = 0x09;
const OP_SLT: Word = 0x0a;
const OP_SRAV: Word = 0x0b;
const OP_SRLV: Word = 0x0c;
const OP_SUB: Word = 0x0d;
const OP_XOR: Word = 0x0e;

// Register-shift opcodes (6 bits).
const OP_RL: Word = 0x10;
const OP_RR: Word = 0x11;
const OP_SLL: Word = 0x12;
const OP_SRA: Word = 0x13;
const OP_SRL: Word = 0x14;

// Register-immediate opcodes (4 bits).
const OP_ADDI: Word = 0x8;
const OP_ANDI: Word = 0x9;
const OP_ORI: Word = 0xa;
const OP_SLTI: Word = 0xb;
const OP_XORI: Word = 0xc;

// Register-offset opcodes (6 bits).
const OP_BGEZ: Word = 0x18;
const OP_BGEZAL: Word = 0x19;
const OP_BGTZ: Word = 0x1a;
const OP_BLEZ: Word = 0x1b;
const OP_BLTZ: Word = 0x1c;
const OP_BLTZAL: Word = 0x1d;
const OP_JAL: Word = 0x1e;

// Jump opcode (5 bits).
const OP_J: Word = 0x1e;

// Control flush has no operands and owns a fixed word.
const CF_WORD: Word = 0xfc00_0000;

fn reg_pair(opcode: Word, rd: Register, rs: Register) -> Word {
    (opcode << 26) | ((rd as Word) << 20) | ((rs as Word) << 14)
}

fn reg_shift(opcode: Word, rd: Register, amount: ShiftAmount) -> Word {
    (opcode << 26) | ((rd as Word) << 20) | ((amount as Word) << 14)
}

fn reg_imm(opcode: Word, rd: Register, immediate: Immediate) -> Word {
    (opcode << 28) | ((rd as Word) << 22) | (immediate as Word & IMMEDIATE_MASK)
}

fn reg_offset(opcode: Word, rd: Register, offset: Offset) -> Word {
    (opcode << 26) | ((rd as Word) << 17) | (offset as Word & OFFSET_MASK)
}

fn jump(opcode: Word, target: Target) -> Word {
    (opcode << 27) | (target & TARGET_MASK)
}

pub fn add(rd: Register, rs: Register) -> Word {
    reg_pair(OP_ADD, rd, rs)
}

pub fn and(rd: Register, rs: Register) -> Word {
    reg_pair(OP_AND, rd, rs)
}

pub fn exchange(rd: Register, rs: Register) -> Word {
    reg_pair(OP_EXCHANGE, rd, rs)
}

pub fn jalr(rd: Register, rs: Register) -> Word {
    reg_pair(OP_JALR, rd, rs)
}

pub fn nor(rd: Register, rs: Register) -> Word {
    reg_pair(OP_NOR, rd, rs)
}

pub fn or(rd: Register, rs: Register) -> Word {
    reg_pair(OP_OR, rd, rs)
}

pub fn rlv(rd: Register, rs: Register) -> Word {
    reg_pair(OP_RLV, rd, rs)
}

pub fn rrv(rd: Register, rs: Register) -> Word {
    reg_pair(OP_RRV, rd, rs)
}

pub fn sllv(rd: Register, rs: Register) -> Word {
    reg_pair(OP_SLLV, rd, rs)
}

pub fn slt(rd: Register, rs: Register) -> Word {
    reg_pair(OP_SLT, rd, rs)
}

pub fn srav(rd: Register, rs: Register) -> Word {
    reg_pair(OP_SRAV, rd, rs)
}

pub fn srlv(rd: Register, rs: Register) -> Word {
    reg_pair(OP_SRLV, rd, rs)
}

pub fn sub(rd: Register, rs: Register) -> Word {
    reg_pair(OP_SUB, rd, rs)
}

pub fn xor(rd: Register, rs: Register) -> Word {
    reg_pair(OP_XOR, rd, rs)
}

pub fn rl(rd: Register, amount: ShiftAmount) -> Word {
    reg_shift(OP_RL, rd, amount)
}

pub fn rr(rd: Register, amount: ShiftAmount) -> Word {
    reg_shift(OP_RR, rd, amount)
}

pub fn sll(rd: Register, amount: ShiftAmount) -> Word {
    reg_shift(OP_SLL, rd, amount)
}

pub fn sra(rd: Register, amount: ShiftAmount) -> Word {
    reg_shift(OP_SRA, rd, amount)
}

pub fn srl(rd: Register, amount: ShiftAmount) -> Word {
    reg_shift(OP_SRL, rd, amount)
}

pub fn addi(rd: Register, immediate: Immediate) -> Word {
    reg_imm(OP_ADDI, rd, immediate)
}

pub fn andi(rd: Register, immediate: Immediate) -> Word {
    reg_imm(OP_ANDI, rd, immediate)
}

pub fn ori(rd: Register, immediate: Immediate) -> Word {
    reg_imm(OP_ORI, rd, immediate)
}

pub fn slti(rd: Register, immediate: Immediate) -> Word {
    reg_imm(OP_SLTI, rd, immediate)
}

pub fn xori(rd: Register, immediate: Immediate) -> Word {
    reg_imm(OP_XORI, rd, immediate)
}

pub fn bgez(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_BGEZ, rd, offset)
}

pub fn bgezal(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_BGEZAL, rd, offset)
}

pub fn bgtz(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_BGTZ, rd, offset)
}

pub fn blez(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_BLEZ, rd, offset)
}

pub fn bltz(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_BLTZ, rd, offset)
}

pub fn bltzal(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_BLTZAL, rd, offset)
}

pub fn jal(rd: Register, offset: Offset) -> Word {
    reg_offset(OP_JAL, rd, offset)
}

pub fn j(target: Target) -> Word {
    jump(OP_J, target)
}

pub fn cf() -> Word {
    CF_WORD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_fields() {
        let word = add(1, 2);
        assert_eq!(word >> 26, OP_ADD);
        assert_eq!((word >> 20) & 0x3f, 1);
        assert_eq!((word >> 14) & 0x3f, 2);
    }

    #[test]
    fn test_negative_immediates_are_masked() {
        let word = addi(0, -1);
        assert_eq!(word & IMMEDIATE_MASK, IMMEDIATE_MASK);
        assert_eq!(word >> 28, OP_ADDI);

        let word = bltz(3, -2);
        assert_eq!(word & OFFSET_MASK, OFFSET_MASK - 1);
    }

    #[test]
    fn test_jump_target_occupies_low_bits() {
        let word = j(0x7ff_ffff);
        assert_eq!(word & TARGET_MASK, 0x7ff_ffff);
        assert_eq!(word >> 27, OP_J);
    }

    #[test]
    fn test_mnemonics_encode_distinctly() {
        let words = vec![
            add(1, 2),
            and(1, 2),
            exchange(1, 2),
            sub(1, 2),
            sll(1, 2),
            sra(1, 2),
            addi(1, 2),
            ori(1, 2),
            bgez(1, 2),
            jal(1, 2),
            j(2),
            cf(),
        ];
        let mut unique = words.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(words.len(), unique.len());
    }
}
