/// One encoded instruction or data cell.
pub type Word = u32;

/// A location in the word-addressed memory space.
pub type Address = u32;

/// A register index, 0 through 63.
pub type Register = u8;

/// A shift/rotate amount, 0 through 63.
pub type ShiftAmount = u8;

/// A sign-extended 22-bit immediate.
pub type Immediate = i32;

/// A sign-extended 17-bit branch offset, in words.
pub type Offset = i32;

/// A 27-bit absolute jump target.
pub type Target = u32;

/// Per-mnemonic instruction word packing.
pub mod encode;

/// The sparse memory map and the assembled image handed to the execution
/// engine.
pub mod memory;
