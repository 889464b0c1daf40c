/// Translates metronome32 assembly source into a word-addressed memory image.
///
/// The steps are:
/// 1. **Parsing** - matching directive lines and materializing `Directive`s
/// 2. **Resolution** - assigning addresses and building the label table
/// 3. **Encoding** - validating operands per instruction format family and
///    emitting 32-bit words into a sparse memory map
pub mod assembler;

/// Types shared with the metronome32 execution engine: operand domains,
/// the sparse memory map and the per-mnemonic word packing functions.
pub mod isa;

/// Word-dump utility for assembled images.
pub mod hexdump;
