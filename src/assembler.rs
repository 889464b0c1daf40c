/// The fixed text patterns describing numbers, names, registers, strings,
/// labels and comments, composed into a single directive pattern, plus the
/// text-level contracts built on top of it.
pub mod pattern;

/// One parsed source line.
pub mod directive;

/// Decodes source text into an ordered sequence of directives.
pub mod parser;

/// The pseudo-op set and the size computation shared by both passes.
pub mod pseudo;

/// Pass 1: assigns addresses and builds the label table.
pub mod resolver;

/// Numeric conversion and per-field domain validation of operands.
pub mod operand;

/// Pass 2: dispatches each directive to its instruction format family and
/// emits words into the memory map.
pub mod encoder;

/// The assembly error taxonomy.
pub mod error;

pub use error::AssemblyError;

use crate::isa::memory::Image;

/// Utility function assembling raw source text into a memory image.
///
/// Runs the full pipeline: the directive-syntax gate, the parser, the label
/// resolver and the encoder. On gate failure the first offending byte offset
/// is reported.
#[tracing::instrument(skip_all)]
pub fn assemble_source(input: &str) -> Result<Image, AssemblyError> {
    if !pattern::consists_of_directives(input) {
        return Err(AssemblyError::NotDirectives {
            offset: pattern::find_first_nondirective(input),
        });
    }
    let directives = parser::parse_source(input);

    encoder::assemble(directives)
}
