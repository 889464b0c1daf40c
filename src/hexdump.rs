use crate::isa::memory::MemoryMap;

/// Renders the populated cells of a sparse image, `stride` words per line.
/// A new address prefix starts whenever the cells stop being contiguous.
pub fn dump_words(memory: &MemoryMap, stride: usize) -> String {
    let mut out = String::new();
    let mut previous = None;
    let mut words_on_line = 0;

    for (address, word) in memory.iter() {
        let contiguous = previous == Some(address.wrapping_sub(1));
        if !contiguous || words_on_line == stride {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(format!("{:08x}:", address).as_str());
            words_on_line = 0;
        }
        out.push_str(format!(" {:08x}", word).as_str());
        words_on_line += 1;
        previous = Some(address);
    }

    out
}
