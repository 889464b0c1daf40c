use std::collections::BTreeMap;

use crate::isa::{Address, Word};

/// Sparse word-addressed memory. Only cells that were actually written
/// exist; everything else reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryMap {
    cells: BTreeMap<Address, Word>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, address: Address, value: Word) {
        self.cells.insert(address, value);
    }

    /// The cell value, defaulting to zero for unwritten addresses.
    pub fn read(&self, address: Address) -> Word {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// The cell value, or `None` if the address was never written.
    pub fn get(&self, address: Address) -> Option<Word> {
        self.cells.get(&address).copied()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, Word)> + '_ {
        self.cells.iter().map(|(addr, word)| (*addr, *word))
    }
}

/// A fully assembled program: the populated memory map and the initial
/// program counter. Moved into the execution engine as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub memory: MemoryMap,
    pub entry_point: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_cells_read_zero() {
        let mut memory = MemoryMap::new();
        memory.write(10, 0xdead_beef);

        assert_eq!(memory.read(10), 0xdead_beef);
        assert_eq!(memory.get(10), Some(0xdead_beef));
        assert_eq!(memory.read(11), 0);
        assert_eq!(memory.get(11), None);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_iteration_is_address_ordered() {
        let mut memory = MemoryMap::new();
        memory.write(30, 3);
        memory.write(10, 1);
        memory.write(20, 2);

        let cells: Vec<(Address, Word)> = memory.iter().collect();
        assert_eq!(cells, vec![(10, 1), (20, 2), (30, 3)]);
    }
}
