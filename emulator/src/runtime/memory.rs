use crate::constants::{Address, Word, MEMORY_SIZE};

/// Holds the memory cells of the computer.
///
/// It has 8192 cells, shared by code and data. Addresses wrap around the
/// memory size, so every access lands on a cell.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    inner: Box<[Word; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            inner: Box::new([0; MEMORY_SIZE]),
        }
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.inner.iter().filter(|&&w| w != 0).count();
        write!(f, "Memory {{ size: {MEMORY_SIZE}, nonzero: {used} }}")
    }
}

#[inline]
const fn index(address: Address) -> usize {
    address as usize % MEMORY_SIZE
}

impl Memory {
    /// Build a memory image from a list of words, starting at address 0.
    ///
    /// Words past the end of the memory are ignored.
    #[must_use]
    pub fn from_words(words: &[Word]) -> Self {
        let mut memory = Self::default();
        for (cell, word) in memory.inner.iter_mut().zip(words) {
            *cell = *word;
        }
        memory
    }

    /// Get the value of the cell at an address
    #[must_use]
    pub fn get(&self, address: Address) -> Word {
        self.inner[index(address)]
    }

    /// Set the value of the cell at an address
    pub fn set(&mut self, address: Address, value: Word) {
        self.inner[index(address)] = value;
    }

    /// Number of cells
    #[must_use]
    pub const fn len(&self) -> usize {
        MEMORY_SIZE
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.inner.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Word> {
        self.inner.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn from_words_test() {
        let memory = Memory::from_words(&[1, 2, 3]);
        assert_eq!(memory.get(0), 1);
        assert_eq!(memory.get(1), 2);
        assert_eq!(memory.get(2), 3);
        assert_eq!(memory.get(3), 0);
        assert_eq!(memory.iter().filter(|&&w| w != 0).count(), 3);
    }

    #[test]
    fn wrap_around_test() {
        let mut memory = Memory::default();
        memory.set(0x2005, 0x42);
        assert_eq!(memory.get(0x0005), 0x42);
        assert_eq!(memory.get(0x4005), 0x42);
        assert_eq!(memory.get(0xE005), 0x42);
    }

    proptest! {
        #[test]
        #[allow(clippy::cast_possible_truncation)]
        fn aliased_addresses_touch_the_same_cell(address in 0u16..0xE000, value in any::<u16>()) {
            let aliased = address + MEMORY_SIZE as Address;

            let mut memory = Memory::default();
            memory.set(aliased, value);
            prop_assert_eq!(memory.get(address), value);

            let mut memory = Memory::default();
            memory.set(address, value);
            prop_assert_eq!(memory.get(aliased), value);
        }
    }
}
