use crate::domain::Unit;

/// The in-flight slice of a document's units awaiting boundary detection.
///
/// Units live in the borrowed arena for the whole document. `start` is the first
/// pending unit and `end` is one past the last admitted one, so eviction is a cursor
/// move and nothing is removed while reconciliation walks the pending units.
#[derive(Debug)]
pub struct SectionWindow<'a> {
    units: &'a [Unit],
    start: usize,
    end: usize,
    base_capacity: usize,
    capacity: usize,
}

impl<'a> SectionWindow<'a> {
    pub fn new(units: &'a [Unit], capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            units,
            start: 0,
            end: 0,
            base_capacity: capacity,
            capacity,
        }
    }

    /// Admits the next unit. Returns `false` once every unit has been admitted.
    pub fn admit(&mut self) -> bool {
        if self.end < self.units.len() {
            self.end += 1;
            true
        } else {
            false
        }
    }

    pub fn all_admitted(&self) -> bool {
        self.end == self.units.len()
    }

    pub fn is_full(&self) -> bool {
        self.pending().len() >= self.capacity
    }

    pub fn pending(&self) -> &'a [Unit] {
        &self.units[self.start..self.end]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent `capacity` pending units as `marker text` lines.
    pub fn excerpt(&self) -> String {
        let pending = self.pending();
        let skip = pending.len().saturating_sub(self.capacity);
        pending[skip..]
            .iter()
            .map(Unit::tagged_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Grows the capacity by half of the starting capacity. The growth persists for the
    /// rest of the document.
    pub fn expand(&mut self) {
        self.capacity += (self.base_capacity / 2).max(1);
    }

    /// Drops the first `count` pending units.
    pub fn evict(&mut self, count: usize) {
        self.start = (self.start + count).min(self.end);
    }
}
