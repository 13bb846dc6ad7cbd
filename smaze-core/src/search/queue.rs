use std::{cmp::Reverse, collections::BinaryHeap};

use crate::dims::Dims;

/// Min-priority queue of cells.
///
/// Entries with equal priority are popped in insertion order. Entries are never updated in
/// place, a cell may be queued several times and the outdated entries are skipped by the caller.
#[derive(Debug, Clone, Default)]
pub(crate) struct MinQueue {
    heap: BinaryHeap<Reverse<(u32, u64, Dims)>>,
    seq: u64,
}

impl MinQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, priority: u32, pos: Dims) {
        self.heap.push(Reverse((priority, self.seq, pos)));
        self.seq += 1;
    }

    pub fn pop(&mut self) -> Option<(u32, Dims)> {
        self.heap
            .pop()
            .map(|Reverse((priority, _, pos))| (priority, pos))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_first_then_fifo() {
        let mut queue = MinQueue::new();
        queue.push(3, Dims(0, 0));
        queue.push(1, Dims(5, 5));
        queue.push(1, Dims(2, 2));
        queue.push(2, Dims(1, 1));
        assert_eq!(queue.len(), 4);

        assert_eq!(queue.pop(), Some((1, Dims(5, 5))));
        assert_eq!(queue.pop(), Some((1, Dims(2, 2))));
        assert_eq!(queue.pop(), Some((2, Dims(1, 1))));
        assert_eq!(queue.pop(), Some((3, Dims(0, 0))));
        assert_eq!(queue.pop(), None);
    }
}
