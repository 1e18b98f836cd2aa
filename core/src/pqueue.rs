//! Indexed binary min-heap
//!
//! Keys are dense indices (flat cell indices). A side table maps each key
//! to its slot in the heap, giving O(1) `contains` and O(log n)
//! decrease-key. Equal priorities pop in insertion order: every push or
//! decrease stamps the entry with a fresh sequence number that serves as
//! the secondary key.

use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Entry {
    key: usize,
    priority: usize,
    seq: u64,
}

impl Entry {
    fn precedes(&self, other: &Entry) -> bool {
        (self.priority, self.seq) < (other.priority, other.seq)
    }
}

#[derive(Clone, Debug, Default)]
pub struct IndexedMinHeap {
    heap: Vec<Entry>,
    positions: Vec<Option<usize>>,
    next_seq: u64,
}

impl IndexedMinHeap {
    /// A heap sized for keys in `[0, keys)`. Larger keys grow the table.
    pub fn with_capacity(keys: usize) -> Self {
        Self {
            heap: Vec::with_capacity(keys),
            positions: vec![None; keys],
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: usize) -> bool {
        self.slot(key).is_some()
    }

    pub fn priority_of(&self, key: usize) -> Option<usize> {
        self.slot(key).map(|i| self.heap[i].priority)
    }

    /// Insert `key`, or lower its priority if already queued.
    ///
    /// Returns `false` when the key is queued with a priority that is
    /// already at least as good.
    pub fn push_or_decrease(&mut self, key: usize, priority: usize) -> bool {
        let seq = self.next_seq;
        match self.slot(key) {
            Some(i) if self.heap[i].priority <= priority => false,
            Some(i) => {
                self.next_seq += 1;
                self.heap[i].priority = priority;
                self.heap[i].seq = seq;
                self.sift_up(i);
                true
            }
            None => {
                self.next_seq += 1;
                if key >= self.positions.len() {
                    self.positions.resize(key + 1, None);
                }
                self.heap.push(Entry { key, priority, seq });
                let last = self.heap.len() - 1;
                self.positions[key] = Some(last);
                self.sift_up(last);
                true
            }
        }
    }

    /// Remove and return the `(key, priority)` with the lowest priority.
    pub fn pop(&mut self) -> Option<(usize, usize)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.positions[top.key] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((top.key, top.priority))
    }

    fn slot(&self, key: usize) -> Option<usize> {
        self.positions.get(key).copied().flatten()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].key] = Some(a);
        self.positions[self.heap[b].key] = Some(b);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.heap[i].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.heap[left].precedes(&self.heap[smallest]) {
                smallest = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}
