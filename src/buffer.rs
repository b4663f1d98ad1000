//! A priority buffer that keeps the `k` closest items seen so far.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::median::cmp_scalar;
use crate::Scalar;

struct HeapElem<F, T> {
    dist: F,
    item: T,
}

impl<F: Scalar, T> PartialOrd for HeapElem<F, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Scalar, T> PartialEq for HeapElem<F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<F: Scalar, T> Eq for HeapElem<F, T> {}

impl<F: Scalar, T> Ord for HeapElem<F, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_scalar(&self.dist, &other.dist)
    }
}

/// Holds at most `capacity` `(priority, item)` pairs, evicting the pair
/// with the largest priority on overflow.
///
/// Backed by a max-heap, so a push costs `O(log k)` and the current worst
/// priority is available in constant time.
pub struct BoundedBuffer<F, T> {
    capacity: usize,
    heap: BinaryHeap<HeapElem<F, T>>,
}

impl<F: Scalar, T> BoundedBuffer<F, T> {
    pub fn new(capacity: usize) -> Self {
        BoundedBuffer {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Insert a pair, discarding the currently-largest one if the buffer
    /// would exceed its capacity.
    pub fn push(&mut self, priority: F, item: T) {
        if self.capacity == 0 {
            return;
        }
        let elem = HeapElem { dist: priority, item };
        if self.heap.len() < self.capacity {
            self.heap.push(elem);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if elem < *worst {
                *worst = elem;
            }
        }
    }

    /// Priority of the worst retained pair, or `None` (unbounded) while the
    /// buffer holds fewer than `capacity` pairs.
    pub fn peek_max(&self) -> Option<F> {
        if self.is_full() {
            self.heap.peek().map(|e| e.dist)
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.heap.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the buffer, returning its pairs in ascending priority order.
    pub fn into_sorted_vec(self) -> Vec<(F, T)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|e| (e.dist, e.item))
            .collect()
    }
}
