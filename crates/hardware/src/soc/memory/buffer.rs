//! Fixed-capacity ring buffer backing MEMORY components.
//!
//! Storage is a flat `Vec<T>` addressed through `head` (oldest entry), `tail` (next write slot)
//! and `count`. Pushing into a full buffer overwrites the oldest entry and advances `head` to
//! `tail`, so the buffer never applies backpressure.

/// Circular FIFO with overwrite-on-full semantics.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Creates an empty buffer. A `capacity` of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity.max(1)],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Maximum number of stored entries.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of stored entries.
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if nothing is stored.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if the next push will evict.
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Index of the oldest entry.
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Index of the next write slot.
    pub const fn tail(&self) -> usize {
        self.tail
    }

    /// Appends `value`, returning the entry it overwrote if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let cap = self.capacity();
        let evicted = if self.count == cap {
            let old = self.data[self.head];
            self.head = (self.head + 1) % cap;
            Some(old)
        } else {
            self.count += 1;
            None
        };
        self.data[self.tail] = value;
        self.tail = (self.tail + 1) % cap;
        if evicted.is_some() {
            self.head = self.tail;
        }
        evicted
    }

    /// Removes and returns the oldest entry.
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let value = self.data[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        Some(value)
    }

    /// Returns the oldest entry without removing it.
    pub fn peek(&self) -> Option<T> {
        (self.count > 0).then(|| self.data[self.head])
    }

    /// Iterates stored entries from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + '_ {
        let cap = self.capacity();
        (0..self.count).map(move |i| self.data[(self.head + i) % cap])
    }

    /// Reallocates to `capacity` (floor 1), keeping the newest `min(capacity, len)` entries
    /// in insertion order.
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        let keep = self.count.min(capacity);
        let skip = self.count - keep;
        let mut data = vec![T::default(); capacity];
        for (slot, value) in data.iter_mut().zip(self.iter().skip(skip)) {
            *slot = value;
        }
        self.data = data;
        self.head = 0;
        self.count = keep;
        self.tail = keep % capacity;
    }

    /// Discards every entry.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }
}
