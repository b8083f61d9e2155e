//! Dense, capped storage for short-lived primitives
//!
//! Items live in one preallocated vector. Aging is in place and expired
//! entries are dropped with `swap_remove`, so a frame never allocates.

/// Something that counts down and expires
pub trait Ephemeral {
    /// Advance by `dt` seconds
    fn step(&mut self, dt: f32);
    /// Remaining life in seconds; expired at or below zero
    fn life(&self) -> f32;
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    cap: usize,
}

impl<T: Ephemeral> Pool<T> {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Add an item; returns false (and drops it) when the pool is full
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() >= self.cap {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Age every item once and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.items.len() {
            self.items[i].step(dt);
            if self.items[i].life() <= 0.0 {
                // The swapped-in item has not been stepped yet; revisit slot i
                self.items.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
