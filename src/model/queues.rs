// src/model/queues.rs

use std::collections::VecDeque;

/// A fixed-length FIFO used as a transport delay.
///
/// The line always holds exactly `len()` slots. Items leave from the front
/// and enter at the back in a single rotation, so the length never changes
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayLine {
    buffer: VecDeque<u32>,
    delay_length: usize,
}

impl DelayLine {
    /// Builds a line of `delay` slots, each pre-filled with `fill`.
    pub fn new(delay: usize, fill: u32) -> Self {
        let mut buffer = VecDeque::with_capacity(delay);
        buffer.extend(std::iter::repeat(fill).take(delay));

        Self {
            buffer,
            delay_length: delay,
        }
    }

    /// Pops the front slot and pushes `item` at the back in one move.
    ///
    /// Returns what was at the front. A zero-length line passes `item`
    /// straight through.
    pub fn rotate(&mut self, item: u32) -> u32 {
        if self.delay_length == 0 {
            return item;
        }
        let arrived = self.buffer.pop_front().unwrap_or(0);
        self.buffer.push_back(item);
        debug_assert_eq!(self.buffer.len(), self.delay_length);
        arrived
    }

    /// Adds `quantity` to the most recently pushed slot.
    pub fn add_to_back(&mut self, quantity: u32) {
        if let Some(slot) = self.buffer.back_mut() {
            *slot = slot.saturating_add(quantity);
        }
    }

    /// The slot that will leave on the next rotation.
    pub fn front(&self) -> u32 {
        self.buffer.front().copied().unwrap_or(0)
    }

    /// Sum of everything currently in transit.
    pub fn total(&self) -> u32 {
        self.buffer.iter().fold(0u32, |acc, q| acc.saturating_add(*q))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.buffer.iter().copied()
    }
}
