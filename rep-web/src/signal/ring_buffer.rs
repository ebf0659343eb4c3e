//! Fixed-capacity ring buffer of scalar samples
//!
//! Overwrites the oldest sample once full. Capacity is chosen at construction
//! and the storage never grows afterwards.

/// Rolling buffer that keeps the last `capacity` samples
#[derive(Clone, Debug)]
pub struct RingBuffer {
    /// Circular storage, allocated once
    data: Box<[f32]>,

    /// Current write position (points to next slot to write)
    write_index: usize,

    /// Number of valid samples (saturates at capacity)
    filled: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)].into_boxed_slice(),
            write_index: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.data.len()
    }

    /// Push a sample, evicting the oldest when full
    pub fn push(&mut self, value: f32) {
        self.data[self.write_index] = value;
        self.write_index = (self.write_index + 1) % self.data.len();

        if self.filled < self.data.len() {
            self.filled += 1;
        }
    }

    /// Most recently pushed sample
    pub fn latest(&self) -> Option<f32> {
        if self.filled == 0 {
            return None;
        }
        let idx = (self.write_index + self.data.len() - 1) % self.data.len();
        Some(self.data[idx])
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let cap = self.data.len();
        let start = (self.write_index + cap - self.filled) % cap;
        (0..self.filled).map(move |i| self.data[(start + i) % cap])
    }

    pub fn mean(&self) -> Option<f32> {
        if self.filled == 0 {
            return None;
        }
        Some(self.iter().sum::<f32>() / self.filled as f32)
    }

    /// Population standard deviation over the stored window
    pub fn std_dev(&self) -> Option<f32> {
        let mean = self.mean()?;
        let variance = self
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f32>()
            / self.filled as f32;
        Some(variance.sqrt())
    }

    /// Clear the buffer (useful on reset)
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
        self.write_index = 0;
        self.filled = 0;
    }
}
