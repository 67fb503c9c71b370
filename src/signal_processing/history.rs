/// Fixed-capacity ring buffer of the most recent samples
///
/// Starts zero-filled. Each `push` overwrites the oldest entry in O(1)
/// without allocating, so steady-state filtering never touches the heap.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    buffer: Vec<f64>,
    /// Index of the newest sample
    head: usize,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            head: capacity.saturating_sub(1),
        }
    }

    /// Append a sample, evicting the oldest one.
    ///
    /// A zero-capacity history drops every sample.
    pub fn push(&mut self, sample: f64) {
        if self.buffer.is_empty() {
            return;
        }
        self.head += 1;
        if self.head == self.buffer.len() {
            self.head = 0;
        }
        self.buffer[self.head] = sample;
    }

    /// Sample pushed `age` calls ago (0 is the newest), or `None` if `age`
    /// is beyond the capacity
    pub fn newest(&self, age: usize) -> Option<f64> {
        let n = self.buffer.len();
        if age >= n {
            return None;
        }
        Some(self.buffer[(self.head + n - age) % n])
    }

    /// Dot product of `weights` with the history, newest sample first.
    ///
    /// `weights[0]` pairs with the newest sample, `weights[1]` with the one
    /// before it, and so on. Extra weights beyond the capacity are ignored.
    pub fn weighted_sum(&self, weights: &[f64]) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }

        // Walk the ring as two contiguous reverse ranges to keep modulo
        // arithmetic out of the inner loop.
        let (front, back) = self.buffer.split_at(self.head + 1);
        weights
            .iter()
            .zip(front.iter().rev().chain(back.iter().rev()))
            .map(|(w, x)| w * x)
            .sum()
    }

    /// Contents in arrival order, oldest first
    pub fn to_vec(&self) -> Vec<f64> {
        let (front, back) = self.buffer.split_at((self.head + 1).min(self.buffer.len()));
        back.iter().chain(front.iter()).copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Zero every entry
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.head = self.buffer.len().saturating_sub(1);
    }
}
