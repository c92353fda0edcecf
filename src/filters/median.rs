use super::ChannelFilter;
use std::collections::VecDeque;

/// Median filter
pub struct MedianFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
    scratch: Vec<f64>,
}

impl MedianFilter {
    /// # Panics
    ///
    /// Panics if the window size is zero or even
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(window_size % 2 == 1, "Median filter window size must be odd");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
            scratch: Vec::with_capacity(window_size),
        }
    }

    fn median(&mut self) -> f64 {
        self.scratch.clear();
        self.scratch.extend(self.buffer.iter().copied());
        self.scratch.sort_by(f64::total_cmp);

        let len = self.scratch.len();
        if len == 0 {
            0.0
        } else if len % 2 == 0 {
            (self.scratch[len / 2 - 1] + self.scratch[len / 2]) / 2.0
        } else {
            self.scratch[len / 2]
        }
    }
}

impl ChannelFilter for MedianFilter {
    fn apply(&mut self, value: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
        self.median()
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MedianFilter"
    }
}
