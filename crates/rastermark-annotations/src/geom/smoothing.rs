//! Pen-stroke smoothing.
//!
//! Raw pointer samples jitter. A bounded sliding window averages them into a
//! committed smoothed prefix, while a transient "unstable tail" of
//! progressively shorter trailing averages keeps the visible line glued to
//! the cursor. The tail is discarded and recomputed on every new sample, so
//! smoothing never introduces visible lag.

use smallvec::SmallVec;

/// Default number of raw samples retained in the window.
pub const DEFAULT_WINDOW: usize = 8;

/// Sliding-window smoother for live pen input.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    window: SmallVec<[[f64; 2]; DEFAULT_WINDOW]>,
    capacity: usize,
}

impl SmoothingBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            window: SmallVec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Feeds one raw sample.
    ///
    /// Returns a committed smoothed point (the average of the whole window)
    /// when the window is "full enough" — odd-length or at capacity —
    /// otherwise `None`.
    pub fn push(&mut self, x: f64, y: f64) -> Option<[f64; 2]> {
        if self.window.len() == self.capacity {
            self.window.remove(0);
        }
        self.window.push([x, y]);

        let len = self.window.len();
        if len % 2 == 1 || len == self.capacity {
            Some(average(&self.window))
        } else {
            None
        }
    }

    /// The transient tail: averages of progressively shorter trailing
    /// sub-windows, ending at the raw cursor position.
    ///
    /// Rendered after the committed prefix and thrown away when the next
    /// sample arrives.
    pub fn unstable_tail(&self) -> Vec<[f64; 2]> {
        let len = self.window.len();
        let mut tail = Vec::with_capacity(len);
        for k in (1..=len).rev() {
            tail.push(average(&self.window[len - k..]));
        }
        tail
    }

    /// Number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Clears the window for a new stroke.
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Default for SmoothingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn average(points: &[[f64; 2]]) -> [f64; 2] {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_on_odd_length_and_at_capacity() {
        let mut buf = SmoothingBuffer::with_capacity(4);
        assert!(buf.push(0.0, 0.0).is_some()); // len 1, odd
        assert!(buf.push(2.0, 0.0).is_none()); // len 2
        assert!(buf.push(4.0, 0.0).is_some()); // len 3, odd
        let committed = buf.push(6.0, 0.0); // len 4, at capacity
        assert_eq!(committed, Some([3.0, 0.0]));
    }

    #[test]
    fn window_is_bounded() {
        let mut buf = SmoothingBuffer::with_capacity(3);
        for i in 0..10 {
            buf.push(i as f64, 0.0);
        }
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn tail_ends_at_raw_cursor() {
        let mut buf = SmoothingBuffer::with_capacity(8);
        buf.push(0.0, 0.0);
        buf.push(10.0, 0.0);
        let tail = buf.unstable_tail();
        assert_eq!(tail.first(), Some(&[5.0, 0.0]));
        assert_eq!(tail.last(), Some(&[10.0, 0.0]));
    }
}
