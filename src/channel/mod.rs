use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("sample count mismatch: {width}x{height} needs {expected} samples, got {got}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
}

/// A single image channel: `height` rows of `width` samples, row-major.
///
/// Samples are nominally in [0, 255] but are kept as `f64` so transform
/// output can be carried without intermediate rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    width: usize,
    height: usize,
    samples: Vec<f64>,
}

impl Channel {
    pub fn new(width: usize, height: usize, samples: Vec<f64>) -> Result<Self, ChannelError> {
        let expected = width * height;
        if samples.len() != expected {
            return Err(ChannelError::ShapeMismatch {
                width,
                height,
                expected,
                got: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// A channel with every sample set to zero.
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Build a channel by evaluating `f(row, col)` for every sample.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut samples = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                samples.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.width + col]
    }

    /// Mutable view of one row.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.width;
        &mut self.samples[start..start + self.width]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.width;
        &self.samples[start..start + self.width]
    }

    /// Clamp every sample into [lo, hi].
    pub fn clip(&mut self, lo: f64, hi: f64) {
        for s in self.samples.iter_mut() {
            *s = s.clamp(lo, hi);
        }
    }
}
