use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Zero-centered angular frequencies (radians/pixel) for an n-point
/// transform, in rustfft's native ordering: DC first, positive
/// frequencies up to Nyquist, then negative frequencies. Index `k` maps
/// to `2*pi*k/n` for `k <= n/2` and `2*pi*(k-n)/n` above. Every consumer
/// of a spectrum in this crate indexes frequencies through this grid so
/// the zero-frequency placement can never drift out of sync with the
/// transform.
pub fn freq_grid(n: usize) -> Vec<f32> {
    (0..n)
        .map(|k| {
            let signed = if k <= n / 2 {
                k as isize
            } else {
                k as isize - n as isize
            };
            2.0 * PI * signed as f32 / n as f32
        })
        .collect()
}

/// 2-D complex FFT over a height x width row-major buffer, built from
/// rustfft's 1-D plans: rows in place, transpose, columns as rows,
/// transpose back. Plans and scratch are created once and reused across
/// frames.
pub struct Fft2 {
    height: usize,
    width: usize,
    row_fwd: Arc<dyn Fft<f32>>,
    row_inv: Arc<dyn Fft<f32>>,
    col_fwd: Arc<dyn Fft<f32>>,
    col_inv: Arc<dyn Fft<f32>>,
    flipped: Vec<Complex<f32>>,
}

impl Fft2 {
    pub fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        Self {
            height,
            width,
            row_fwd: planner.plan_fft_forward(width),
            row_inv: planner.plan_fft_inverse(width),
            col_fwd: planner.plan_fft_forward(height),
            col_inv: planner.plan_fft_inverse(height),
            flipped: vec![Complex { re: 0.0, im: 0.0 }; height * width],
        }
    }

    /// Unnormalized forward transform, in place.
    pub fn forward(&mut self, buf: &mut [Complex<f32>]) {
        self.pass(buf, true);
    }

    /// Inverse transform, in place, normalized by 1/(height*width) so a
    /// forward/inverse round trip reproduces the input.
    pub fn inverse(&mut self, buf: &mut [Complex<f32>]) {
        self.pass(buf, false);
        let norm = 1.0 / (self.height * self.width) as f32;
        for v in buf.iter_mut() {
            *v *= norm;
        }
    }

    fn pass(&mut self, buf: &mut [Complex<f32>], forward: bool) {
        assert_eq!(buf.len(), self.height * self.width, "fft2 buffer shape");
        let (row, col) = if forward {
            (&self.row_fwd, &self.col_fwd)
        } else {
            (&self.row_inv, &self.col_inv)
        };

        for chunk in buf.chunks_exact_mut(self.width) {
            row.process(chunk);
        }
        transpose(buf, self.height, self.width, &mut self.flipped);
        for chunk in self.flipped.chunks_exact_mut(self.height) {
            col.process(chunk);
        }
        transpose(&self.flipped, self.width, self.height, buf);
    }
}

fn transpose(src: &[Complex<f32>], rows: usize, cols: usize, dst: &mut [Complex<f32>]) {
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}
