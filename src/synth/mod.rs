mod aperture;
mod drift;
mod fft2;
mod upscale;

pub use aperture::{compose, edge_mask, quantize, radial_map, Aperture};
pub use drift::oriented_drift;
pub use fft2::{freq_grid, Fft2};
pub use upscale::upscale;

use crate::noise;
use crate::params::StimulusParameters;

/// 2-D real-valued plane, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub height: usize,
    pub width: usize,
    pub data: Vec<f32>,
}

impl Field {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![0.0; height * width],
        }
    }
}

/// Per-region filter output: frame-major stack of planes sharing one
/// spatial grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftTensor {
    pub frames: usize,
    pub height: usize,
    pub width: usize,
    pub data: Vec<f32>,
}

impl DriftTensor {
    pub fn frame(&self, t: usize) -> &[f32] {
        let n = self.height * self.width;
        &self.data[t * n..(t + 1) * n]
    }

    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.data {
            *v *= factor;
        }
    }
}

/// Final 8-bit artifact, frame-major. Owned by the caller; the synthesizer
/// keeps nothing between invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub width: usize,
    pub height: usize,
    pub frame_count: usize,
    pub fps: f32,
    pub data: Vec<u8>,
}

impl Movie {
    pub fn frame(&self, t: usize) -> &[u8] {
        let n = self.height * self.width;
        &self.data[t * n..(t + 1) * n]
    }
}

/// Synthesize the full movie for one condition. Pure: identical parameters
/// produce identical output. Both regions are driven from the same seeded
/// noise field so the aperture blend stays spatially coherent.
pub fn synthesize(params: &StimulusParameters) -> Movie {
    let (base_h, base_w) = params.base_dims();
    let frame_count = params.frame_count();

    let seed_field = noise::normal_field(params.noise_seed, base_h, base_w);
    let up = upscale(&seed_field, params.pattern_upscale);

    let mut inner = oriented_drift(
        &up,
        params.ori,
        params.coherence,
        frame_count,
        params.inner_speed,
        params.pattern_upscale,
    );
    inner.scale(params.inner_contrast);

    let mut outer = oriented_drift(
        &up,
        params.ori + params.outer_ori_delta,
        params.coherence,
        frame_count,
        params.outer_speed,
        params.pattern_upscale,
    );
    outer.scale(params.outer_contrast);

    let aperture = Aperture {
        x: params.aperture_x,
        y: params.aperture_y,
        radius: params.aperture_r,
        transition: params.aperture_transition,
        annulus_alpha: params.annulus_alpha,
    };
    let data = compose(&inner, &outer, &aperture);

    Movie {
        width: up.width,
        height: up.height,
        frame_count,
        fps: params.fps,
        data,
    }
}
