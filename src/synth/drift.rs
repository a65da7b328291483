use rustfft::num_complex::Complex;
use std::f32::consts::{PI, TAU};

use crate::synth::fft2::{freq_grid, Fft2};
use crate::synth::{DriftTensor, Field};

/// Turn one upscaled field into a drifting movie for a single region.
///
/// The field's spectrum is shaped once by a low-pass Gaussian envelope and
/// (for coherence > 1) a pair of opposed raised-cosine orientation lobes;
/// each frame then applies a constant-velocity phase ramp of
/// `speed * t` pixels along the orientation axis and inverse-transforms
/// back to space. All transforms are 2-D spatial; nothing is transformed
/// across the frame axis.
pub fn oriented_drift(
    field: &Field,
    ori_degrees: f32,
    coherence: f32,
    frame_count: usize,
    speed: f32,
    upscale: usize,
) -> DriftTensor {
    let h = field.height;
    let w = field.width;
    let mut fft = Fft2::new(h, w);

    let mut spectrum: Vec<Complex<f32>> = field
        .data
        .iter()
        .map(|&v| Complex { re: v, im: 0.0 })
        .collect();
    fft.forward(&mut spectrum);

    let fy = freq_grid(h);
    let fx = freq_grid(w);
    let ori = ori_degrees.to_radians();

    // coherence <= 1 is the isotropic branch: no orientation mask at all.
    let ori_mix = if coherence > 1.0 { 1.0f32 } else { 0.0 };

    // The envelope is the transform of a spatial Gaussian whose std is the
    // upscale factor in pixels: the smoothing deferred from the zero-order
    // hold.
    let sigma2 = (upscale * upscale) as f32;
    for (i, &fyv) in fy.iter().enumerate() {
        for (j, &fxv) in fx.iter().enumerate() {
            let mut g = (-(fxv * fxv + fyv * fyv) * sigma2 / 2.0).exp();
            if ori_mix > 0.0 {
                g *= orientation_lobes(fyv.atan2(fxv), ori, coherence);
            }
            spectrum[i * w + j] *= g;
        }
    }

    // Offset the variance the orientation lobes removed.
    let compensation = 1.0 + ori_mix * (coherence.sqrt() - 1.0);

    let (cos_o, sin_o) = (ori.cos(), ori.sin());
    let mut data = Vec::with_capacity(frame_count * h * w);
    let mut plane = vec![Complex { re: 0.0f32, im: 0.0 }; h * w];
    for t in 0..frame_count {
        let shift = speed * t as f32;
        for (i, &fyv) in fy.iter().enumerate() {
            for (j, &fxv) in fx.iter().enumerate() {
                let phase = -shift * (cos_o * fxv + sin_o * fyv);
                plane[i * w + j] = spectrum[i * w + j]
                    * Complex {
                        re: phase.cos(),
                        im: phase.sin(),
                    };
            }
        }
        fft.inverse(&mut plane);
        data.extend(plane.iter().map(|c| c.re * compensation));
    }

    DriftTensor {
        frames: frame_count,
        height: h,
        width: w,
        data,
    }
}

/// Orientation selectivity in the angular frequency coordinate: a Hann
/// lobe of bandwidth pi/coherence centered on `ori`, summed with its
/// point-symmetric twin (0 and 180 degrees are indistinguishable). At
/// coherence exactly 1 the two lobes sum to 1 at every angle, which is
/// why that boundary belongs to the isotropic branch.
fn orientation_lobes(angle: f32, ori: f32, coherence: f32) -> f32 {
    lobe(angle - ori, coherence) + lobe(angle - ori - PI, coherence)
}

fn lobe(delta: f32, coherence: f32) -> f32 {
    let d = wrap_pi(delta);
    if d.abs() >= PI / (2.0 * coherence) {
        return 0.0;
    }
    let c = (coherence * d).cos();
    c * c
}

fn wrap_pi(a: f32) -> f32 {
    a - (a / TAU).round() * TAU
}
