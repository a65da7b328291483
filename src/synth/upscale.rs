use crate::synth::Field;

/// Expand a field by an integer factor in each dimension: zero-order hold
/// plus a circular phase-alignment shift of `round(factor/2)` samples,
/// one pass per axis, each pass renormalized by the factor. No smoothing
/// happens here; the drift filter's Gaussian envelope handles that.
pub fn upscale(field: &Field, factor: usize) -> Field {
    let shift = ((factor as f32) / 2.0).round() as usize;
    let gain = factor as f32;

    let h = field.height;
    let w = field.width;
    let out_w = w * factor;
    let out_h = h * factor;

    // Pass 1: along x.
    let mut wide = vec![0.0f32; h * out_w];
    for y in 0..h {
        let row = &field.data[y * w..(y + 1) * w];
        let dst = &mut wide[y * out_w..(y + 1) * out_w];
        for j in 0..out_w {
            dst[j] = row[((j + shift) % out_w) / factor] * gain;
        }
    }

    // Pass 2: along y.
    let mut data = vec![0.0f32; out_h * out_w];
    for i in 0..out_h {
        let src = ((i + shift) % out_h) / factor;
        let row = &wide[src * out_w..(src + 1) * out_w];
        let dst = &mut data[i * out_w..(i + 1) * out_w];
        for j in 0..out_w {
            dst[j] = row[j] * gain;
        }
    }

    Field {
        height: out_h,
        width: out_w,
        data,
    }
}
