use crate::synth::{DriftTensor, Field};

/// Soft circular boundary between the inner and outer noise regions, in
/// width-normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aperture {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub transition: f32,
    pub annulus_alpha: f32,
}

/// Distance of every pixel center from the aperture center. Horizontal
/// coordinates span [-0.5, 0.5) across the width; the vertical axis uses
/// the same pitch, so its span is the horizontal one scaled by the
/// pattern's aspect ratio.
pub fn radial_map(height: usize, width: usize, x0: f32, y0: f32) -> Field {
    let mut map = Field::new(height, width);
    let pitch = 1.0 / width as f32;
    for i in 0..height {
        let y = (i as f32 + 0.5 - height as f32 / 2.0) * pitch - y0;
        for j in 0..width {
            let x = (j as f32 + 0.5 - width as f32 / 2.0) * pitch - x0;
            map.data[i * width + j] = (x * x + y * y).sqrt();
        }
    }
    map
}

/// Sigmoid transition: 0 deep inside the aperture, 1 well outside,
/// exactly 0.5 at r == radius.
pub fn edge_mask(r: f32, radius: f32, transition: f32) -> f32 {
    1.0 / (1.0 + (-(r - radius) / (transition / 4.0)).exp())
}

/// Map a normalized sample to an 8-bit pixel value. Out-of-range signal
/// saturates; it never wraps.
pub fn quantize(v: f32) -> u8 {
    (v * 256.0 + 127.5).round().clamp(0.0, 255.0) as u8
}

/// Blend the two regions through the aperture mask (broadcast across all
/// frames), dim the annulus ring, and quantize. Inner and outer are
/// expected contrast-scaled already.
pub fn compose(inner: &DriftTensor, outer: &DriftTensor, aperture: &Aperture) -> Vec<u8> {
    assert_eq!(
        (inner.frames, inner.height, inner.width),
        (outer.frames, outer.height, outer.width),
        "inner/outer drift tensors must share shape"
    );

    let h = inner.height;
    let w = inner.width;
    let r = radial_map(h, w, aperture.x, aperture.y);

    let mask: Vec<f32> = r
        .data
        .iter()
        .map(|&d| edge_mask(d, aperture.radius, aperture.transition))
        .collect();
    let ring_gain = 1.0 - aperture.annulus_alpha;
    let ring: Vec<bool> = r
        .data
        .iter()
        .map(|&d| (d - aperture.radius).abs() <= aperture.transition / 2.0)
        .collect();

    let mut out = Vec::with_capacity(inner.frames * h * w);
    for t in 0..inner.frames {
        let a = inner.frame(t);
        let b = outer.frame(t);
        for p in 0..h * w {
            let m = mask[p];
            let mut v = a[p] * (1.0 - m) + b[p] * m;
            if ring[p] {
                v *= ring_gain;
            }
            out.push(quantize(v));
        }
    }
    out
}
