use std::f32::consts::PI;

use crate::synth::Field;

/// Draw the seed noise field: i.i.d. standard-normal samples from a
/// deterministically seeded generator. The same seed always yields the
/// same field, which is what makes whole syntheses reproducible.
pub fn normal_field(seed: u64, height: usize, width: usize) -> Field {
    let mut rng = fastrand::Rng::with_seed(seed);
    let data = (0..height * width).map(|_| randn(&mut rng)).collect();
    Field {
        height,
        width,
        data,
    }
}

/// Box-Muller transform over the uniform generator.
fn randn(rng: &mut fastrand::Rng) -> f32 {
    loop {
        let u1 = rng.f32();
        let u2 = rng.f32();
        if u1 > 1e-12 {
            let r = (-2.0 * u1.ln()).sqrt();
            return r * (2.0 * PI * u2).cos();
        }
    }
}
