mod halfblock;
mod terminal;

pub use halfblock::{fit_rect, HalfBlockPresenter};
pub use terminal::TerminalGuard;

use anyhow::bail;

use crate::params::StimulusParameters;
use crate::synth::Movie;

/// Quantized zero-signal luminance; what the screen shows when nothing is
/// being presented.
pub const BLANK_LEVEL: u8 = 128;

/// Presentation collaborator consumed by the trial playback routine.
pub trait DisplayService {
    fn refresh_rate_hz(&self) -> f32;
    /// Target drawing rect in pixels (width, height).
    fn display_rect(&self) -> (usize, usize);
    /// Present one grayscale frame; returns how many frames were dropped
    /// while getting it on screen.
    fn present_frame(&mut self, frame: &[u8], width: usize, height: usize) -> anyhow::Result<u32>;
}

/// Trial playback: check the environment preconditions, hold the blank
/// period, then present every movie frame in order. Returns the total
/// dropped-frame count. Any precondition mismatch aborts the trial.
pub fn play(
    display: &mut dyn DisplayService,
    params: &StimulusParameters,
    movie: &Movie,
) -> anyhow::Result<u32> {
    let rate = display.refresh_rate_hz();
    if (rate - params.fps).abs() > 0.5 {
        bail!(
            "display refresh rate {rate:.2} Hz does not match stimulus frame rate {:.2} Hz",
            params.fps
        );
    }

    let (rect_w, rect_h) = display.display_rect();
    if rect_w == 0 || rect_h == 0 || movie.width == 0 || movie.height == 0 {
        bail!("empty display rect or movie");
    }
    let rect_aspect = rect_w as f32 / rect_h as f32;
    let movie_aspect = movie.width as f32 / movie.height as f32;
    if (rect_aspect - movie_aspect).abs() > 0.05 * movie_aspect {
        bail!("display rect aspect {rect_aspect:.3} does not match pattern aspect {movie_aspect:.3}");
    }

    let mut dropped = 0u32;
    let blank_frames = (params.pre_blank_period * params.fps).round().max(0.0) as usize;
    if blank_frames > 0 {
        let blank = vec![BLANK_LEVEL; movie.width * movie.height];
        for _ in 0..blank_frames {
            dropped += display.present_frame(&blank, movie.width, movie.height)?;
        }
    }

    for t in 0..movie.frame_count {
        dropped += display.present_frame(movie.frame(t), movie.width, movie.height)?;
    }
    Ok(dropped)
}
