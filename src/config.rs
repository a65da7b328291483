use clap::Parser;
use std::path::PathBuf;

use crate::params::StimulusParameters;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "stim-synth",
    version,
    about = "Orientation-coherent drifting-noise stimulus movie synthesizer"
)]
pub struct Config {
    /// Condition file (key = value); takes the place of the stimulus flags below.
    #[arg(long)]
    pub condition: Option<PathBuf>,

    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    #[arg(long, default_value_t = 100)]
    pub noise_seed: u64,

    #[arg(long, default_value_t = 1.0)]
    pub pre_blank_period: f32,

    #[arg(long, default_value_t = 5.0)]
    pub duration: f32,

    #[arg(long, default_value_t = 64)]
    pub pattern_width: usize,

    #[arg(long, default_value_t = 1.78)]
    pub pattern_aspect: f32,

    #[arg(long, default_value_t = 4)]
    pub pattern_upscale: usize,

    #[arg(long, default_value_t = 0.0)]
    pub ori: f32,

    #[arg(long, default_value_t = 90.0)]
    pub outer_ori_delta: f32,

    #[arg(long, default_value_t = 2.5)]
    pub coherence: f32,

    #[arg(long, default_value_t = 0.0)]
    pub aperture_x: f32,

    #[arg(long, default_value_t = 0.0)]
    pub aperture_y: f32,

    #[arg(long, default_value_t = 0.2)]
    pub aperture_r: f32,

    #[arg(long, default_value_t = 0.1)]
    pub aperture_transition: f32,

    #[arg(long, default_value_t = 0.0)]
    pub annulus_alpha: f32,

    #[arg(long, default_value_t = 0.5)]
    pub inner_contrast: f32,

    #[arg(long, default_value_t = 0.5)]
    pub outer_contrast: f32,

    #[arg(long, default_value_t = 0.2)]
    pub inner_speed: f32,

    #[arg(long, default_value_t = 0.2)]
    pub outer_speed: f32,

    /// Play the synthesized movie in the terminal.
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    /// Print per-movie statistics after synthesis.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub stats: bool,

    /// Print the resolved parameter record and exit.
    #[arg(long, default_value_t = false)]
    pub dump_params: bool,
}

impl Config {
    pub fn stimulus_parameters(&self) -> StimulusParameters {
        StimulusParameters {
            fps: self.fps,
            noise_seed: self.noise_seed,
            pre_blank_period: self.pre_blank_period,
            duration: self.duration,
            pattern_width: self.pattern_width,
            pattern_aspect: self.pattern_aspect,
            pattern_upscale: self.pattern_upscale,
            ori: self.ori,
            outer_ori_delta: self.outer_ori_delta,
            coherence: self.coherence,
            aperture_x: self.aperture_x,
            aperture_y: self.aperture_y,
            aperture_r: self.aperture_r,
            aperture_transition: self.aperture_transition,
            annulus_alpha: self.annulus_alpha,
            inner_contrast: self.inner_contrast,
            outer_contrast: self.outer_contrast,
            inner_speed: self.inner_speed,
            outer_speed: self.outer_speed,
        }
    }
}
