use anyhow::Context;
use std::io::BufWriter;

use crate::config::Config;
use crate::display::{self, HalfBlockPresenter, TerminalGuard};
use crate::params::StimulusParameters;
use crate::synth::{self, Movie};

pub fn resolve_parameters(cfg: &Config) -> anyhow::Result<StimulusParameters> {
    match &cfg.condition {
        Some(path) => StimulusParameters::from_path(path)
            .with_context(|| format!("load condition file {}", path.display())),
        None => Ok(cfg.stimulus_parameters()),
    }
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let params = resolve_parameters(&cfg)?;
    let movie = synth::synthesize(&params);

    if cfg.stats {
        print_stats(&movie);
    }

    if cfg.preview {
        let dropped = {
            let _term = TerminalGuard::new()?;
            let out = BufWriter::new(TerminalGuard::stdout());
            let mut presenter =
                HalfBlockPresenter::from_terminal(out, movie.width, movie.height, params.fps)?;
            display::play(&mut presenter, &params, &movie)?
        };
        if dropped > 0 {
            eprintln!("warning: {dropped} frame(s) dropped during playback");
        }
    }

    Ok(())
}

fn print_stats(movie: &Movie) {
    println!(
        "movie: {}x{} px, {} frames @ {} fps ({:.3}s)",
        movie.width,
        movie.height,
        movie.frame_count,
        movie.fps,
        movie.frame_count as f32 / movie.fps.max(f32::MIN_POSITIVE),
    );
    if movie.data.is_empty() {
        return;
    }
    let min = movie.data.iter().copied().min().unwrap_or(0);
    let max = movie.data.iter().copied().max().unwrap_or(0);
    let mean = movie.data.iter().map(|&v| v as f64).sum::<f64>() / movie.data.len() as f64;
    println!("luminance: min {min}, max {max}, mean {mean:.2}");
}
