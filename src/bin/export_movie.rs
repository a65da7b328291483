use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use stim_synth::params::StimulusParameters;
use stim_synth::synth::{self, Movie};

const DEFAULT_OUTPUT: &str = "stimulus.mkv";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_movie",
    version,
    about = "Offline stimulus export (condition file -> lossless grayscale movie via ffmpeg)"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "FILE")]
    pub(crate) condition: PathBuf,

    #[arg(long, value_name = "MKV", default_value = DEFAULT_OUTPUT)]
    pub(crate) out: PathBuf,

    /// Dump numbered PGM frames into this directory instead of invoking ffmpeg.
    #[arg(long, value_name = "DIR")]
    pub(crate) frames_dir: Option<PathBuf>,

    /// Cap the exported duration in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) duration: Option<f32>,
}

pub(crate) fn validate_params(params: &StimulusParameters) -> Result<()> {
    if params.pattern_width == 0 {
        bail!("pattern_width must be >= 1");
    }
    if params.pattern_upscale == 0 {
        bail!("pattern_upscale must be >= 1");
    }
    if params.fps <= 0.0 {
        bail!("fps must be > 0");
    }
    if params.duration <= 0.0 {
        bail!("duration must be > 0 seconds");
    }
    if params.pattern_aspect <= 0.0 {
        bail!("pattern_aspect must be > 0");
    }
    Ok(())
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if let Some(cap) = args.duration {
        if cap <= 0.0 {
            bail!("--duration must be > 0 seconds");
        }
    }
    Ok(())
}

pub(crate) fn capped_frame_count(frame_count: usize, fps: f32, cap_s: Option<f32>) -> usize {
    match cap_s {
        Some(cap) => frame_count.min((cap.max(0.0) * fps).round() as usize),
        None => frame_count,
    }
}

pub(crate) fn pgm_header(width: usize, height: usize) -> String {
    format!("P5\n{width} {height}\n255\n")
}

fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;

    let params = StimulusParameters::from_path(&args.condition)
        .with_context(|| format!("load condition file {}", args.condition.display()))?;
    validate_params(&params)?;

    let movie = synth::synthesize(&params);
    let frame_count = capped_frame_count(movie.frame_count, params.fps, args.duration);
    if frame_count == 0 {
        bail!("no frames to export after applying --duration");
    }

    if let Some(dir) = &args.frames_dir {
        dump_pgm_frames(&movie, frame_count, dir)?;
        println!(
            "exported {} PGM frames ({}x{}) -> {}",
            frame_count,
            movie.width,
            movie.height,
            dir.display()
        );
        return Ok(());
    }

    ensure_ffmpeg_available()?;

    let mut parent = args.out.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))?;

    let mut ffmpeg = spawn_ffmpeg(&args.out, movie.width, movie.height, params.fps)?;
    let mut ffmpeg_in = ffmpeg
        .stdin
        .take()
        .context("failed to open ffmpeg stdin for rawvideo input")?;

    for t in 0..frame_count {
        ffmpeg_in
            .write_all(movie.frame(t))
            .context("write frame to ffmpeg stdin")?;
    }
    drop(ffmpeg_in);

    let status = ffmpeg.wait().context("wait for ffmpeg")?;
    if !status.success() {
        bail!("ffmpeg exited with status {status}");
    }

    println!(
        "exported {} frames @ {} fps ({}x{}) -> {}",
        frame_count,
        params.fps,
        movie.width,
        movie.height,
        args.out.display()
    );
    Ok(())
}

fn dump_pgm_frames(movie: &Movie, frame_count: usize, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create frames dir {}", dir.display()))?;
    let header = pgm_header(movie.width, movie.height);
    for t in 0..frame_count {
        let path = dir.join(format!("frame_{t:06}.pgm"));
        let mut file =
            fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(header.as_bytes())?;
        file.write_all(movie.frame(t))?;
    }
    Ok(())
}

fn ensure_ffmpeg_available() -> Result<()> {
    match Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            bail!("ffmpeg not found in PATH (install ffmpeg, or use --frames-dir)")
        }
        Err(err) => Err(anyhow!("failed to run ffmpeg: {err}")),
    }
}

fn spawn_ffmpeg(
    out_path: &Path,
    width: usize,
    height: usize,
    fps: f32,
) -> Result<std::process::Child> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("gray")
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-framerate")
        .arg(format!("{fps:.6}"))
        .arg("-i")
        .arg("-")
        .arg("-c:v")
        .arg("ffv1")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    cmd.spawn()
        .with_context(|| format!("spawn ffmpeg for output {}", out_path.display()))
}
