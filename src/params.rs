use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

/// Flat scalar record describing one stimulus condition. Immutable once
/// synthesis begins; the synthesizer never writes back into it.
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusParameters {
    pub fps: f32,
    pub noise_seed: u64,
    pub pre_blank_period: f32,
    pub duration: f32,
    pub pattern_width: usize,
    pub pattern_aspect: f32,
    pub pattern_upscale: usize,
    pub ori: f32,
    pub outer_ori_delta: f32,
    pub coherence: f32,
    pub aperture_x: f32,
    pub aperture_y: f32,
    pub aperture_r: f32,
    pub aperture_transition: f32,
    pub annulus_alpha: f32,
    pub inner_contrast: f32,
    pub outer_contrast: f32,
    pub inner_speed: f32,
    pub outer_speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamsError {
    Io(String),
    Parse { line: usize, message: String },
    UnknownKey { line: usize, key: String },
    DuplicateKey { line: usize, key: String },
    MissingField(&'static str),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::UnknownKey { line, key } => write!(f, "unknown key at line {line}: {key}"),
            Self::DuplicateKey { line, key } => write!(f, "duplicate key at line {line}: {key}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for ParamsError {}

impl StimulusParameters {
    /// Parse a condition file: one `key = value` per line, `#` comments.
    /// Every recognized option must appear exactly once.
    pub fn parse(text: &str) -> Result<Self, ParamsError> {
        let mut fps: Option<f32> = None;
        let mut noise_seed: Option<u64> = None;
        let mut pre_blank_period: Option<f32> = None;
        let mut duration: Option<f32> = None;
        let mut pattern_width: Option<usize> = None;
        let mut pattern_aspect: Option<f32> = None;
        let mut pattern_upscale: Option<usize> = None;
        let mut ori: Option<f32> = None;
        let mut outer_ori_delta: Option<f32> = None;
        let mut coherence: Option<f32> = None;
        let mut aperture_x: Option<f32> = None;
        let mut aperture_y: Option<f32> = None;
        let mut aperture_r: Option<f32> = None;
        let mut aperture_transition: Option<f32> = None;
        let mut annulus_alpha: Option<f32> = None;
        let mut inner_contrast: Option<f32> = None;
        let mut outer_contrast: Option<f32> = None;
        let mut inner_speed: Option<f32> = None;
        let mut outer_speed: Option<f32> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (key, value) = trimmed.split_once('=').ok_or(ParamsError::Parse {
                line: line_no,
                message: "expected <key> = <value>".to_string(),
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "noise_seed" => {
                    assign_once(&mut noise_seed, parse_u64(value, line_no, key)?, line_no, key)?
                }
                "pattern_width" => assign_once(
                    &mut pattern_width,
                    parse_usize(value, line_no, key)?,
                    line_no,
                    key,
                )?,
                "pattern_upscale" => assign_once(
                    &mut pattern_upscale,
                    parse_usize(value, line_no, key)?,
                    line_no,
                    key,
                )?,
                _ => {
                    let slot = match key {
                        "fps" => &mut fps,
                        "pre_blank_period" => &mut pre_blank_period,
                        "duration" => &mut duration,
                        "pattern_aspect" => &mut pattern_aspect,
                        "ori" => &mut ori,
                        "outer_ori_delta" => &mut outer_ori_delta,
                        "coherence" => &mut coherence,
                        "aperture_x" => &mut aperture_x,
                        "aperture_y" => &mut aperture_y,
                        "aperture_r" => &mut aperture_r,
                        "aperture_transition" => &mut aperture_transition,
                        "annulus_alpha" => &mut annulus_alpha,
                        "inner_contrast" => &mut inner_contrast,
                        "outer_contrast" => &mut outer_contrast,
                        "inner_speed" => &mut inner_speed,
                        "outer_speed" => &mut outer_speed,
                        _ => {
                            return Err(ParamsError::UnknownKey {
                                line: line_no,
                                key: key.to_string(),
                            });
                        }
                    };
                    assign_once(slot, parse_f32(value, line_no, key)?, line_no, key)?;
                }
            }
        }

        Ok(Self {
            fps: fps.ok_or(ParamsError::MissingField("fps"))?,
            noise_seed: noise_seed.ok_or(ParamsError::MissingField("noise_seed"))?,
            pre_blank_period: pre_blank_period
                .ok_or(ParamsError::MissingField("pre_blank_period"))?,
            duration: duration.ok_or(ParamsError::MissingField("duration"))?,
            pattern_width: pattern_width.ok_or(ParamsError::MissingField("pattern_width"))?,
            pattern_aspect: pattern_aspect.ok_or(ParamsError::MissingField("pattern_aspect"))?,
            pattern_upscale: pattern_upscale
                .ok_or(ParamsError::MissingField("pattern_upscale"))?,
            ori: ori.ok_or(ParamsError::MissingField("ori"))?,
            outer_ori_delta: outer_ori_delta
                .ok_or(ParamsError::MissingField("outer_ori_delta"))?,
            coherence: coherence.ok_or(ParamsError::MissingField("coherence"))?,
            aperture_x: aperture_x.ok_or(ParamsError::MissingField("aperture_x"))?,
            aperture_y: aperture_y.ok_or(ParamsError::MissingField("aperture_y"))?,
            aperture_r: aperture_r.ok_or(ParamsError::MissingField("aperture_r"))?,
            aperture_transition: aperture_transition
                .ok_or(ParamsError::MissingField("aperture_transition"))?,
            annulus_alpha: annulus_alpha.ok_or(ParamsError::MissingField("annulus_alpha"))?,
            inner_contrast: inner_contrast.ok_or(ParamsError::MissingField("inner_contrast"))?,
            outer_contrast: outer_contrast.ok_or(ParamsError::MissingField("outer_contrast"))?,
            inner_speed: inner_speed.ok_or(ParamsError::MissingField("inner_speed"))?,
            outer_speed: outer_speed.ok_or(ParamsError::MissingField("outer_speed"))?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ParamsError::Io(format!("{}: {err}", path.display())))?;
        Self::parse(&text)
    }

    /// Render the record back into condition-file form (parseable by `parse`).
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "fps = {}", self.fps);
        let _ = writeln!(out, "noise_seed = {}", self.noise_seed);
        let _ = writeln!(out, "pre_blank_period = {}", self.pre_blank_period);
        let _ = writeln!(out, "duration = {}", self.duration);
        let _ = writeln!(out, "pattern_width = {}", self.pattern_width);
        let _ = writeln!(out, "pattern_aspect = {}", self.pattern_aspect);
        let _ = writeln!(out, "pattern_upscale = {}", self.pattern_upscale);
        let _ = writeln!(out, "ori = {}", self.ori);
        let _ = writeln!(out, "outer_ori_delta = {}", self.outer_ori_delta);
        let _ = writeln!(out, "coherence = {}", self.coherence);
        let _ = writeln!(out, "aperture_x = {}", self.aperture_x);
        let _ = writeln!(out, "aperture_y = {}", self.aperture_y);
        let _ = writeln!(out, "aperture_r = {}", self.aperture_r);
        let _ = writeln!(out, "aperture_transition = {}", self.aperture_transition);
        let _ = writeln!(out, "annulus_alpha = {}", self.annulus_alpha);
        let _ = writeln!(out, "inner_contrast = {}", self.inner_contrast);
        let _ = writeln!(out, "outer_contrast = {}", self.outer_contrast);
        let _ = writeln!(out, "inner_speed = {}", self.inner_speed);
        let _ = writeln!(out, "outer_speed = {}", self.outer_speed);
        out
    }

    /// Dimensions of the small noise field: `pattern_width` across, height
    /// chosen so the field covers the pattern's aspect ratio.
    pub fn base_dims(&self) -> (usize, usize) {
        let w = self.pattern_width;
        let h = (self.pattern_width as f32 / self.pattern_aspect).round() as usize;
        (h, w)
    }

    /// Output (movie) spatial dimensions after upscaling.
    pub fn output_dims(&self) -> (usize, usize) {
        let (h, w) = self.base_dims();
        (h * self.pattern_upscale, w * self.pattern_upscale)
    }

    pub fn frame_count(&self) -> usize {
        (self.duration * self.fps).round() as usize
    }
}

fn assign_once<T>(
    slot: &mut Option<T>,
    value: T,
    line: usize,
    key: &str,
) -> Result<(), ParamsError> {
    if slot.is_some() {
        return Err(ParamsError::DuplicateKey {
            line,
            key: key.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

fn parse_f32(value: &str, line: usize, key: &str) -> Result<f32, ParamsError> {
    value.parse::<f32>().map_err(|_| ParamsError::Parse {
        line,
        message: format!("{key}: expected a number, got '{value}'"),
    })
}

fn parse_u64(value: &str, line: usize, key: &str) -> Result<u64, ParamsError> {
    value.parse::<u64>().map_err(|_| ParamsError::Parse {
        line,
        message: format!("{key}: expected a non-negative integer, got '{value}'"),
    })
}

fn parse_usize(value: &str, line: usize, key: &str) -> Result<usize, ParamsError> {
    value.parse::<usize>().map_err(|_| ParamsError::Parse {
        line,
        message: format!("{key}: expected a non-negative integer, got '{value}'"),
    })
}
