use anyhow::bail;
use std::io::Write;
use std::time::{Duration, Instant};

use crate::display::DisplayService;

/// Largest half-block pixel rect (width, even height) inside a
/// `px_w x px_h` pixel grid that preserves the movie's aspect ratio.
pub fn fit_rect(movie_w: usize, movie_h: usize, px_w: usize, px_h: usize) -> (usize, usize) {
    if movie_w == 0 || movie_h == 0 || px_w == 0 || px_h < 2 {
        return (0, 0);
    }
    let aspect = movie_w as f32 / movie_h as f32;
    let mut h = px_h & !1;
    let mut w = (h as f32 * aspect).round() as usize;
    if w > px_w {
        w = px_w;
        h = ((w as f32 / aspect).round() as usize) & !1;
    }
    (w.max(1), h.max(2).min(px_h & !1))
}

/// Terminal presenter: letterboxes each grayscale frame into the cell
/// grid (one cell = two stacked pixels) and paces presentation against a
/// wall-clock schedule, reporting frames dropped when it falls behind.
#[derive(Debug)]
pub struct HalfBlockPresenter<W: Write> {
    out: W,
    fps: f32,
    rect_w: usize,
    rect_h: usize,
    origin_col: usize,
    origin_row: usize,
    frame_interval: Duration,
    next_deadline: Option<Instant>,
    last_fg: Option<u8>,
    last_bg: Option<u8>,
}

impl<W: Write> HalfBlockPresenter<W> {
    pub fn new(
        out: W,
        movie_w: usize,
        movie_h: usize,
        fps: f32,
        term_cols: u16,
        term_rows: u16,
    ) -> anyhow::Result<Self> {
        if fps <= 0.0 {
            bail!("frame rate must be positive, got {fps}");
        }
        let px_w = term_cols as usize;
        let px_h = term_rows as usize * 2;
        let (rect_w, rect_h) = fit_rect(movie_w, movie_h, px_w, px_h);
        if rect_w == 0 || rect_h == 0 {
            bail!("terminal too small for a {movie_w}x{movie_h} movie ({term_cols}x{term_rows} cells)");
        }

        Ok(Self {
            out,
            fps,
            rect_w,
            rect_h,
            origin_col: (px_w - rect_w) / 2 + 1,
            origin_row: (px_h - rect_h) / 4 + 1,
            frame_interval: Duration::from_secs_f32(1.0 / fps),
            next_deadline: None,
            last_fg: None,
            last_bg: None,
        })
    }

    pub fn from_terminal(
        out: W,
        movie_w: usize,
        movie_h: usize,
        fps: f32,
    ) -> anyhow::Result<Self> {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        Self::new(out, movie_w, movie_h, fps, cols, rows)
    }

    fn pace(&mut self) -> u32 {
        let now = Instant::now();
        match self.next_deadline {
            None => {
                self.next_deadline = Some(now + self.frame_interval);
                0
            }
            Some(deadline) => {
                if now < deadline {
                    std::thread::sleep(deadline - now);
                    self.next_deadline = Some(deadline + self.frame_interval);
                    0
                } else {
                    // Behind schedule: count whole missed intervals and resync.
                    let behind = (now - deadline).as_secs_f32();
                    self.next_deadline = Some(now + self.frame_interval);
                    (behind / self.frame_interval.as_secs_f32()) as u32
                }
            }
        }
    }
}

impl<W: Write> DisplayService for HalfBlockPresenter<W> {
    fn refresh_rate_hz(&self) -> f32 {
        self.fps
    }

    fn display_rect(&self) -> (usize, usize) {
        (self.rect_w, self.rect_h)
    }

    fn present_frame(&mut self, frame: &[u8], width: usize, height: usize) -> anyhow::Result<u32> {
        if frame.len() < width * height || width == 0 || height == 0 {
            bail!(
                "frame buffer too small (need {}, got {})",
                width * height,
                frame.len()
            );
        }

        let dropped = self.pace();

        // Disable autowrap while painting full-width runs.
        self.out.write_all(b"\x1b[0m\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';

        for cell_row in 0..self.rect_h / 2 {
            let top_y = (cell_row * 2) * height / self.rect_h;
            let bot_y = (cell_row * 2 + 1) * height / self.rect_h;
            write!(
                self.out,
                "\x1b[{};{}H",
                self.origin_row + cell_row,
                self.origin_col
            )?;
            for cell_col in 0..self.rect_w {
                let x = cell_col * width / self.rect_w;
                let top = frame[top_y * width + x];
                let bot = frame[bot_y * width + x];

                if self.last_fg != Some(top) {
                    write!(self.out, "\x1b[38;2;{top};{top};{top}m")?;
                    self.last_fg = Some(top);
                }
                if self.last_bg != Some(bot) {
                    write!(self.out, "\x1b[48;2;{bot};{bot};{bot}m")?;
                    self.last_bg = Some(bot);
                }
                write!(self.out, "{HALF_BLOCK}")?;
            }
        }

        self.out.write_all(b"\x1b[?7h")?;
        self.out.flush()?;
        Ok(dropped)
    }
}
