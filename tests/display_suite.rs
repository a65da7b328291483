use stim_synth::display::{fit_rect, play, DisplayService, HalfBlockPresenter, BLANK_LEVEL};
use stim_synth::params::StimulusParameters;
use stim_synth::synth::Movie;

fn params_for(fps: f32, pre_blank: f32) -> StimulusParameters {
    StimulusParameters {
        fps,
        noise_seed: 1,
        pre_blank_period: pre_blank,
        duration: 1.0,
        pattern_width: 16,
        pattern_aspect: 1.0,
        pattern_upscale: 1,
        ori: 0.0,
        outer_ori_delta: 90.0,
        coherence: 1.0,
        aperture_x: 0.0,
        aperture_y: 0.0,
        aperture_r: 0.2,
        aperture_transition: 0.1,
        annulus_alpha: 0.0,
        inner_contrast: 0.5,
        outer_contrast: 0.5,
        inner_speed: 0.0,
        outer_speed: 0.0,
    }
}

fn gray_movie(width: usize, height: usize, frame_count: usize, fps: f32) -> Movie {
    Movie {
        width,
        height,
        frame_count,
        fps,
        data: vec![200u8; width * height * frame_count],
    }
}

struct MockDisplay {
    rate: f32,
    rect: (usize, usize),
    presented: Vec<Vec<u8>>,
    dropped_per_frame: u32,
}

impl MockDisplay {
    fn new(rate: f32, rect: (usize, usize)) -> Self {
        Self {
            rate,
            rect,
            presented: Vec::new(),
            dropped_per_frame: 0,
        }
    }
}

impl DisplayService for MockDisplay {
    fn refresh_rate_hz(&self) -> f32 {
        self.rate
    }

    fn display_rect(&self) -> (usize, usize) {
        self.rect
    }

    fn present_frame(&mut self, frame: &[u8], _width: usize, _height: usize) -> anyhow::Result<u32> {
        self.presented.push(frame.to_vec());
        Ok(self.dropped_per_frame)
    }
}

// ── Trial playback preconditions ────────────────────────────────────────────

#[test]
fn play_presents_blanks_then_frames() {
    let params = params_for(2.0, 1.5); // 3 blank frames
    let movie = gray_movie(16, 16, 2, 2.0);
    let mut display = MockDisplay::new(2.0, (16, 16));

    let dropped = play(&mut display, &params, &movie).expect("playback should succeed");
    assert_eq!(dropped, 0);
    assert_eq!(display.presented.len(), 3 + 2);
    for blank in &display.presented[..3] {
        assert!(blank.iter().all(|&v| v == BLANK_LEVEL), "blank frame level");
    }
    for shown in &display.presented[3..] {
        assert!(shown.iter().all(|&v| v == 200), "movie frame content");
    }
}

#[test]
fn play_accumulates_dropped_frames() {
    let params = params_for(2.0, 0.0);
    let movie = gray_movie(16, 16, 4, 2.0);
    let mut display = MockDisplay::new(2.0, (16, 16));
    display.dropped_per_frame = 2;

    let dropped = play(&mut display, &params, &movie).expect("playback should succeed");
    assert_eq!(dropped, 8);
}

#[test]
fn play_rejects_refresh_rate_mismatch() {
    let params = params_for(60.0, 0.0);
    let movie = gray_movie(16, 16, 1, 60.0);
    let mut display = MockDisplay::new(30.0, (16, 16));

    let err = play(&mut display, &params, &movie).expect_err("rate mismatch must abort");
    assert!(err.to_string().contains("refresh rate"));
    assert!(display.presented.is_empty(), "nothing may be presented");
}

#[test]
fn play_rejects_aspect_mismatch() {
    let params = params_for(2.0, 0.0);
    let movie = gray_movie(32, 16, 1, 2.0);
    let mut display = MockDisplay::new(2.0, (16, 16));

    let err = play(&mut display, &params, &movie).expect_err("aspect mismatch must abort");
    assert!(err.to_string().contains("aspect"));
}

// ── Letterbox fitting ───────────────────────────────────────────────────────

#[test]
fn fit_rect_preserves_aspect_within_cells() {
    assert_eq!(fit_rect(64, 36, 80, 48), (80, 44));
    assert_eq!(fit_rect(16, 16, 80, 48), (48, 48));
    assert_eq!(fit_rect(16, 16, 10, 48), (10, 10));
}

#[test]
fn fit_rect_degenerate_inputs_yield_empty_rect() {
    assert_eq!(fit_rect(0, 16, 80, 48), (0, 0));
    assert_eq!(fit_rect(16, 0, 80, 48), (0, 0));
    assert_eq!(fit_rect(16, 16, 0, 48), (0, 0));
    assert_eq!(fit_rect(16, 16, 80, 1), (0, 0));
}

// ── Half-block presenter ────────────────────────────────────────────────────

#[test]
fn presenter_reports_requested_rate_and_fitted_rect() {
    let presenter = HalfBlockPresenter::new(Vec::new(), 16, 16, 30.0, 20, 10)
        .expect("presenter should build");
    assert_eq!(presenter.refresh_rate_hz(), 30.0);
    assert_eq!(presenter.display_rect(), (20, 20));
}

#[test]
fn presenter_rejects_zero_fps() {
    let err = HalfBlockPresenter::new(Vec::new(), 16, 16, 0.0, 20, 10)
        .expect_err("fps=0 must fail");
    assert!(err.to_string().contains("frame rate"));
}

#[test]
fn presenter_paints_half_blocks_with_gray_colors() {
    let mut out = Vec::new();
    {
        let mut presenter = HalfBlockPresenter::new(&mut out, 4, 4, 1000.0, 10, 5)
            .expect("presenter should build");
        let frame = vec![77u8; 16];
        let dropped = presenter
            .present_frame(&frame, 4, 4)
            .expect("present should succeed");
        assert_eq!(dropped, 0, "first frame starts the schedule");
    }
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains('\u{2580}'), "missing half-block char");
    assert!(s.contains("38;2;77;77;77"), "missing gray FG color");
    assert!(s.contains("48;2;77;77;77"), "missing gray BG color");
    assert!(s.contains("\x1b[?7l") && s.contains("\x1b[?7h"), "autowrap guards");
}

#[test]
fn presenter_rejects_short_frame_buffer() {
    let mut presenter = HalfBlockPresenter::new(Vec::new(), 8, 8, 1000.0, 20, 10)
        .expect("presenter should build");
    let err = presenter
        .present_frame(&[0u8; 7], 8, 8)
        .expect_err("short buffer must fail");
    assert!(err.to_string().contains("too small"));
}
