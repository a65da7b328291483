#[allow(dead_code)]
#[path = "../src/bin/export_movie.rs"]
mod export_movie;

use clap::Parser;
use std::path::PathBuf;
use stim_synth::params::StimulusParameters;

fn valid_params() -> StimulusParameters {
    StimulusParameters {
        fps: 60.0,
        noise_seed: 100,
        pre_blank_period: 1.0,
        duration: 5.0,
        pattern_width: 64,
        pattern_aspect: 1.78,
        pattern_upscale: 4,
        ori: 0.0,
        outer_ori_delta: 90.0,
        coherence: 2.5,
        aperture_x: 0.0,
        aperture_y: 0.0,
        aperture_r: 0.2,
        aperture_transition: 0.1,
        annulus_alpha: 0.0,
        inner_contrast: 0.5,
        outer_contrast: 0.5,
        inner_speed: 0.2,
        outer_speed: 0.2,
    }
}

#[test]
fn parse_args_defaults_are_stable() {
    let args = export_movie::Cli::try_parse_from(["export_movie", "--condition", "cond.txt"])
        .expect("parse should succeed");

    assert_eq!(args.condition, PathBuf::from("cond.txt"));
    assert_eq!(args.out, PathBuf::from("stimulus.mkv"));
    assert_eq!(args.frames_dir, None);
    assert_eq!(args.duration, None);
}

#[test]
fn parse_args_overrides_work() {
    let args = export_movie::Cli::try_parse_from([
        "export_movie",
        "--condition",
        "session/cond_07.txt",
        "--out",
        "movies/cond_07.mkv",
        "--frames-dir",
        "frames",
        "--duration",
        "2.5",
    ])
    .expect("parse should succeed");

    assert_eq!(args.condition, PathBuf::from("session/cond_07.txt"));
    assert_eq!(args.out, PathBuf::from("movies/cond_07.mkv"));
    assert_eq!(args.frames_dir, Some(PathBuf::from("frames")));
    assert_eq!(args.duration, Some(2.5));
}

#[test]
fn validate_rejects_non_positive_duration_cap() {
    let args = export_movie::Cli::try_parse_from([
        "export_movie",
        "--condition",
        "cond.txt",
        "--duration",
        "0",
    ])
    .expect("parse should succeed");

    let err = export_movie::validate_args(&args).expect_err("duration=0 must fail validation");
    assert!(err.to_string().contains("--duration"));
}

#[test]
fn validate_params_rejects_degenerate_conditions() {
    let mut p = valid_params();
    p.pattern_width = 0;
    let err = export_movie::validate_params(&p).expect_err("zero width must fail");
    assert!(err.to_string().contains("pattern_width"));

    let mut p = valid_params();
    p.pattern_upscale = 0;
    assert!(export_movie::validate_params(&p).is_err());

    let mut p = valid_params();
    p.fps = 0.0;
    assert!(export_movie::validate_params(&p).is_err());

    let mut p = valid_params();
    p.duration = -1.0;
    assert!(export_movie::validate_params(&p).is_err());

    let mut p = valid_params();
    p.pattern_aspect = 0.0;
    assert!(export_movie::validate_params(&p).is_err());

    assert!(export_movie::validate_params(&valid_params()).is_ok());
}

#[test]
fn capped_frame_count_is_deterministic() {
    assert_eq!(export_movie::capped_frame_count(120, 60.0, None), 120);
    assert_eq!(export_movie::capped_frame_count(120, 60.0, Some(1.0)), 60);
    assert_eq!(export_movie::capped_frame_count(120, 60.0, Some(10.0)), 120);
    assert_eq!(export_movie::capped_frame_count(120, 60.0, Some(0.5)), 30);
    assert_eq!(export_movie::capped_frame_count(0, 60.0, Some(1.0)), 0);
}

#[test]
fn pgm_header_is_binary_graymap() {
    assert_eq!(export_movie::pgm_header(256, 144), "P5\n256 144\n255\n");
    assert_eq!(export_movie::pgm_header(1, 1), "P5\n1 1\n255\n");
}
