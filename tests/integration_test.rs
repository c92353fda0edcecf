//! End-to-end replay through the frame loop with the playback collaborators

use glasses_tryon::{
    config::{Config, EXAMPLE_CONFIG},
    frame_loop::{FrameLoop, LoopControl, TickOutcome},
    interfaces::DrawingSurface,
    parameters::ParameterStore,
    playback::{LogRenderer, PlaybackSource, SyntheticFace, TraceDetector},
    surface::ImageSurface,
};

const TRACE: &str = r"
frames:
  - left_eye: [0.4, 0.5, 0.0]
    right_eye: [0.6, 0.5, 0.0]
    nose_bridge: [0.5, 0.45, 0.0]
  - left_eye: [0.4, 0.5, 0.0]
    right_eye: [0.6, 0.5, 0.01]
    nose_bridge: [0.5, 0.45, 0.0]
  - null
  - left_eye: [0.38, 0.5, 0.0]
    right_eye: [0.62, 0.5, 0.0]
    nose_bridge: [0.5, 0.45, 0.0]
";

fn fast_config() -> Config {
    let mut config = Config::default();
    config.display.target_fps = 1000;
    config
}

#[test]
fn test_trace_replay() {
    let config = fast_config();
    let control = LoopControl::default();
    let detector = TraceDetector::from_yaml(TRACE).unwrap();
    let frames = detector.len() as u64;

    let mut frame_loop = FrameLoop::new(
        PlaybackSource::new(640, 480, frames, control.clone()),
        detector,
        ImageSurface::with_size(640, 480),
        LogRenderer::new(),
        ParameterStore::new(config.transform).unwrap(),
        control.clone(),
        &config,
    )
    .unwrap();

    let stats = frame_loop.run().clone();
    assert!(control.is_stopped());
    assert_eq!(stats.face_present, 3);
    assert_eq!(stats.face_absent, 1);
    assert_eq!(frame_loop.renderer().shown(), 3);
    assert_eq!(frame_loop.renderer().hidden(), 1);
    assert_eq!(frame_loop.detector().remaining(), 0);
    assert!(frame_loop.renderer().last_anchors().is_some());

    // Eyes 0.24 apart on 640 pixels: 153.6 / 20 * 5
    assert!((frame_loop.stabilized_scale() - 38.4).abs() < 1e-9);
    let pose = frame_loop.last_pose().unwrap();
    assert_eq!(pose.rotation.y, 0.0);
}

#[test]
fn test_synthetic_replay_keeps_scale_steady() {
    let config = fast_config();
    let control = LoopControl::default();
    let mut frame_loop = FrameLoop::new(
        PlaybackSource::new(640, 480, 60, control.clone()),
        SyntheticFace::new(3, 0.0005),
        ImageSurface::with_size(640, 480),
        LogRenderer::new(),
        ParameterStore::new(config.transform).unwrap(),
        control,
        &config,
    )
    .unwrap();

    let stats = frame_loop.run().clone();
    assert_eq!(stats.face_present, 60);
    assert_eq!(stats.poses_published, 60);
    assert!(frame_loop.stabilized_scale() > 1.0);
    assert_eq!(frame_loop.surface().dimensions(), (640, 480));
    assert!(frame_loop.surface().frames_drawn() >= 60);
}

#[test]
fn test_stop_from_another_thread() {
    let config = fast_config();
    let control = LoopControl::default();
    let mut frame_loop = FrameLoop::new(
        PlaybackSource::new(320, 240, u64::MAX, control.clone()),
        SyntheticFace::new(9, 0.001).with_dropout(0.2),
        ImageSurface::with_size(320, 240),
        LogRenderer::new(),
        ParameterStore::new(config.transform).unwrap(),
        control.clone(),
        &config,
    )
    .unwrap();

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(50));
        control.stop();
    });
    let stats = frame_loop.run().clone();
    stopper.join().unwrap();

    assert!(stats.ticks > 0);
    assert_eq!(frame_loop.tick(), TickOutcome::Stopped);
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("glasses-tryon-config-{}.yaml", std::process::id()));
    let mut config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    config.transform.y_offset = -0.25;
    config.smoothing.filter = "median:3".to_string();
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.transform, config.transform);
    assert_eq!(loaded.smoothing.filter, "median:3");
    assert!(loaded.validate().is_ok());
}
