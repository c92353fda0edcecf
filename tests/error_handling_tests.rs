//! Error handling tests for all modules

use glasses_tryon::{
    config::Config,
    filters::create_filter,
    landmarks::AnchorIndices,
    parameters::{ParameterStore, ParameterUpdate, TransformParameters},
    playback::TraceDetector,
    Error,
};

#[test]
fn test_filter_creation_errors() {
    assert!(matches!(create_filter("kalman"), Err(Error::FilterError(_))));

    match create_filter("moving_average:0") {
        Err(Error::FilterError(msg)) => assert!(msg.contains("Window size")),
        _ => panic!("Expected FilterError"),
    }

    match create_filter("exponential:2.0") {
        Err(Error::FilterError(msg)) => assert!(msg.contains("Alpha")),
        _ => panic!("Expected FilterError"),
    }

    for spec in ["exponential:-0.1", "median:0", "median:4", "median:abc", "moving_average:-5"] {
        assert!(create_filter(spec).is_err(), "{spec} should be rejected");
    }
}

#[test]
fn test_unknown_parameter_name() {
    match ParameterUpdate::single("brightness", 1.0) {
        Err(Error::UnknownParameter(name)) => assert_eq!(name, "brightness"),
        _ => panic!("Expected UnknownParameter"),
    }
}

#[test]
fn test_malformed_assignment() {
    assert!(matches!(ParameterUpdate::parse_assignment("yawMultiplier"), Err(Error::InvalidInput(_))));
    assert!(matches!(ParameterUpdate::parse_assignment("yawMultiplier=fast"), Err(Error::InvalidInput(_))));
    assert!(ParameterUpdate::parse_assignment(" yawMultiplier = 2.5 ").is_ok());
}

#[test]
fn test_rejected_update_leaves_store_unchanged() {
    let store = ParameterStore::default();
    let update = ParameterUpdate {
        x_offset: Some(1.0),
        tilt_multiplier: Some(f64::INFINITY),
        ..ParameterUpdate::default()
    };

    match store.set(&update) {
        Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "tilt_multiplier"),
        _ => panic!("Expected InvalidParameter"),
    }
    assert_eq!(store.get(), TransformParameters::default());
}

#[test]
fn test_store_rejects_invalid_initial_parameters() {
    let params = TransformParameters {
        coordinate_factor: f64::NAN,
        ..TransformParameters::default()
    };
    assert!(ParameterStore::new(params).is_err());
}

#[test]
fn test_anchor_indices_out_of_range() {
    let indices = AnchorIndices {
        left_eye: 33,
        right_eye: 263,
        nose_bridge: 600,
    };
    assert!(matches!(indices.validate(478), Err(Error::InvalidInput(_))));
}

#[test]
fn test_config_file_missing() {
    let result = Config::from_file("/nonexistent/glasses-tryon.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_trace_file_missing() {
    let result = TraceDetector::from_file("/nonexistent/trace.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_error_messages() {
    let err = Error::InvalidParameter {
        name: "scale_divider".to_string(),
        value: f64::NAN,
    };
    assert!(err.to_string().contains("scale_divider"));

    let err = Error::DetectorUnavailable("model failed to load".to_string());
    assert!(err.to_string().contains("model failed to load"));
}
