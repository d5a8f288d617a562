//! Unit tests for error rendering.

use aip_protocol::ShapeMismatchError;

use super::*;

#[test]
fn load_error_names_the_module() {
    let err = HostError::Load {
        module: String::from("face_detector"),
        message: String::from("file not found"),
        source: None,
    };
    assert_eq!(
        err.to_string(),
        "failed to load module 'face_detector': file not found"
    );
}

#[test]
fn property_error_names_property_and_code() {
    let err = HostError::Property {
        name: String::from("threshold"),
        code: 7,
        message: String::from("out of range"),
    };
    let text = err.to_string();
    assert!(text.contains("threshold"));
    assert!(text.contains("code 7"));
}

#[test]
fn shape_mismatch_passes_through_transparently() {
    let inner = ShapeMismatchError::TensorElementCount {
        len: 10,
        expected: 3,
        dims: vec![3],
    };
    let err = HostError::from(inner.clone());
    assert_eq!(err.to_string(), inner.to_string());
}
