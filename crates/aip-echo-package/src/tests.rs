//! Unit tests driving the echo detector through the package interface.

use rstest::{fixture, rstest};

use aip_protocol::{
    AiPackage, Device, ImageData, Object, Pixels, RawHandle, ShapeType, Tensor,
};

use super::*;

#[fixture]
fn detector() -> aip_package_sdk::BoundPackage {
    package()
}

fn create(detector: &aip_package_sdk::BoundPackage) -> RawHandle {
    detector
        .create(&Device::default(), &[], &[])
        .expect("create succeeds")
}

fn frame(width: u32, height: u32) -> ImageData {
    ImageData::from_pixels(Pixels::Byte(vec![0; (width * height * 3) as usize]), 1, height, width, 3)
        .expect("geometry matches")
}

#[rstest]
fn echoes_images_and_detects_full_frames(detector: aip_package_sdk::BoundPackage) {
    let handle = create(&detector);
    let image = frame(4, 3);
    let result = detector
        .forward(handle, METHOD_ECHO, std::slice::from_ref(&image), &[])
        .expect("echo succeeds");

    assert_eq!(result.images(), &[image]);
    assert_eq!(result.objects().len(), 1);
    let detection = &result.objects()[0];
    assert_eq!(detection.shape().shape_type(), ShapeType::Rectangle);
    assert_eq!(detection.shape().landmarks().len(), 2);
    assert_eq!(detection.tags()[0].label, LABEL_ECHO);
}

#[rstest]
fn passes_input_objects_through(detector: aip_package_sdk::BoundPackage) {
    let handle = create(&detector);
    let weights = Object::from_extra(Tensor::byte(vec![1, 2, 3], vec![3]).expect("3 bytes"));
    let result = detector
        .forward(handle, METHOD_ECHO, &[], std::slice::from_ref(&weights))
        .expect("echo succeeds");
    assert_eq!(result.objects(), &[weights]);
}

#[rstest]
fn score_property_reaches_detections(detector: aip_package_sdk::BoundPackage) {
    let handle = create(&detector);
    detector.setd(handle, "score", 0.25).expect("writable");
    let result = detector
        .forward(handle, METHOD_ECHO, &[frame(2, 2)], &[])
        .expect("echo succeeds");
    let tag = result.objects()[0].tags()[0];
    assert!((tag.score - 0.25).abs() < f32::EPSILON);
}

#[rstest]
fn unknown_method_faults(detector: aip_package_sdk::BoundPackage) {
    let handle = create(&detector);
    let err = detector
        .forward(handle, 9, &[], &[])
        .expect_err("only the echo method exists");
    assert_eq!(err.code(), FAULT_UNKNOWN_METHOD);
}

#[rstest]
fn tag_text_resolves(detector: aip_package_sdk::BoundPackage) {
    let handle = create(&detector);
    assert_eq!(
        detector.tag(handle, METHOD_ECHO, 0, LABEL_ECHO).as_deref(),
        Some("echo")
    );
}
