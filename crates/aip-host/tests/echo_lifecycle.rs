//! End-to-end lifecycle test driving the echo package through the full
//! protocol: load, describe, create, compute, inspect, and tear down.

use aip_host::{Engine, HostError, Instance, InstanceSpec};
use aip_protocol::{
    Device, ImageData, LandmarkCount, Object, Pixels, ShapeType, Tensor,
};

fn engine() -> Engine {
    Engine::from_package(Box::new(aip_echo_package::package())).expect("echo package loads")
}

fn bgr_frame(width: u32, height: u32) -> ImageData {
    ImageData::from_pixels(
        Pixels::Byte(vec![127; (width * height * 3) as usize]),
        1,
        height,
        width,
        3,
    )
    .expect("geometry matches")
}

#[test]
fn full_lifecycle_against_the_echo_package() {
    let engine = engine();
    assert_eq!(engine.metadata().module, "EchoDetector");
    assert_eq!(engine.metadata().support, ["cpu"]);

    // Configuration objects ride along with create, like pre-loaded weights.
    let cfg = Object::from_extra(Tensor::scalar_double(0.5));
    let weights = Object::from_extra(Tensor::byte(vec![9; 16], vec![16]).expect("16 bytes"));
    let spec = InstanceSpec::new()
        .with_device(Device::new("cpu", 0))
        .with_objects(vec![cfg, weights]);
    let mut instance = Instance::with_engine(&engine, &spec).expect("create succeeds");

    // One image in, one echoed image and one rectangle detection out.
    let result = instance
        .forward(0, &[bgr_frame(8, 6)], &[])
        .expect("echo succeeds");
    assert_eq!(result.images().len(), 1);
    assert_eq!(ShapeType::Rectangle.landmark_count(), LandmarkCount::Exactly(2));
    for object in result.objects() {
        if object.shape().shape_type() == ShapeType::Rectangle {
            assert_eq!(object.shape().landmarks().len(), 2);
        }
    }
    let detection = &result.objects()[0];
    assert_eq!(
        instance
            .tag(0, 0, detection.tags()[0].label)
            .expect("engine live"),
        Some(String::from("echo"))
    );

    // Scalar property round-trip through the boundary.
    instance.setd("score", 0.75).expect("writable");
    assert!((instance.getd("score").expect("readable") - 0.75).abs() < f64::EPSILON);

    // Reset is a documented no-op for this stateless package.
    instance.reset().expect("reset never fails here");

    // Teardown: instance first, engine second; both idempotent.
    instance.dispose();
    instance.dispose();
    assert!(instance.is_disposed());
    assert!(!engine.is_disposed(), "borrowed engine is untouched");
    engine.dispose();
    engine.dispose();
    assert!(engine.is_disposed());
}

#[test]
fn two_workers_share_one_engine() {
    let engine = engine();
    let descriptor = engine.descriptor();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let descriptor = descriptor.clone();
            std::thread::spawn(move || {
                let mut instance =
                    Instance::with_descriptor(descriptor, &InstanceSpec::new())
                        .expect("create succeeds");
                let result = instance
                    .forward(0, &[bgr_frame(4, 4)], &[])
                    .expect("echo succeeds");
                result.objects().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("worker finishes"), 1);
    }
    engine.dispose();
}

#[test]
fn disposed_engine_turns_descriptor_calls_into_errors() {
    let engine = engine();
    let descriptor = engine.descriptor();
    engine.dispose();

    let err = descriptor
        .create(&Device::default(), &[], &[])
        .expect_err("module is gone");
    assert!(matches!(err, HostError::EngineDisposed));
    // Metadata stays readable for diagnostics.
    assert_eq!(descriptor.metadata().module, "EchoDetector");
}

#[test]
fn forward_faults_carry_package_error_text() {
    let engine = engine();
    let mut instance = Instance::with_engine(&engine, &InstanceSpec::new()).expect("create");
    let err = instance
        .forward(42, &[], &[])
        .expect_err("unknown method faults");
    match err {
        HostError::Forward { code, message } => {
            assert_eq!(code, aip_echo_package::FAULT_UNKNOWN_METHOD);
            assert!(message.contains("not implemented"), "message: {message}");
        }
        other => panic!("expected a forward error, got {other:?}"),
    }
    // The last-error channel serves the same text.
    assert!(instance.error(-1).contains("not implemented"));
}
