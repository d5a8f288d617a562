//! Unit tests for instance lifecycle, ownership, and error plumbing.

use std::path::PathBuf;

use mockall::mock;
use mockall::predicate::eq;

use aip_protocol::{
    AiPackage, Device, Fault, ForwardResult, ImageData, Object, PackageMetadata, PackageResult,
    RawHandle, Tensor, Value,
};
use aip_package_sdk::PackageBuilder;

use super::*;
use crate::engine::Engine;
use crate::error::HostError;

mock! {
    pub Package {}

    impl AiPackage for Package {
        fn metadata(&self) -> PackageMetadata;
        fn create(
            &self,
            device: &Device,
            models: &[PathBuf],
            objects: &[Object],
        ) -> PackageResult<RawHandle>;
        fn free(&self, handle: RawHandle);
        fn property(&self, handle: RawHandle) -> PackageResult<Vec<String>>;
        fn setd(&self, handle: RawHandle, name: &str, value: f64) -> PackageResult<()>;
        fn getd(&self, handle: RawHandle, name: &str) -> PackageResult<f64>;
        fn set(&self, handle: RawHandle, name: &str, value: &Object) -> PackageResult<()>;
        fn get(&self, handle: RawHandle, name: &str) -> PackageResult<Object>;
        fn reset(&self, handle: RawHandle) -> PackageResult<()>;
        fn forward(
            &self,
            handle: RawHandle,
            method_id: u32,
            images: &[ImageData],
            objects: &[Object],
        ) -> PackageResult<ForwardResult>;
        fn tag(
            &self,
            handle: RawHandle,
            method_id: u32,
            label_index: u32,
            label_value: i32,
        ) -> Option<String>;
        fn error(&self, handle: Option<RawHandle>, code: i32) -> Option<String>;
    }
}

fn test_metadata() -> PackageMetadata {
    PackageMetadata {
        aip_version: 2,
        module: String::from("Mocked"),
        description: String::from("{}"),
        m_id: String::from("mock.package"),
        s_id: String::from("MOCK"),
        version: String::from("1.0"),
        support: vec![String::from("cpu")],
    }
}

/// A mock that loads cleanly and creates handle 7.
fn creatable_mock() -> MockPackage {
    let mut package = MockPackage::new();
    package.expect_metadata().return_const(test_metadata());
    package
        .expect_create()
        .returning(|_, _, _| Ok(RawHandle::new(7)));
    package
}

fn echo_engine() -> Engine {
    Engine::from_package(Box::new(aip_echo_package::package())).expect("echo package loads")
}

// ---------------------------------------------------------------------------
// Disposal and the disposed sentinel
// ---------------------------------------------------------------------------

#[test]
fn dispose_frees_the_handle_exactly_once() {
    let mut package = creatable_mock();
    package
        .expect_free()
        .with(eq(RawHandle::new(7)))
        .times(1)
        .return_const(());

    let engine = Engine::from_package(Box::new(package)).expect("mock loads");
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");

    instance.dispose();
    assert!(instance.is_disposed());
    instance.dispose();
    drop(instance);
    // Unloading drops the mock, which verifies the single free call.
    engine.dispose();
}

#[test]
fn operations_after_dispose_fail_without_a_native_call() {
    let mut package = creatable_mock();
    package.expect_free().times(1).return_const(());
    // No forward/setd/getd expectations: reaching the package would panic.

    let engine = Engine::from_package(Box::new(package)).expect("mock loads");
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    instance.dispose();

    assert!(matches!(
        instance.forward(0, &[], &[]),
        Err(HostError::Disposed)
    ));
    assert!(matches!(instance.getd("score"), Err(HostError::Disposed)));
    assert!(matches!(instance.setd("score", 1.0), Err(HostError::Disposed)));
    assert!(matches!(instance.reset(), Err(HostError::Disposed)));
    assert!(matches!(instance.property(), Err(HostError::Disposed)));
    assert!(matches!(instance.tag(0, 0, 0), Err(HostError::Disposed)));
    assert_eq!(instance.error(-1), "");
}

#[test]
fn dropping_an_instance_disposes_it() {
    let mut package = creatable_mock();
    package.expect_free().times(1).return_const(());

    let engine = Engine::from_package(Box::new(package)).expect("mock loads");
    {
        let _instance =
            Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    }
    engine.dispose();
}

// ---------------------------------------------------------------------------
// Engine ownership
// ---------------------------------------------------------------------------

#[test]
fn owned_engine_is_disposed_with_the_instance() {
    let engine = echo_engine();
    let descriptor = engine.descriptor();
    let mut instance =
        Instance::from_engine(engine, &InstanceSpec::new()).expect("create succeeds");

    instance.dispose();

    assert!(descriptor.is_disposed());
    let err = descriptor
        .create(&Device::default(), &[], &[])
        .expect_err("engine went with the instance");
    assert!(matches!(err, HostError::EngineDisposed));
}

#[test]
fn borrowed_engine_survives_instance_disposal() {
    let engine = echo_engine();
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    instance.dispose();

    assert!(!engine.is_disposed());
    let again = Instance::with_engine(&engine, &InstanceSpec::new());
    assert!(again.is_ok(), "borrowed engine must remain usable");
    engine.dispose();
}

#[test]
fn multiple_instances_share_one_engine() {
    let engine = echo_engine();
    let first = Instance::with_engine(&engine, &InstanceSpec::new()).expect("first");
    let second = Instance::with_engine(&engine, &InstanceSpec::new()).expect("second");
    drop(first);
    drop(second);
    assert!(!engine.is_disposed());
    engine.dispose();
}

// ---------------------------------------------------------------------------
// Error plumbing
// ---------------------------------------------------------------------------

#[test]
fn construction_failure_resolves_text_through_the_error_channel() {
    let mut package = MockPackage::new();
    package.expect_metadata().return_const(test_metadata());
    package
        .expect_create()
        .returning(|_, _, _| Err(Fault::new(12)));
    package
        .expect_error()
        .with(eq(None::<RawHandle>), eq(12))
        .returning(|_, _| Some(String::from("model file is unreadable")));

    let engine = Engine::from_package(Box::new(package)).expect("mock loads");
    let err = Instance::with_engine(&engine, &InstanceSpec::new()).expect_err("create fails");
    assert!(matches!(
        err,
        HostError::Init { code: 12, ref message } if message == "model file is unreadable"
    ));
}

#[test]
fn construction_failure_falls_back_to_the_last_error_sentinel() {
    let mut package = MockPackage::new();
    package.expect_metadata().return_const(test_metadata());
    package
        .expect_create()
        .returning(|_, _, _| Err(Fault::new(12)));
    package
        .expect_error()
        .with(eq(None::<RawHandle>), eq(12))
        .returning(|_, _| None);
    package
        .expect_error()
        .with(eq(None::<RawHandle>), eq(aip_protocol::LAST_ERROR))
        .returning(|_, _| Some(String::from("fell back")));

    let engine = Engine::from_package(Box::new(package)).expect("mock loads");
    let err = Instance::with_engine(&engine, &InstanceSpec::new()).expect_err("create fails");
    assert!(matches!(err, HostError::Init { ref message, .. } if message == "fell back"));
}

#[test]
fn forward_fault_surfaces_code_and_text() {
    let mut package = creatable_mock();
    package.expect_free().return_const(());
    package
        .expect_forward()
        .returning(|_, _, _, _| Err(Fault::new(33)));
    package
        .expect_error()
        .returning(|_, code| (code == 33).then(|| String::from("shape mismatch inside package")));

    let engine = Engine::from_package(Box::new(package)).expect("mock loads");
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    let err = instance.forward(4, &[], &[]).expect_err("package faults");
    assert!(matches!(
        err,
        HostError::Forward { code: 33, ref message } if message.contains("shape mismatch")
    ));
}

// ---------------------------------------------------------------------------
// Method id policy
// ---------------------------------------------------------------------------

#[test]
fn reject_zero_policy_fails_before_the_boundary() {
    let engine = echo_engine();
    let mut instance = Instance::with_engine(
        &engine,
        &InstanceSpec::new().with_method_id_policy(MethodIdPolicy::RejectZero),
    )
    .expect("create succeeds");

    let err = instance.forward(0, &[], &[]).expect_err("zero is reserved");
    assert!(matches!(err, HostError::Forward { code: 0, .. }));
}

#[test]
fn allow_zero_is_the_default_policy() {
    assert_eq!(
        InstanceSpec::new().method_id_policy(),
        MethodIdPolicy::AllowZero
    );
    let engine = echo_engine();
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    assert!(instance.forward(0, &[], &[]).is_ok());
}

// ---------------------------------------------------------------------------
// Spec defaults and value plumbing
// ---------------------------------------------------------------------------

#[test]
fn spec_defaults_to_cpu_zero_and_empty_inputs() {
    let spec = InstanceSpec::new();
    assert_eq!(spec.device(), &Device::default());
    assert!(spec.models().is_empty());
    assert!(spec.objects().is_empty());
}

#[test]
fn structured_set_coerces_onto_scalar_properties() {
    let engine = echo_engine();
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");

    instance
        .set("score", Tensor::scalar_double(0.125))
        .expect("scalar coercion");
    assert!((instance.getd("score").expect("readable") - 0.125).abs() < f64::EPSILON);

    let value = instance.get("score").expect("readable");
    assert!(matches!(value, Value::Tensor(ref t) if t.as_scalar_double() == Some(0.125)));
}

#[test]
fn unknown_property_surfaces_a_property_error_with_text() {
    let engine = echo_engine();
    let mut instance =
        Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    let err = instance.setd("scroe", 0.5).expect_err("misspelled");
    assert!(matches!(
        err,
        HostError::Property { ref name, ref message, .. }
            if name == "scroe" && message.contains("did you mean")
    ));
}

#[test]
fn property_listing_and_tag_lookup_pass_through() {
    let engine = echo_engine();
    let instance = Instance::with_engine(&engine, &InstanceSpec::new()).expect("create succeeds");
    assert_eq!(instance.property().expect("listable"), ["score"]);
    assert_eq!(
        instance
            .tag(aip_echo_package::METHOD_ECHO, 0, aip_echo_package::LABEL_ECHO)
            .expect("engine live"),
        Some(String::from("echo"))
    );
}

#[test]
fn sdk_package_builds_without_a_factory_and_reports_it() {
    let package = PackageBuilder::new(test_metadata()).build();
    let engine = Engine::from_package(Box::new(package)).expect("loads");
    let err = Instance::with_engine(&engine, &InstanceSpec::new()).expect_err("no factory");
    assert!(matches!(err, HostError::Init { .. }));
}
