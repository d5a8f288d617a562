//! A minimal complete AI Package used for integration testing and as an
//! authoring reference.
//!
//! The echo detector returns every input image unchanged and reports one
//! full-frame rectangle detection per image, tagged with the configured
//! score. Input objects pass through behind the detections. The package is
//! compiled both as a native module (`cdylib`, loadable through
//! `aip_host::Engine::load`) and as a plain library so tests can reach
//! [`package`] in-process.

use aip_package_sdk::{
    PackageBuilder, PackageFault, PackageInstance, Properties, export_package,
};
use aip_protocol::{
    AIP_VERSION, ForwardResult, ImageData, Object, PackageMetadata, Point, Shape, Tag,
};

/// The only computation this package implements.
pub const METHOD_ECHO: u32 = 0;

/// Fault code for a method id this package does not implement.
pub const FAULT_UNKNOWN_METHOD: i32 = 10;

/// Label reported on every echoed detection.
pub const LABEL_ECHO: i32 = 0;

struct EchoInstance;

impl PackageInstance for EchoInstance {
    fn forward(
        &mut self,
        properties: &Properties,
        method_id: u32,
        images: &[ImageData],
        objects: &[Object],
    ) -> Result<ForwardResult, PackageFault> {
        if method_id != METHOD_ECHO {
            return Err(PackageFault::new(
                FAULT_UNKNOWN_METHOD,
                format!("method {method_id} is not implemented by EchoDetector"),
            ));
        }
        let score = properties.scalar("score").unwrap_or(1.0);
        let mut detections: Vec<Object> = images.iter().map(|image| detect(image, score)).collect();
        detections.extend(objects.iter().cloned());
        Ok(ForwardResult::new(images.to_vec(), detections))
    }
}

/// One full-frame rectangle detection for an echoed image.
fn detect(image: &ImageData, score: f64) -> Object {
    #[allow(clippy::cast_precision_loss, reason = "image extents are small")]
    let (width, height) = (image.width() as f32, image.height() as f32);
    #[allow(clippy::cast_possible_truncation, reason = "score is a plain ratio")]
    let score = score as f32;
    Object::default()
        .with_shape(Shape::rectangle(Point::new(0.0, 0.0), Point::new(width, height)))
        .with_tag(Tag::new(LABEL_ECHO, score))
}

/// Builds the echo detector package.
#[must_use]
pub fn package() -> aip_package_sdk::BoundPackage {
    PackageBuilder::new(PackageMetadata {
        aip_version: AIP_VERSION,
        module: String::from("EchoDetector"),
        description: String::from(
            r#"{"methods":{"0":"echo"},"properties":{"score":"tag score of echoed detections"}}"#,
        ),
        m_id: String::from("aip.echo.detector"),
        s_id: String::from("ECHO"),
        version: String::from("1.0.0"),
        support: vec![String::from("cpu")],
    })
    .bind_scalar("score", 1.0)
    .bind_tag(METHOD_ECHO, 0, LABEL_ECHO, "echo")
    .bind_error(FAULT_UNKNOWN_METHOD, "method id is not implemented")
    .factory(|_ctx| Ok(Box::new(EchoInstance)))
    .build()
}

export_package!(crate::package());

#[cfg(test)]
mod tests;
