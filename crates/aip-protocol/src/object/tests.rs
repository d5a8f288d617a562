//! Unit tests for the object composite and value conversions.

use rstest::rstest;

use super::*;
use crate::device::Point;
use crate::shape::ShapeType;

fn rect() -> Shape {
    Shape::rectangle(Point::new(0.0, 0.0), Point::new(2.0, 2.0))
}

// ---------------------------------------------------------------------------
// Object building
// ---------------------------------------------------------------------------

#[test]
fn default_object_is_bare() {
    let object = Object::default();
    assert_eq!(object.shape().shape_type(), ShapeType::NoShape);
    assert!(object.tags().is_empty());
    assert!(object.extra().is_empty());
}

#[test]
fn builder_accumulates_tags_in_order() {
    let object = Object::default()
        .with_tag(Tag::new(3, 0.2))
        .with_tag(Tag::new(4, 0.4));
    assert_eq!(object.tags(), &[Tag::new(3, 0.2), Tag::new(4, 0.4)]);
}

// ---------------------------------------------------------------------------
// Value round-trips
// ---------------------------------------------------------------------------

#[rstest]
#[case::tensor(Value::Tensor(Tensor::scalar_double(1.5)))]
#[case::shape(Value::Shape(rect()))]
#[case::tag(Value::Tag(Tag::new(7, 0.9)))]
fn bare_values_survive_the_object_encoding(#[case] value: Value) {
    let object = value.clone().into_object();
    assert_eq!(Value::from_object(object), value);
}

#[test]
fn composite_objects_stay_objects() {
    let object = Object::default()
        .with_shape(rect())
        .with_tag(Tag::new(1, 0.5));
    let value = Value::from_object(object.clone());
    assert_eq!(value, Value::Object(object));
}

#[test]
fn tensor_value_lands_in_the_extra_slot() {
    let tensor = Tensor::int(vec![1, 2], vec![2]).expect("two elements");
    let object = Value::Tensor(tensor.clone()).into_object();
    assert_eq!(object.extra(), &tensor);
    assert_eq!(object.shape().shape_type(), ShapeType::NoShape);
}
