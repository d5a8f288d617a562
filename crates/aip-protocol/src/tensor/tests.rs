//! Unit tests for tensor construction and accessors.

use rstest::rstest;

use super::*;

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn int_tensor_accepts_matching_counts() {
    let t = Tensor::int(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).expect("2x3 holds 6 values");
    assert_eq!(t.value_type(), ValueType::Int);
    assert_eq!(t.dims(), &[2, 3]);
    assert_eq!(t.element_count(), 6);
}

#[rstest]
#[case::too_many(10, vec![3])]
#[case::too_few(2, vec![2, 3])]
#[case::scalar_dims_overfilled(4, vec![])]
fn byte_tensor_rejects_mismatched_counts(#[case] len: usize, #[case] dims: Vec<u32>) {
    let err = Tensor::byte(vec![0; len], dims.clone()).expect_err("count mismatch");
    assert_eq!(
        err,
        ShapeMismatchError::TensorElementCount {
            len,
            expected: dims.iter().map(|&d| d as usize).product(),
            dims,
        }
    );
}

#[test]
fn empty_dims_mean_one_scalar_element() {
    let t = Tensor::double(vec![0.5], vec![]).expect("scalar");
    assert_eq!(t.element_count(), 1);
    assert!(t.dims().is_empty());
}

#[test]
fn void_tensor_holds_nothing() {
    let t = Tensor::empty();
    assert_eq!(t.value_type(), ValueType::Void);
    assert!(t.is_empty());
    assert_eq!(t.element_count(), 0);
}

#[test]
fn char_tensor_records_character_length() {
    let t = Tensor::chars("label");
    assert_eq!(t.value_type(), ValueType::Char);
    assert_eq!(t.dims(), &[5]);
    assert_eq!(t.as_str(), Some("label"));
}

#[test]
fn char_tensor_counts_characters_not_bytes() {
    let t = Tensor::chars("héllo");
    assert_eq!(t.dims(), &[5]);
}

// ---------------------------------------------------------------------------
// Scalar access
// ---------------------------------------------------------------------------

#[rstest]
#[case::double(Tensor::scalar_double(2.5), Some(2.5))]
#[case::void(Tensor::empty(), None)]
fn scalar_double_round_trips(#[case] tensor: Tensor, #[case] expected: Option<f64>) {
    assert_eq!(tensor.as_scalar_double(), expected);
}

#[test]
fn dimensioned_tensor_is_not_a_scalar() {
    let t = Tensor::int(vec![7], vec![1]).expect("one element");
    assert_eq!(t.as_scalar_double(), None);
}

#[test]
fn int_scalar_widens_to_double() {
    let t = Tensor::new(TensorData::Int(vec![3]), vec![]).expect("scalar int");
    assert_eq!(t.as_scalar_double(), Some(3.0));
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

#[rstest]
#[case(ValueType::Void, 0)]
#[case(ValueType::Byte, 2)]
#[case(ValueType::Int, 5)]
#[case(ValueType::Float, 10)]
#[case(ValueType::Double, 11)]
#[case(ValueType::Char, 13)]
fn value_type_codes_are_stable(#[case] value_type: ValueType, #[case] code: i32) {
    assert_eq!(value_type.code(), code);
    assert_eq!(ValueType::from_code(code), Some(value_type));
}

#[test]
fn unknown_code_resolves_to_none() {
    assert_eq!(ValueType::from_code(42), None);
}
