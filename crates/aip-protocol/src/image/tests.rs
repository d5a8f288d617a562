//! Unit tests for image construction and the format/type table.

use rstest::rstest;

use super::*;

// ---------------------------------------------------------------------------
// Format table
// ---------------------------------------------------------------------------

#[rstest]
#[case(ImageFormat::U8Raw, ValueType::Byte)]
#[case(ImageFormat::U8Rgb, ValueType::Byte)]
#[case(ImageFormat::U8Bgr, ValueType::Byte)]
#[case(ImageFormat::U8Rgba, ValueType::Byte)]
#[case(ImageFormat::U8Bgra, ValueType::Byte)]
#[case(ImageFormat::U8Y, ValueType::Byte)]
#[case(ImageFormat::F32Raw, ValueType::Float)]
#[case(ImageFormat::I32Raw, ValueType::Int)]
fn formats_resolve_to_fixed_value_types(#[case] format: ImageFormat, #[case] vt: ValueType) {
    assert_eq!(format.value_type(), vt);
}

#[rstest]
#[case(ImageFormat::U8Raw, 0)]
#[case(ImageFormat::F32Raw, 1)]
#[case(ImageFormat::I32Raw, 2)]
#[case(ImageFormat::U8Rgb, 1001)]
#[case(ImageFormat::U8Y, 1005)]
fn format_codes_are_stable(#[case] format: ImageFormat, #[case] code: i32) {
    assert_eq!(format.code(), code);
    assert_eq!(ImageFormat::from_code(code), Some(format));
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn accepts_matching_geometry() {
    let image = ImageData::new(ImageFormat::U8Bgr, 1, 4, 5, 3, Pixels::Byte(vec![0; 60]))
        .expect("1x4x5x3 holds 60 bytes");
    assert_eq!(image.dims(), [1, 4, 5, 3]);
    assert_eq!(image.as_bytes().map(<[u8]>::len), Some(60));
}

#[test]
fn rejects_short_buffer() {
    let err = ImageData::from_pixels(Pixels::Byte(vec![0; 10]), 1, 1, 1, 3)
        .expect_err("10 bytes do not fill 1x1x1x3");
    assert_eq!(
        err,
        ShapeMismatchError::ImageElementCount {
            len: 10,
            expected: 3,
            number: 1,
            height: 1,
            width: 1,
            channels: 3,
        }
    );
}

#[test]
fn rejects_type_disagreeing_with_format() {
    let err = ImageData::new(ImageFormat::F32Raw, 1, 1, 1, 3, Pixels::Byte(vec![0; 3]))
        .expect_err("bytes are not floats");
    assert_eq!(
        err,
        ShapeMismatchError::ImageValueType {
            format: ImageFormat::F32Raw,
            expected: ValueType::Float,
            supplied: ValueType::Byte,
        }
    );
}

#[rstest]
#[case::byte(Pixels::Byte(vec![0; 6]), ImageFormat::U8Raw)]
#[case::int(Pixels::Int(vec![0; 6]), ImageFormat::I32Raw)]
#[case::float(Pixels::Float(vec![0.0; 6]), ImageFormat::F32Raw)]
fn from_pixels_infers_the_raw_format(#[case] pixels: Pixels, #[case] format: ImageFormat) {
    let image = ImageData::from_pixels(pixels, 1, 2, 3, 1).expect("counts match");
    assert_eq!(image.format(), format);
}
