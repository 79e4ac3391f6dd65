use super::*;
use crate::column::{DatetimeTzArray, DurationArray};
use crate::error::ChronocolError;
use crate::types::{DatetimeTzDtype, TimeZoneId, NAT};
use arrow::array::{Array, Int64Array, TimestampMillisecondArray, TimestampNanosecondArray};
use arrow::datatypes::{DataType, TimeUnit as ArrowTimeUnit};

fn central() -> TimeZoneId {
    TimeZoneId::parse("US/Central").unwrap()
}

#[test]
fn test_to_arrow_maps_nat_to_null_and_keeps_tz() {
    // 1. Arrange
    let column = DatetimeTzArray::from_i64(vec![1, NAT, 3], Some(central()));

    // 2. Act
    let array = to_arrow(&column).unwrap();

    // 3. Assert
    assert_eq!(array.len(), 3);
    assert_eq!(array.null_count(), 1);
    assert!(array.is_null(1));
    assert_eq!(array.value(2), 3);
    assert_eq!(
        array.data_type(),
        &DataType::Timestamp(ArrowTimeUnit::Nanosecond, Some("US/Central".into()))
    );
}

#[test]
fn test_arrow_roundtrip_is_lossless() {
    let column = DatetimeTzArray::from_i64(vec![10, NAT, -5], Some(TimeZoneId::Utc));
    let back = from_arrow(&to_arrow(&column).unwrap()).unwrap();
    assert_eq!(back, column);

    let naive = DatetimeTzArray::from_i64(vec![7], None);
    assert_eq!(from_arrow(&to_arrow(&naive).unwrap()).unwrap(), naive);
}

#[test]
fn test_arrow_roundtrip_keeps_second_level_offsets() {
    let lmt = TimeZoneId::from_offset_seconds(3601).unwrap();
    let column = DatetimeTzArray::from_i64(vec![0, NAT], Some(lmt));

    let array = to_arrow(&column).unwrap();
    let back = from_arrow(&array).unwrap();

    assert_eq!(
        array.data_type(),
        &DataType::Timestamp(ArrowTimeUnit::Nanosecond, Some("+01:00:01".into()))
    );
    assert_eq!(back, column);
    assert_eq!(back.dtype(), column.dtype());
}

#[test]
fn test_from_arrow_scales_units_and_blanks_nulls() {
    let millis = TimestampMillisecondArray::from(vec![Some(2), None]).with_timezone("+01:00");
    let column = from_arrow(&millis).unwrap();
    assert_eq!(column.asi8(), &[2_000_000, NAT]);
    assert_eq!(column.tz(), Some(&TimeZoneId::Fixed(3600)));
}

#[test]
fn test_from_arrow_rejects_other_types() {
    let ints = Int64Array::from(vec![1, 2]);
    assert!(matches!(from_arrow(&ints), Err(ChronocolError::TypeMismatch(_))));

    let bad_tz = TimestampNanosecondArray::from(vec![1]).with_timezone("Mars/Olympus");
    assert!(matches!(from_arrow(&bad_tz), Err(ChronocolError::InvalidTimezone(_))));
}

#[test]
fn test_field_and_duration_export() {
    let column = DatetimeTzArray::from_i64(vec![1], None);
    let field = to_arrow_field(&column, "ts");
    assert_eq!(field.name(), "ts");
    assert!(field.is_nullable());
    assert_eq!(field.data_type(), &DataType::Timestamp(ArrowTimeUnit::Nanosecond, None));

    let durations = durations_to_arrow(&DurationArray::from_nanos(vec![5, NAT])).unwrap();
    assert_eq!(durations.null_count(), 1);
    assert_eq!(durations.value(0), 5);
}

#[test]
fn test_bytes_roundtrip() {
    let column = DatetimeTzArray::from_i64(vec![1, NAT, i64::MAX], Some(central()));
    let bytes = as_bytes(&column);
    assert_eq!(bytes.len(), 24);
    let back = from_bytes(bytes, *column.dtype()).unwrap();
    assert_eq!(back, column);

    // An offset copy is unaligned for i64 but still decodes.
    let mut shifted = vec![0u8; 1];
    shifted.extend_from_slice(bytes);
    let back = from_bytes(&shifted[1..], DatetimeTzDtype::ns(Some(central()))).unwrap();
    assert_eq!(back, column);

    assert!(matches!(
        from_bytes(&bytes[..5], DatetimeTzDtype::naive()),
        Err(ChronocolError::InvalidValue(_))
    ));
}
