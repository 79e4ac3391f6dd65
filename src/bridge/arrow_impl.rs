// In: src/bridge/arrow_impl.rs

//! Conversions between chronocol columns and Arrow timestamp arrays.

use arrow::array::{Array, AsArray, DurationNanosecondArray, TimestampNanosecondArray};
use arrow::datatypes::{
    DataType, TimeUnit as ArrowTimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType,
};
use arrow_schema::Field;

use crate::column::{DatetimeTzArray, DurationArray};
use crate::error::{ChronocolError, Result};
use crate::null_handling;
use crate::types::{TimeUnit, TimeZoneId};

fn unit_from_arrow(unit: &ArrowTimeUnit) -> TimeUnit {
    match unit {
        ArrowTimeUnit::Second => TimeUnit::Second,
        ArrowTimeUnit::Millisecond => TimeUnit::Millisecond,
        ArrowTimeUnit::Microsecond => TimeUnit::Microsecond,
        ArrowTimeUnit::Nanosecond => TimeUnit::Nanosecond,
    }
}

fn arrow_tz(column: &DatetimeTzArray) -> Option<String> {
    column.tz().map(|tz| tz.to_string())
}

/// Exports the column without copying its values. NaT slots become nulls.
pub fn to_arrow(column: &DatetimeTzArray) -> Result<TimestampNanosecondArray> {
    let nulls = null_handling::validity_buffer(column.asi8());
    let array = TimestampNanosecondArray::try_new(column.buffer(), nulls)?;
    Ok(array.with_timezone_opt(arrow_tz(column)))
}

/// The schema field a column named `name` would occupy.
pub fn to_arrow_field(column: &DatetimeTzArray, name: &str) -> Field {
    let data_type = DataType::Timestamp(ArrowTimeUnit::Nanosecond, arrow_tz(column).map(Into::into));
    Field::new(name, data_type, true)
}

pub fn durations_to_arrow(column: &DurationArray) -> Result<DurationNanosecondArray> {
    let nulls = null_handling::validity_buffer(column.asi8());
    Ok(DurationNanosecondArray::try_new(column.asi8().to_vec().into(), nulls)?)
}

/// Imports any Arrow timestamp array. Nulls become NaT and coarser units are
/// scaled to nanoseconds.
pub fn from_arrow(array: &dyn Array) -> Result<DatetimeTzArray> {
    let DataType::Timestamp(arrow_unit, arrow_tz) = array.data_type() else {
        return Err(ChronocolError::TypeMismatch(format!(
            "cannot build a DatetimeTzArray from Arrow type {}",
            array.data_type()
        )));
    };
    let tz = arrow_tz.as_deref().map(TimeZoneId::parse).transpose()?;
    let unit = unit_from_arrow(arrow_unit);

    let raw = match arrow_unit {
        ArrowTimeUnit::Second => array.as_primitive::<TimestampSecondType>().values().to_vec(),
        ArrowTimeUnit::Millisecond => array.as_primitive::<TimestampMillisecondType>().values().to_vec(),
        ArrowTimeUnit::Microsecond => array.as_primitive::<TimestampMicrosecondType>().values().to_vec(),
        ArrowTimeUnit::Nanosecond => array.as_primitive::<TimestampNanosecondType>().values().to_vec(),
    };
    // Null slots hold arbitrary values; blank them before scaling.
    let raw = null_handling::apply_validity(raw, array.nulls())?;
    let values = match unit {
        TimeUnit::Nanosecond => raw,
        _ => raw
            .into_iter()
            .map(|v| unit.to_nanos(v))
            .collect::<Result<Vec<i64>>>()?,
    };
    log::debug!(
        "from_arrow: {} values, unit={}, tz={:?}",
        values.len(),
        unit,
        tz.map(|t| t.to_string())
    );
    Ok(DatetimeTzArray::from_i64(values, tz))
}
