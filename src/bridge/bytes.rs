// In: src/bridge/bytes.rs

//! Raw byte views of the physical buffer.

use crate::column::DatetimeTzArray;
use crate::error::{ChronocolError, Result};
use crate::types::DatetimeTzDtype;

const WIDTH: usize = std::mem::size_of::<i64>();

/// Zero-copy view of the physical values as native-endian bytes.
pub fn as_bytes(column: &DatetimeTzArray) -> &[u8] {
    bytemuck::cast_slice(column.asi8())
}

/// Rebuilds a column from bytes produced by [`as_bytes`]. Unaligned input is
/// copied element by element.
pub fn from_bytes(bytes: &[u8], dtype: DatetimeTzDtype) -> Result<DatetimeTzArray> {
    if bytes.len() % WIDTH != 0 {
        return Err(ChronocolError::InvalidValue(format!(
            "byte length {} is not a multiple of {}",
            bytes.len(),
            WIDTH
        )));
    }
    let values: Vec<i64> = match bytemuck::try_cast_slice::<u8, i64>(bytes) {
        Ok(aligned) => aligned.to_vec(),
        Err(bytemuck::PodCastError::TargetAlignmentGreaterAndInputNotAligned) => bytes
            .chunks_exact(WIDTH)
            .map(bytemuck::pod_read_unaligned::<i64>)
            .collect(),
        Err(e) => return Err(e.into()),
    };
    Ok(DatetimeTzArray::simple_new(values, dtype))
}
