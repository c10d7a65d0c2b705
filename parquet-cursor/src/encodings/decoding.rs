// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Contains all supported decoders for Parquet.

use std::io::Read;

use crate::basic::Type;
use crate::data_type::{ByteArray, Int96, Value};
use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{self, read_u32_le, read_u8};

// ----------------------------------------------------------------------
// PLAIN Decoding

/// Plain decoding that supports all types.
/// Values are encoded back to back.
/// The plain encoding is used whenever a more efficient encoding can not be used. It
/// stores the data in the following format:
/// - BOOLEAN - 1 bit per value, 0 is false; 1 is true.
/// - INT32 - 4 bytes per value, stored as little-endian.
/// - INT64 - 8 bytes per value, stored as little-endian.
/// - FLOAT - 4 bytes per value, stored as IEEE little-endian.
/// - DOUBLE - 8 bytes per value, stored as IEEE little-endian.
/// - BYTE_ARRAY - 4 byte length stored as little endian, followed by bytes.
/// - FIXED_LEN_BYTE_ARRAY - just the bytes are stored.
///
/// A decoder is used for the values of a single page, since booleans are
/// packed 8 to a byte and the decoder owns the partially consumed byte.
#[derive(Debug)]
pub struct PlainDecoder {
    // The physical type of the values.
    physical_type: Type,

    // Byte width of FIXED_LEN_BYTE_ARRAY values.
    type_length: usize,

    // The byte holding the next boolean values.
    bool_byte: u8,

    // Number of booleans already taken from `bool_byte`, 8 means a new
    // byte has to be read.
    bool_offset: u8,
}

impl PlainDecoder {
    /// Creates new plain decoder for values of `physical_type`.
    ///
    /// `type_length` is only used for FIXED_LEN_BYTE_ARRAY columns.
    pub fn new(physical_type: Type, type_length: i32) -> Result<Self> {
        let type_length = match physical_type {
            Type::FIXED_LEN_BYTE_ARRAY => usize::try_from(type_length).map_err(|_| {
                general_err!("Invalid FIXED_LEN_BYTE_ARRAY type length {}", type_length)
            })?,
            _ => 0,
        };
        Ok(Self {
            physical_type,
            type_length,
            bool_byte: 0,
            bool_offset: 8,
        })
    }

    /// Decodes the next value from `reader`.
    pub fn read<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<Value> {
        let value = match self.physical_type {
            Type::BOOLEAN => Value::Boolean(self.read_bool(reader)?),
            Type::INT32 => Value::Int32(i32::from_le_bytes(read_array(reader)?)),
            Type::INT64 => Value::Int64(i64::from_le_bytes(read_array(reader)?)),
            Type::INT96 => Value::Int96(Int96::try_from_le_slice(&read_array::<_, 12>(reader)?)?),
            Type::FLOAT => Value::Float(f32::from_le_bytes(read_array(reader)?)),
            Type::DOUBLE => Value::Double(f64::from_le_bytes(read_array(reader)?)),
            Type::BYTE_ARRAY => {
                let len = read_u32_le(reader)? as usize;
                Value::ByteArray(bit_util::read_bytes(reader, len)?.into())
            }
            Type::FIXED_LEN_BYTE_ARRAY => Value::FixedLenByteArray(ByteArray::from(
                bit_util::read_bytes(reader, self.type_length)?,
            )),
        };
        Ok(value)
    }

    /// Decodes the next `num_values` values from `reader`.
    pub fn read_batch<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        num_values: usize,
    ) -> Result<Vec<Value>> {
        // cap the pre-allocation, `num_values` comes from the page header
        let mut values = Vec::with_capacity(num_values.min(4096));
        for _ in 0..num_values {
            values.push(self.read(reader)?);
        }
        Ok(values)
    }

    #[inline]
    fn read_bool<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<bool> {
        if self.bool_offset == 8 {
            self.bool_byte = read_u8(reader)?;
            self.bool_offset = 0;
        }
        let bit = (self.bool_byte >> self.bool_offset) & 1;
        self.bool_offset += 1;
        Ok(bit == 1)
    }
}

#[inline]
fn read_array<R: Read + ?Sized, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

// ----------------------------------------------------------------------
// Definition level resolution

/// Resolves dictionary `indices` against `dictionary`, producing one element
/// per definition level.
///
/// A level equal to `max_definition_level` marks a defined slot, which takes
/// the next index. Any lower level is a null and takes no index.
pub fn filter_values(
    dictionary: &[Value],
    indices: &[u64],
    definition_levels: &[u64],
    max_definition_level: u64,
) -> Result<Vec<Option<Value>>> {
    let mut indices = indices.iter();
    definition_levels
        .iter()
        .map(|level| {
            if *level != max_definition_level {
                return Ok(None);
            }
            let index = *indices
                .next()
                .ok_or_else(|| eof_err!("Not enough dictionary indices for definition levels"))?
                as usize;
            dictionary
                .get(index)
                .cloned()
                .map(Some)
                .ok_or(ParquetError::IndexOutOfBound(index, dictionary.len()))
        })
        .collect()
}

/// Spreads the defined `values` of a page over its definition levels, the
/// same way [`filter_values`] resolves dictionary indices.
pub fn spread_values(
    values: Vec<Value>,
    definition_levels: &[u64],
    max_definition_level: u64,
) -> Result<Vec<Option<Value>>> {
    let mut values = values.into_iter();
    definition_levels
        .iter()
        .map(|level| {
            if *level != max_definition_level {
                return Ok(None);
            }
            values
                .next()
                .map(Some)
                .ok_or_else(|| eof_err!("Not enough values for definition levels"))
        })
        .collect()
}

/// Counts the defined slots in `definition_levels`.
pub fn num_defined(definition_levels: &[u64], max_definition_level: u64) -> usize {
    definition_levels
        .iter()
        .filter(|level| **level == max_definition_level)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::util::test_common::file_util::encode_plain;

    fn roundtrip(physical_type: Type, type_length: i32, values: Vec<Value>) {
        let data = encode_plain(&values);
        let mut reader: &[u8] = &data;
        let mut decoder = PlainDecoder::new(physical_type, type_length).unwrap();
        let decoded = decoder.read_batch(&mut reader, values.len()).unwrap();
        assert_eq!(decoded, values);
        assert!(reader.is_empty(), "{physical_type} left trailing bytes");
    }

    #[test]
    fn test_plain_decode_bool() {
        let values = [true, false, false, true, true, false, true, true, false, true];
        roundtrip(
            Type::BOOLEAN,
            -1,
            values.iter().map(|v| Value::Boolean(*v)).collect(),
        );
    }

    #[test]
    fn test_plain_decode_bool_bit_order() {
        // 0b0000_0101: first value is the least significant bit
        let mut reader: &[u8] = &[0b0000_0101, 0b1000_0000];
        let mut decoder = PlainDecoder::new(Type::BOOLEAN, -1).unwrap();
        let values = decoder.read_batch(&mut reader, 16).unwrap();
        let expected: Vec<Value> = (0..16)
            .map(|i| Value::Boolean(i == 0 || i == 2 || i == 15))
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_plain_decode_int32() {
        roundtrip(
            Type::INT32,
            -1,
            vec![Value::Int32(42), Value::Int32(i32::MIN), Value::Int32(-1)],
        );
    }

    #[test]
    fn test_plain_decode_int64() {
        roundtrip(
            Type::INT64,
            -1,
            vec![Value::Int64(i64::MAX), Value::Int64(0), Value::Int64(-7)],
        );
    }

    #[test]
    fn test_plain_decode_int96() {
        let mut v = Int96::new();
        v.set_data(11, 22, 2_440_589);
        roundtrip(Type::INT96, -1, vec![Value::Int96(v), Value::Int96(Int96::new())]);
    }

    #[test]
    fn test_plain_decode_float() {
        roundtrip(
            Type::FLOAT,
            -1,
            vec![Value::Float(3.25), Value::Float(-0.0), Value::Float(f32::MAX)],
        );
    }

    #[test]
    fn test_plain_decode_double() {
        roundtrip(
            Type::DOUBLE,
            -1,
            vec![Value::Double(1e-300), Value::Double(std::f64::consts::PI)],
        );
    }

    #[test]
    fn test_plain_decode_byte_array() {
        roundtrip(
            Type::BYTE_ARRAY,
            -1,
            vec![
                Value::ByteArray("hello".into()),
                Value::ByteArray("".into()),
                Value::ByteArray(vec![0xffu8, 0x00].into()),
            ],
        );
    }

    #[test]
    fn test_plain_decode_fixed_len_byte_array() {
        roundtrip(
            Type::FIXED_LEN_BYTE_ARRAY,
            3,
            vec![
                Value::FixedLenByteArray("abc".into()),
                Value::FixedLenByteArray("xyz".into()),
            ],
        );
    }

    #[test]
    fn test_plain_decode_truncated() {
        let mut reader: &[u8] = &[1, 0, 0];
        let mut decoder = PlainDecoder::new(Type::INT32, -1).unwrap();
        let err = decoder.read(&mut reader).unwrap_err();
        assert!(matches!(err, ParquetError::EOF(_)), "{err}");

        // length prefix larger than the remaining bytes
        let mut reader: &[u8] = &[10, 0, 0, 0, b'a'];
        let mut decoder = PlainDecoder::new(Type::BYTE_ARRAY, -1).unwrap();
        let err = decoder.read(&mut reader).unwrap_err();
        assert!(matches!(err, ParquetError::EOF(_)), "{err}");
    }

    #[test]
    fn test_plain_decoder_invalid_type_length() {
        assert!(PlainDecoder::new(Type::FIXED_LEN_BYTE_ARRAY, -1).is_err());
        assert!(PlainDecoder::new(Type::INT32, -1).is_ok());
    }

    #[test]
    fn test_filter_values() {
        let dictionary = vec![Value::Int32(10), Value::Int32(20), Value::Int32(30)];
        let indices = [2, 0, 2];
        let levels = [1, 0, 1, 0, 1];
        let values = filter_values(&dictionary, &indices, &levels, 1).unwrap();
        assert_eq!(
            values,
            vec![
                Some(Value::Int32(30)),
                None,
                Some(Value::Int32(10)),
                None,
                Some(Value::Int32(30)),
            ]
        );
    }

    #[test]
    fn test_filter_values_output_length() {
        let dictionary = vec![Value::Boolean(true)];
        // trailing indices past the last defined level are ignored
        let values = filter_values(&dictionary, &[0, 0, 0, 0], &[0, 0, 1], 1).unwrap();
        assert_eq!(values, vec![None, None, Some(Value::Boolean(true))]);

        let values = filter_values(&dictionary, &[], &[], 1).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_filter_values_errors() {
        let dictionary = vec![Value::Int32(1)];
        let err = filter_values(&dictionary, &[3], &[1], 1).unwrap_err();
        assert!(matches!(err, ParquetError::IndexOutOfBound(3, 1)), "{err}");

        let err = filter_values(&dictionary, &[0], &[1, 1], 1).unwrap_err();
        assert!(matches!(err, ParquetError::EOF(_)), "{err}");
    }

    #[test]
    fn test_spread_values() {
        let values = vec![Value::Int64(1), Value::Int64(2)];
        let spread = spread_values(values, &[2, 1, 2, 0], 2).unwrap();
        assert_eq!(
            spread,
            vec![Some(Value::Int64(1)), None, Some(Value::Int64(2)), None]
        );
        assert_eq!(num_defined(&[2, 1, 2, 0], 2), 2);
    }
}
