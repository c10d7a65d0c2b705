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

//! Data types that connect Parquet physical types with their Rust-specific
//! representations.

use std::fmt;
use std::str::from_utf8;

use bytes::Bytes;

use crate::basic::Type;
use crate::errors::{ParquetError, Result};

/// Julian day number of the Unix epoch, 1970-01-01
pub const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;

/// Number of seconds in a day
pub const SECONDS_IN_DAY: i64 = 86_400;
/// Number of milliseconds in a second
pub const MILLIS_IN_SECOND: i64 = 1_000;
/// Number of nanoseconds in a millisecond
pub const NANOS_IN_MILLI: i64 = 1_000_000;

/// Rust representation for logical type INT96, value is backed by an array of `u32`.
/// The type only takes 12 bytes, without extra padding.
///
/// The first 8 bytes hold the nanoseconds within the day, the last 4 bytes
/// the Julian day number, all little-endian.
#[derive(Clone, Copy, Debug, PartialOrd, Default, PartialEq, Eq, Hash)]
pub struct Int96 {
    value: [u32; 3],
}

impl Int96 {
    /// Creates new INT96 type struct with no data set.
    pub fn new() -> Self {
        Self { value: [0; 3] }
    }

    /// Returns underlying data as slice of [`u32`].
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.value
    }

    /// Sets data for this INT96 type.
    #[inline]
    pub fn set_data(&mut self, elem0: u32, elem1: u32, elem2: u32) {
        self.value = [elem0, elem1, elem2];
    }

    /// Decodes a value from its 12 byte little-endian representation.
    pub fn try_from_le_slice(b: &[u8]) -> Result<Self> {
        if b.len() != 12 {
            return Err(general_err!("INT96 requires 12 bytes, got {}", b.len()));
        }
        let word = |i: usize| u32::from_le_bytes([b[i], b[i + 1], b[i + 2], b[i + 3]]);
        Ok(Self {
            value: [word(0), word(4), word(8)],
        })
    }

    /// Nanoseconds since midnight, stored in the low 8 bytes.
    pub fn nanos(&self) -> i64 {
        ((self.value[1] as u64) << 32 | self.value[0] as u64) as i64
    }

    /// Julian day number, stored in the high 4 bytes.
    pub fn julian_day(&self) -> i64 {
        self.value[2] as i64
    }

    /// Converts this INT96 into an i64 representing the number of MILLISECONDS since Epoch
    pub fn to_millis(&self) -> i64 {
        let seconds = (self.julian_day() - JULIAN_DAY_OF_EPOCH) * SECONDS_IN_DAY;
        seconds * MILLIS_IN_SECOND + self.nanos() / NANOS_IN_MILLI
    }
}

impl fmt::Display for Int96 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.data())
    }
}

/// Rust representation for BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY Parquet physical types.
/// Value is backed by a byte buffer.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Hash)]
pub struct ByteArray {
    data: Bytes,
}

impl ByteArray {
    /// Creates new byte array with no data set.
    #[inline]
    pub fn new() -> Self {
        ByteArray { data: Bytes::new() }
    }

    /// Gets length of the underlying byte buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the underlying buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns slice of data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns `ByteArray` instance with slice of values for a data.
    #[inline]
    pub fn slice(&self, start: usize, len: usize) -> Self {
        Self::from(self.data.slice(start..start + len))
    }

    /// Try to convert the byte array to a utf8 slice
    pub fn as_utf8(&self) -> Result<&str> {
        #[cfg(feature = "simdutf8")]
        {
            simdutf8::basic::from_utf8(self.data())
                .map_err(|_| general_err!("byte array is not valid utf-8"))
        }
        #[cfg(not(feature = "simdutf8"))]
        {
            from_utf8(self.data()).map_err(|e| e.into())
        }
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(buf: Vec<u8>) -> ByteArray {
        Self { data: buf.into() }
    }
}

impl<'a> From<&'a [u8]> for ByteArray {
    fn from(b: &'a [u8]) -> ByteArray {
        Self {
            data: Bytes::copy_from_slice(b),
        }
    }
}

impl<'a> From<&'a str> for ByteArray {
    fn from(s: &'a str) -> ByteArray {
        ByteArray::from(s.as_bytes())
    }
}

impl From<Bytes> for ByteArray {
    fn from(value: Bytes) -> Self {
        Self { data: value }
    }
}

impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_struct = f.debug_struct("ByteArray");
        match from_utf8(self.data()) {
            Ok(s) => debug_struct.field("data", &s),
            Err(_) => debug_struct.field("data", &self.data()),
        };
        debug_struct.finish()
    }
}

/// A single decoded value of one of the Parquet physical types.
///
/// This is the element type of a decoded column; nulls are represented by
/// wrapping it in an [`Option`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// BOOLEAN
    Boolean(bool),
    /// INT32
    Int32(i32),
    /// INT64
    Int64(i64),
    /// INT96, see [`Int96`]
    Int96(Int96),
    /// FLOAT
    Float(f32),
    /// DOUBLE
    Double(f64),
    /// BYTE_ARRAY
    ByteArray(ByteArray),
    /// FIXED_LEN_BYTE_ARRAY
    FixedLenByteArray(ByteArray),
}

impl Value {
    /// Returns the physical type this value was decoded as.
    pub fn physical_type(&self) -> Type {
        match self {
            Value::Boolean(_) => Type::BOOLEAN,
            Value::Int32(_) => Type::INT32,
            Value::Int64(_) => Type::INT64,
            Value::Int96(_) => Type::INT96,
            Value::Float(_) => Type::FLOAT,
            Value::Double(_) => Type::DOUBLE,
            Value::ByteArray(_) => Type::BYTE_ARRAY,
            Value::FixedLenByteArray(_) => Type::FIXED_LEN_BYTE_ARRAY,
        }
    }

    /// Returns the value as an `i64` if it is an integer type.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Int32(v) => Ok(*v as i64),
            Value::Int64(v) => Ok(*v),
            other => Err(general_err!(
                "Cannot read {} value as an integer",
                other.physical_type()
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Int96(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::ByteArray(v) | Value::FixedLenByteArray(v) => write!(f, "{:?}", v.data()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int96_layout() {
        // 8 bytes of nanos (0) followed by the julian day (999)
        let mut buf = vec![0u8; 8];
        buf.extend_from_slice(&999u32.to_le_bytes());
        let v = Int96::try_from_le_slice(&buf).unwrap();
        assert_eq!(v.nanos(), 0);
        assert_eq!(v.julian_day(), 999);
        assert_eq!(v.data(), &[0, 0, 999]);
    }

    #[test]
    fn test_int96_to_millis() {
        let mut v = Int96::new();
        v.set_data(0, 0, JULIAN_DAY_OF_EPOCH as u32);
        assert_eq!(v.to_millis(), 0);

        // one day and 1.5 seconds after the epoch
        let nanos = 1_500_000_000u64;
        v.set_data(nanos as u32, (nanos >> 32) as u32, JULIAN_DAY_OF_EPOCH as u32 + 1);
        assert_eq!(v.to_millis(), 86_401_500);
    }

    #[test]
    fn test_int96_wrong_length() {
        assert!(Int96::try_from_le_slice(&[0; 11]).is_err());
    }

    #[test]
    fn test_byte_array_utf8() {
        let ba = ByteArray::from("parquet");
        assert_eq!(ba.len(), 7);
        assert_eq!(ba.as_utf8().unwrap(), "parquet");
        assert_eq!(ba.slice(1, 3).data(), b"arq");

        let invalid = ByteArray::from(vec![0xff, 0xfe]);
        assert!(invalid.as_utf8().is_err());
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(Value::Int32(-3).as_i64().unwrap(), -3);
        assert_eq!(Value::Int64(1 << 40).as_i64().unwrap(), 1 << 40);
        assert!(Value::Boolean(true).as_i64().is_err());
    }
}
