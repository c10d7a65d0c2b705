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

//! Low level primitives for reading bytes and bit-widths from a stream.

use std::io::Read;

use crate::errors::{ParquetError, Result};

/// Returns the ceil of `value / divisor`.
#[inline]
pub fn ceil<T: num::Integer>(value: T, divisor: T) -> T {
    num::Integer::div_ceil(&value, &divisor)
}

/// Returns the minimum number of bits needed to represent the value `x`,
/// i.e. `ceil(log2(x + 1))`. Zero needs zero bits.
#[inline]
pub fn num_required_bits(x: u64) -> u8 {
    64 - x.leading_zeros() as u8
}

/// Bit width needed to store every integer in `0..=max_int`.
///
/// Used to size definition and repetition levels from the maximum level of
/// a column.
#[inline]
pub fn width_from_max_int(max_int: u64) -> u8 {
    num_required_bits(max_int)
}

/// Reads exactly `len` bytes from `reader`.
///
/// Returns [`ParquetError::EOF`] if the stream ends first.
pub fn read_bytes<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let read = reader.take(len as u64).read_to_end(&mut buf)?;
    if read != len {
        return Err(eof_err!("Expected {} bytes, got {}", len, read));
    }
    Ok(buf)
}

/// Reads a single byte from `reader`.
#[inline]
pub fn read_u8<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Reads a little-endian `u32` from `reader`.
#[inline]
pub fn read_u32_le<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads an unsigned integer stored little-endian in `width` bytes.
///
/// `width` must be at most 8.
pub fn read_fixed_le<R: Read + ?Sized>(reader: &mut R, width: usize) -> Result<u64> {
    if width > 8 {
        return Err(general_err!("Cannot read {} byte wide integer", width));
    }
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf[..width])?;
    Ok(u64::from_le_bytes(buf))
}

/// Reads a ULEB128 encoded unsigned integer: 7 bits per byte, least
/// significant group first, the high bit of each byte set if more follow.
pub fn read_unsigned_var_int<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    let mut result = 0u64;
    let mut shift = 0;
    loop {
        let byte = read_u8(reader)?;
        if shift >= u64::BITS || (shift == 63 && byte & 0x7e != 0) {
            return Err(general_err!("Varint does not fit in 64 bits"));
        }
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}
