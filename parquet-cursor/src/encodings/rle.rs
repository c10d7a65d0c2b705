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

use std::cmp;
use std::io::{Read, Seek, SeekFrom};

use crate::errors::{ParquetError, Result};
use crate::util::bit_util::{self, read_fixed_le, read_u32_le, read_unsigned_var_int};

/// Rle/Bit-Packing Hybrid Encoding
/// The grammar for this encoding looks like the following (copied verbatim
/// from <https://github.com/Parquet/parquet-format/blob/master/Encodings.md>):
///
/// rle-bit-packed-hybrid: `<length>` `<encoded-data>`
/// length := length of the `<encoded-data>` in bytes stored as 4 bytes little endian
/// encoded-data := `<run>`*
/// run := `<bit-packed-run>` | `<rle-run>`
/// bit-packed-run := `<bit-packed-header>` `<bit-packed-values>`
/// bit-packed-header := varint-encode(`<bit-pack-count>` << 1 | 1)
/// we always bit-pack a multiple of 8 values at a time, so we only store the number of
/// values / 8
/// bit-pack-count := (number of values in this run) / 8
/// bit-packed-values := *see 1 below*
/// rle-run := `<rle-header>` `<repeated-value>`
/// rle-header := varint-encode( (number of times repeated) << 1)
/// repeated-value := value that is repeated, using a fixed-width of
/// round-up-to-next-byte(bit-width)
///
/// 1. Values of a bit-packed run are packed from the least significant bit
///    of each byte to the most significant bit.
///
/// The deprecated `BIT_PACKED` encoding packs from the most significant bit
/// instead and has no run headers, see [`RleDecoder::read_bitpacked_deprecated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RleDecoder {
    // Number of bits used to encode the value. Must be between [0, 64].
    bit_width: u8,

    // Number of bytes holding the repeated value of an RLE run.
    byte_width: usize,

    // Mask selecting the low `bit_width` bits of a value.
    mask: u64,
}

impl RleDecoder {
    /// Creates a decoder for values of `bit_width` bits.
    pub fn new(bit_width: u8) -> Result<Self> {
        if bit_width > 64 {
            return Err(general_err!("Invalid bit width {}, must be at most 64", bit_width));
        }
        let mask = match bit_width {
            64 => u64::MAX,
            w => (1u64 << w) - 1,
        };
        Ok(RleDecoder {
            bit_width,
            byte_width: bit_util::ceil(bit_width as usize, 8),
            mask,
        })
    }

    /// Number of bits per value
    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    /// Decodes the value of an RLE run with run header `header`, repeated
    /// `header >> 1` times.
    pub fn read_rle<R: Read + ?Sized>(&self, reader: &mut R, header: u64) -> Result<Vec<u64>> {
        let count = usize::try_from(header >> 1)?;
        self.read_rle_count(reader, count)
    }

    fn read_rle_count<R: Read + ?Sized>(&self, reader: &mut R, count: usize) -> Result<Vec<u64>> {
        let value = read_fixed_le(reader, self.byte_width)?;
        Ok(vec![value; count])
    }

    /// Decodes a bit-packed run with run header `header`, holding
    /// `(header >> 1) * 8` values.
    ///
    /// Writers may truncate the final run of a page to the bytes actually
    /// needed, so a run that ends early yields only the complete values
    /// present in the available bytes.
    pub fn read_bitpacked<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        header: u64,
    ) -> Result<Vec<u64>> {
        let num_groups = usize::try_from(header >> 1)?;
        let count = num_groups
            .checked_mul(8)
            .ok_or_else(|| general_err!("Bit-packed run of {} groups is too long", num_groups))?;
        self.read_bitpacked_count(reader, count, usize::MAX)
    }

    // Reads at most `max_bytes` of a run of `count` values.
    fn read_bitpacked_count<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        count: usize,
        max_bytes: usize,
    ) -> Result<Vec<u64>> {
        if self.bit_width == 0 {
            return Ok(vec![0; count]);
        }
        let bit_width = self.bit_width as usize;
        let num_bytes = count
            .checked_mul(bit_width)
            .map(|bits| bit_util::ceil(bits, 8))
            .ok_or_else(|| general_err!("Bit-packed run of {} values is too long", count))?;
        let num_bytes = cmp::min(num_bytes, max_bytes);

        let mut buf = Vec::new();
        reader.take(num_bytes as u64).read_to_end(&mut buf)?;

        let num_values = cmp::min(count, buf.len() * 8 / bit_width);
        let mut values = Vec::with_capacity(num_values);
        let mut word: u128 = 0;
        let mut bits_in_word = 0;
        for byte in buf {
            word |= (byte as u128) << bits_in_word;
            bits_in_word += 8;
            while bits_in_word >= bit_width && values.len() < num_values {
                values.push(word as u64 & self.mask);
                word >>= bit_width;
                bits_in_word -= bit_width;
            }
        }
        Ok(values)
    }

    /// Decodes `count` values of the deprecated `BIT_PACKED` encoding from
    /// exactly `byte_count` bytes.
    ///
    /// Bytes are shifted into a rolling word most significant bit first, and
    /// each value is taken from the top `bit_width` bits of the word.
    pub fn read_bitpacked_deprecated<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        byte_count: usize,
        count: usize,
    ) -> Result<Vec<u64>> {
        let buf = bit_util::read_bytes(reader, byte_count)?;
        if self.bit_width == 0 {
            return Ok(vec![0; count]);
        }
        let bit_width = self.bit_width as usize;

        let mut values = Vec::with_capacity(cmp::min(count, byte_count * 8 / bit_width));
        let mut word: u128 = 0;
        let mut bits_in_word = 0;
        let mut index = 0;
        while values.len() < count {
            if bits_in_word >= bit_width {
                let offset = bits_in_word - bit_width;
                values.push((word >> offset) as u64 & self.mask);
                bits_in_word -= bit_width;
                // drop the consumed bits so the word never exceeds 72 bits
                word &= (1u128 << bits_in_word) - 1;
            } else {
                if index >= buf.len() {
                    break;
                }
                word = (word << 8) | buf[index] as u128;
                index += 1;
                bits_in_word += 8;
            }
        }
        Ok(values)
    }

    /// Decodes a complete RLE/bit-packing hybrid block.
    ///
    /// If `length` is `None` the block starts with its byte length as a
    /// 4 byte little-endian integer. Runs are decoded until the block's bytes
    /// are consumed, and the reader is left positioned after the block.
    pub fn read_hybrid<R: Read + Seek + ?Sized>(
        &self,
        reader: &mut R,
        length: Option<usize>,
    ) -> Result<Vec<u64>> {
        self.read_hybrid_bounded(reader, length, usize::MAX)
    }

    /// Like [`Self::read_hybrid`], but stops once `max_values` values have
    /// been decoded. Runs extending past the limit are cut short.
    pub fn read_hybrid_bounded<R: Read + Seek + ?Sized>(
        &self,
        reader: &mut R,
        length: Option<usize>,
        max_values: usize,
    ) -> Result<Vec<u64>> {
        let length = match length {
            Some(length) => length as u64,
            None => read_u32_le(reader)? as u64,
        };
        let start = reader.stream_position()?;
        let end = start + length;

        let mut values = Vec::new();
        let mut pos = start;
        while pos < end && values.len() < max_values {
            let header = read_unsigned_var_int(reader)?;
            let remaining = max_values - values.len();
            if header & 1 == 0 {
                let count = cmp::min(usize::try_from(header >> 1)?, remaining);
                values.extend(self.read_rle_count(reader, count)?);
            } else {
                let num_groups = usize::try_from(header >> 1)?;
                let count = cmp::min(num_groups.saturating_mul(8), remaining);
                let available = end.saturating_sub(reader.stream_position()?) as usize;
                let run = self.read_bitpacked_count(reader, count, available)?;
                let short = run.len() < count;
                values.extend(run);
                if short {
                    // a truncated run can only be the last one of the block
                    break;
                }
            }
            pos = reader.stream_position()?;
        }

        reader.seek(SeekFrom::Start(end))?;
        Ok(values)
    }
}
