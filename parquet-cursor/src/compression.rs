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

//! Contains codec interface and supported codec implementations.
//!
//! See [`Compression`] enum for all available compression algorithms.
//!
//! # Example
//!
//! ```no_run
//! use parquet_cursor::{basic::Compression, compression::create_codec};
//!
//! let mut codec = match create_codec(Compression::SNAPPY) {
//!     Ok(Some(codec)) => codec,
//!     _ => panic!(),
//! };
//!
//! let compressed = vec![0x05, 0x10, 0x68, 0x65, 0x6c, 0x6c, 0x6f];
//! let mut output = vec![];
//! codec.decompress(&compressed, &mut output, Some(5)).unwrap();
//! assert_eq!(output, b"hello");
//! ```

use crate::basic::Compression;
use crate::errors::{ParquetError, Result};

/// Parquet compression codec interface.
pub trait Codec: Send {
    /// Decompresses data stored in slice `input_buf` and appends output to `output_buf`.
    ///
    /// If the uncompress_size is provided it will allocate the exact amount of memory.
    /// Otherwise, it will estimate the uncompressed size, allocating an amount of memory
    /// greater or equal to the real uncompress_size.
    ///
    /// Returns the total number of bytes written.
    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        uncompress_size: Option<usize>,
    ) -> Result<usize>;
}

/// Given the compression type `codec`, returns a codec used to decompress
/// bytes for that codec.
///
/// Returns `None` for [`Compression::UNCOMPRESSED`], and an `NYI` error for
/// codecs that are not supported or whose feature is not enabled.
pub fn create_codec(codec: Compression) -> Result<Option<Box<dyn Codec>>> {
    #[allow(unreachable_code, unused_variables)]
    match codec {
        Compression::UNCOMPRESSED => Ok(None),
        Compression::SNAPPY => {
            #[cfg(feature = "snap")]
            return Ok(Some(Box::new(SnappyCodec::new())));
            Err(nyi_err!("The 'snap' feature is not enabled"))
        }
        Compression::GZIP => {
            #[cfg(feature = "flate2")]
            return Ok(Some(Box::new(GZipCodec::new())));
            Err(nyi_err!("The 'flate2' feature is not enabled"))
        }
        other => Err(nyi_err!("The codec type {} is not supported yet", other)),
    }
}

#[cfg(feature = "snap")]
mod snappy_codec {
    use snap::raw::{decompress_len, Decoder};

    use crate::compression::Codec;
    use crate::errors::Result;

    /// Codec for Snappy compression format.
    pub struct SnappyCodec {
        decoder: Decoder,
    }

    impl SnappyCodec {
        /// Creates new Snappy compression codec.
        pub(crate) fn new() -> Self {
            Self {
                decoder: Decoder::new(),
            }
        }
    }

    impl Codec for SnappyCodec {
        fn decompress(
            &mut self,
            input_buf: &[u8],
            output_buf: &mut Vec<u8>,
            uncompress_size: Option<usize>,
        ) -> Result<usize> {
            let len = match uncompress_size {
                Some(size) => size,
                None => decompress_len(input_buf)?,
            };
            let offset = output_buf.len();
            output_buf.resize(offset + len, 0);
            let n = self
                .decoder
                .decompress(input_buf, &mut output_buf[offset..])?;
            // the size hint may overstate the stream
            output_buf.truncate(offset + n);
            Ok(n)
        }
    }
}
#[cfg(feature = "snap")]
pub use snappy_codec::*;

#[cfg(feature = "flate2")]
mod gzip_codec {
    use std::io::Read;

    use flate2::read;

    use crate::compression::Codec;
    use crate::errors::Result;

    /// Codec for GZIP compression algorithm.
    pub struct GZipCodec {}

    impl GZipCodec {
        /// Creates new GZIP compression codec.
        pub(crate) fn new() -> Self {
            Self {}
        }
    }

    impl Codec for GZipCodec {
        fn decompress(
            &mut self,
            input_buf: &[u8],
            output_buf: &mut Vec<u8>,
            uncompress_size: Option<usize>,
        ) -> Result<usize> {
            let decoder = read::MultiGzDecoder::new(input_buf);
            match uncompress_size {
                // one byte past the hint is enough to detect an understated size
                Some(size) => decoder
                    .take(size as u64 + 1)
                    .read_to_end(output_buf)
                    .map_err(|e| e.into()),
                None => {
                    let mut decoder = decoder;
                    decoder.read_to_end(output_buf).map_err(|e| e.into())
                }
            }
        }
    }
}
#[cfg(feature = "flate2")]
pub use gzip_codec::*;
