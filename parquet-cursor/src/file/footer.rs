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

//! Module for working with Parquet file footers.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::errors::{ParquetError, Result};
use crate::file::metadata::ParquetMetaData;
use crate::file::{FOOTER_SIZE, PARQUET_MAGIC};
use crate::format::FileMetaData;
use crate::parquet_thrift::{ReadThrift, ThriftCompactInputProtocol};
use crate::util::bit_util;

/// The 8 byte tail of a Parquet file: the metadata length followed by the
/// `PAR1` magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterTail {
    metadata_length: usize,
}

impl FooterTail {
    /// Decodes the footer tail, validating the magic.
    pub fn try_new(slice: &[u8; FOOTER_SIZE]) -> Result<FooterTail> {
        let magic = &slice[4..];
        if magic != PARQUET_MAGIC {
            return Err(general_err!("Invalid Parquet file. Corrupt footer"));
        }
        // get the metadata length from the footer
        let metadata_len = u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]);
        Ok(FooterTail {
            metadata_length: metadata_len as usize,
        })
    }

    /// The length of the thrift encoded [`FileMetaData`] preceding the tail.
    pub fn metadata_length(&self) -> usize {
        self.metadata_length
    }
}

/// Reads the [`ParquetMetaData`] from the footer of the Parquet file held
/// by `reader`.
///
/// The file must start and end with the `PAR1` magic. The position of
/// `reader` afterwards is unspecified.
pub fn parse_metadata<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<ParquetMetaData> {
    // check file is large enough to hold the leading magic and the footer
    let file_size = reader.seek(SeekFrom::End(0))?;
    if file_size < (PARQUET_MAGIC.len() + FOOTER_SIZE) as u64 {
        return Err(general_err!(
            "Invalid Parquet file. Size is smaller than footer"
        ));
    }

    let mut header = [0_u8; 4];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut header)?;
    if header != PARQUET_MAGIC {
        return Err(general_err!("Invalid Parquet file. Corrupt header"));
    }

    let mut footer = [0_u8; FOOTER_SIZE];
    reader.seek(SeekFrom::Start(file_size - FOOTER_SIZE as u64))?;
    reader.read_exact(&mut footer)?;
    let footer = FooterTail::try_new(&footer)?;

    let metadata_len = footer.metadata_length() as u64;
    let footer_metadata_len = FOOTER_SIZE as u64 + metadata_len;
    if footer_metadata_len + PARQUET_MAGIC.len() as u64 > file_size {
        return Err(general_err!(
            "Invalid Parquet file. Reported metadata length of {} + {} byte footer, but file is only {} bytes",
            metadata_len,
            FOOTER_SIZE,
            file_size
        ));
    }

    reader.seek(SeekFrom::Start(file_size - footer_metadata_len))?;
    let metadata_buf = bit_util::read_bytes(reader, metadata_len as usize)?;
    debug!(
        "decoding {} bytes of footer metadata from a {} byte file",
        metadata_len, file_size
    );
    decode_metadata(&metadata_buf)
}

/// Decodes [`ParquetMetaData`] from the provided bytes.
///
/// Typically this is used to decode the metadata from the end of a parquet
/// file. The format of `buf` is the Thrift compact binary protocol.
pub fn decode_metadata(buf: &[u8]) -> Result<ParquetMetaData> {
    let mut prot = ThriftCompactInputProtocol::new(buf);
    let file_metadata = FileMetaData::read_thrift(&mut prot)
        .map_err(|e| general_err!("Could not parse metadata: {}", e))?;
    ParquetMetaData::try_from_thrift(file_metadata)
}
