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

//! Contains the resumable column chunk reader.
//!
//! A [`ColumnChunkReader`] returns the values of one column chunk page by
//! page. Between calls the position reached is kept in a
//! [`CurrentLocation`], so that a row-limited read can pick up where the
//! previous one stopped.

use std::cmp;
use std::io::{Read, Seek, SeekFrom};

use log::trace;

use crate::basic::PageType;
use crate::column::page::{read_page, read_page_header, PageDecoder};
use crate::compression::create_codec;
use crate::data_type::Value;
use crate::errors::{ParquetError, Result};
use crate::file::metadata::ColumnChunkMetaData;
use crate::file::properties::ReaderProperties;
use crate::schema::types::ColumnDescriptor;

/// Position of a column inside the current row group.
///
/// `page_index` counts data pages only, dictionary and index pages are not
/// numbered. `row_index` is the number of values of that page already
/// returned, and is less than the number of values of the page when not 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CurrentLocation {
    /// Index of the next data page to return values from.
    pub page_index: usize,
    /// Values of the page at `page_index` already returned.
    pub row_index: usize,
}

impl CurrentLocation {
    /// Creates a location.
    pub fn new(page_index: usize, row_index: usize) -> Self {
        Self {
            page_index,
            row_index,
        }
    }
}

/// Reads the values of a single column chunk.
pub struct ColumnChunkReader<'a> {
    chunk: &'a ColumnChunkMetaData,
    descr: &'a ColumnDescriptor,
    num_rows: usize,
    props: &'a ReaderProperties,
}

impl<'a> ColumnChunkReader<'a> {
    /// Creates a reader for `chunk`, a chunk of a row group with `num_rows`
    /// rows, whose column is described by `descr`.
    pub fn new(
        chunk: &'a ColumnChunkMetaData,
        descr: &'a ColumnDescriptor,
        num_rows: usize,
        props: &'a ReaderProperties,
    ) -> Self {
        Self {
            chunk,
            descr,
            num_rows,
            props,
        }
    }

    /// Reads values from the chunk stored in `input`.
    ///
    /// With `natural` set, every value of the chunk is returned and
    /// `location` is left untouched. Otherwise reading resumes at
    /// `location` and stops once `max_values` values were collected, if
    /// given, and `location` is advanced past the values returned.
    ///
    /// Pages before `location.page_index` are skipped without decoding
    /// their payload, but their dictionary page is always decoded.
    pub fn read<R: Read + Seek + ?Sized>(
        &self,
        input: &mut R,
        location: &mut CurrentLocation,
        max_values: Option<usize>,
        natural: bool,
    ) -> Result<Vec<Option<Value>>> {
        let (start, len) = self.chunk.byte_range()?;
        let end = start.saturating_add(len);
        input.seek(SeekFrom::Start(start))?;

        let resume = if natural {
            CurrentLocation::default()
        } else {
            *location
        };
        let mut decoder = PageDecoder::for_chunk(self.chunk, self.descr);
        let mut decompressor = create_codec(self.chunk.compression())?;

        let mut column = Vec::new();
        let mut values_seen = 0;
        let mut page_index = 0;

        while values_seen < self.num_rows {
            // a chunk without a recorded size ends after its last value
            if len > 0 && input.stream_position()? >= end {
                break;
            }
            let header = read_page_header(input)?;

            let data_header = match header.page_type {
                PageType::DICTIONARY_PAGE => {
                    let buf = read_page(input, &header, decompressor.as_mut(), self.props)?;
                    if let Some(dict_header) = &header.dictionary_page_header {
                        decoder.decode_dictionary_page(dict_header, &buf)?;
                    }
                    continue;
                }
                PageType::INDEX_PAGE => {
                    trace!("skipping index page of {} bytes", header.compressed_page_size);
                    input.seek(SeekFrom::Current(header.compressed_page_size as i64))?;
                    continue;
                }
                PageType::DATA_PAGE => header
                    .data_page_header
                    .ok_or_else(|| general_err!("Missing V1 data page header"))?,
                other => return Err(ParquetError::UnsupportedPageType(other)),
            };
            values_seen += data_header.num_values;

            if page_index < resume.page_index {
                trace!(
                    "column {}: skipping data page {} of {} values",
                    self.chunk.column_name(),
                    page_index,
                    data_header.num_values
                );
                input.seek(SeekFrom::Current(header.compressed_page_size as i64))?;
                page_index += 1;
                continue;
            }

            let buf = read_page(input, &header, decompressor.as_mut(), self.props)?;
            let mut values = decoder.decode_data_page(&data_header, &buf)?;

            let row_index = if page_index == resume.page_index {
                resume.row_index
            } else {
                0
            };
            if row_index > 0 {
                values.drain(..cmp::min(row_index, values.len()));
            }

            if let Some(max_values) = max_values {
                if column.len() + values.len() >= max_values {
                    let needed = max_values - column.len();
                    let next = if needed < values.len() {
                        CurrentLocation::new(page_index, row_index + needed)
                    } else {
                        CurrentLocation::new(page_index + 1, 0)
                    };
                    values.truncate(needed);
                    column.extend(values);
                    if !natural {
                        trace!("column {}: stopping at {:?}", self.chunk.column_name(), next);
                        *location = next;
                    }
                    return Ok(column);
                }
            }

            trace!(
                "column {}: decoded data page {} of {} values",
                self.chunk.column_name(),
                page_index,
                values.len()
            );
            column.extend(values);
            page_index += 1;
            if !natural {
                *location = CurrentLocation::new(page_index, 0);
            }
        }

        Ok(column)
    }
}
