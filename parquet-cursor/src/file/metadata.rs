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

//! Contains information about available Parquet metadata.
//!
//! The hierarchy of metadata is as follows:
//!
//! [`ParquetMetaData`] contains the file level metadata, the schema as a
//! [`SchemaDescriptor`], and a [`RowGroupMetaData`] for each row group.
//!
//! [`RowGroupMetaData`] contains information about a row group and one
//! [`ColumnChunkMetaData`] for each column chunk.
//!
//! [`ColumnChunkMetaData`] locates the pages of one column chunk, possibly in
//! a file other than the one holding the footer.

use std::sync::Arc;

use crate::basic::{Compression, Encoding, Type};
use crate::errors::{ParquetError, Result};
use crate::format;
use crate::schema::types::{ColumnDescPtr, ColumnPath, SchemaDescPtr, SchemaDescriptor};

/// Global Parquet metadata, decoded from the file footer.
#[derive(Debug)]
pub struct ParquetMetaData {
    version: i32,
    num_rows: i64,
    created_by: Option<String>,
    key_value_metadata: Vec<(String, Option<String>)>,
    schema_descr: SchemaDescPtr,
    row_groups: Vec<RowGroupMetaData>,
}

impl ParquetMetaData {
    pub(crate) fn try_from_thrift(file_metadata: format::FileMetaData) -> Result<Self> {
        let schema_descr = Arc::new(SchemaDescriptor::try_from_elements(
            &file_metadata.schema,
        )?);
        let row_groups = file_metadata
            .row_groups
            .into_iter()
            .map(|rg| RowGroupMetaData::try_from_thrift(&schema_descr, rg))
            .collect::<Result<Vec<_>>>()?;
        let key_value_metadata = file_metadata
            .key_value_metadata
            .unwrap_or_default()
            .into_iter()
            .map(|kv| (kv.key, kv.value))
            .collect();
        Ok(Self {
            version: file_metadata.version,
            num_rows: file_metadata.num_rows,
            created_by: file_metadata.created_by,
            key_value_metadata,
            schema_descr,
            row_groups,
        })
    }

    /// Returns version of this file.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Returns number of rows in the file, as written in the footer.
    pub fn num_rows(&self) -> i64 {
        self.num_rows
    }

    /// String message for application that wrote this file.
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns key_value_metadata of this file.
    pub fn key_value_metadata(&self) -> &[(String, Option<String>)] {
        &self.key_value_metadata
    }

    /// Returns Parquet schema descriptor.
    pub fn schema_descr(&self) -> &SchemaDescriptor {
        &self.schema_descr
    }

    /// Returns reference counted clone for schema descriptor.
    pub fn schema_descr_ptr(&self) -> SchemaDescPtr {
        self.schema_descr.clone()
    }

    /// Returns number of row groups in this file.
    pub fn num_row_groups(&self) -> usize {
        self.row_groups.len()
    }

    /// Returns row group metadata for `i`th position.
    /// Position should be less than number of row groups `num_row_groups`.
    pub fn row_group(&self, i: usize) -> &RowGroupMetaData {
        &self.row_groups[i]
    }

    /// Returns slice of row groups in this file.
    pub fn row_groups(&self) -> &[RowGroupMetaData] {
        &self.row_groups
    }
}

/// Metadata for a row group.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroupMetaData {
    columns: Vec<ColumnChunkMetaData>,
    num_rows: i64,
    total_byte_size: i64,
}

impl RowGroupMetaData {
    fn try_from_thrift(schema_descr: &SchemaDescriptor, rg: format::RowGroup) -> Result<Self> {
        let columns = rg
            .columns
            .into_iter()
            .map(|cc| ColumnChunkMetaData::try_from_thrift(schema_descr, cc))
            .collect::<Result<Vec<_>>>()?;
        if rg.num_rows < 0 {
            return Err(general_err!("Row group has {} rows", rg.num_rows));
        }
        Ok(Self {
            columns,
            num_rows: rg.num_rows,
            total_byte_size: rg.total_byte_size,
        })
    }

    /// Number of columns in this row group.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns column chunk metadata for `i`th column.
    pub fn column(&self, i: usize) -> &ColumnChunkMetaData {
        &self.columns[i]
    }

    /// Returns the chunk of the column named `name`, if present.
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnChunkMetaData> {
        self.columns.iter().find(|c| c.column_name() == name)
    }

    /// Returns slice of column chunk metadata.
    pub fn columns(&self) -> &[ColumnChunkMetaData] {
        &self.columns
    }

    /// Number of rows in this row group.
    pub fn num_rows(&self) -> i64 {
        self.num_rows
    }

    /// Total byte size of all uncompressed column data in this row group.
    pub fn total_byte_size(&self) -> i64 {
        self.total_byte_size
    }
}

/// Metadata for a column chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunkMetaData {
    column_path: ColumnPath,
    column_name: String,
    column_descr: Option<ColumnDescPtr>,
    physical_type: Type,
    encodings: Vec<Encoding>,
    file_path: Option<String>,
    file_offset: i64,
    num_values: i64,
    compression: Compression,
    total_compressed_size: i64,
    total_uncompressed_size: i64,
    data_page_offset: i64,
    index_page_offset: Option<i64>,
    dictionary_page_offset: Option<i64>,
    width: i32,
}

impl ColumnChunkMetaData {
    fn try_from_thrift(schema_descr: &SchemaDescriptor, cc: format::ColumnChunk) -> Result<Self> {
        let col_metadata = cc
            .meta_data
            .ok_or_else(|| general_err!("Expected to have column metadata"))?;
        let column_path = ColumnPath::new(col_metadata.path_in_schema);
        let column_name = column_path.string();
        let column_descr = schema_descr.column_by_name(&column_name).cloned();
        // the byte width is not part of the chunk metadata, it comes from the schema
        let width = column_descr
            .as_ref()
            .map(|descr| descr.type_length())
            .unwrap_or(-1);
        Ok(Self {
            column_path,
            column_name,
            column_descr,
            physical_type: col_metadata.type_,
            encodings: col_metadata.encodings,
            file_path: cc.file_path,
            file_offset: cc.file_offset,
            num_values: col_metadata.num_values,
            compression: col_metadata.codec,
            total_compressed_size: col_metadata.total_compressed_size,
            total_uncompressed_size: col_metadata.total_uncompressed_size,
            data_page_offset: col_metadata.data_page_offset,
            index_page_offset: col_metadata.index_page_offset,
            dictionary_page_offset: col_metadata.dictionary_page_offset,
            width,
        })
    }

    /// File where the column chunk is stored.
    ///
    /// If not set, assumed to belong to the same file as the metadata.
    /// This path is relative to the current file.
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    /// Byte offset of `ColumnMetaData` in `file_path()`.
    pub fn file_offset(&self) -> i64 {
        self.file_offset
    }

    /// Path (or identifier) of this column.
    pub fn column_path(&self) -> &ColumnPath {
        &self.column_path
    }

    /// Dotted name of this column, e.g. `a.b.c`.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Descriptor of this column in the file schema, if the schema has a
    /// leaf with the same path.
    pub fn column_descr(&self) -> Option<&ColumnDescPtr> {
        self.column_descr.as_ref()
    }

    /// Physical type of this column.
    pub fn column_type(&self) -> Type {
        self.physical_type
    }

    /// All encodings used for this column.
    pub fn encodings(&self) -> &[Encoding] {
        &self.encodings
    }

    /// Total number of values in this column chunk.
    pub fn num_values(&self) -> i64 {
        self.num_values
    }

    /// Compression for this column.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the total compressed data size of this column chunk.
    pub fn compressed_size(&self) -> i64 {
        self.total_compressed_size
    }

    /// Returns the total uncompressed data size of this column chunk.
    pub fn uncompressed_size(&self) -> i64 {
        self.total_uncompressed_size
    }

    /// Returns the offset for the column data.
    pub fn data_page_offset(&self) -> i64 {
        self.data_page_offset
    }

    /// Returns the offset for the index page.
    pub fn index_page_offset(&self) -> Option<i64> {
        self.index_page_offset
    }

    /// Returns the offset for the dictionary page, if any.
    pub fn dictionary_page_offset(&self) -> Option<i64> {
        self.dictionary_page_offset
    }

    /// Byte width of the values, the `type_length` of the schema element.
    /// -1 unless this is a FIXED_LEN_BYTE_ARRAY column.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Returns the offset of the first page of this column chunk.
    ///
    /// That is the dictionary page when one precedes the data pages.
    pub fn start_offset(&self) -> Result<u64> {
        let start = match self.dictionary_page_offset {
            Some(dict_offset) if dict_offset > 0 && dict_offset < self.data_page_offset => {
                dict_offset
            }
            _ => self.data_page_offset,
        };
        u64::try_from(start).map_err(|_| general_err!("Invalid column chunk offset {}", start))
    }

    /// Returns the offset and length in bytes of the column chunk within the file
    pub fn byte_range(&self) -> Result<(u64, u64)> {
        let col_start = self.start_offset()?;
        let col_len = u64::try_from(self.total_compressed_size).map_err(|_| {
            general_err!("Invalid column chunk size {}", self.total_compressed_size)
        })?;
        Ok((col_start, col_len))
    }
}
