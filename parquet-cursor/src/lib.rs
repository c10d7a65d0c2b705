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

//!
//! This crate reads [Apache Parquet](https://parquet.apache.org/) files one
//! batch of rows at a time, without materializing whole row groups.
//!
//! # Format Overview
//!
//! Parquet is a columnar format: values are stored along columns instead of
//! rows. Each file contains metadata, along with zero or more "row groups",
//! each row group containing one column chunk per column, and each column
//! chunk a sequence of pages. The APIs in this crate reflect this structure.
//!
//! For more details about the Parquet format itself, see the [Parquet spec]
//!
//! [Parquet spec]: https://github.com/apache/parquet-format/blob/master/README.md#file-format
//!
//! # APIs
//!
//! ## Reading rows
//!
//! [`ParquetReader`](file::reader::ParquetReader) returns the values of the
//! selected columns in batches. A batch is either the next row group
//! (a "natural" read) or the next `n` rows, which may cut through pages and
//! row groups. The reader remembers, per column, the page and the row within
//! it where the previous batch ended, so consecutive reads never decode a
//! page twice unless it is split between them.
//!
//! ```no_run
//! use parquet_cursor::file::reader::ParquetReader;
//!
//! let mut reader = ParquetReader::open("data/dataset").unwrap();
//! loop {
//!     let batch = reader.read(Some(&["id", "name"]), Some(1024), false).unwrap();
//!     if batch["id"].is_empty() {
//!         break;
//!     }
//!     println!("{} rows", batch["id"].len());
//! }
//! ```
//!
//! ## Metadata and Schema
//!
//! The [`schema`] module provides the leaf columns of a Parquet schema. The
//! [`file::metadata`] module provides the decoded footer.
//!
//! ## Decoding
//!
//! The lower-level [`column`] and [`encodings`] modules decode single pages
//! and encoded runs. [`record`] applies converted types to decoded values.

#![warn(missing_docs)]

#[macro_use]
pub mod errors;

#[macro_use]
mod parquet_macros;

pub mod basic;
pub mod data_type;

mod parquet_thrift;

/// The subset of the [parquet.thrift] structs needed to read Parquet files.
///
/// [parquet.thrift]: https://github.com/apache/parquet-format/blob/master/src/main/thrift/parquet.thrift
pub(crate) mod format;

pub mod column;
pub mod compression;
pub mod encodings;
pub mod file;
pub mod record;
pub mod schema;
pub mod util;
