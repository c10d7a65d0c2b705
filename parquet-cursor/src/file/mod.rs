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

//! Main entrypoint for working with Parquet API.
//!
//! Provides access to file and row group readers, and column chunk metadata.
//!
//! # Example of reading an existing file
//!
//! ```rust,no_run
//! use parquet_cursor::file::reader::ParquetReader;
//!
//! let mut reader = ParquetReader::open("data/alltypes_plain.parquet").unwrap();
//! println!("{} rows in {} row groups", reader.num_rows(), reader.metadata().num_row_groups());
//!
//! // read the first 10 rows of column `id`, then the next 10
//! let first = reader.read(Some(&["id"]), Some(10), false).unwrap();
//! let next = reader.read(Some(&["id"]), Some(10), false).unwrap();
//! println!("{:?} {:?}", first["id"], next["id"]);
//! ```
pub mod filesystem;
pub mod footer;
pub mod metadata;
pub mod properties;
pub mod reader;

/// The length of the parquet footer in bytes
pub const FOOTER_SIZE: usize = 8;

pub(crate) const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];
