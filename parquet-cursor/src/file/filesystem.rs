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

//! Access to the files of a dataset.
//!
//! A Parquet dataset may spread its column chunks over several files, named
//! by [`ColumnChunkMetaData::file_path`](crate::file::metadata::ColumnChunkMetaData::file_path)
//! relative to the file holding the footer. The reader opens them through a
//! [`FileSystem`].

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::errors::{ParquetError, Result};

/// The file system a dataset is read from.
pub trait FileSystem {
    /// Handle of an open file.
    type File: Read + Seek;

    /// Opens the file at `path` for reading.
    fn open(&self, path: &Path) -> Result<Self::File>;

    /// Returns true if `path` names a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    type File = BufReader<File>;

    fn open(&self, path: &Path) -> Result<Self::File> {
        let file = File::open(path)
            .map_err(|e| general_err!("Failed to open {}: {}", path.display(), e))?;
        Ok(BufReader::new(file))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
