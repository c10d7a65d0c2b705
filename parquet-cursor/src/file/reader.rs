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

//! Row group reader over a Parquet file or dataset.
//!
//! [`ParquetReader`] returns the rows of a dataset in consecutive batches.
//! Each call to [`ParquetReader::read`] either returns the next row group
//! whole (a natural read) or the next `rows` rows, which may span row group
//! and page boundaries.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::column::reader::{ColumnChunkReader, CurrentLocation};
use crate::data_type::Value;
use crate::errors::{ParquetError, Result};
use crate::file::filesystem::{FileSystem, LocalFileSystem};
use crate::file::footer::parse_metadata;
use crate::file::metadata::ParquetMetaData;
use crate::file::properties::ReaderProperties;
use crate::schema::types::SchemaDescriptor;

/// Values read for each requested column, keyed by dotted column name in
/// the order requested. `None` marks a null.
pub type ColumnData = IndexMap<String, Vec<Option<Value>>>;

/// Reader of a Parquet file, or of a dataset whose column chunks live in
/// several files.
///
/// The primary input holds the footer. Column chunks with a `file_path`
/// are read from that file, resolved against the directory of the footer,
/// and opened through `F` on first use. Files stay open until the reader is
/// closed or dropped.
pub struct ParquetReader<R: Read + Seek, F: FileSystem = LocalFileSystem> {
    input: R,
    fs: F,
    base_dir: PathBuf,
    props: ReaderProperties,
    metadata: ParquetMetaData,
    columns: Vec<String>,
    row_group_index: usize,
    locations: HashMap<String, CurrentLocation>,
    files: HashMap<String, F::File>,
}

impl<R: Read + Seek> ParquetReader<R, LocalFileSystem> {
    /// Creates a reader for the Parquet file in `input`.
    ///
    /// Column chunks stored in other files are looked up relative to the
    /// current directory.
    pub fn new(input: R) -> Result<Self> {
        Self::new_with_properties(input, ReaderProperties::default())
    }

    /// Creates a reader for the Parquet file in `input` with custom
    /// [`ReaderProperties`].
    pub fn new_with_properties(input: R, props: ReaderProperties) -> Result<Self> {
        Self::new_with_file_system(input, LocalFileSystem, PathBuf::from("."), props)
    }
}

impl ParquetReader<<LocalFileSystem as FileSystem>::File, LocalFileSystem> {
    /// Opens the Parquet file at `path`.
    ///
    /// If `path` is a directory its metadata file, `_metadata` by default,
    /// is opened, and column chunk paths are resolved against `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(LocalFileSystem, path, ReaderProperties::default())
    }
}

impl<F: FileSystem> ParquetReader<F::File, F> {
    /// Opens the Parquet file or directory dataset at `path` through `fs`.
    pub fn open_with(
        fs: F,
        path: impl AsRef<Path>,
        props: ReaderProperties,
    ) -> Result<Self> {
        let path = path.as_ref();
        let (file_path, base_dir) = if fs.is_dir(path) {
            (path.join(props.metadata_file_name()), path.to_path_buf())
        } else {
            let base_dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            (path.to_path_buf(), base_dir)
        };
        debug!("opening {}", file_path.display());
        let input = fs.open(&file_path)?;
        Self::new_with_file_system(input, fs, base_dir, props)
    }
}

impl<R: Read + Seek, F: FileSystem> ParquetReader<R, F> {
    /// Creates a reader for the Parquet file in `input` that opens the
    /// files of column chunks in `base_dir` through `fs`.
    pub fn new_with_file_system(
        mut input: R,
        fs: F,
        base_dir: PathBuf,
        props: ReaderProperties,
    ) -> Result<Self> {
        let metadata = parse_metadata(&mut input)?;
        let columns = metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name())
            .collect();
        debug!(
            "opened dataset with {} rows in {} row groups",
            metadata.num_rows(),
            metadata.num_row_groups()
        );
        Ok(Self {
            input,
            fs,
            base_dir,
            props,
            metadata,
            columns,
            row_group_index: 0,
            locations: HashMap::new(),
            files: HashMap::new(),
        })
    }

    /// Metadata decoded from the footer.
    pub fn metadata(&self) -> &ParquetMetaData {
        &self.metadata
    }

    /// Properties the reader was created with.
    pub fn properties(&self) -> &ReaderProperties {
        &self.props
    }

    /// Schema of the dataset.
    pub fn schema(&self) -> &SchemaDescriptor {
        self.metadata.schema_descr()
    }

    /// Dotted names of all leaf columns, the columns read by default.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Total number of rows over all row groups.
    pub fn num_rows(&self) -> usize {
        self.metadata
            .row_groups()
            .iter()
            .map(|rg| rg.num_rows().max(0) as usize)
            .sum()
    }

    /// Index of the row group the next read starts in.
    pub fn row_group_index(&self) -> usize {
        self.row_group_index
    }

    /// Position of `column` within the current row group, if a row-limited
    /// read has touched it since the row group was entered.
    pub fn location(&self, column: &str) -> Option<CurrentLocation> {
        self.locations.get(column).copied()
    }

    /// Reads the next batch of rows.
    ///
    /// `columns` selects the columns to read, all leaf columns if `None` or
    /// empty. A column named more than once is read once.
    ///
    /// With `natural` set, the next row group that contains rows is
    /// returned whole. Otherwise `rows` limits the number of rows returned,
    /// continuing where the previous read stopped. Without a limit the
    /// rest of the dataset is returned.
    ///
    /// Fewer rows than requested, possibly none, are returned once the
    /// dataset is exhausted.
    pub fn read(
        &mut self,
        columns: Option<&[&str]>,
        rows: Option<usize>,
        natural: bool,
    ) -> Result<ColumnData> {
        let columns: IndexSet<String> = match columns {
            Some(columns) if !columns.is_empty() => {
                columns.iter().map(|c| c.to_string()).collect()
            }
            _ => self.columns.iter().cloned().collect(),
        };
        for column in &columns {
            if self.schema().column_by_name(column).is_none() {
                return Err(ParquetError::UnknownColumn(column.clone()));
            }
        }
        if natural && rows.is_some() {
            return Err(ParquetError::InvalidUsage(
                "a natural read returns whole row groups and takes no row count".to_string(),
            ));
        }

        let mut out: ColumnData = columns.iter().map(|c| (c.clone(), Vec::new())).collect();
        if rows == Some(0) {
            return Ok(out);
        }

        let mut remaining = rows;
        while self.row_group_index < self.metadata.num_row_groups() {
            let rows_read = self.read_row_group(&columns, remaining, natural, &mut out)?;

            if let Some(remaining) = remaining.as_mut() {
                *remaining -= rows_read;
                if *remaining == 0 {
                    break;
                }
            }
            self.advance_row_group();
            if natural && rows_read > 0 {
                break;
            }
        }
        Ok(out)
    }

    /// Closes the reader and any files it opened.
    pub fn close(self) {
        debug!("closing reader and {} external files", self.files.len());
    }

    fn advance_row_group(&mut self) {
        self.row_group_index += 1;
        self.locations.clear();
        debug!("advanced to row group {}", self.row_group_index);
    }

    // Reads the requested columns of the current row group into `out`,
    // returning the number of rows read.
    fn read_row_group(
        &mut self,
        columns: &IndexSet<String>,
        max_rows: Option<usize>,
        natural: bool,
        out: &mut ColumnData,
    ) -> Result<usize> {
        let row_group = self.metadata.row_group(self.row_group_index);
        let num_rows = usize::try_from(row_group.num_rows())
            .map_err(|_| general_err!("Invalid row count {}", row_group.num_rows()))?;
        let schema = self.metadata.schema_descr();

        let mut rows_read = None;
        for name in columns {
            let chunk = row_group.column_by_name(name).ok_or_else(|| {
                general_err!(
                    "Column {} missing from row group {}",
                    name,
                    self.row_group_index
                )
            })?;
            let descr = schema
                .column_by_name(name)
                .ok_or_else(|| ParquetError::UnknownColumn(name.clone()))?;
            let reader = ColumnChunkReader::new(chunk, descr, num_rows, &self.props);
            let location = self.locations.entry(name.clone()).or_default();

            let values = match chunk.file_path() {
                None => reader.read(&mut self.input, location, max_rows, natural)?,
                Some(path) => {
                    let file = match self.files.entry(path.to_string()) {
                        Entry::Occupied(entry) => entry.into_mut(),
                        Entry::Vacant(entry) => {
                            let full_path = self.base_dir.join(path);
                            debug!("opening column chunk file {}", full_path.display());
                            entry.insert(self.fs.open(&full_path)?)
                        }
                    };
                    reader.read(file, location, max_rows, natural)?
                }
            };

            rows_read.get_or_insert(values.len());
            if let Some(column) = out.get_mut(name) {
                column.extend(values);
            }
        }
        Ok(rows_read.unwrap_or(0))
    }
}
