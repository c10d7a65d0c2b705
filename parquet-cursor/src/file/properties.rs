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

//! Configuration via [`ReaderProperties`]

use std::sync::Arc;

/// Default value for [`ReaderProperties::metadata_file_name`]
pub const DEFAULT_METADATA_FILE_NAME: &str = "_metadata";
/// Default value for [`ReaderProperties::validate_utf8`]
pub const DEFAULT_VALIDATE_UTF8: bool = true;
/// Default value for [`ReaderProperties::max_page_size`]
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1024 * 1024 * 1024;

/// Reference counted reader properties.
pub type ReaderPropertiesPtr = Arc<ReaderProperties>;

/// Configuration settings for reading parquet files.
///
/// All properties are immutable and `Send` + `Sync`.
/// Use [`ReaderPropertiesBuilder`] to assemble these properties.
///
/// # Example
///
/// ```rust
/// use parquet_cursor::file::properties::ReaderProperties;
///
/// // Create properties with default configuration.
/// let props = ReaderProperties::builder().build();
///
/// // Use properties builder to set certain options and assemble the configuration.
/// let props = ReaderProperties::builder()
///     .set_metadata_file_name("_common_metadata")
///     .set_validate_utf8(false)
///     .build();
/// assert_eq!(props.metadata_file_name(), "_common_metadata");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderProperties {
    metadata_file_name: String,
    validate_utf8: bool,
    max_page_size: usize,
}

impl Default for ReaderProperties {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ReaderProperties {
    /// Returns builder for reader properties with default values.
    pub fn builder() -> ReaderPropertiesBuilder {
        ReaderPropertiesBuilder::with_defaults()
    }

    /// Returns the name of the file holding the footer of a directory dataset.
    pub fn metadata_file_name(&self) -> &str {
        &self.metadata_file_name
    }

    /// Returns whether string columns reject invalid UTF-8 when converted
    /// to [`Field`](crate::record::Field)s.
    pub fn validate_utf8(&self) -> bool {
        self.validate_utf8
    }

    /// Returns the largest compressed or uncompressed page size accepted.
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }
}

/// Builder for parquet file reader configuration. See example on
/// [`ReaderProperties`]
pub struct ReaderPropertiesBuilder {
    metadata_file_name: Option<String>,
    validate_utf8: Option<bool>,
    max_page_size: Option<usize>,
}

/// Reader properties builder.
impl ReaderPropertiesBuilder {
    /// Returns default state of the builder.
    fn with_defaults() -> Self {
        Self {
            metadata_file_name: None,
            validate_utf8: None,
            max_page_size: None,
        }
    }

    /// Finalizes the configuration and returns immutable reader properties struct.
    pub fn build(self) -> ReaderProperties {
        ReaderProperties {
            metadata_file_name: self
                .metadata_file_name
                .unwrap_or_else(|| DEFAULT_METADATA_FILE_NAME.to_string()),
            validate_utf8: self.validate_utf8.unwrap_or(DEFAULT_VALIDATE_UTF8),
            max_page_size: self.max_page_size.unwrap_or(DEFAULT_MAX_PAGE_SIZE),
        }
    }

    /// Sets the file opened when a reader is created for a directory
    /// (defaults to `_metadata`).
    pub fn set_metadata_file_name(mut self, value: impl Into<String>) -> Self {
        self.metadata_file_name = Some(value.into());
        self
    }

    /// Enable/disable UTF-8 validation of string columns.
    ///
    /// If disabled, invalid sequences are replaced with `U+FFFD` instead of
    /// returning an error.
    pub fn set_validate_utf8(mut self, value: bool) -> Self {
        self.validate_utf8 = Some(value);
        self
    }

    /// Sets the largest page, in bytes, the reader will allocate for.
    pub fn set_max_page_size(mut self, value: usize) -> Self {
        self.max_page_size = Some(value);
        self
    }
}
