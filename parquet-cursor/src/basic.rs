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

//! Contains Rust mappings for the enums of the Thrift definition.
//! Refer to `parquet.thrift` file to see raw definitions.

use std::fmt;

use crate::errors::{ParquetError, Result};

// ----------------------------------------------------------------------
// Mirrors `parquet::Type`

thrift_enum!(
/// Types supported by Parquet.
/// These physical types are intended to be used in combination with the encodings to
/// control the on disk storage format.
/// For example INT16 is not included as a type since a good encoding of INT32
/// would handle this.
enum Type {
  BOOLEAN = 0;
  INT32 = 1;
  INT64 = 2;
  INT96 = 3;
  FLOAT = 4;
  DOUBLE = 5;
  BYTE_ARRAY = 6;
  FIXED_LEN_BYTE_ARRAY = 7;
}
);

// ----------------------------------------------------------------------
// Mirrors `parquet::ConvertedType`

thrift_enum!(
/// Common types (converted types) used by frameworks when using Parquet.
/// This helps map between types in those frameworks to the base types in Parquet.
/// This is only metadata and not needed to decode the data.
///
/// A schema element without a converted type is represented as `None`.
enum ConvertedType {
  /// A BYTE_ARRAY actually contains UTF8 encoded chars.
  UTF8 = 0;
  /// A map is converted as an optional field containing a repeated key/value pair.
  MAP = 1;
  /// A key/value pair is converted into a group of two fields.
  MAP_KEY_VALUE = 2;
  /// A list is converted into an optional field containing a repeated field for its
  /// values.
  LIST = 3;
  /// An enum is converted into a binary field
  ENUM = 4;
  /// A decimal value, stored as the unscaled two's complement value. Must be
  /// accompanied by a precision and a scale in the schema element.
  DECIMAL = 5;
  /// A date stored as days since Unix epoch, encoded as the INT32 physical type.
  DATE = 6;
  /// The total number of milliseconds since midnight, stored as INT32.
  TIME_MILLIS = 7;
  /// The total number of microseconds since midnight, stored as INT64.
  TIME_MICROS = 8;
  /// Date and time recorded as milliseconds since the Unix epoch, stored as INT64.
  TIMESTAMP_MILLIS = 9;
  /// Date and time recorded as microseconds since the Unix epoch, stored as INT64.
  TIMESTAMP_MICROS = 10;
  /// An unsigned 8 bit integer value stored as INT32 physical type.
  UINT_8 = 11;
  /// An unsigned 16 bit integer value stored as INT32 physical type.
  UINT_16 = 12;
  /// An unsigned 32 bit integer value stored as INT32 physical type.
  UINT_32 = 13;
  /// An unsigned 64 bit integer value stored as INT64 physical type.
  UINT_64 = 14;
  /// A signed 8 bit integer value stored as INT32 physical type.
  INT_8 = 15;
  /// A signed 16 bit integer value stored as INT32 physical type.
  INT_16 = 16;
  /// A signed 32 bit integer value stored as INT32 physical type.
  INT_32 = 17;
  /// A signed 64 bit integer value stored as INT64 physical type.
  INT_64 = 18;
  /// A JSON document embedded within a single UTF8 column.
  JSON = 19;
  /// A BSON document embedded within a single BINARY column.
  BSON = 20;
  /// An interval of time, stored as a FIXED_LEN_BYTE_ARRAY of length 12.
  INTERVAL = 21;
}
);

// ----------------------------------------------------------------------
// Mirrors `parquet::FieldRepetitionType`

thrift_enum!(
/// Representation of field types in schema.
enum Repetition {
  /// Field is required (can not be null) and each record has exactly 1 value.
  REQUIRED = 0;
  /// Field is optional (can be null) and each record has 0 or 1 values.
  OPTIONAL = 1;
  /// Field is repeated and can contain 0 or more values.
  REPEATED = 2;
}
);

// ----------------------------------------------------------------------
// Mirrors `parquet::Encoding`

thrift_enum!(
/// Encodings supported by Parquet.
/// Not all encodings are valid for all types. These enums are also used to specify the
/// encoding of definition and repetition levels.
enum Encoding {
  /// Default byte encoding.
  /// - BOOLEAN - 1 bit per value, 0 is false; 1 is true.
  /// - INT32 - 4 bytes per value, stored as little-endian.
  /// - INT64 - 8 bytes per value, stored as little-endian.
  /// - FLOAT - 4 bytes per value, stored as little-endian.
  /// - DOUBLE - 8 bytes per value, stored as little-endian.
  /// - BYTE_ARRAY - 4 byte length stored as little endian, followed by bytes.
  /// - FIXED_LEN_BYTE_ARRAY - just the bytes are stored.
  PLAIN = 0;
  /// **Deprecated** dictionary encoding. Treated exactly like RLE_DICTIONARY
  /// for data pages.
  PLAIN_DICTIONARY = 2;
  /// Group packed run length encoding.
  ///
  /// Usable for definition/repetition levels encoding and boolean values.
  RLE = 3;
  /// **Deprecated** bit packed encoding for definition/repetition levels.
  BIT_PACKED = 4;
  /// Delta encoding for integers, either INT32 or INT64.
  DELTA_BINARY_PACKED = 5;
  /// Encoding for byte arrays to separate the length values and the data.
  DELTA_LENGTH_BYTE_ARRAY = 6;
  /// Incremental encoding for byte arrays.
  DELTA_BYTE_ARRAY = 7;
  /// Dictionary encoding. The ids are encoded using the RLE encoding.
  RLE_DICTIONARY = 8;
  /// Encoding for floating-point data, scattering value bytes into K streams.
  BYTE_STREAM_SPLIT = 9;
}
);

// ----------------------------------------------------------------------
// Mirrors `parquet::CompressionCodec`

thrift_enum!(
/// Supported compression algorithms.
enum Compression {
  UNCOMPRESSED = 0;
  SNAPPY = 1;
  GZIP = 2;
  LZO = 3;
  BROTLI = 4;
  LZ4 = 5;
  ZSTD = 6;
  LZ4_RAW = 7;
}
);

// ----------------------------------------------------------------------
// Mirrors `parquet::PageType`

thrift_enum!(
/// Available data pages for Parquet file format.
/// Note that some of the page types may not be supported.
enum PageType {
  DATA_PAGE = 0;
  INDEX_PAGE = 1;
  DICTIONARY_PAGE = 2;
  DATA_PAGE_V2 = 3;
}
);

impl Encoding {
    /// Returns true if data pages in this encoding store indices into the
    /// column chunk's dictionary.
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY)
    }
}
