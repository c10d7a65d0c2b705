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

//! In-memory writer of Parquet files for tests.
//!
//! [`TestFileBuilder`] lays out row groups of PLAIN or dictionary encoded
//! pages, optionally compressed, followed by the thrift footer.

use std::io::Write;

use crate::basic::{Compression, ConvertedType, Encoding, PageType, Repetition, Type};
use crate::data_type::Value;
use crate::file::PARQUET_MAGIC;
use crate::format::{
    ColumnChunk, ColumnMetaData, DataPageHeader, DictionaryPageHeader, FileMetaData, PageHeader,
    RowGroup, SchemaElement,
};
use crate::parquet_thrift::{ThriftCompactOutputProtocol, WriteThrift};
use crate::schema::types::{ColumnDescPtr, SchemaDescriptor};
use crate::util::bit_util::{ceil, width_from_max_int};

/// PLAIN encodes `values`, packing runs of booleans 8 to a byte.
pub(crate) fn encode_plain(values: &[Value]) -> Vec<u8> {
    let mut out = vec![];
    let mut bool_byte = 0u8;
    let mut bool_bits = 0;
    for value in values {
        if let Value::Boolean(b) = value {
            bool_byte |= (*b as u8) << bool_bits;
            bool_bits += 1;
            if bool_bits == 8 {
                out.push(bool_byte);
                bool_byte = 0;
                bool_bits = 0;
            }
            continue;
        }
        if bool_bits > 0 {
            out.push(bool_byte);
            bool_byte = 0;
            bool_bits = 0;
        }
        match value {
            Value::Boolean(_) => unreachable!(),
            Value::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::Int64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::Int96(v) => {
                for word in v.data() {
                    out.extend_from_slice(&word.to_le_bytes());
                }
            }
            Value::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::ByteArray(v) => {
                out.extend_from_slice(&(v.len() as u32).to_le_bytes());
                out.extend_from_slice(v.data());
            }
            Value::FixedLenByteArray(v) => out.extend_from_slice(v.data()),
        }
    }
    if bool_bits > 0 {
        out.push(bool_byte);
    }
    out
}

fn write_var_int(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Encodes `values` with the RLE/bit-packing hybrid, without the length
/// prefix. Repeats of 8 or more become RLE runs, everything else goes into
/// bit-packed groups of 8, the last one padded with zeros.
pub(crate) fn encode_hybrid(values: &[u64], bit_width: u8) -> Vec<u8> {
    let byte_width = ceil(bit_width as usize, 8);
    let mut out = vec![];
    let mut i = 0;
    while i < values.len() {
        let mut run = 1;
        while i + run < values.len() && values[i + run] == values[i] {
            run += 1;
        }
        if run >= 8 {
            write_var_int(&mut out, (run as u64) << 1);
            out.extend_from_slice(&values[i].to_le_bytes()[..byte_width]);
            i += run;
            continue;
        }

        let end = (i + 8).min(values.len());
        write_var_int(&mut out, (1 << 1) | 1);
        let mut acc = 0u128;
        let mut bits = 0;
        for j in 0..8 {
            let value = values[i..end].get(j).copied().unwrap_or(0);
            acc |= (value as u128) << bits;
            bits += bit_width as usize;
            while bits >= 8 {
                out.push(acc as u8);
                acc >>= 8;
                bits -= 8;
            }
        }
        i = end;
    }
    out
}

/// Encodes `values` with the deprecated BIT_PACKED encoding, most
/// significant bit first.
pub(crate) fn encode_bitpacked_deprecated(values: &[u64], bit_width: u8) -> Vec<u8> {
    let mask = match bit_width {
        64 => u64::MAX,
        w => (1u64 << w) - 1,
    };
    let mut out = vec![];
    let mut acc = 0u128;
    let mut bits = 0;
    for value in values {
        acc = (acc << bit_width) | (value & mask) as u128;
        bits += bit_width as usize;
        while bits >= 8 {
            out.push((acc >> (bits - 8)) as u8);
            bits -= 8;
            acc &= (1u128 << bits) - 1;
        }
    }
    if bits > 0 {
        out.push((acc << (8 - bits)) as u8);
    }
    out
}

/// Required INT32 column values.
pub(crate) fn int32s(values: &[i32]) -> Vec<Option<Value>> {
    values.iter().map(|v| Some(Value::Int32(*v))).collect()
}

/// Optional INT32 column values.
pub(crate) fn optional_int32s(values: &[Option<i32>]) -> Vec<Option<Value>> {
    values.iter().map(|v| v.map(Value::Int32)).collect()
}

/// Required BOOLEAN column values.
pub(crate) fn bools(values: &[bool]) -> Vec<Option<Value>> {
    values.iter().map(|v| Some(Value::Boolean(*v))).collect()
}

/// BYTE_ARRAY column values.
pub(crate) fn byte_arrays(values: &[&str]) -> Vec<Option<Value>> {
    values
        .iter()
        .map(|v| Some(Value::ByteArray((*v).into())))
        .collect()
}

/// Layout of one column of a test file.
#[derive(Debug, Clone)]
pub(crate) struct ColumnSpec {
    name: String,
    physical_type: Type,
    repetition: Repetition,
    converted_type: Option<ConvertedType>,
    type_length: Option<i32>,
    dictionary: bool,
    value_encoding: Encoding,
    def_level_encoding: Encoding,
    codec: Compression,
    values_per_page: Option<usize>,
    leading_page: Option<PageType>,
    file_path: Option<String>,
}

impl ColumnSpec {
    pub(crate) fn new(name: &str, physical_type: Type, repetition: Repetition) -> Self {
        Self {
            name: name.to_string(),
            physical_type,
            repetition,
            converted_type: None,
            type_length: None,
            dictionary: false,
            value_encoding: Encoding::PLAIN,
            def_level_encoding: Encoding::RLE,
            codec: Compression::UNCOMPRESSED,
            values_per_page: None,
            leading_page: None,
            file_path: None,
        }
    }

    pub(crate) fn required_int32(name: &str) -> Self {
        Self::new(name, Type::INT32, Repetition::REQUIRED)
    }

    pub(crate) fn optional_int32(name: &str) -> Self {
        Self::new(name, Type::INT32, Repetition::OPTIONAL)
    }

    pub(crate) fn required_bool(name: &str) -> Self {
        Self::new(name, Type::BOOLEAN, Repetition::REQUIRED)
    }

    pub(crate) fn optional_byte_array(name: &str) -> Self {
        Self::new(name, Type::BYTE_ARRAY, Repetition::OPTIONAL)
    }

    pub(crate) fn with_converted_type(mut self, converted_type: ConvertedType) -> Self {
        self.converted_type = Some(converted_type);
        self
    }

    pub(crate) fn with_type_length(mut self, type_length: i32) -> Self {
        self.type_length = Some(type_length);
        self
    }

    /// Dictionary encode the data pages.
    pub(crate) fn with_dictionary(mut self) -> Self {
        self.dictionary = true;
        self
    }

    /// Encoding of the values of non-dictionary pages.
    pub(crate) fn with_value_encoding(mut self, encoding: Encoding) -> Self {
        self.value_encoding = encoding;
        self
    }

    pub(crate) fn with_def_level_encoding(mut self, encoding: Encoding) -> Self {
        self.def_level_encoding = encoding;
        self
    }

    pub(crate) fn with_codec(mut self, codec: Compression) -> Self {
        self.codec = codec;
        self
    }

    pub(crate) fn with_values_per_page(mut self, values_per_page: usize) -> Self {
        self.values_per_page = Some(values_per_page);
        self
    }

    /// Writes a page of `page_type` with a 4 byte payload before the data
    /// pages of every chunk.
    pub(crate) fn with_leading_page(mut self, page_type: PageType) -> Self {
        self.leading_page = Some(page_type);
        self
    }

    /// Writes the chunks of this column to the data file `file_path`, see
    /// [`TestFileBuilder::build_dataset`].
    pub(crate) fn with_file_path(mut self, file_path: &str) -> Self {
        self.file_path = Some(file_path.to_string());
        self
    }

    fn schema_element(&self) -> SchemaElement {
        SchemaElement {
            type_: Some(self.physical_type),
            type_length: self.type_length,
            repetition_type: Some(self.repetition),
            name: self.name.clone(),
            converted_type: self.converted_type,
            ..Default::default()
        }
    }

    fn max_def_level(&self) -> i16 {
        match self.repetition {
            Repetition::REQUIRED => 0,
            _ => 1,
        }
    }

    fn max_rep_level(&self) -> i16 {
        match self.repetition {
            Repetition::REPEATED => 1,
            _ => 0,
        }
    }
}

/// The descriptor of `spec` as the only column of a schema.
pub(crate) fn column_descr(spec: &ColumnSpec) -> ColumnDescPtr {
    let elements = vec![root_element(1), spec.schema_element()];
    let schema = SchemaDescriptor::try_from_elements(&elements).unwrap();
    schema.column(0).unwrap().clone()
}

fn root_element(num_children: usize) -> SchemaElement {
    SchemaElement {
        name: "schema".to_string(),
        num_children: Some(num_children as i32),
        ..Default::default()
    }
}

fn write_thrift<T: WriteThrift>(value: &T, out: &mut Vec<u8>) {
    let mut writer = ThriftCompactOutputProtocol::new(out);
    value.write_thrift(&mut writer).unwrap();
}

fn compress(codec: Compression, data: &[u8]) -> Vec<u8> {
    match codec {
        Compression::UNCOMPRESSED => data.to_vec(),
        Compression::SNAPPY => snap::raw::Encoder::new().compress_vec(data).unwrap(),
        Compression::GZIP => {
            let mut encoder =
                flate2::write::GzEncoder::new(vec![], flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        other => panic!("unsupported test codec {other}"),
    }
}

// Writes a page header and payload, returning the uncompressed size of both.
fn write_page(
    out: &mut Vec<u8>,
    codec: Compression,
    page_type: PageType,
    payload: &[u8],
    data_page_header: Option<DataPageHeader>,
    dictionary_page_header: Option<DictionaryPageHeader>,
) -> i64 {
    let compressed = compress(codec, payload);
    let header = PageHeader {
        type_: page_type,
        uncompressed_page_size: payload.len() as i32,
        compressed_page_size: compressed.len() as i32,
        crc: None,
        data_page_header,
        dictionary_page_header,
    };
    let start = out.len();
    write_thrift(&header, out);
    let header_len = out.len() - start;
    out.extend_from_slice(&compressed);
    (header_len + payload.len()) as i64
}

fn write_levels(out: &mut Vec<u8>, levels: &[u64], encoding: Encoding) {
    let bit_width = width_from_max_int(levels.iter().copied().max().unwrap_or(0).max(1));
    match encoding {
        Encoding::RLE => {
            let data = encode_hybrid(levels, bit_width);
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend(data);
        }
        Encoding::BIT_PACKED => out.extend(encode_bitpacked_deprecated(levels, bit_width)),
        other => panic!("unsupported test level encoding {other}"),
    }
}

// Writes the pages of one column chunk to `out`.
fn write_column_chunk(
    spec: &ColumnSpec,
    values: &[Option<Value>],
    out: &mut Vec<u8>,
) -> ColumnMetaData {
    let start = out.len();
    let mut uncompressed_size = 0;
    let mut encodings = vec![Encoding::RLE];

    let dictionary = spec.dictionary.then(|| {
        let mut dictionary: Vec<Value> = vec![];
        for value in values.iter().flatten() {
            if !dictionary.contains(value) {
                dictionary.push(value.clone());
            }
        }
        dictionary
    });

    let mut dictionary_page_offset = None;
    if let Some(dictionary) = &dictionary {
        dictionary_page_offset = Some(out.len() as i64);
        let header = DictionaryPageHeader {
            num_values: dictionary.len() as i32,
            encoding: Encoding::PLAIN,
            is_sorted: None,
        };
        uncompressed_size += write_page(
            out,
            spec.codec,
            PageType::DICTIONARY_PAGE,
            &encode_plain(dictionary),
            None,
            Some(header),
        );
        encodings.extend([Encoding::PLAIN, Encoding::RLE_DICTIONARY]);
    }

    let data_page_offset = out.len() as i64;
    if let Some(page_type) = spec.leading_page {
        uncompressed_size += write_page(out, spec.codec, page_type, &[0; 4], None, None);
    }

    let values_per_page = spec.values_per_page.unwrap_or(values.len()).max(1);
    let mut pages: Vec<&[Option<Value>]> = values.chunks(values_per_page).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }

    let max_def_level = spec.max_def_level() as u64;
    for page in pages {
        let mut payload = vec![];
        if spec.max_rep_level() > 0 {
            write_levels(&mut payload, &vec![0; page.len()], Encoding::RLE);
        }
        if max_def_level > 0 {
            let levels: Vec<u64> = page
                .iter()
                .map(|v| if v.is_some() { max_def_level } else { 0 })
                .collect();
            write_levels(&mut payload, &levels, spec.def_level_encoding);
        }

        let defined: Vec<Value> = page.iter().flatten().cloned().collect();
        let encoding = match &dictionary {
            Some(dictionary) => {
                let indices: Vec<u64> = defined
                    .iter()
                    .map(|v| dictionary.iter().position(|d| d == v).unwrap() as u64)
                    .collect();
                let max_index = dictionary.len().saturating_sub(1) as u64;
                let bit_width = width_from_max_int(max_index).max(1);
                payload.push(bit_width);
                payload.extend(encode_hybrid(&indices, bit_width));
                Encoding::RLE_DICTIONARY
            }
            None if spec.value_encoding == Encoding::RLE => {
                let bits: Vec<u64> = defined
                    .iter()
                    .map(|v| matches!(v, Value::Boolean(true)) as u64)
                    .collect();
                write_levels(&mut payload, &bits, Encoding::RLE);
                Encoding::RLE
            }
            None => {
                payload.extend(encode_plain(&defined));
                Encoding::PLAIN
            }
        };
        if !encodings.contains(&encoding) {
            encodings.push(encoding);
        }

        let header = DataPageHeader {
            num_values: page.len() as i32,
            encoding,
            definition_level_encoding: spec.def_level_encoding,
            repetition_level_encoding: Encoding::RLE,
        };
        uncompressed_size += write_page(
            out,
            spec.codec,
            PageType::DATA_PAGE,
            &payload,
            Some(header),
            None,
        );
    }

    ColumnMetaData {
        type_: spec.physical_type,
        encodings,
        path_in_schema: vec![spec.name.clone()],
        codec: spec.codec,
        num_values: values.len() as i64,
        total_uncompressed_size: uncompressed_size,
        total_compressed_size: (out.len() - start) as i64,
        data_page_offset,
        index_page_offset: None,
        dictionary_page_offset,
    }
}

/// Builds a Parquet file, or a dataset of a footer file and data files, in
/// memory.
#[derive(Debug, Default)]
pub(crate) struct TestFileBuilder {
    columns: Vec<ColumnSpec>,
    row_groups: Vec<Vec<Vec<Option<Value>>>>,
}

impl TestFileBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn column(mut self, spec: ColumnSpec) -> Self {
        self.columns.push(spec);
        self
    }

    /// Adds a row group holding `columns`, one vector of values per column
    /// in the order the columns were added.
    pub(crate) fn row_group(mut self, columns: Vec<Vec<Option<Value>>>) -> Self {
        assert_eq!(columns.len(), self.columns.len(), "one vector per column");
        self.row_groups.push(columns);
        self
    }

    /// Writes a single file. Columns must not have a file path.
    pub(crate) fn build(self) -> Vec<u8> {
        let (file, data_files) = self.build_dataset();
        assert!(data_files.is_empty(), "columns with a file path need build_dataset");
        file
    }

    /// Writes the footer file and the data files named by the file paths of
    /// the columns. Chunks of columns without a file path stay in the footer
    /// file.
    pub(crate) fn build_dataset(self) -> (Vec<u8>, Vec<(String, Vec<u8>)>) {
        let mut file = PARQUET_MAGIC.to_vec();
        let mut data_files: Vec<(String, Vec<u8>)> = vec![];
        let mut row_groups = vec![];
        let mut num_rows = 0;

        for columns in &self.row_groups {
            let rows = columns.first().map(|c| c.len()).unwrap_or(0) as i64;
            let mut chunks = vec![];
            for (spec, values) in self.columns.iter().zip(columns) {
                let out = match &spec.file_path {
                    None => &mut file,
                    Some(path) => {
                        let idx = match data_files.iter().position(|(p, _)| p == path) {
                            Some(idx) => idx,
                            None => {
                                data_files.push((path.clone(), PARQUET_MAGIC.to_vec()));
                                data_files.len() - 1
                            }
                        };
                        &mut data_files[idx].1
                    }
                };
                let meta_data = write_column_chunk(spec, values, out);
                chunks.push(ColumnChunk {
                    file_path: spec.file_path.clone(),
                    file_offset: out.len() as i64,
                    meta_data: Some(meta_data),
                });
            }
            row_groups.push(RowGroup {
                total_byte_size: chunks
                    .iter()
                    .filter_map(|c| c.meta_data.as_ref())
                    .map(|m| m.total_uncompressed_size)
                    .sum(),
                columns: chunks,
                num_rows: rows,
            });
            num_rows += rows;
        }

        let mut schema = vec![root_element(self.columns.len())];
        schema.extend(self.columns.iter().map(|c| c.schema_element()));
        let metadata = FileMetaData {
            version: 1,
            schema,
            num_rows,
            row_groups,
            key_value_metadata: None,
            created_by: Some("parquet-cursor test writer".to_string()),
        };

        let mut footer = vec![];
        write_thrift(&metadata, &mut footer);
        file.extend_from_slice(&footer);
        file.extend_from_slice(&(footer.len() as u32).to_le_bytes());
        file.extend_from_slice(&PARQUET_MAGIC);
        (file, data_files)
    }
}
