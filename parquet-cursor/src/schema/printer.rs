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

//! Parquet schema printer.
//! Provides methods to print Parquet file schema and list file metadata.
//!
//! # Example
//!
//! ```rust,no_run
//! use parquet_cursor::{
//!     file::reader::ParquetReader,
//!     schema::printer::{print_parquet_metadata, print_schema},
//! };
//!
//! let reader = ParquetReader::open("test.parquet").unwrap();
//! print_parquet_metadata(&mut std::io::stdout(), reader.metadata());
//! print_schema(&mut std::io::stdout(), reader.schema());
//! ```

use std::io;

use crate::file::metadata::{ColumnChunkMetaData, ParquetMetaData, RowGroupMetaData};
use crate::schema::types::{ColumnDescriptor, SchemaDescriptor};

/// Prints Parquet metadata [`ParquetMetaData`] information.
#[allow(unused_must_use)]
pub fn print_parquet_metadata(out: &mut dyn io::Write, metadata: &ParquetMetaData) {
    writeln!(out, "version: {}", metadata.version());
    writeln!(out, "num of rows: {}", metadata.num_rows());
    if let Some(created_by) = metadata.created_by() {
        writeln!(out, "created by: {created_by}");
    }
    if !metadata.key_value_metadata().is_empty() {
        writeln!(out, "metadata:");
        for (key, value) in metadata.key_value_metadata() {
            writeln!(out, "  {}: {}", key, value.as_deref().unwrap_or(""));
        }
    }
    print_schema(out, metadata.schema_descr());
    writeln!(out);
    writeln!(out, "num of row groups: {}", metadata.num_row_groups());
    writeln!(out, "row groups:");
    writeln!(out);
    for (i, rg) in metadata.row_groups().iter().enumerate() {
        writeln!(out, "row group {i}:");
        print_dashes(out, 80);
        print_row_group_metadata(out, rg);
    }
}

/// Prints the leaf columns of a [`SchemaDescriptor`], one per line.
#[allow(unused_must_use)]
pub fn print_schema(out: &mut dyn io::Write, schema: &SchemaDescriptor) {
    writeln!(out, "message {} {{", schema.name());
    for column in schema.columns() {
        writeln!(out, "  {}", format_column(column));
    }
    writeln!(out, "}}");
}

// e.g. `OPTIONAL BYTE_ARRAY a.b (UTF8) [def 2, rep 1];`
fn format_column(column: &ColumnDescriptor) -> String {
    let mut s = format!("{} {}", column.repetition(), column.physical_type());
    if column.type_length() >= 0 {
        s.push_str(&format!(" ({})", column.type_length()));
    }
    s.push_str(&format!(" {}", column.path().string()));
    if let Some(converted_type) = column.converted_type() {
        s.push_str(&format!(" ({converted_type})"));
    }
    s.push_str(&format!(
        " [def {}, rep {}];",
        column.max_def_level(),
        column.max_rep_level()
    ));
    s
}

#[allow(unused_must_use)]
fn print_row_group_metadata(out: &mut dyn io::Write, rg_metadata: &RowGroupMetaData) {
    writeln!(out, "total byte size: {}", rg_metadata.total_byte_size());
    writeln!(out, "num of rows: {}", rg_metadata.num_rows());
    writeln!(out);
    writeln!(out, "num of columns: {}", rg_metadata.num_columns());
    writeln!(out, "columns: ");
    for (i, cc) in rg_metadata.columns().iter().enumerate() {
        writeln!(out);
        writeln!(out, "column {i}:");
        print_dashes(out, 80);
        print_column_chunk_metadata(out, cc);
    }
}

#[allow(unused_must_use)]
fn print_column_chunk_metadata(out: &mut dyn io::Write, cc_metadata: &ColumnChunkMetaData) {
    writeln!(out, "column type: {}", cc_metadata.column_type());
    writeln!(out, "column path: {}", cc_metadata.column_name());
    let encoding_strs: Vec<_> = cc_metadata
        .encodings()
        .iter()
        .map(|e| format!("{e}"))
        .collect();
    writeln!(out, "encodings: {}", encoding_strs.join(" "));
    let file_path_str = cc_metadata.file_path().unwrap_or("N/A");
    writeln!(out, "file path: {file_path_str}");
    writeln!(out, "file offset: {}", cc_metadata.file_offset());
    writeln!(out, "num of values: {}", cc_metadata.num_values());
    writeln!(out, "compression: {}", cc_metadata.compression());
    writeln!(
        out,
        "total compressed size (in bytes): {}",
        cc_metadata.compressed_size()
    );
    writeln!(
        out,
        "total uncompressed size (in bytes): {}",
        cc_metadata.uncompressed_size()
    );
    writeln!(out, "data page offset: {}", cc_metadata.data_page_offset());
    let index_page_offset_str = match cc_metadata.index_page_offset() {
        None => "N/A".to_owned(),
        Some(ipo) => ipo.to_string(),
    };
    writeln!(out, "index page offset: {index_page_offset_str}");
    let dict_page_offset_str = match cc_metadata.dictionary_page_offset() {
        None => "N/A".to_owned(),
        Some(dpo) => dpo.to_string(),
    };
    writeln!(out, "dictionary page offset: {dict_page_offset_str}");
    writeln!(out);
}

#[allow(unused_must_use)]
fn print_dashes(out: &mut dyn io::Write, num: i32) {
    for _ in 0..num {
        write!(out, "-");
    }
    writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crate::basic::ConvertedType;
    use crate::file::footer::parse_metadata;
    use crate::util::test_common::file_util::{
        byte_arrays, int32s, ColumnSpec, TestFileBuilder,
    };

    #[test]
    fn test_print_schema() {
        let data = TestFileBuilder::new()
            .column(ColumnSpec::required_int32("a"))
            .column(ColumnSpec::optional_byte_array("s").with_converted_type(ConvertedType::UTF8))
            .row_group(vec![int32s(&[1]), byte_arrays(&["x"])])
            .build();
        let metadata = parse_metadata(&mut Cursor::new(data)).unwrap();

        let mut out = vec![];
        print_schema(&mut out, metadata.schema_descr());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "message schema {\n  REQUIRED INT32 a [def 0, rep 0];\n  OPTIONAL BYTE_ARRAY s (UTF8) [def 1, rep 0];\n}\n"
        );
    }

    #[test]
    fn test_print_parquet_metadata() {
        let data = TestFileBuilder::new()
            .column(ColumnSpec::required_int32("a").with_dictionary())
            .row_group(vec![int32s(&[1, 1, 2])])
            .build();
        let metadata = parse_metadata(&mut Cursor::new(data)).unwrap();

        let mut out = vec![];
        print_parquet_metadata(&mut out, &metadata);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("version: 1\nnum of rows: 3\n"), "{out}");
        assert!(out.contains("num of row groups: 1\n"), "{out}");
        assert!(out.contains("column path: a\n"), "{out}");
        assert!(out.contains("encodings: RLE PLAIN RLE_DICTIONARY\n"), "{out}");
        assert!(out.contains("dictionary page offset: 4\n"), "{out}");
    }
}
