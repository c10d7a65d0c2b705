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

//! Structs of the `parquet.thrift` definition that this crate decodes.
//!
//! Only the fields needed for reading column chunks are kept, every other
//! field is skipped by the protocol. These are translated into the domain
//! types of [`crate::file::metadata`] and [`crate::column::page`].

use std::io::Read;
#[cfg(test)]
use std::io::Write;

use crate::basic::{Compression, ConvertedType, Encoding, PageType, Repetition, Type};
use crate::errors::{ParquetError, Result};
use crate::parquet_thrift::{FieldType, ReadThrift, ThriftCompactInputProtocol};
#[cfg(test)]
use crate::parquet_thrift::{
    write_struct_field, ElementType, ThriftCompactOutputProtocol, WriteThrift, WriteThriftField,
};

macro_rules! required {
    ($field:ident, $struct:literal) => {
        $field.ok_or_else(|| {
            general_err!(
                "Required field {} is missing from {}",
                stringify!($field),
                $struct
            )
        })?
    };
}

#[cfg(test)]
macro_rules! write_optional {
    ($writer:expr, $value:expr, $id:literal, $last:ident) => {
        if let Some(v) = &$value {
            $last = v.write_thrift_field($writer, $id, $last)?;
        }
    };
}

// ----------------------------------------------------------------------
// Schema

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SchemaElement {
    pub(crate) type_: Option<Type>,
    pub(crate) type_length: Option<i32>,
    pub(crate) repetition_type: Option<Repetition>,
    pub(crate) name: String,
    pub(crate) num_children: Option<i32>,
    pub(crate) converted_type: Option<ConvertedType>,
    pub(crate) scale: Option<i32>,
    pub(crate) precision: Option<i32>,
    pub(crate) field_id: Option<i32>,
}

impl ReadThrift for SchemaElement {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut res = SchemaElement::default();
        let mut name: Option<String> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => res.type_ = Some(Type::read_thrift(prot)?),
                2 => res.type_length = Some(i32::read_thrift(prot)?),
                3 => res.repetition_type = Some(Repetition::read_thrift(prot)?),
                4 => name = Some(String::read_thrift(prot)?),
                5 => res.num_children = Some(i32::read_thrift(prot)?),
                6 => res.converted_type = Some(ConvertedType::read_thrift(prot)?),
                7 => res.scale = Some(i32::read_thrift(prot)?),
                8 => res.precision = Some(i32::read_thrift(prot)?),
                9 => res.field_id = Some(i32::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        res.name = required!(name, "SchemaElement");
        Ok(res)
    }
}

#[cfg(test)]
impl WriteThrift for SchemaElement {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = 0;
        write_optional!(writer, self.type_, 1, last);
        write_optional!(writer, self.type_length, 2, last);
        write_optional!(writer, self.repetition_type, 3, last);
        last = self.name.write_thrift_field(writer, 4, last)?;
        write_optional!(writer, self.num_children, 5, last);
        write_optional!(writer, self.converted_type, 6, last);
        write_optional!(writer, self.scale, 7, last);
        write_optional!(writer, self.precision, 8, last);
        write_optional!(writer, self.field_id, 9, last);
        let _ = last;
        writer.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// File metadata

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct KeyValue {
    pub(crate) key: String,
    pub(crate) value: Option<String>,
}

impl ReadThrift for KeyValue {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut key: Option<String> = None;
        let mut value: Option<String> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => key = Some(String::read_thrift(prot)?),
                2 => value = Some(String::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            key: required!(key, "KeyValue"),
            value,
        })
    }
}

#[cfg(test)]
impl WriteThrift for KeyValue {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.key.write_thrift_field(writer, 1, 0)?;
        write_optional!(writer, self.value, 2, last);
        let _ = last;
        writer.write_struct_end()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FileMetaData {
    pub(crate) version: i32,
    pub(crate) schema: Vec<SchemaElement>,
    pub(crate) num_rows: i64,
    pub(crate) row_groups: Vec<RowGroup>,
    pub(crate) key_value_metadata: Option<Vec<KeyValue>>,
    pub(crate) created_by: Option<String>,
}

impl ReadThrift for FileMetaData {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut version: Option<i32> = None;
        let mut schema: Option<Vec<SchemaElement>> = None;
        let mut num_rows: Option<i64> = None;
        let mut row_groups: Option<Vec<RowGroup>> = None;
        let mut key_value_metadata: Option<Vec<KeyValue>> = None;
        let mut created_by: Option<String> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => version = Some(i32::read_thrift(prot)?),
                2 => schema = Some(Vec::read_thrift(prot)?),
                3 => num_rows = Some(i64::read_thrift(prot)?),
                4 => row_groups = Some(Vec::read_thrift(prot)?),
                5 => key_value_metadata = Some(Vec::read_thrift(prot)?),
                6 => created_by = Some(String::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            version: required!(version, "FileMetaData"),
            schema: required!(schema, "FileMetaData"),
            num_rows: required!(num_rows, "FileMetaData"),
            row_groups: required!(row_groups, "FileMetaData"),
            key_value_metadata,
            created_by,
        })
    }
}

#[cfg(test)]
impl WriteThrift for FileMetaData {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.version.write_thrift_field(writer, 1, 0)?;
        last = self.schema.write_thrift_field(writer, 2, last)?;
        last = self.num_rows.write_thrift_field(writer, 3, last)?;
        last = self.row_groups.write_thrift_field(writer, 4, last)?;
        write_optional!(writer, self.key_value_metadata, 5, last);
        write_optional!(writer, self.created_by, 6, last);
        let _ = last;
        writer.write_struct_end()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RowGroup {
    pub(crate) columns: Vec<ColumnChunk>,
    pub(crate) total_byte_size: i64,
    pub(crate) num_rows: i64,
}

impl ReadThrift for RowGroup {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut columns: Option<Vec<ColumnChunk>> = None;
        let mut total_byte_size: Option<i64> = None;
        let mut num_rows: Option<i64> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => columns = Some(Vec::read_thrift(prot)?),
                2 => total_byte_size = Some(i64::read_thrift(prot)?),
                3 => num_rows = Some(i64::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            columns: required!(columns, "RowGroup"),
            total_byte_size: required!(total_byte_size, "RowGroup"),
            num_rows: required!(num_rows, "RowGroup"),
        })
    }
}

#[cfg(test)]
impl WriteThrift for RowGroup {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.columns.write_thrift_field(writer, 1, 0)?;
        last = self.total_byte_size.write_thrift_field(writer, 2, last)?;
        self.num_rows.write_thrift_field(writer, 3, last)?;
        writer.write_struct_end()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ColumnChunk {
    pub(crate) file_path: Option<String>,
    pub(crate) file_offset: i64,
    pub(crate) meta_data: Option<ColumnMetaData>,
}

impl ReadThrift for ColumnChunk {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut file_path: Option<String> = None;
        let mut file_offset: Option<i64> = None;
        let mut meta_data: Option<ColumnMetaData> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => file_path = Some(String::read_thrift(prot)?),
                2 => file_offset = Some(i64::read_thrift(prot)?),
                3 => meta_data = Some(ColumnMetaData::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            file_path,
            file_offset: required!(file_offset, "ColumnChunk"),
            meta_data,
        })
    }
}

#[cfg(test)]
impl WriteThrift for ColumnChunk {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = 0;
        write_optional!(writer, self.file_path, 1, last);
        last = self.file_offset.write_thrift_field(writer, 2, last)?;
        if let Some(meta_data) = &self.meta_data {
            write_struct_field(meta_data, writer, 3, last)?;
        }
        writer.write_struct_end()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColumnMetaData {
    pub(crate) type_: Type,
    pub(crate) encodings: Vec<Encoding>,
    pub(crate) path_in_schema: Vec<String>,
    pub(crate) codec: Compression,
    pub(crate) num_values: i64,
    pub(crate) total_uncompressed_size: i64,
    pub(crate) total_compressed_size: i64,
    pub(crate) data_page_offset: i64,
    pub(crate) index_page_offset: Option<i64>,
    pub(crate) dictionary_page_offset: Option<i64>,
}

impl ReadThrift for ColumnMetaData {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut type_: Option<Type> = None;
        let mut encodings: Option<Vec<Encoding>> = None;
        let mut path_in_schema: Option<Vec<String>> = None;
        let mut codec: Option<Compression> = None;
        let mut num_values: Option<i64> = None;
        let mut total_uncompressed_size: Option<i64> = None;
        let mut total_compressed_size: Option<i64> = None;
        let mut data_page_offset: Option<i64> = None;
        let mut index_page_offset: Option<i64> = None;
        let mut dictionary_page_offset: Option<i64> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => type_ = Some(Type::read_thrift(prot)?),
                2 => encodings = Some(Vec::read_thrift(prot)?),
                3 => path_in_schema = Some(Vec::read_thrift(prot)?),
                4 => codec = Some(Compression::read_thrift(prot)?),
                5 => num_values = Some(i64::read_thrift(prot)?),
                6 => total_uncompressed_size = Some(i64::read_thrift(prot)?),
                7 => total_compressed_size = Some(i64::read_thrift(prot)?),
                9 => data_page_offset = Some(i64::read_thrift(prot)?),
                10 => index_page_offset = Some(i64::read_thrift(prot)?),
                11 => dictionary_page_offset = Some(i64::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            type_: required!(type_, "ColumnMetaData"),
            encodings: required!(encodings, "ColumnMetaData"),
            path_in_schema: required!(path_in_schema, "ColumnMetaData"),
            codec: required!(codec, "ColumnMetaData"),
            num_values: required!(num_values, "ColumnMetaData"),
            total_uncompressed_size: required!(total_uncompressed_size, "ColumnMetaData"),
            total_compressed_size: required!(total_compressed_size, "ColumnMetaData"),
            data_page_offset: required!(data_page_offset, "ColumnMetaData"),
            index_page_offset,
            dictionary_page_offset,
        })
    }
}

#[cfg(test)]
impl WriteThrift for ColumnMetaData {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.type_.write_thrift_field(writer, 1, 0)?;
        last = self.encodings.write_thrift_field(writer, 2, last)?;
        last = self.path_in_schema.write_thrift_field(writer, 3, last)?;
        last = self.codec.write_thrift_field(writer, 4, last)?;
        last = self.num_values.write_thrift_field(writer, 5, last)?;
        last = self.total_uncompressed_size.write_thrift_field(writer, 6, last)?;
        last = self.total_compressed_size.write_thrift_field(writer, 7, last)?;
        last = self.data_page_offset.write_thrift_field(writer, 9, last)?;
        write_optional!(writer, self.index_page_offset, 10, last);
        write_optional!(writer, self.dictionary_page_offset, 11, last);
        let _ = last;
        writer.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// Page headers

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DataPageHeader {
    pub(crate) num_values: i32,
    pub(crate) encoding: Encoding,
    pub(crate) definition_level_encoding: Encoding,
    pub(crate) repetition_level_encoding: Encoding,
}

impl ReadThrift for DataPageHeader {
    // statistics (field 5) are not needed for decoding and are skipped
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_level_encoding: Option<Encoding> = None;
        let mut repetition_level_encoding: Option<Encoding> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(i32::read_thrift(prot)?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                3 => definition_level_encoding = Some(Encoding::read_thrift(prot)?),
                4 => repetition_level_encoding = Some(Encoding::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            num_values: required!(num_values, "DataPageHeader"),
            encoding: required!(encoding, "DataPageHeader"),
            definition_level_encoding: required!(definition_level_encoding, "DataPageHeader"),
            repetition_level_encoding: required!(repetition_level_encoding, "DataPageHeader"),
        })
    }
}

#[cfg(test)]
impl WriteThrift for DataPageHeader {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.num_values.write_thrift_field(writer, 1, 0)?;
        last = self.encoding.write_thrift_field(writer, 2, last)?;
        last = self.definition_level_encoding.write_thrift_field(writer, 3, last)?;
        self.repetition_level_encoding.write_thrift_field(writer, 4, last)?;
        writer.write_struct_end()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DictionaryPageHeader {
    pub(crate) num_values: i32,
    pub(crate) encoding: Encoding,
    pub(crate) is_sorted: Option<bool>,
}

impl ReadThrift for DictionaryPageHeader {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut is_sorted: Option<bool> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => num_values = Some(i32::read_thrift(prot)?),
                2 => encoding = Some(Encoding::read_thrift(prot)?),
                3 => is_sorted = Some(bool::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            num_values: required!(num_values, "DictionaryPageHeader"),
            encoding: required!(encoding, "DictionaryPageHeader"),
            is_sorted,
        })
    }
}

#[cfg(test)]
impl WriteThrift for DictionaryPageHeader {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.num_values.write_thrift_field(writer, 1, 0)?;
        last = self.encoding.write_thrift_field(writer, 2, last)?;
        write_optional!(writer, self.is_sorted, 3, last);
        let _ = last;
        writer.write_struct_end()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PageHeader {
    pub(crate) type_: PageType,
    pub(crate) uncompressed_page_size: i32,
    pub(crate) compressed_page_size: i32,
    pub(crate) crc: Option<i32>,
    pub(crate) data_page_header: Option<DataPageHeader>,
    pub(crate) dictionary_page_header: Option<DictionaryPageHeader>,
}

impl ReadThrift for PageHeader {
    // index (6) and data page v2 (8) headers are skipped, such pages are
    // recognised by their page type alone
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let mut type_: Option<PageType> = None;
        let mut uncompressed_page_size: Option<i32> = None;
        let mut compressed_page_size: Option<i32> = None;
        let mut crc: Option<i32> = None;
        let mut data_page_header: Option<DataPageHeader> = None;
        let mut dictionary_page_header: Option<DictionaryPageHeader> = None;
        prot.read_struct_begin()?;
        loop {
            let field_ident = prot.read_field_begin()?;
            if field_ident.field_type == FieldType::Stop {
                break;
            }
            match field_ident.id {
                1 => type_ = Some(PageType::read_thrift(prot)?),
                2 => uncompressed_page_size = Some(i32::read_thrift(prot)?),
                3 => compressed_page_size = Some(i32::read_thrift(prot)?),
                4 => crc = Some(i32::read_thrift(prot)?),
                5 => data_page_header = Some(DataPageHeader::read_thrift(prot)?),
                7 => dictionary_page_header = Some(DictionaryPageHeader::read_thrift(prot)?),
                _ => prot.skip(field_ident.field_type)?,
            }
        }
        prot.read_struct_end()?;
        Ok(Self {
            type_: required!(type_, "PageHeader"),
            uncompressed_page_size: required!(uncompressed_page_size, "PageHeader"),
            compressed_page_size: required!(compressed_page_size, "PageHeader"),
            crc,
            data_page_header,
            dictionary_page_header,
        })
    }
}

#[cfg(test)]
impl WriteThrift for PageHeader {
    const ELEMENT_TYPE: ElementType = ElementType::Struct;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        let mut last = self.type_.write_thrift_field(writer, 1, 0)?;
        last = self.uncompressed_page_size.write_thrift_field(writer, 2, last)?;
        last = self.compressed_page_size.write_thrift_field(writer, 3, last)?;
        write_optional!(writer, self.crc, 4, last);
        if let Some(header) = &self.data_page_header {
            last = write_struct_field(header, writer, 5, last)?;
        }
        if let Some(header) = &self.dictionary_page_header {
            last = write_struct_field(header, writer, 7, last)?;
        }
        let _ = last;
        writer.write_struct_end()
    }
}
