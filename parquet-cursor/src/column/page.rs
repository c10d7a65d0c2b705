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

//! Contains Parquet Page definitions and page reader interface.
//!
//! A column chunk is a sequence of pages, each a thrift encoded
//! [`PageHeader`] followed by `compressed_page_size` bytes of payload.
//! [`read_page_header`] and [`read_page`] take a page apart,
//! [`PageDecoder`] turns the payload of dictionary and data pages into
//! values.

use std::io::{Cursor, Read};

use log::trace;

use crate::basic::{Encoding, PageType, Type};
use crate::compression::Codec;
use crate::data_type::Value;
use crate::encodings::decoding::{filter_values, num_defined, spread_values, PlainDecoder};
use crate::encodings::rle::RleDecoder;
use crate::errors::{ParquetError, Result};
use crate::file::metadata::ColumnChunkMetaData;
use crate::file::properties::ReaderProperties;
use crate::format;
use crate::parquet_thrift::{ReadThrift, ThriftCompactInputProtocol};
use crate::schema::types::ColumnDescriptor;
use crate::util::bit_util::{self, width_from_max_int};

/// Header of a data page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPageHeader {
    /// Number of values, nulls included. For repeated columns this is the
    /// number of level slots, not the number of rows.
    pub num_values: usize,
    /// Encoding of the values.
    pub encoding: Encoding,
    /// Encoding of the definition levels.
    pub def_level_encoding: Encoding,
    /// Encoding of the repetition levels.
    pub rep_level_encoding: Encoding,
}

/// Header of a dictionary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryPageHeader {
    /// Number of entries in the dictionary.
    pub num_values: usize,
    /// Encoding of the entries.
    pub encoding: Encoding,
    /// Whether the entries are sorted.
    pub is_sorted: bool,
}

/// Parsed page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Type of the page.
    pub page_type: PageType,
    /// Size of the payload as stored in the file.
    pub compressed_page_size: usize,
    /// Size of the payload after decompression.
    pub uncompressed_page_size: usize,
    /// Set for [`PageType::DATA_PAGE`] pages.
    pub data_page_header: Option<DataPageHeader>,
    /// Set for [`PageType::DICTIONARY_PAGE`] pages.
    pub dictionary_page_header: Option<DictionaryPageHeader>,
}

impl PageHeader {
    /// Number of values in the page, 0 for pages without values.
    pub fn num_values(&self) -> usize {
        match (&self.data_page_header, &self.dictionary_page_header) {
            (Some(header), _) => header.num_values,
            (None, Some(header)) => header.num_values,
            (None, None) => 0,
        }
    }
}

impl TryFrom<format::PageHeader> for PageHeader {
    type Error = ParquetError;

    fn try_from(header: format::PageHeader) -> Result<Self> {
        let size = |size: i32| {
            usize::try_from(size).map_err(|_| general_err!("Invalid page size {}", size))
        };
        let num_values = |num_values: i32| {
            usize::try_from(num_values)
                .map_err(|_| general_err!("Invalid number of values {}", num_values))
        };

        let data_page_header = match header.data_page_header {
            Some(h) => Some(DataPageHeader {
                num_values: num_values(h.num_values)?,
                encoding: h.encoding,
                def_level_encoding: h.definition_level_encoding,
                rep_level_encoding: h.repetition_level_encoding,
            }),
            None if header.type_ == PageType::DATA_PAGE => {
                return Err(general_err!("Missing V1 data page header"))
            }
            None => None,
        };
        let dictionary_page_header = match header.dictionary_page_header {
            Some(h) => Some(DictionaryPageHeader {
                num_values: num_values(h.num_values)?,
                encoding: h.encoding,
                is_sorted: h.is_sorted.unwrap_or(false),
            }),
            None if header.type_ == PageType::DICTIONARY_PAGE => {
                return Err(general_err!("Missing dictionary page header"))
            }
            None => None,
        };

        Ok(Self {
            page_type: header.type_,
            compressed_page_size: size(header.compressed_page_size)?,
            uncompressed_page_size: size(header.uncompressed_page_size)?,
            data_page_header,
            dictionary_page_header,
        })
    }
}

/// Reads a [`PageHeader`] from `input`, leaving it positioned at the first
/// byte of the page payload.
pub fn read_page_header<R: Read + ?Sized>(input: &mut R) -> Result<PageHeader> {
    let mut prot = ThriftCompactInputProtocol::new(input);
    format::PageHeader::read_thrift(&mut prot)?.try_into()
}

/// Reads the payload of the page described by `header` from `input` and
/// decompresses it with `decompressor`, if any.
pub fn read_page<R: Read + ?Sized>(
    input: &mut R,
    header: &PageHeader,
    decompressor: Option<&mut Box<dyn Codec>>,
    props: &ReaderProperties,
) -> Result<Vec<u8>> {
    let max_page_size = props.max_page_size();
    if header.compressed_page_size > max_page_size
        || header.uncompressed_page_size > max_page_size
    {
        return Err(general_err!(
            "Page of {} bytes ({} uncompressed) exceeds the maximum page size {}",
            header.compressed_page_size,
            header.uncompressed_page_size,
            max_page_size
        ));
    }

    let buffer = bit_util::read_bytes(input, header.compressed_page_size)?;
    let decompressor = match decompressor {
        Some(decompressor) => decompressor,
        None => return Ok(buffer),
    };

    let uncompressed_page_size = header.uncompressed_page_size;
    let mut decompressed = Vec::with_capacity(uncompressed_page_size);
    // decompressed size of zero corresponds to a page with no non-null values
    if uncompressed_page_size > 0 {
        decompressor.decompress(&buffer, &mut decompressed, Some(uncompressed_page_size))?;
    }
    if decompressed.len() != uncompressed_page_size {
        return Err(general_err!(
            "Actual decompressed size doesn't match the expected one ({} vs {})",
            decompressed.len(),
            uncompressed_page_size
        ));
    }
    Ok(decompressed)
}

/// Decodes the pages of one column chunk.
///
/// The decoder holds the dictionary of the chunk once its dictionary page
/// was decoded, so a fresh decoder is needed per column chunk.
#[derive(Debug)]
pub struct PageDecoder {
    physical_type: Type,
    type_length: i32,
    max_def_level: i16,
    max_rep_level: i16,
    dictionary: Option<Vec<Value>>,
}

impl PageDecoder {
    /// Creates a decoder for pages of the column described by `descr`.
    pub fn new(descr: &ColumnDescriptor) -> Self {
        Self {
            physical_type: descr.physical_type(),
            type_length: descr.type_length(),
            max_def_level: descr.max_def_level(),
            max_rep_level: descr.max_rep_level(),
            dictionary: None,
        }
    }

    /// Creates a decoder for the pages of `chunk`, taking the physical type
    /// and value width from the chunk metadata and the levels from `descr`.
    pub fn for_chunk(chunk: &ColumnChunkMetaData, descr: &ColumnDescriptor) -> Self {
        Self {
            physical_type: chunk.column_type(),
            type_length: chunk.width(),
            ..Self::new(descr)
        }
    }

    /// The dictionary of the column chunk, if decoded.
    pub fn dictionary(&self) -> Option<&[Value]> {
        self.dictionary.as_deref()
    }

    /// Decodes a dictionary page, replacing any previous dictionary.
    pub fn decode_dictionary_page(
        &mut self,
        header: &DictionaryPageHeader,
        buf: &[u8],
    ) -> Result<()> {
        match header.encoding {
            // older writers flag dictionary pages as PLAIN_DICTIONARY
            Encoding::PLAIN | Encoding::PLAIN_DICTIONARY => {}
            other => return Err(ParquetError::UnsupportedEncoding(other)),
        }
        let mut reader = buf;
        let mut decoder = PlainDecoder::new(self.physical_type, self.type_length)?;
        let values = decoder.read_batch(&mut reader, header.num_values)?;
        trace!("decoded dictionary of {} values", values.len());
        self.dictionary = Some(values);
        Ok(())
    }

    /// Decodes a data page into one element per level slot, `None` marking
    /// a null.
    ///
    /// Repetition levels are read past but not applied, so values of repeated
    /// columns come back flattened.
    pub fn decode_data_page(
        &self,
        header: &DataPageHeader,
        buf: &[u8],
    ) -> Result<Vec<Option<Value>>> {
        let num_values = header.num_values;
        let mut reader = Cursor::new(buf);

        if self.max_rep_level > 0 {
            read_levels(
                &mut reader,
                header.rep_level_encoding,
                self.max_rep_level,
                num_values,
            )?;
        }
        let def_levels = if self.max_def_level > 0 {
            Some(read_levels(
                &mut reader,
                header.def_level_encoding,
                self.max_def_level,
                num_values,
            )?)
        } else {
            None
        };
        let max_def_level = self.max_def_level as u64;
        let num_present = match &def_levels {
            Some(levels) => num_defined(levels, max_def_level),
            None => num_values,
        };

        match header.encoding {
            Encoding::PLAIN => {
                let mut decoder = PlainDecoder::new(self.physical_type, self.type_length)?;
                let values = decoder.read_batch(&mut reader, num_present)?;
                resolve(values, def_levels.as_deref(), max_def_level)
            }
            encoding if encoding.is_dictionary() => {
                let dictionary = self
                    .dictionary
                    .as_deref()
                    .ok_or_else(|| general_err!("Missing dictionary page header"))?;
                let bit_width = bit_util::read_u8(&mut reader)?;
                let remaining = buf.len() - reader.position() as usize;
                let indices = RleDecoder::new(bit_width)?.read_hybrid_bounded(
                    &mut reader,
                    Some(remaining),
                    num_present,
                )?;
                if indices.len() < num_present {
                    return Err(eof_err!(
                        "Expected {} dictionary indices, found {}",
                        num_present,
                        indices.len()
                    ));
                }
                match &def_levels {
                    Some(levels) => filter_values(dictionary, &indices, levels, max_def_level),
                    None => indices
                        .iter()
                        .map(|index| {
                            let index = *index as usize;
                            dictionary
                                .get(index)
                                .cloned()
                                .map(Some)
                                .ok_or(ParquetError::IndexOutOfBound(index, dictionary.len()))
                        })
                        .collect(),
                }
            }
            Encoding::RLE if self.physical_type == Type::BOOLEAN => {
                let values = RleDecoder::new(1)?.read_hybrid_bounded(&mut reader, None, num_present)?;
                if values.len() < num_present {
                    return Err(eof_err!(
                        "Expected {} boolean values, found {}",
                        num_present,
                        values.len()
                    ));
                }
                let values = values.into_iter().map(|v| Value::Boolean(v != 0)).collect();
                resolve(values, def_levels.as_deref(), max_def_level)
            }
            other => Err(ParquetError::UnsupportedEncoding(other)),
        }
    }
}

fn resolve(
    values: Vec<Value>,
    def_levels: Option<&[u64]>,
    max_def_level: u64,
) -> Result<Vec<Option<Value>>> {
    match def_levels {
        Some(levels) => spread_values(values, levels, max_def_level),
        None => Ok(values.into_iter().map(Some).collect()),
    }
}

// Reads `num_values` levels of at most `max_level` in `encoding`.
fn read_levels(
    reader: &mut Cursor<&[u8]>,
    encoding: Encoding,
    max_level: i16,
    num_values: usize,
) -> Result<Vec<u64>> {
    let bit_width = width_from_max_int(max_level as u64);
    let decoder = RleDecoder::new(bit_width)?;
    let levels = match encoding {
        Encoding::RLE => decoder.read_hybrid_bounded(reader, None, num_values)?,
        Encoding::BIT_PACKED => {
            let byte_count = bit_util::ceil(num_values * bit_width as usize, 8);
            decoder.read_bitpacked_deprecated(reader, byte_count, num_values)?
        }
        other => return Err(ParquetError::UnsupportedEncoding(other)),
    };
    if levels.len() < num_values {
        return Err(eof_err!(
            "Expected {} levels, found {}",
            num_values,
            levels.len()
        ));
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use crate::basic::{Compression, Repetition};
    use crate::compression::create_codec;
    use crate::parquet_thrift::{ThriftCompactOutputProtocol, WriteThrift};
    use crate::util::test_common::file_util::{
        column_descr, encode_bitpacked_deprecated, encode_hybrid, encode_plain, ColumnSpec,
    };

    fn data_header(num_values: usize, encoding: Encoding) -> DataPageHeader {
        DataPageHeader {
            num_values,
            encoding,
            def_level_encoding: Encoding::RLE,
            rep_level_encoding: Encoding::RLE,
        }
    }

    // hybrid encoded levels with their 4 byte length prefix
    fn rle_levels(levels: &[u64], bit_width: u8) -> Vec<u8> {
        let data = encode_hybrid(levels, bit_width);
        let mut buf = (data.len() as u32).to_le_bytes().to_vec();
        buf.extend(data);
        buf
    }

    #[test]
    fn test_read_page_header() {
        let header = format::PageHeader {
            type_: PageType::DATA_PAGE,
            uncompressed_page_size: 10,
            compressed_page_size: 8,
            crc: None,
            data_page_header: Some(format::DataPageHeader {
                num_values: 3,
                encoding: Encoding::RLE_DICTIONARY,
                definition_level_encoding: Encoding::RLE,
                repetition_level_encoding: Encoding::BIT_PACKED,
            }),
            dictionary_page_header: None,
        };
        let mut writer = ThriftCompactOutputProtocol::new(vec![]);
        header.write_thrift(&mut writer).unwrap();
        let mut buf = writer.into_inner();
        let header_len = buf.len();
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let mut reader = Cursor::new(buf);
        let header = read_page_header(&mut reader).unwrap();
        assert_eq!(reader.position() as usize, header_len);
        assert_eq!(header.page_type, PageType::DATA_PAGE);
        assert_eq!(header.compressed_page_size, 8);
        assert_eq!(header.uncompressed_page_size, 10);
        assert_eq!(header.num_values(), 3);
        assert_eq!(
            header.data_page_header,
            Some(DataPageHeader {
                num_values: 3,
                encoding: Encoding::RLE_DICTIONARY,
                def_level_encoding: Encoding::RLE,
                rep_level_encoding: Encoding::BIT_PACKED,
            })
        );
    }

    #[test]
    fn test_page_header_missing_data_page_header() {
        let header = format::PageHeader {
            type_: PageType::DATA_PAGE,
            uncompressed_page_size: 0,
            compressed_page_size: 0,
            crc: None,
            data_page_header: None,
            dictionary_page_header: None,
        };
        let err = PageHeader::try_from(header).unwrap_err();
        assert_eq!(err.to_string(), "Parquet error: Missing V1 data page header");
    }

    #[test]
    fn test_page_header_negative_size() {
        let header = format::PageHeader {
            type_: PageType::INDEX_PAGE,
            uncompressed_page_size: 0,
            compressed_page_size: -4,
            crc: None,
            data_page_header: None,
            dictionary_page_header: None,
        };
        let err = PageHeader::try_from(header).unwrap_err();
        assert_eq!(err.to_string(), "Parquet error: Invalid page size -4");
    }

    fn page_header(compressed: usize, uncompressed: usize) -> PageHeader {
        PageHeader {
            page_type: PageType::DATA_PAGE,
            compressed_page_size: compressed,
            uncompressed_page_size: uncompressed,
            data_page_header: Some(data_header(1, Encoding::PLAIN)),
            dictionary_page_header: None,
        }
    }

    #[test]
    fn test_read_page_uncompressed() {
        let props = ReaderProperties::default();
        let mut reader: &[u8] = &[1, 2, 3, 4, 5];
        let buf = read_page(&mut reader, &page_header(3, 3), None, &props).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
        assert_eq!(reader, &[4, 5]);

        let mut reader: &[u8] = &[1, 2];
        let err = read_page(&mut reader, &page_header(3, 3), None, &props).unwrap_err();
        assert!(matches!(err, ParquetError::EOF(_)), "{err}");
    }

    #[test]
    fn test_read_page_snappy() {
        let props = ReaderProperties::default();
        let data: Vec<u8> = (0..100).map(|i| (i % 7) as u8).collect();
        let compressed = snap::raw::Encoder::new().compress_vec(&data).unwrap();
        let mut codec = create_codec(Compression::SNAPPY).unwrap();

        let header = page_header(compressed.len(), data.len());
        let mut reader: &[u8] = &compressed;
        let buf = read_page(&mut reader, &header, codec.as_mut(), &props).unwrap();
        assert_eq!(buf, data);

        // header claiming a different uncompressed size
        let header = page_header(compressed.len(), data.len() + 1);
        let mut reader: &[u8] = &compressed;
        let err = read_page(&mut reader, &header, codec.as_mut(), &props).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parquet error: Actual decompressed size doesn't match the expected one (100 vs 101)"
        );

        let header = page_header(compressed.len(), data.len() - 1);
        let mut reader: &[u8] = &compressed;
        assert!(read_page(&mut reader, &header, codec.as_mut(), &props).is_err());
    }

    #[test]
    fn test_read_page_gzip_understated_size() {
        let props = ReaderProperties::default();
        let data = vec![7u8; 4096];
        let mut encoder = flate2::write::GzEncoder::new(vec![], flate2::Compression::default());
        encoder.write_all(&data).unwrap();
        let compressed = encoder.finish().unwrap();
        let mut codec = create_codec(Compression::GZIP).unwrap();

        let header = page_header(compressed.len(), data.len());
        let mut reader: &[u8] = &compressed;
        let buf = read_page(&mut reader, &header, codec.as_mut(), &props).unwrap();
        assert_eq!(buf, data);

        let header = page_header(compressed.len(), 16);
        let mut reader: &[u8] = &compressed;
        let err = read_page(&mut reader, &header, codec.as_mut(), &props).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parquet error: Actual decompressed size doesn't match the expected one (17 vs 16)"
        );
    }

    #[test]
    fn test_read_page_too_large() {
        let props = ReaderProperties::builder().set_max_page_size(16).build();
        let mut reader: &[u8] = &[0; 32];
        let err = read_page(&mut reader, &page_header(8, 32), None, &props).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parquet error: Page of 8 bytes (32 uncompressed) exceeds the maximum page size 16"
        );
    }

    #[test]
    fn test_decode_required_plain() {
        let descr = column_descr(&ColumnSpec::required_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let values = vec![Value::Int32(1), Value::Int32(-2), Value::Int32(3)];
        let buf = encode_plain(&values);

        let decoded = decoder
            .decode_data_page(&data_header(3, Encoding::PLAIN), &buf)
            .unwrap();
        assert_eq!(decoded, values.into_iter().map(Some).collect::<Vec<_>>());
    }

    #[test]
    fn test_decode_optional_plain() {
        let descr = column_descr(&ColumnSpec::optional_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let mut buf = rle_levels(&[1, 0, 1, 1, 0], 1);
        buf.extend(encode_plain(&[
            Value::Int32(10),
            Value::Int32(20),
            Value::Int32(30),
        ]));

        let decoded = decoder
            .decode_data_page(&data_header(5, Encoding::PLAIN), &buf)
            .unwrap();
        assert_eq!(
            decoded,
            vec![
                Some(Value::Int32(10)),
                None,
                Some(Value::Int32(20)),
                Some(Value::Int32(30)),
                None
            ]
        );
    }

    #[test]
    fn test_decode_bit_packed_levels() {
        let descr = column_descr(&ColumnSpec::optional_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let mut buf = encode_bitpacked_deprecated(&[0, 1, 1], 1);
        assert_eq!(buf, vec![0b0110_0000]);
        buf.extend(encode_plain(&[Value::Int32(7), Value::Int32(8)]));

        let header = DataPageHeader {
            def_level_encoding: Encoding::BIT_PACKED,
            ..data_header(3, Encoding::PLAIN)
        };
        let decoded = decoder.decode_data_page(&header, &buf).unwrap();
        assert_eq!(
            decoded,
            vec![None, Some(Value::Int32(7)), Some(Value::Int32(8))]
        );
    }

    #[test]
    fn test_decode_unsupported_level_encoding() {
        let descr = column_descr(&ColumnSpec::optional_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let header = DataPageHeader {
            def_level_encoding: Encoding::DELTA_BINARY_PACKED,
            ..data_header(1, Encoding::PLAIN)
        };
        let err = decoder.decode_data_page(&header, &[0; 8]).unwrap_err();
        assert!(matches!(
            err,
            ParquetError::UnsupportedEncoding(Encoding::DELTA_BINARY_PACKED)
        ));
    }

    #[test]
    fn test_decode_dictionary() {
        let descr = column_descr(&ColumnSpec::optional_byte_array("s"));
        let mut decoder = PageDecoder::new(&descr);

        let dictionary = vec![Value::ByteArray("x".into()), Value::ByteArray("y".into())];
        let dict_header = DictionaryPageHeader {
            num_values: 2,
            encoding: Encoding::PLAIN_DICTIONARY,
            is_sorted: false,
        };
        decoder
            .decode_dictionary_page(&dict_header, &encode_plain(&dictionary))
            .unwrap();
        assert_eq!(decoder.dictionary(), Some(dictionary.as_slice()));

        let mut buf = rle_levels(&[1, 1, 0, 1], 1);
        buf.push(1);
        buf.extend(encode_hybrid(&[1, 0, 1], 1));
        let decoded = decoder
            .decode_data_page(&data_header(4, Encoding::RLE_DICTIONARY), &buf)
            .unwrap();
        assert_eq!(
            decoded,
            vec![
                Some(Value::ByteArray("y".into())),
                Some(Value::ByteArray("x".into())),
                None,
                Some(Value::ByteArray("y".into())),
            ]
        );
    }

    #[test]
    fn test_decode_dictionary_required_index_out_of_bound() {
        let descr = column_descr(&ColumnSpec::required_int32("a"));
        let mut decoder = PageDecoder::new(&descr);
        let dict_header = DictionaryPageHeader {
            num_values: 1,
            encoding: Encoding::PLAIN,
            is_sorted: false,
        };
        decoder
            .decode_dictionary_page(&dict_header, &encode_plain(&[Value::Int32(5)]))
            .unwrap();

        let mut buf = vec![2];
        buf.extend(encode_hybrid(&[0, 0, 3], 2));
        let err = decoder
            .decode_data_page(&data_header(3, Encoding::PLAIN_DICTIONARY), &buf)
            .unwrap_err();
        assert!(matches!(err, ParquetError::IndexOutOfBound(3, 1)), "{err}");
    }

    #[test]
    fn test_decode_missing_dictionary() {
        let descr = column_descr(&ColumnSpec::required_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let err = decoder
            .decode_data_page(&data_header(1, Encoding::RLE_DICTIONARY), &[1, 2, 1])
            .unwrap_err();
        assert_eq!(err.to_string(), "Parquet error: Missing dictionary page header");
    }

    #[test]
    fn test_decode_rle_booleans() {
        let descr = column_descr(&ColumnSpec::required_bool("b"));
        let decoder = PageDecoder::new(&descr);
        let buf = rle_levels(&[1, 1, 0, 1, 0, 0, 0, 0, 0, 0], 1);
        let decoded = decoder
            .decode_data_page(&data_header(10, Encoding::RLE), &buf)
            .unwrap();
        let expected: Vec<_> = [true, true, false, true, false, false, false, false, false, false]
            .iter()
            .map(|b| Some(Value::Boolean(*b)))
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_unsupported_value_encoding() {
        let descr = column_descr(&ColumnSpec::required_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let err = decoder
            .decode_data_page(&data_header(1, Encoding::DELTA_BINARY_PACKED), &[0; 4])
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported encoding: DELTA_BINARY_PACKED");

        // RLE is only supported for booleans
        let err = decoder
            .decode_data_page(&data_header(1, Encoding::RLE), &[0; 4])
            .unwrap_err();
        assert!(matches!(err, ParquetError::UnsupportedEncoding(Encoding::RLE)));
    }

    #[test]
    fn test_decode_repeated_flattens() {
        let spec = ColumnSpec::new("r", Type::INT64, Repetition::REPEATED);
        let descr = column_descr(&spec);
        assert_eq!(descr.max_rep_level(), 1);
        assert_eq!(descr.max_def_level(), 1);
        let decoder = PageDecoder::new(&descr);

        // rows [1, 2], [], [3]
        let mut buf = rle_levels(&[0, 1, 0, 0], 1);
        buf.extend(rle_levels(&[1, 1, 0, 1], 1));
        buf.extend(encode_plain(&[
            Value::Int64(1),
            Value::Int64(2),
            Value::Int64(3),
        ]));
        let decoded = decoder
            .decode_data_page(&data_header(4, Encoding::PLAIN), &buf)
            .unwrap();
        assert_eq!(
            decoded,
            vec![
                Some(Value::Int64(1)),
                Some(Value::Int64(2)),
                None,
                Some(Value::Int64(3))
            ]
        );
    }

    #[test]
    fn test_decode_truncated_values() {
        let descr = column_descr(&ColumnSpec::required_int32("a"));
        let decoder = PageDecoder::new(&descr);
        let buf = encode_plain(&[Value::Int32(1)]);
        let err = decoder
            .decode_data_page(&data_header(2, Encoding::PLAIN), &buf)
            .unwrap_err();
        assert!(matches!(err, ParquetError::EOF(_)), "{err}");
    }
}
