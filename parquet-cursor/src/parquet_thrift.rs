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

//! Thrift compact protocol decoder for the footer and page headers.
//!
//! The protocol reads from any [`Read`], so the same code decodes a footer
//! buffered in memory and a page header read directly off a positioned file.

use std::io::Read;
#[cfg(test)]
use std::io::Write;

use crate::errors::{ParquetError, Result};

/// Maximum nesting depth when skipping unknown fields
const MAX_SKIP_DEPTH: i8 = 64;

// Thrift compact protocol types for struct fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FieldType {
    Stop = 0,
    BooleanTrue = 1,
    BooleanFalse = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for FieldType {
    type Error = ParquetError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Stop),
            1 => Ok(Self::BooleanTrue),
            2 => Ok(Self::BooleanFalse),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(general_err!("Unexpected struct field type {}", value)),
        }
    }
}

impl TryFrom<ElementType> for FieldType {
    type Error = ParquetError;
    fn try_from(value: ElementType) -> Result<Self> {
        match value {
            ElementType::Bool => Ok(Self::BooleanTrue),
            ElementType::Byte => Ok(Self::Byte),
            ElementType::I16 => Ok(Self::I16),
            ElementType::I32 => Ok(Self::I32),
            ElementType::I64 => Ok(Self::I64),
            ElementType::Double => Ok(Self::Double),
            ElementType::Binary => Ok(Self::Binary),
            ElementType::List => Ok(Self::List),
            ElementType::Struct => Ok(Self::Struct),
            _ => Err(general_err!("Unexpected list element type {:?}", value)),
        }
    }
}

// Thrift compact protocol types for list elements
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ElementType {
    Bool = 2,
    Byte = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Double = 7,
    Binary = 8,
    List = 9,
    Set = 10,
    Map = 11,
    Struct = 12,
}

impl TryFrom<u8> for ElementType {
    type Error = ParquetError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            // For historical and compatibility reasons, a reader should be capable to deal with both cases.
            // The only valid value in the original spec was 2, but due to an widespread implementation bug
            // the defacto standard across large parts of the library became 1 instead.
            // As a result, both values are now allowed.
            // https://github.com/apache/thrift/blob/master/doc/specs/thrift-compact-protocol.md#list-and-set
            1 | 2 => Ok(Self::Bool),
            3 => Ok(Self::Byte),
            4 => Ok(Self::I16),
            5 => Ok(Self::I32),
            6 => Ok(Self::I64),
            7 => Ok(Self::Double),
            8 => Ok(Self::Binary),
            9 => Ok(Self::List),
            10 => Ok(Self::Set),
            11 => Ok(Self::Map),
            12 => Ok(Self::Struct),
            _ => Err(general_err!("Unexpected list/set element type {}", value)),
        }
    }
}

pub(crate) struct FieldIdentifier {
    pub(crate) field_type: FieldType,
    pub(crate) id: i16,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ListIdentifier {
    pub(crate) element_type: ElementType,
    pub(crate) size: i32,
}

/// Compact protocol reader over a byte stream.
///
/// Only the bytes belonging to the decoded value are consumed, leaving the
/// stream positioned directly after it.
pub(crate) struct ThriftCompactInputProtocol<R: Read> {
    reader: R,
    // Identifier of the last field deserialized for a struct.
    last_read_field_id: i16,
    // Stack of the last read field ids (a new entry is added each time a nested struct is read).
    read_field_id_stack: Vec<i16>,
    // Boolean value for a field.
    // Saved because boolean fields and their value are encoded in a single byte,
    // and reading the field only occurs after the field id is read.
    pending_read_bool_value: Option<bool>,
}

impl<R: Read> ThriftCompactInputProtocol<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            last_read_field_id: 0,
            read_field_id_stack: Vec::with_capacity(16),
            pending_read_bool_value: None,
        }
    }

    fn read_vlq(&mut self) -> Result<u64> {
        let mut in_progress = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_byte()?;
            if shift >= u64::BITS {
                return Err(general_err!("Thrift varint exceeds 64 bits"));
            }
            in_progress |= ((byte & 0x7F) as u64) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(in_progress);
            }
        }
    }

    fn read_zig_zag(&mut self) -> Result<i64> {
        let val = self.read_vlq()?;
        Ok((val >> 1) as i64 ^ -((val & 1) as i64))
    }

    fn read_list_set_begin(&mut self) -> Result<(ElementType, i32)> {
        let header = self.read_byte()?;
        let element_type = ElementType::try_from(header & 0x0f)?;

        let possible_element_count = (header & 0xF0) >> 4;
        let element_count = if possible_element_count != 15 {
            // high bits set high if count and type encoded separately
            possible_element_count as i32
        } else {
            i32::try_from(self.read_vlq()?)?
        };

        Ok((element_type, element_count))
    }

    pub(crate) fn read_struct_begin(&mut self) -> Result<()> {
        self.read_field_id_stack.push(self.last_read_field_id);
        self.last_read_field_id = 0;
        Ok(())
    }

    pub(crate) fn read_struct_end(&mut self) -> Result<()> {
        self.last_read_field_id = self
            .read_field_id_stack
            .pop()
            .ok_or_else(|| general_err!("Thrift struct end without matching begin"))?;
        Ok(())
    }

    pub(crate) fn read_field_begin(&mut self) -> Result<FieldIdentifier> {
        // we can read at least one byte, which is:
        // - the type
        // - the field delta and the type
        let field_type = self.read_byte()?;
        let field_delta = (field_type & 0xf0) >> 4;
        let field_type = FieldType::try_from(field_type & 0xf)?;

        match field_type {
            FieldType::Stop => Ok(FieldIdentifier {
                field_type: FieldType::Stop,
                id: 0,
            }),
            _ => {
                // special handling for bools
                if field_type == FieldType::BooleanFalse {
                    self.pending_read_bool_value = Some(false);
                } else if field_type == FieldType::BooleanTrue {
                    self.pending_read_bool_value = Some(true);
                }
                if field_delta != 0 {
                    self.last_read_field_id = self
                        .last_read_field_id
                        .checked_add(field_delta as i16)
                        .ok_or_else(|| {
                            general_err!(
                                "cannot add {} to {}",
                                field_delta,
                                self.last_read_field_id
                            )
                        })?;
                } else {
                    self.last_read_field_id = self.read_i16()?;
                };

                Ok(FieldIdentifier {
                    field_type,
                    id: self.last_read_field_id,
                })
            }
        }
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        match self.pending_read_bool_value.take() {
            Some(b) => Ok(b),
            None => {
                let b = self.read_byte()?;
                // Previous versions of the thrift specification said to use 0 and 1 inside collections,
                // but that differed from existing implementations.
                match b {
                    0x01 => Ok(true),
                    0x00 | 0x02 => Ok(false),
                    unkn => Err(general_err!("cannot convert {} into bool", unkn)),
                }
            }
        }
    }

    pub(crate) fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = usize::try_from(self.read_vlq()?)?;
        let mut buf = Vec::new();
        let read = (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
        if read != len {
            return Err(eof_err!("Expected to read {} bytes, read only {}", len, read));
        }
        Ok(buf)
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8(bytes)?)
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_byte()? as _)
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_zig_zag()? as _)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_zig_zag()? as _)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        self.read_zig_zag()
    }

    pub(crate) fn read_double(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.reader.read_exact(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    pub(crate) fn read_list_begin(&mut self) -> Result<ListIdentifier> {
        let (element_type, element_count) = self.read_list_set_begin()?;
        if element_count < 0 {
            return Err(general_err!("Negative thrift list size {}", element_count));
        }
        Ok(ListIdentifier {
            element_type,
            size: element_count,
        })
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn skip_vlq(&mut self) -> Result<()> {
        loop {
            let byte = self.read_byte()?;
            if byte & 0x80 == 0 {
                return Ok(());
            }
        }
    }

    fn skip_binary(&mut self) -> Result<()> {
        self.read_bytes().map(|_| ())
    }

    /// Skip a field with type `field_type` recursively until the default
    /// maximum skip depth is reached.
    pub(crate) fn skip(&mut self, field_type: FieldType) -> Result<()> {
        self.skip_till_depth(field_type, MAX_SKIP_DEPTH)
    }

    /// Skip a field with type `field_type` recursively up to `depth` levels.
    fn skip_till_depth(&mut self, field_type: FieldType, depth: i8) -> Result<()> {
        if depth == 0 {
            return Err(general_err!("cannot parse past {:?}", field_type));
        }

        match field_type {
            FieldType::BooleanFalse | FieldType::BooleanTrue => self.read_bool().map(|_| ()),
            FieldType::Byte => self.read_i8().map(|_| ()),
            FieldType::I16 | FieldType::I32 | FieldType::I64 => self.skip_vlq(),
            FieldType::Double => self.read_double().map(|_| ()),
            FieldType::Binary => self.skip_binary(),
            FieldType::Struct => {
                self.read_struct_begin()?;
                loop {
                    let field_ident = self.read_field_begin()?;
                    if field_ident.field_type == FieldType::Stop {
                        break;
                    }
                    self.skip_till_depth(field_ident.field_type, depth - 1)?;
                }
                self.read_struct_end()
            }
            FieldType::List | FieldType::Set => {
                let list_ident = self.read_list_begin()?;
                for _ in 0..list_ident.size {
                    let element_type = FieldType::try_from(list_ident.element_type)?;
                    self.skip_till_depth(element_type, depth - 1)?;
                }
                Ok(())
            }
            // no map types in parquet format
            u => Err(general_err!("cannot skip field type {:?}", &u)),
        }
    }
}

/// Reads a value of a generated thrift type from the compact protocol.
pub(crate) trait ReadThrift: Sized {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self>;
}

impl ReadThrift for bool {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        prot.read_bool()
    }
}

impl ReadThrift for i32 {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        prot.read_i32()
    }
}

impl ReadThrift for i64 {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        prot.read_i64()
    }
}

impl ReadThrift for String {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        prot.read_string()
    }
}

impl<T: ReadThrift> ReadThrift for Vec<T> {
    fn read_thrift<R: Read>(prot: &mut ThriftCompactInputProtocol<R>) -> Result<Self> {
        let list_ident = prot.read_list_begin()?;
        // the size comes from untrusted input, so only pre-allocate a bounded amount
        let mut res = Vec::with_capacity((list_ident.size as usize).min(1024));
        for _ in 0..list_ident.size {
            res.push(T::read_thrift(prot)?);
        }
        Ok(res)
    }
}

/////////////////////////
// thrift compact output, used to build fixtures in tests

#[cfg(test)]
pub(crate) struct ThriftCompactOutputProtocol<W: Write> {
    writer: W,
}

#[cfg(test)]
impl<W: Write> ThriftCompactOutputProtocol<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    fn write_byte(&mut self, b: u8) -> Result<()> {
        self.writer.write_all(&[b])?;
        Ok(())
    }

    fn write_vlq(&mut self, val: u64) -> Result<()> {
        let mut v = val;
        while v > 0x7f {
            self.write_byte(v as u8 | 0x80)?;
            v >>= 7;
        }
        self.write_byte(v as u8)
    }

    fn write_zig_zag(&mut self, val: i64) -> Result<()> {
        let s = (val < 0) as i64;
        self.write_vlq((((val ^ -s) << 1) + s) as u64)
    }

    pub(crate) fn write_field_begin(
        &mut self,
        field_type: FieldType,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<()> {
        let delta = field_id.wrapping_sub(last_field_id);
        if delta > 0 && delta <= 0xf {
            self.write_byte((delta as u8) << 4 | field_type as u8)
        } else {
            self.write_byte(field_type as u8)?;
            self.write_i16(field_id)
        }
    }

    pub(crate) fn write_list_begin(&mut self, element_type: ElementType, len: usize) -> Result<()> {
        if len < 15 {
            self.write_byte((len as u8) << 4 | element_type as u8)
        } else {
            self.write_byte(0xf0u8 | element_type as u8)?;
            self.write_vlq(len as _)
        }
    }

    pub(crate) fn write_struct_end(&mut self) -> Result<()> {
        self.write_byte(0)
    }

    pub(crate) fn write_bytes(&mut self, val: &[u8]) -> Result<()> {
        self.write_vlq(val.len() as u64)?;
        self.writer.write_all(val)?;
        Ok(())
    }

    pub(crate) fn write_i16(&mut self, val: i16) -> Result<()> {
        self.write_zig_zag(val as _)
    }

    pub(crate) fn write_i32(&mut self, val: i32) -> Result<()> {
        self.write_zig_zag(val as _)
    }

    pub(crate) fn write_i64(&mut self, val: i64) -> Result<()> {
        self.write_zig_zag(val as _)
    }
}

#[cfg(test)]
pub(crate) trait WriteThrift {
    const ELEMENT_TYPE: ElementType;

    // used to write generated enums and structs
    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()>;
}

#[cfg(test)]
impl WriteThrift for String {
    const ELEMENT_TYPE: ElementType = ElementType::Binary;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_bytes(self.as_bytes())
    }
}

#[cfg(test)]
impl<T: WriteThrift> WriteThrift for Vec<T> {
    const ELEMENT_TYPE: ElementType = ElementType::List;

    fn write_thrift<W: Write>(&self, writer: &mut ThriftCompactOutputProtocol<W>) -> Result<()> {
        writer.write_list_begin(T::ELEMENT_TYPE, self.len())?;
        for item in self {
            item.write_thrift(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) trait WriteThriftField {
    // write the field header and field value. returns `field_id`.
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16>;
}

#[cfg(test)]
impl WriteThriftField for bool {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        // boolean only writes the field header
        match *self {
            true => writer.write_field_begin(FieldType::BooleanTrue, field_id, last_field_id)?,
            false => writer.write_field_begin(FieldType::BooleanFalse, field_id, last_field_id)?,
        }
        Ok(field_id)
    }
}

#[cfg(test)]
impl WriteThriftField for i32 {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::I32, field_id, last_field_id)?;
        writer.write_i32(*self)?;
        Ok(field_id)
    }
}

#[cfg(test)]
impl WriteThriftField for i64 {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::I64, field_id, last_field_id)?;
        writer.write_i64(*self)?;
        Ok(field_id)
    }
}

#[cfg(test)]
impl WriteThriftField for String {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::Binary, field_id, last_field_id)?;
        writer.write_bytes(self.as_bytes())?;
        Ok(field_id)
    }
}

#[cfg(test)]
impl<T: WriteThrift> WriteThriftField for Vec<T> {
    fn write_thrift_field<W: Write>(
        &self,
        writer: &mut ThriftCompactOutputProtocol<W>,
        field_id: i16,
        last_field_id: i16,
    ) -> Result<i16> {
        writer.write_field_begin(FieldType::List, field_id, last_field_id)?;
        self.write_thrift(writer)?;
        Ok(field_id)
    }
}

/// Writes a nested struct as field `field_id`, returning `field_id`.
#[cfg(test)]
pub(crate) fn write_struct_field<T: WriteThrift, W: Write>(
    value: &T,
    writer: &mut ThriftCompactOutputProtocol<W>,
    field_id: i16,
    last_field_id: i16,
) -> Result<i16> {
    writer.write_field_begin(FieldType::Struct, field_id, last_field_id)?;
    value.write_thrift(writer)?;
    Ok(field_id)
}
