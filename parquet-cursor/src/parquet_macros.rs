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

// These macros allow pasting the enum sections of the Parquet thrift IDL
// file into rust, generating the enum along with its ordinal conversions.

/// macro to generate rust enums from a thrift enum definition
macro_rules! thrift_enum {
    ($(#[$($def_attrs:tt)*])* enum $identifier:ident { $($(#[$($field_attrs:tt)*])* $field_name:ident = $field_value:literal;)* }) => {
        $(#[$($def_attrs)*])*
        #[derive(Debug, Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
        #[allow(non_camel_case_types)]
        #[allow(missing_docs)]
        pub enum $identifier {
            $($(#[$($field_attrs)*])* $field_name = $field_value,)*
        }

        impl TryFrom<i32> for $identifier {
            type Error = ParquetError;

            fn try_from(val: i32) -> Result<Self> {
                match val {
                    $($field_value => Ok(Self::$field_name),)*
                    _ => Err(general_err!("Unexpected {} {}", stringify!($identifier), val)),
                }
            }
        }

        impl $crate::parquet_thrift::ReadThrift for $identifier {
            fn read_thrift<R: std::io::Read>(
                prot: &mut $crate::parquet_thrift::ThriftCompactInputProtocol<R>,
            ) -> Result<Self> {
                Self::try_from(prot.read_i32()?)
            }
        }

        #[cfg(test)]
        impl $crate::parquet_thrift::WriteThrift for $identifier {
            const ELEMENT_TYPE: $crate::parquet_thrift::ElementType =
                $crate::parquet_thrift::ElementType::I32;

            fn write_thrift<W: std::io::Write>(
                &self,
                writer: &mut $crate::parquet_thrift::ThriftCompactOutputProtocol<W>,
            ) -> Result<()> {
                writer.write_i32(*self as i32)
            }
        }

        #[cfg(test)]
        impl $crate::parquet_thrift::WriteThriftField for $identifier {
            fn write_thrift_field<W: std::io::Write>(
                &self,
                writer: &mut $crate::parquet_thrift::ThriftCompactOutputProtocol<W>,
                field_id: i16,
                last_field_id: i16,
            ) -> Result<i16> {
                $crate::parquet_thrift::WriteThriftField::write_thrift_field(
                    &(*self as i32),
                    writer,
                    field_id,
                    last_field_id,
                )
            }
        }

        impl fmt::Display for $identifier {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{self:?}")
            }
        }
    }
}
