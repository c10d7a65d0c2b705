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

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::basic::ConvertedType;
use crate::data_type::{ByteArray, Value};
use crate::errors::{ParquetError, Result};
use crate::file::properties::ReaderProperties;
use crate::schema::types::ColumnDescriptor;

// Number of days from the unix epoch to 0001-01-01
const DAYS_FROM_CE_TO_UNIX_EPOCH: i32 = 719_163;

/// API to represent a single field of a row.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// Null value.
    Null,
    /// Boolean value (`true`, `false`).
    Bool(bool),
    /// Signed integer INT_8.
    Byte(i8),
    /// Signed integer INT_16.
    Short(i16),
    /// Signed integer INT_32.
    Int(i32),
    /// Signed integer INT_64.
    Long(i64),
    /// Unsigned integer UINT_8.
    UByte(u8),
    /// Unsigned integer UINT_16.
    UShort(u16),
    /// Unsigned integer UINT_32.
    UInt(u32),
    /// Unsigned integer UINT_64.
    ULong(u64),
    /// IEEE 32-bit floating point value.
    Float(f32),
    /// IEEE 64-bit floating point value.
    Double(f64),
    /// Decimal value, `value * 10^-scale`.
    Decimal {
        /// The unscaled value.
        value: i128,
        /// Number of digits after the decimal point.
        scale: i32,
    },
    /// UTF-8 encoded character string.
    Str(String),
    /// General binary value.
    Bytes(ByteArray),
    /// Date without a time of day, stores the number of days from the
    /// Unix epoch, 1 January 1970.
    Date(i32),
    /// Time of day in milliseconds since midnight.
    TimeMillis(i32),
    /// Time of day in microseconds since midnight.
    TimeMicros(i64),
    /// Milliseconds from the Unix epoch, 1 January 1970.
    TimestampMillis(i64),
    /// Microseconds from the Unix epoch, 1 January 1970.
    TimestampMicros(i64),
}

impl Field {
    /// Converts the physical `value` of a column described by `descr`.
    ///
    /// `None` is a null. String columns holding invalid UTF-8 are an error
    /// when `validate_utf8` is set, otherwise the invalid sequences are
    /// replaced.
    pub fn convert(
        value: Option<&Value>,
        descr: &ColumnDescriptor,
        validate_utf8: bool,
    ) -> Result<Self> {
        let value = match value {
            Some(value) => value,
            None => return Ok(Field::Null),
        };
        let converted_type = descr.converted_type();
        let scale = descr.type_scale();

        let field = match value {
            Value::Boolean(v) => Field::Bool(*v),
            Value::Int32(v) => match converted_type {
                Some(ConvertedType::INT_8) => Field::Byte(*v as i8),
                Some(ConvertedType::INT_16) => Field::Short(*v as i16),
                Some(ConvertedType::UINT_8) => Field::UByte(*v as u8),
                Some(ConvertedType::UINT_16) => Field::UShort(*v as u16),
                Some(ConvertedType::UINT_32) => Field::UInt(*v as u32),
                Some(ConvertedType::DATE) => Field::Date(*v),
                Some(ConvertedType::TIME_MILLIS) => Field::TimeMillis(*v),
                Some(ConvertedType::DECIMAL) => Field::Decimal {
                    value: *v as i128,
                    scale,
                },
                _ => Field::Int(*v),
            },
            Value::Int64(v) => match converted_type {
                Some(ConvertedType::UINT_64) => Field::ULong(*v as u64),
                Some(ConvertedType::TIME_MICROS) => Field::TimeMicros(*v),
                Some(ConvertedType::TIMESTAMP_MILLIS) => Field::TimestampMillis(*v),
                Some(ConvertedType::TIMESTAMP_MICROS) => Field::TimestampMicros(*v),
                Some(ConvertedType::DECIMAL) => Field::Decimal {
                    value: *v as i128,
                    scale,
                },
                _ => Field::Long(*v),
            },
            Value::Int96(v) => Field::TimestampMillis(v.to_millis()),
            Value::Float(v) => Field::Float(*v),
            Value::Double(v) => Field::Double(*v),
            Value::ByteArray(v) | Value::FixedLenByteArray(v) => match converted_type {
                Some(ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON) => {
                    Field::Str(convert_string(v, validate_utf8)?)
                }
                Some(ConvertedType::DECIMAL) => Field::Decimal {
                    value: decimal_from_be_bytes(v.data())?,
                    scale,
                },
                None => match std::str::from_utf8(v.data()) {
                    Ok(s) => Field::Str(s.to_string()),
                    Err(_) => Field::Bytes(v.clone()),
                },
                _ => Field::Bytes(v.clone()),
            },
        };
        Ok(field)
    }

    /// Returns true if the field is [`Field::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Converts this field into a JSON value.
    #[cfg(feature = "json")]
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Field::Null => Value::Null,
            Field::Bool(b) => Value::Bool(*b),
            Field::Byte(n) => Value::Number(serde_json::Number::from(*n)),
            Field::Short(n) => Value::Number(serde_json::Number::from(*n)),
            Field::Int(n) => Value::Number(serde_json::Number::from(*n)),
            Field::Long(n) => Value::Number(serde_json::Number::from(*n)),
            Field::UByte(n) => Value::Number(serde_json::Number::from(*n)),
            Field::UShort(n) => Value::Number(serde_json::Number::from(*n)),
            Field::UInt(n) => Value::Number(serde_json::Number::from(*n)),
            Field::ULong(n) => Value::Number(serde_json::Number::from(*n)),
            Field::Float(n) => serde_json::Number::from_f64(f64::from(*n))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Field::Double(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Field::Decimal { .. } => Value::String(self.to_string()),
            Field::Str(s) => Value::String(s.to_owned()),
            Field::Bytes(b) => Value::Array(
                b.data()
                    .iter()
                    .map(|b| Value::Number(serde_json::Number::from(*b)))
                    .collect(),
            ),
            Field::Date(_)
            | Field::TimeMillis(_)
            | Field::TimeMicros(_)
            | Field::TimestampMillis(_)
            | Field::TimestampMicros(_) => Value::String(self.to_string()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Field::Null => write!(f, "null"),
            Field::Bool(value) => write!(f, "{value}"),
            Field::Byte(value) => write!(f, "{value}"),
            Field::Short(value) => write!(f, "{value}"),
            Field::Int(value) => write!(f, "{value}"),
            Field::Long(value) => write!(f, "{value}"),
            Field::UByte(value) => write!(f, "{value}"),
            Field::UShort(value) => write!(f, "{value}"),
            Field::UInt(value) => write!(f, "{value}"),
            Field::ULong(value) => write!(f, "{value}"),
            Field::Float(value) => write!(f, "{value:?}"),
            Field::Double(value) => write!(f, "{value:?}"),
            Field::Decimal { value, scale } => write!(f, "{}", format_decimal(*value, *scale)),
            Field::Str(value) => write!(f, "\"{value}\""),
            Field::Bytes(value) => write!(f, "{:?}", value.data()),
            Field::Date(value) => write!(f, "{}", convert_date_to_string(*value)),
            Field::TimeMillis(value) => {
                write!(f, "{}", convert_time_to_string(*value as i64, 1_000_000))
            }
            Field::TimeMicros(value) => write!(f, "{}", convert_time_to_string(*value, 1_000)),
            Field::TimestampMillis(value) => {
                write!(f, "{}", convert_timestamp_to_string(*value, 1_000_000))
            }
            Field::TimestampMicros(value) => {
                write!(f, "{}", convert_timestamp_to_string(*value, 1_000))
            }
        }
    }
}

/// Converts the physical `values` of the column described by `descr`.
pub fn convert_column(
    values: &[Option<Value>],
    descr: &ColumnDescriptor,
    props: &ReaderProperties,
) -> Result<Vec<Field>> {
    values
        .iter()
        .map(|value| Field::convert(value.as_ref(), descr, props.validate_utf8()))
        .collect()
}

fn convert_string(value: &ByteArray, validate_utf8: bool) -> Result<String> {
    if validate_utf8 {
        Ok(value.as_utf8()?.to_string())
    } else {
        Ok(String::from_utf8_lossy(value.data()).into_owned())
    }
}

// Decodes a big-endian two's complement integer of at most 16 bytes.
fn decimal_from_be_bytes(bytes: &[u8]) -> Result<i128> {
    if bytes.len() > 16 {
        return Err(general_err!(
            "Decimal of {} bytes does not fit in 128 bits",
            bytes.len()
        ));
    }
    let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
    let mut buf = if negative { [0xff; 16] } else { [0; 16] };
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Ok(i128::from_be_bytes(buf))
}

fn format_decimal(value: i128, scale: i32) -> String {
    if scale <= 0 {
        return format!("{}{}", value, "0".repeat(scale.unsigned_abs() as usize));
    }
    let scale = scale as usize;
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    if digits.len() > scale {
        let (int, frac) = digits.split_at(digits.len() - scale);
        format!("{sign}{int}.{frac}")
    } else {
        format!("{sign}0.{digits:0>scale$}")
    }
}

// Renders days since the unix epoch as `YYYY-MM-DD`.
fn convert_date_to_string(value: i32) -> String {
    value
        .checked_add(DAYS_FROM_CE_TO_UNIX_EPOCH)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{value} days"))
}

// Renders `value` units of `nanos_per_unit` nanoseconds since midnight as
// `HH:MM:SS.fff`.
fn convert_time_to_string(value: i64, nanos_per_unit: i64) -> String {
    let units_per_sec = 1_000_000_000 / nanos_per_unit;
    let secs = value.div_euclid(units_per_sec);
    let nanos = value.rem_euclid(units_per_sec) * nanos_per_unit;
    u32::try_from(secs)
        .ok()
        .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos as u32))
        .map(|time| time.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| format!("{secs}s"))
}

// Renders `value` units of `nanos_per_unit` nanoseconds since the unix epoch
// as a UTC timestamp.
fn convert_timestamp_to_string(value: i64, nanos_per_unit: i64) -> String {
    let units_per_sec = 1_000_000_000 / nanos_per_unit;
    let secs = value.div_euclid(units_per_sec);
    let nanos = value.rem_euclid(units_per_sec) * nanos_per_unit;
    DateTime::from_timestamp(secs, nanos as u32)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f %:z").to_string())
        .unwrap_or_else(|| format!("{value}"))
}
