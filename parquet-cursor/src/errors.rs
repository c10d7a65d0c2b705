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

//! Common Parquet errors and macros.

use core::num::TryFromIntError;
use std::error::Error;
use std::string::FromUtf8Error;
use std::{io, result, str};

use crate::basic::{Encoding, PageType};

/// Parquet error enumeration
// Note: we don't implement PartialEq as the semantics for the
// external variant are not well defined (#3154)
#[derive(Debug)]
#[non_exhaustive]
pub enum ParquetError {
    /// General Parquet error.
    /// Returned when code violates normal workflow of working with Parquet files,
    /// e.g. a corrupt footer or an implausible page header.
    General(String),
    /// "Not yet implemented" Parquet error.
    /// Returned when functionality is not yet available, e.g. a compression
    /// codec that was not compiled in.
    NYI(String),
    /// "End of file" Parquet error.
    /// Returned when fewer bytes are available than a decode step requires.
    EOF(String),
    /// A requested column name is not a leaf column of the schema.
    UnknownColumn(String),
    /// The arguments of a call contradict each other, e.g. a natural read
    /// combined with an explicit row quota.
    InvalidUsage(String),
    /// A page uses an encoding this crate cannot decode.
    UnsupportedEncoding(Encoding),
    /// A page type this crate cannot decode, and cannot safely skip.
    UnsupportedPageType(PageType),
    /// Error when the requested index is more than the
    /// number of items expected
    IndexOutOfBound(usize, usize),
    /// An external error variant
    External(Box<dyn Error + Send + Sync>),
}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            ParquetError::General(message) => {
                write!(fmt, "Parquet error: {message}")
            }
            ParquetError::NYI(message) => write!(fmt, "NYI: {message}"),
            ParquetError::EOF(message) => write!(fmt, "EOF: {message}"),
            ParquetError::UnknownColumn(name) => write!(fmt, "Unknown column: {name}"),
            ParquetError::InvalidUsage(message) => write!(fmt, "Invalid usage: {message}"),
            ParquetError::UnsupportedEncoding(encoding) => {
                write!(fmt, "Unsupported encoding: {encoding}")
            }
            ParquetError::UnsupportedPageType(page_type) => {
                write!(fmt, "Unsupported page type: {page_type}")
            }
            ParquetError::IndexOutOfBound(index, bound) => {
                write!(fmt, "Index {index} out of bound: {bound}")
            }
            ParquetError::External(e) => write!(fmt, "External: {e}"),
        }
    }
}

impl Error for ParquetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParquetError::External(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<TryFromIntError> for ParquetError {
    fn from(e: TryFromIntError) -> ParquetError {
        ParquetError::General(format!("Integer overflow: {e}"))
    }
}

impl From<io::Error> for ParquetError {
    fn from(e: io::Error) -> ParquetError {
        // a short read on a positioned stream is a truncated input, not an I/O failure
        if e.kind() == io::ErrorKind::UnexpectedEof {
            return ParquetError::EOF(e.to_string());
        }
        ParquetError::External(Box::new(e))
    }
}

#[cfg(feature = "snap")]
impl From<snap::Error> for ParquetError {
    fn from(e: snap::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<str::Utf8Error> for ParquetError {
    fn from(e: str::Utf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<FromUtf8Error> for ParquetError {
    fn from(e: FromUtf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T, E = ParquetError> = result::Result<T, E>;

// ----------------------------------------------------------------------
// Conversion from `ParquetError` to other types of `Error`s

impl From<ParquetError> for io::Error {
    fn from(e: ParquetError) -> Self {
        io::Error::other(e)
    }
}

// ----------------------------------------------------------------------
// Convenient macros for different errors

macro_rules! general_err {
    ($fmt:expr) => (ParquetError::General($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::General(format!($fmt, $($args),*)));
}

macro_rules! nyi_err {
    ($fmt:expr) => (ParquetError::NYI($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::NYI(format!($fmt, $($args),*)));
}

macro_rules! eof_err {
    ($fmt:expr) => (ParquetError::EOF($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (ParquetError::EOF(format!($fmt, $($args),*)));
}
