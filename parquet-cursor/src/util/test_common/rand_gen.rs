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

use rand::{rngs::StdRng, Rng};

use crate::basic::Type;
use crate::data_type::{ByteArray, Int96, Value};

/// Random value of `physical_type`. Byte arrays are at most 16 bytes long,
/// fixed length byte arrays are `type_length` bytes long.
pub(crate) fn random_value(rng: &mut StdRng, physical_type: Type, type_length: usize) -> Value {
    match physical_type {
        Type::BOOLEAN => Value::Boolean(rng.random_bool(0.5)),
        Type::INT32 => Value::Int32(rng.random()),
        Type::INT64 => Value::Int64(rng.random()),
        Type::INT96 => {
            let mut value = Int96::new();
            value.set_data(rng.random(), rng.random(), rng.random());
            Value::Int96(value)
        }
        Type::FLOAT => Value::Float(rng.random_range(-1e6..1e6)),
        Type::DOUBLE => Value::Double(rng.random_range(-1e12..1e12)),
        Type::BYTE_ARRAY => {
            let len = rng.random_range(0..16);
            Value::ByteArray(random_bytes(rng, len))
        }
        Type::FIXED_LEN_BYTE_ARRAY => Value::FixedLenByteArray(random_bytes(rng, type_length)),
    }
}

/// `len` random values of `physical_type`, each null with probability
/// `null_density`.
pub(crate) fn random_column(
    rng: &mut StdRng,
    physical_type: Type,
    type_length: usize,
    len: usize,
    null_density: f64,
) -> Vec<Option<Value>> {
    (0..len)
        .map(|_| {
            if rng.random_bool(null_density) {
                None
            } else {
                Some(random_value(rng, physical_type, type_length))
            }
        })
        .collect()
}

fn random_bytes(rng: &mut StdRng, len: usize) -> ByteArray {
    (0..len).map(|_| rng.random::<u8>()).collect::<Vec<u8>>().into()
}
