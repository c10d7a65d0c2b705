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

//! Contains structs and methods to describe the leaf columns of a Parquet
//! schema.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::basic::{ConvertedType, Repetition, Type as PhysicalType};
use crate::errors::{ParquetError, Result};
use crate::format::SchemaElement;

/// Reference counted pointer for [`ColumnDescriptor`].
pub type ColumnDescPtr = Arc<ColumnDescriptor>;

/// Reference counted pointer for [`SchemaDescriptor`].
pub type SchemaDescPtr = Arc<SchemaDescriptor>;

/// Represents the location of a column in a Parquet schema
#[derive(Clone, PartialEq, Debug, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ColumnPath {
    parts: Vec<String>,
}

impl ColumnPath {
    /// Creates new column path from vector of field names.
    pub fn new(parts: Vec<String>) -> Self {
        ColumnPath { parts }
    }

    /// Returns string representation of this column path.
    /// ```rust
    /// use parquet_cursor::schema::types::ColumnPath;
    ///
    /// let path = ColumnPath::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    /// assert_eq!(&path.string(), "a.b.c");
    /// ```
    pub fn string(&self) -> String {
        self.parts.join(".")
    }

    /// Returns a slice of path components.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.string())
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(parts: Vec<String>) -> Self {
        ColumnPath { parts }
    }
}

impl From<&str> for ColumnPath {
    fn from(single_path: &str) -> Self {
        let s = String::from(single_path);
        ColumnPath::from(s)
    }
}

impl From<String> for ColumnPath {
    fn from(single_path: String) -> Self {
        let v = vec![single_path];
        ColumnPath { parts: v }
    }
}

/// A descriptor for leaf-level primitive columns.
/// This encapsulates information such as definition and repetition levels and is used to
/// re-assemble nested data.
#[derive(Debug, PartialEq, Clone)]
pub struct ColumnDescriptor {
    path: ColumnPath,
    physical_type: PhysicalType,
    type_length: i32,
    repetition: Repetition,
    converted_type: Option<ConvertedType>,
    scale: i32,
    precision: i32,
    max_def_level: i16,
    max_rep_level: i16,
}

impl ColumnDescriptor {
    /// Returns maximum definition level for this column.
    #[inline]
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// Returns maximum repetition level for this column.
    #[inline]
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    /// Returns [`ColumnPath`] for this column.
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    /// Returns the dotted column name, the key used by the reader.
    pub fn name(&self) -> String {
        self.path.string()
    }

    /// Returns physical type for this column.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Returns the repetition of the leaf field itself.
    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    /// Returns [`ConvertedType`] for this column, if any.
    pub fn converted_type(&self) -> Option<ConvertedType> {
        self.converted_type
    }

    /// Returns type length for this column, -1 if not set.
    /// Only meaningful for FIXED_LEN_BYTE_ARRAY columns.
    pub fn type_length(&self) -> i32 {
        self.type_length
    }

    /// Returns type precision for this column, -1 if not set.
    pub fn type_precision(&self) -> i32 {
        self.precision
    }

    /// Returns type scale for this column, 0 if not set.
    pub fn type_scale(&self) -> i32 {
        self.scale
    }
}

/// Schema of a Parquet file, flattened into its leaf columns in schema order.
#[derive(PartialEq, Debug)]
pub struct SchemaDescriptor {
    name: String,

    // All the descriptors for primitive columns in this schema, constructed from
    // the schema elements with a depth-first traversal.
    leaves: Vec<ColumnDescPtr>,

    // Position of each leaf in `leaves`, keyed by dotted column name.
    leaf_index: HashMap<String, usize>,
}

impl SchemaDescriptor {
    /// Builds the descriptor from the flattened schema of the footer, whose
    /// first element is the root group.
    pub(crate) fn try_from_elements(elements: &[SchemaElement]) -> Result<Self> {
        let root = elements
            .first()
            .ok_or_else(|| general_err!("Schema has no root element"))?;
        let num_children = root.num_children.unwrap_or(0);

        let mut leaves = vec![];
        let mut next = 1;
        for _ in 0..num_children {
            next = build_tree(elements, next, &mut vec![], 0, 0, &mut leaves)?;
        }
        if next != elements.len() {
            return Err(general_err!(
                "Schema has {} elements, but only {} are reachable from the root",
                elements.len(),
                next
            ));
        }

        let mut leaf_index = HashMap::with_capacity(leaves.len());
        for (i, leaf) in leaves.iter().enumerate() {
            leaf_index.entry(leaf.name()).or_insert(i);
        }
        Ok(Self {
            name: root.name.clone(),
            leaves,
            leaf_index,
        })
    }

    /// Returns [`ColumnDescriptor`] for a field position.
    pub fn column(&self, i: usize) -> Result<&ColumnDescPtr> {
        self.leaves
            .get(i)
            .ok_or(ParquetError::IndexOutOfBound(i, self.leaves.len()))
    }

    /// Returns the [`ColumnDescriptor`] of the column named `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDescPtr> {
        self.leaf_index.get(name).map(|i| &self.leaves[*i])
    }

    /// Returns slice of [`ColumnDescriptor`].
    pub fn columns(&self) -> &[ColumnDescPtr] {
        &self.leaves
    }

    /// Returns number of leaf-level columns.
    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// Returns schema name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

// Walks the subtree of the element at `index`, appending its leaves.
// Returns the index of the first element after the subtree.
fn build_tree(
    elements: &[SchemaElement],
    index: usize,
    path_so_far: &mut Vec<String>,
    mut max_def_level: i16,
    mut max_rep_level: i16,
    leaves: &mut Vec<ColumnDescPtr>,
) -> Result<usize> {
    // a schema this deep is not something a writer produces
    if path_so_far.len() > 256 {
        return Err(general_err!("Schema nesting is too deep"));
    }
    let element = elements.get(index).ok_or_else(|| {
        general_err!(
            "Schema element {} is out of bounds, the schema has {} elements",
            index,
            elements.len()
        )
    })?;

    let repetition = element.repetition_type.unwrap_or(Repetition::REQUIRED);
    match repetition {
        Repetition::REQUIRED => {}
        Repetition::OPTIONAL => max_def_level += 1,
        Repetition::REPEATED => {
            max_def_level += 1;
            max_rep_level += 1;
        }
    }

    path_so_far.push(element.name.clone());
    let num_children = element.num_children.unwrap_or(0);
    let next = if num_children > 0 {
        let mut next = index + 1;
        for _ in 0..num_children {
            next = build_tree(
                elements,
                next,
                path_so_far,
                max_def_level,
                max_rep_level,
                leaves,
            )?;
        }
        next
    } else {
        let physical_type = element
            .type_
            .ok_or_else(|| general_err!("Leaf column {} has no physical type", element.name))?;
        leaves.push(Arc::new(ColumnDescriptor {
            path: ColumnPath::new(path_so_far.clone()),
            physical_type,
            type_length: element.type_length.unwrap_or(-1),
            repetition,
            converted_type: element.converted_type,
            scale: element.scale.unwrap_or(0),
            precision: element.precision.unwrap_or(-1),
            max_def_level,
            max_rep_level,
        }));
        index + 1
    };
    path_so_far.pop();
    Ok(next)
}
