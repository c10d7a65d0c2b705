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

//! Binary file to read rows from a Parquet file or dataset in batches.
//!
//! # Install
//!
//! `parquet-cursor-read` can be installed using `cargo`:
//! ```
//! cargo install parquet-cursor --features=cli
//! ```
//! After this `parquet-cursor-read` should be available:
//! ```
//! parquet-cursor-read XYZ.parquet --columns id,name --rows 100
//! ```
//!
//! The binary can also be built from the source code and run as follows:
//! ```
//! cargo run --features=cli --bin parquet-cursor-read XYZ.parquet
//! ```
//!
//! Without `--rows` or `--natural` every row is read in a single batch.

use std::io::{self, Cursor, Read, Seek};

use clap::Parser;
use log::{debug, LevelFilter};
use parquet_cursor::errors::{ParquetError, Result};
use parquet_cursor::file::reader::{ColumnData, ParquetReader};
use parquet_cursor::record::{convert_column, Field};
use parquet_cursor::schema::printer::print_parquet_metadata;
use simplelog::{Config, SimpleLogger};

#[derive(Debug, Parser)]
#[clap(author, version, about("Binary file to read rows from a Parquet file or dataset"), long_about = None)]
struct Args {
    #[clap(help("Path to a parquet file, a dataset directory, or - for stdin"))]
    path: String,
    #[clap(
        short,
        long,
        value_delimiter = ',',
        help("Comma separated columns to read. All columns when not provided")
    )]
    columns: Vec<String>,
    #[clap(
        short,
        long,
        conflicts_with = "natural",
        help("Number of rows to read per batch")
    )]
    rows: Option<usize>,
    #[clap(short, long, help("Read one row group per batch"))]
    natural: bool,
    #[clap(short, long, help("Print rows in JSON lines format"))]
    json: bool,
    #[clap(short, long, help("Print the file metadata instead of rows"))]
    metadata: bool,
    #[clap(short, long, help("Log row group and file transitions"))]
    verbose: bool,
}

impl Args {
    fn run(&self) -> Result<()> {
        if self.path == "-" {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            self.print(ParquetReader::new(Cursor::new(buf))?)
        } else {
            self.print(ParquetReader::open(&self.path)?)
        }
    }

    fn print<R: Read + Seek>(&self, mut reader: ParquetReader<R>) -> Result<()> {
        if self.metadata {
            print_parquet_metadata(&mut io::stdout(), reader.metadata());
            return Ok(());
        }

        let columns: Vec<&str> = self.columns.iter().map(|c| c.as_str()).collect();
        let columns = (!columns.is_empty()).then_some(columns.as_slice());

        let mut batch_index = 0;
        loop {
            let batch = reader.read(columns, self.rows, self.natural)?;
            let num_rows = batch.values().next().map(|c| c.len()).unwrap_or(0);
            if num_rows == 0 {
                break;
            }
            debug!("batch {batch_index}: {num_rows} rows");
            if self.natural && !self.json {
                println!("--- row group {} ---", reader.row_group_index() - 1);
            }
            self.print_batch(&reader, &batch, num_rows)?;
            batch_index += 1;
            // an unlimited read returns everything in one batch
            if self.rows.is_none() && !self.natural {
                break;
            }
        }
        reader.close();
        Ok(())
    }

    fn print_batch<R: Read + Seek>(
        &self,
        reader: &ParquetReader<R>,
        batch: &ColumnData,
        num_rows: usize,
    ) -> Result<()> {
        let mut columns = Vec::with_capacity(batch.len());
        for (name, values) in batch {
            let descr = reader
                .schema()
                .column_by_name(name)
                .ok_or_else(|| ParquetError::UnknownColumn(name.clone()))?;
            columns.push((name, convert_column(values, descr, reader.properties())?));
        }

        for row in 0..num_rows {
            let fields = columns.iter().map(|(name, fields)| (*name, &fields[row]));
            if self.json {
                println!("{}", row_to_json(fields));
            } else {
                println!("{}", row_to_string(fields));
            }
        }
        Ok(())
    }
}

fn row_to_string<'a>(fields: impl Iterator<Item = (&'a String, &'a Field)>) -> String {
    let fields: Vec<String> = fields.map(|(name, field)| format!("{name}: {field}")).collect();
    format!("{{{}}}", fields.join(", "))
}

fn row_to_json<'a>(fields: impl Iterator<Item = (&'a String, &'a Field)>) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .map(|(name, field)| (name.clone(), field.to_json_value()))
            .collect(),
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = SimpleLogger::init(level, Config::default());
    args.run()
}
