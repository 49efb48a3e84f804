// In: src/writer/mod.rs

//! The encoded writer adapter.
//!
//! Rows of logical cells go in; one parquet file per logical file comes out.
//! Every non-null cell is routed through the codec registry and lands in the
//! column buffer matching its physical kind, nulls only lower the definition
//! level. Pages are flushed after exactly `page_row_limit` rows so the
//! dataset's value placement lands on deterministic page boundaries.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::data_type::{
    BoolType, ByteArray, ByteArrayType, DoubleType, FixedLenByteArray, FixedLenByteArrayType,
    FloatType, Int32Type, Int64Type, Int96, Int96Type,
};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::file::writer::{SerializedColumnWriter, SerializedFileWriter};
use parquet::schema::types::TypePtr;

use crate::codec;
use crate::config::{ColumnCompression, HarnessConfig};
use crate::dataset::{page_stats, Dataset, Row};
use crate::error::{ColIndexError, Result};
use crate::types::{LogicalType, NanoTime, PhysicalKind, PhysicalValue, Value};

pub mod schema;

pub use schema::{leaf_type, message_type, ID_FRAGMENT};

/// Definition level of a present value in a flat optional column.
const DEF_PRESENT: i16 = 1;
const DEF_NULL: i16 = 0;

//==================================================================================
// 1. Public Types
//==================================================================================

/// A file committed by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub row_count: usize,
}

/// Writes rows of one fixed type list into parquet files.
pub struct ParquetFileWriter {
    types: Vec<LogicalType>,
    schema: TypePtr,
    props: Arc<WriterProperties>,
    page_row_limit: usize,
}

//==================================================================================
// 2. Writer Implementation
//==================================================================================

impl ParquetFileWriter {
    pub fn new(types: &[LogicalType], config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            types: types.to_vec(),
            schema: message_type(types)?,
            props: Arc::new(writer_properties(config)),
            page_row_limit: config.page_row_limit,
        })
    }

    pub fn schema(&self) -> &TypePtr {
        &self.schema
    }

    /// Writes `rows` as a single row group to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path, rows: &[Row]) -> Result<WrittenFile> {
        let width = self.types.len() + 1;
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ColIndexError::InternalError(format!(
                "row {} has {} cells, the schema has {} columns",
                idx,
                row.len(),
                width
            )));
        }

        let file = File::create(path)?;
        let mut writer =
            SerializedFileWriter::new(file, Arc::clone(&self.schema), Arc::clone(&self.props))?;
        let mut row_group = writer.next_row_group()?;

        let mut column_idx = 0;
        while let Some(mut column) = row_group.next_column()? {
            let (kind, logical_type) = match column_idx {
                0 => (ID_FRAGMENT.kind, None),
                i => {
                    let t = self.types[i - 1];
                    (codec::schema_of(t).kind, Some(t))
                }
            };
            let mut buffer = ColumnBuffer::for_kind(kind);
            let mut def_levels = Vec::with_capacity(rows.len());
            for row in rows {
                let cell = &row[column_idx];
                let encoded = match (logical_type, cell) {
                    (_, None) => None,
                    (None, Some(id)) => Some(encode_id(id)?),
                    (Some(t), Some(v)) => Some(codec::encode(t, v)?),
                };
                match encoded {
                    Some(value) => {
                        buffer.push(value)?;
                        def_levels.push(DEF_PRESENT);
                    }
                    None => def_levels.push(DEF_NULL),
                }
            }
            buffer.write_to(&mut column, &def_levels)?;
            column.close()?;
            column_idx += 1;
        }
        row_group.close()?;
        writer.close()?;

        log::debug!(
            "Wrote {} rows x {} columns to {}",
            rows.len(),
            column_idx,
            path.display()
        );

        Ok(WrittenFile {
            path: path.to_path_buf(),
            row_count: rows.len(),
        })
    }

    /// Writes every file of `dataset` into `dir` as `0.parquet`, `1.parquet`, ...
    pub fn write_dataset(&self, dir: &Path, dataset: &Dataset) -> Result<Vec<WrittenFile>> {
        if dataset.types != self.types {
            return Err(ColIndexError::InternalError(format!(
                "dataset types {:?} differ from writer types {:?}",
                dataset.types, self.types
            )));
        }
        let mut written = Vec::with_capacity(dataset.files.len());
        for (n, file) in dataset.files.iter().enumerate() {
            let path = dir.join(format!("{}.parquet", n));
            written.push(self.write_file(&path, &file.rows)?);
            self.log_page_layout(n, &file.rows);
        }
        log::info!(
            "Wrote {} files ({} rows) to {}",
            written.len(),
            dataset.total_rows(),
            dir.display()
        );
        Ok(written)
    }

    fn log_page_layout(&self, file_idx: usize, rows: &[Row]) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        for (i, logical_type) in self.types.iter().enumerate() {
            let column: Vec<_> = rows.iter().map(|r| r[i + 1].clone()).collect();
            let summary: Vec<String> = page_stats(&column, self.page_row_limit)
                .iter()
                .map(|p| {
                    format!(
                        "{}r/{}n/{}d",
                        p.row_count, p.null_count, p.distinct_count
                    )
                })
                .collect();
            log::debug!(
                "file {} {}: pages [{}]",
                file_idx,
                logical_type.column_name(),
                summary.join(", ")
            );
        }
    }
}

/// Convenience wrapper: builds a writer for `dataset.types` and writes it into `dir`.
pub fn write_dataset(
    dir: &Path,
    dataset: &Dataset,
    config: &HarnessConfig,
) -> Result<Vec<WrittenFile>> {
    ParquetFileWriter::new(&dataset.types, config)?.write_dataset(dir, dataset)
}

/// Writer properties for the fixture: no dictionary, page statistics, and
/// pages bounded by `page_row_limit` rows.
pub fn writer_properties(config: &HarnessConfig) -> WriterProperties {
    WriterProperties::builder()
        .set_compression(compression(config.compression))
        .set_dictionary_enabled(false)
        .set_statistics_enabled(EnabledStatistics::Page)
        // The row limit is only checked between mini-batches.
        .set_write_batch_size(config.page_row_limit)
        .set_data_page_row_count_limit(config.page_row_limit)
        .build()
}

fn compression(c: ColumnCompression) -> Compression {
    match c {
        ColumnCompression::Uncompressed => Compression::UNCOMPRESSED,
        ColumnCompression::Snappy => Compression::SNAPPY,
        ColumnCompression::Gzip => Compression::GZIP(GzipLevel::default()),
        ColumnCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
    }
}

fn encode_id(cell: &Value) -> Result<PhysicalValue> {
    match cell {
        Value::Int32(id) => Ok(PhysicalValue::Int32(*id)),
        other => Err(ColIndexError::InternalError(format!(
            "row identifier must be INT32, got {}",
            other.kind_name()
        ))),
    }
}

//==================================================================================
// 3. Column Buffers
//==================================================================================

/// Non-null physical values of one column, typed by physical kind.
enum ColumnBuffer {
    Boolean(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Int96(Vec<Int96>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    FixedLenByteArray(Vec<FixedLenByteArray>),
    ByteArray(Vec<ByteArray>),
}

impl ColumnBuffer {
    fn for_kind(kind: PhysicalKind) -> Self {
        match kind {
            PhysicalKind::Boolean => Self::Boolean(Vec::new()),
            PhysicalKind::Int32 => Self::Int32(Vec::new()),
            PhysicalKind::Int64 => Self::Int64(Vec::new()),
            PhysicalKind::Int96 => Self::Int96(Vec::new()),
            PhysicalKind::Float => Self::Float(Vec::new()),
            PhysicalKind::Double => Self::Double(Vec::new()),
            PhysicalKind::FixedLenByteArray => Self::FixedLenByteArray(Vec::new()),
            PhysicalKind::ByteArray => Self::ByteArray(Vec::new()),
        }
    }

    fn push(&mut self, value: PhysicalValue) -> Result<()> {
        match (self, value) {
            (Self::Boolean(b), PhysicalValue::Boolean(v)) => b.push(v),
            (Self::Int32(b), PhysicalValue::Int32(v)) => b.push(v),
            (Self::Int64(b), PhysicalValue::Int64(v)) => b.push(v),
            (Self::Int96(b), PhysicalValue::Int96(v)) => b.push(to_int96(&v)?),
            (Self::Float(b), PhysicalValue::Float(v)) => b.push(v),
            (Self::Double(b), PhysicalValue::Double(v)) => b.push(v),
            (Self::FixedLenByteArray(b), PhysicalValue::FixedLenByteArray(v)) => {
                b.push(FixedLenByteArray::from(ByteArray::from(v)))
            }
            (Self::ByteArray(b), PhysicalValue::ByteArray(v)) => b.push(ByteArray::from(v)),
            (_, other) => {
                return Err(ColIndexError::InternalError(format!(
                    "physical {} value routed to a column of another kind",
                    other.kind()
                )))
            }
        }
        Ok(())
    }

    fn write_to(&self, column: &mut SerializedColumnWriter<'_>, def_levels: &[i16]) -> Result<()> {
        let defs = Some(def_levels);
        match self {
            Self::Boolean(v) => column.typed::<BoolType>().write_batch(v, defs, None)?,
            Self::Int32(v) => column.typed::<Int32Type>().write_batch(v, defs, None)?,
            Self::Int64(v) => column.typed::<Int64Type>().write_batch(v, defs, None)?,
            Self::Int96(v) => column.typed::<Int96Type>().write_batch(v, defs, None)?,
            Self::Float(v) => column.typed::<FloatType>().write_batch(v, defs, None)?,
            Self::Double(v) => column.typed::<DoubleType>().write_batch(v, defs, None)?,
            Self::FixedLenByteArray(v) => column
                .typed::<FixedLenByteArrayType>()
                .write_batch(v, defs, None)?,
            Self::ByteArray(v) => column.typed::<ByteArrayType>().write_batch(v, defs, None)?,
        };
        Ok(())
    }
}

/// Packs a `NanoTime` as two little-endian nanosecond words followed by the Julian day.
fn to_int96(t: &NanoTime) -> Result<Int96> {
    let nanos = u64::try_from(t.nanos_of_day).map_err(|_| {
        ColIndexError::InternalError(format!("negative nanos of day {}", t.nanos_of_day))
    })?;
    let day = u32::try_from(t.julian_day).map_err(|_| {
        ColIndexError::InternalError(format!("negative julian day {}", t.julian_day))
    })?;
    let mut value = Int96::new();
    value.set_data(nanos as u32, (nanos >> 32) as u32, day);
    Ok(value)
}
