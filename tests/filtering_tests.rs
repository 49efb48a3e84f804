//! End-to-end filtering cases against in-memory engine fakes.
//!
//! `FakeWriter` records table definitions in a shared catalog. `FakeReader`
//! answers the query template over the regenerated dataset, pruning pages
//! from their statistics when pushdown is on, the way a real reader uses
//! its page index.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use colindex::codec;
use colindex::collaborators::{ArtifactStore, LocalArtifactStore, SqlReader, TableWriter};
use colindex::dataset::{generate, page_stats, transpose, Dataset, Row};
use colindex::harness::{run_all_cases, CaseOutcome, DatasetCache, TableDefinition};
use colindex::query::{Operator, OperatorPreset};
use colindex::types::{supported_types, Engine, LogicalType, Value};
use colindex::{ColIndexError, HarnessConfig, Result};

type Catalog = Rc<RefCell<HashMap<String, TableDefinition>>>;

//==================================================================================
// Fakes
//==================================================================================

struct FakeWriter {
    engine: Engine,
    catalog: Catalog,
    dropped: Vec<String>,
}

impl TableWriter for FakeWriter {
    fn engine(&self) -> Engine {
        self.engine
    }

    fn create_external_table(&mut self, definition: &TableDefinition) -> Result<()> {
        self.catalog
            .borrow_mut()
            .insert(definition.name.clone(), definition.clone());
        Ok(())
    }

    fn drop_table(&mut self, table_name: &str) -> Result<()> {
        self.catalog.borrow_mut().remove(table_name);
        self.dropped.push(table_name.to_string());
        Ok(())
    }
}

/// A writer whose DDL always fails.
struct RejectingWriter {
    attempts: usize,
}

impl TableWriter for RejectingWriter {
    fn engine(&self) -> Engine {
        Engine::Hive
    }

    fn create_external_table(&mut self, _definition: &TableDefinition) -> Result<()> {
        self.attempts += 1;
        Err(ColIndexError::collaborator("rejecting-writer", "DDL refused"))
    }

    fn drop_table(&mut self, _table_name: &str) -> Result<()> {
        Ok(())
    }
}

/// A local store whose first `remove_dir_all` fails.
struct StickyStore {
    failed_once: Cell<bool>,
}

impl ArtifactStore for StickyStore {
    fn create_dir(&self, path: &Path) -> Result<()> {
        LocalArtifactStore.create_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        if !self.failed_once.replace(true) {
            return Err(ColIndexError::collaborator("sticky-store", "device busy"));
        }
        LocalArtifactStore.remove_dir_all(path)
    }
}

/// How the reader treats page statistics when pushdown is on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Pruning {
    Correct,
    /// Skips every page that contains a null, whatever the filter.
    SkipsPagesWithNulls,
}

struct FakeReader {
    engine: Engine,
    catalog: Catalog,
    pushdown: bool,
    pruning: Pruning,
    toggles: Vec<bool>,
}

impl FakeReader {
    fn new(engine: Engine, catalog: Catalog) -> Self {
        Self {
            engine,
            catalog,
            pushdown: false,
            pruning: Pruning::Correct,
            toggles: Vec::new(),
        }
    }
}

struct Filter {
    table: String,
    column: LogicalType,
    op: Operator,
    literal: Option<Value>,
}

fn parse(query: &str) -> Filter {
    let rest = query.strip_prefix("SELECT id, ").unwrap();
    let (column_name, rest) = rest.split_once(" FROM ").unwrap();
    let (table, rest) = rest.split_once(" WHERE ").unwrap();
    let condition = rest.strip_suffix(" ORDER BY id").unwrap();
    let column = *LogicalType::ALL
        .iter()
        .find(|t| t.column_name() == column_name)
        .unwrap();
    let condition = condition
        .strip_prefix(column_name)
        .unwrap()
        .trim_start();

    // Longest spellings first so `<=` is not read as `<`.
    let ops = [
        Operator::IsNotNull,
        Operator::IsNull,
        Operator::Le,
        Operator::Ge,
        Operator::NotEq,
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
    ];
    let (op, literal_text) = ops
        .iter()
        .find_map(|op| {
            condition
                .strip_prefix(op.sql())
                .and_then(|r| r.strip_prefix(' '))
                .map(|r| (*op, r))
        })
        .unwrap();

    let literal = if literal_text == "NULL" {
        None
    } else {
        let values = codec::representative_values(column);
        Some(
            values
                .into_iter()
                .find(|v| codec::literal(column, Some(v)).unwrap() == literal_text)
                .unwrap(),
        )
    };
    Filter {
        table: table.to_string(),
        column,
        op,
        literal,
    }
}

fn matches(cell: &Option<Value>, op: Operator, literal: Option<&Value>) -> bool {
    match (cell, op) {
        (None, Operator::IsNull) => true,
        (Some(_), Operator::IsNotNull) => true,
        (None, _) | (Some(_), Operator::IsNull) => false,
        (Some(v), op) => {
            let Some(ord) = literal.and_then(|l| v.compare(l)) else {
                return false;
            };
            match op {
                Operator::Eq => ord == Ordering::Equal,
                Operator::NotEq => ord != Ordering::Equal,
                Operator::Lt => ord == Ordering::Less,
                Operator::Le => ord != Ordering::Greater,
                Operator::Gt => ord == Ordering::Greater,
                Operator::Ge => ord != Ordering::Less,
                Operator::IsNull | Operator::IsNotNull => false,
            }
        }
    }
}

impl SqlReader for FakeReader {
    fn engine(&self) -> Engine {
        self.engine
    }

    fn set_predicate_pushdown(&mut self, enabled: bool) -> Result<()> {
        self.pushdown = enabled;
        self.toggles.push(enabled);
        Ok(())
    }

    fn query_rows(&mut self, query: &str) -> Result<Vec<Row>> {
        let filter = parse(query);
        let definition = self
            .catalog
            .borrow()
            .get(&filter.table)
            .cloned()
            .ok_or_else(|| ColIndexError::collaborator("fake-reader", "table not found"))?;
        let types: Vec<LogicalType> = definition.columns[1..]
            .iter()
            .map(|(name, _)| {
                *LogicalType::ALL
                    .iter()
                    .find(|t| t.column_name() == name.as_str())
                    .unwrap()
            })
            .collect();
        let column_idx = 1 + types.iter().position(|t| *t == filter.column).unwrap();
        let dataset: Dataset = transpose(&generate(&types))?;

        let mut out = Vec::new();
        for file in &dataset.files {
            let column: Vec<_> = file.rows.iter().map(|r| r[column_idx].clone()).collect();
            let pages = page_stats(&column, 3);
            for (row_idx, row) in file.rows.iter().enumerate() {
                let page = &pages[row_idx / 3];
                if self.pushdown {
                    let skip = match self.pruning {
                        Pruning::Correct => page.can_skip(filter.op, filter.literal.as_ref()),
                        Pruning::SkipsPagesWithNulls => page.null_count > 0,
                    };
                    if skip {
                        continue;
                    }
                }
                if matches(&row[column_idx], filter.op, filter.literal.as_ref()) {
                    out.push(vec![row[0].clone(), row[column_idx].clone()]);
                }
            }
        }
        Ok(out)
    }
}

//==================================================================================
// Helpers
//==================================================================================

struct Fixture {
    _root: tempfile::TempDir,
    catalog: Catalog,
    cache: DatasetCache,
    writer: FakeWriter,
    store: LocalArtifactStore,
}

fn fixture(preset: OperatorPreset, keep_artifacts: bool) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let config = HarnessConfig {
        work_root: root.path().to_path_buf(),
        operators: preset,
        keep_artifacts,
        ..HarnessConfig::default()
    };
    let catalog: Catalog = Rc::new(RefCell::new(HashMap::new()));
    Fixture {
        _root: root,
        catalog: Rc::clone(&catalog),
        cache: DatasetCache::new(Arc::new(config)),
        writer: FakeWriter {
            engine: Engine::Hive,
            catalog,
            dropped: Vec::new(),
        },
        store: LocalArtifactStore,
    }
}

//==================================================================================
// Tests
//==================================================================================

#[test]
fn test_int32_greater_than_42_returns_max_rows() {
    // Arrange
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut reader = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    let types = supported_types(Engine::Impala);
    let table = fx
        .cache
        .get_or_build(&mut fx.writer, &fx.store, &types)
        .unwrap()
        .table
        .name
        .clone();
    let query = colindex::query::render_query(
        &table,
        "int32_col",
        Operator::Gt,
        &codec::literal(LogicalType::Int32, Some(&Value::Int32(42))).unwrap(),
    );
    assert!(query.ends_with("WHERE int32_col > CAST('42' AS INT) ORDER BY id"));

    // Act
    reader.set_predicate_pushdown(false).unwrap();
    let reference = reader.query_rows(&query).unwrap();
    reader.set_predicate_pushdown(true).unwrap();
    let actual = reader.query_rows(&query).unwrap();

    // Assert
    let max = Some(Value::Int32(i32::MAX));
    let expected: Vec<Row> = [6, 10, 19]
        .iter()
        .map(|&id| vec![Some(Value::Int32(id)), max.clone()])
        .collect();
    assert_eq!(reference, expected);
    assert_eq!(actual, expected);
}

#[test]
fn test_case_passes_with_default_operators() {
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut reader = FakeReader::new(Engine::SparkSql, Rc::clone(&fx.catalog));

    let outcome = colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut reader,
        &fx.store,
        LogicalType::Utf8,
    )
    .unwrap();

    assert_eq!(outcome, CaseOutcome::Passed { queries: 4 });
    // Pushdown is toggled off then on for every query.
    assert_eq!(reader.toggles, [false, true].repeat(4));
}

#[test]
fn test_all_operators_pass_for_every_supported_type() {
    let mut fx = fixture(OperatorPreset::All, false);
    let mut reader = FakeReader::new(Engine::Hive, Rc::clone(&fx.catalog));

    let outcomes = run_all_cases(&mut fx.cache, &mut fx.writer, &mut reader, &fx.store).unwrap();

    for (t, outcome) in &outcomes {
        if t.is_supported(Engine::Hive) {
            // six comparisons per value, plus IS NULL and IS NOT NULL
            assert_eq!(outcome, &CaseOutcome::Passed { queries: 26 }, "{}", t);
        } else {
            assert!(matches!(outcome, CaseOutcome::Skipped { .. }), "{}", t);
        }
    }
    assert_eq!(fx.cache.build_count(), 1);
}

#[test]
fn test_unsupported_types_are_skipped_without_building() {
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut impala = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    let mut hive = FakeReader::new(Engine::Hive, Rc::clone(&fx.catalog));

    let fixed3 = colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut impala,
        &fx.store,
        LogicalType::Fixed3,
    )
    .unwrap();
    let dec32 = colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut hive,
        &fx.store,
        LogicalType::DecimalAsInt32,
    )
    .unwrap();

    assert!(matches!(fixed3, CaseOutcome::Skipped { .. }));
    assert!(matches!(dec32, CaseOutcome::Skipped { .. }));
    assert!(fx.cache.is_empty());
    assert!(impala.toggles.is_empty());
}

#[test]
fn test_faulty_pruning_is_reported_as_mismatch() {
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut reader = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    reader.pruning = Pruning::SkipsPagesWithNulls;

    let err = colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut reader,
        &fx.store,
        LogicalType::Int32,
    )
    .unwrap_err();

    match err {
        ColIndexError::Mismatch { reference, actual } => {
            assert_ne!(reference, actual);
            assert!(reference.lines().count() > actual.lines().count());
        }
        other => panic!("expected Mismatch, got {:?}", other),
    }
}

#[test]
fn test_cache_builds_once_per_writer_and_type_set() {
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut impala = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    let mut hive = FakeReader::new(Engine::Hive, Rc::clone(&fx.catalog));

    for t in [LogicalType::Int32, LogicalType::Double] {
        colindex::run_filtering_case(&mut fx.cache, &mut fx.writer, &mut impala, &fx.store, t)
            .unwrap();
    }
    assert_eq!(fx.cache.build_count(), 1);

    // Hive supports a different type set, so it needs its own table.
    colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut hive,
        &fx.store,
        LogicalType::Int32,
    )
    .unwrap();
    assert_eq!(fx.cache.build_count(), 2);
    assert_eq!(fx.catalog.borrow().len(), 2);
}

#[test]
fn test_teardown_drops_tables_and_directories() {
    // Arrange
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut reader = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut reader,
        &fx.store,
        LogicalType::Int64,
    )
    .unwrap();
    let entry = fx
        .cache
        .get(Engine::Hive, &supported_types(Engine::Impala))
        .unwrap()
        .clone();
    assert!(entry.definition.location.is_dir());
    assert_eq!(entry.files.len(), 3);

    // Act
    fx.cache.teardown(&mut [&mut fx.writer as &mut dyn TableWriter], &fx.store).unwrap();

    // Assert
    assert!(fx.cache.is_empty());
    assert!(!entry.definition.location.exists());
    assert_eq!(fx.writer.dropped, vec![entry.table.name.clone()]);
    assert!(fx.catalog.borrow().is_empty());
}

#[test]
fn test_teardown_keeps_artifacts_when_asked() {
    let mut fx = fixture(OperatorPreset::Default, true);
    let mut reader = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut reader,
        &fx.store,
        LogicalType::Boolean,
    )
    .unwrap();
    let location = fx
        .cache
        .get(Engine::Hive, &supported_types(Engine::Impala))
        .unwrap()
        .definition
        .location
        .clone();

    fx.cache.teardown(&mut [&mut fx.writer as &mut dyn TableWriter], &fx.store).unwrap();

    assert!(fx.cache.is_empty());
    assert!(location.is_dir());
    assert!(fx.writer.dropped.is_empty());
    fx.store.remove_dir_all(&location).unwrap();
}

#[test]
fn test_teardown_without_matching_writer_fails() {
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut reader = FakeReader::new(Engine::Impala, Rc::clone(&fx.catalog));
    colindex::run_filtering_case(
        &mut fx.cache,
        &mut fx.writer,
        &mut reader,
        &fx.store,
        LogicalType::Float,
    )
    .unwrap();

    let mut other = FakeWriter {
        engine: Engine::SparkSql,
        catalog: Rc::clone(&fx.catalog),
        dropped: Vec::new(),
    };
    let err = fx.cache.teardown(&mut [&mut other as &mut dyn TableWriter], &fx.store).unwrap_err();

    assert!(matches!(err, ColIndexError::InvalidConfig(_)));
    assert_eq!(fx.cache.len(), 1);
}

#[test]
fn test_failed_build_leaves_no_directory_behind() {
    // Arrange
    let mut fx = fixture(OperatorPreset::Default, false);
    let mut writer = RejectingWriter { attempts: 0 };
    let types = supported_types(Engine::Impala);
    let work_root = fx.cache.config().work_root.clone();

    // Act
    for _ in 0..2 {
        let err = fx.cache.get_or_build(&mut writer, &fx.store, &types).unwrap_err();
        assert!(matches!(err, ColIndexError::Collaborator { .. }));
    }
    fx.cache.teardown(&mut [&mut writer as &mut dyn TableWriter], &fx.store).unwrap();

    // Assert
    assert_eq!(writer.attempts, 2);
    assert!(fx.cache.is_empty());
    assert_eq!(fx.cache.build_count(), 0);
    let leftover: Vec<_> = std::fs::read_dir(&work_root)
        .map(|entries| entries.map(|e| e.unwrap().file_name()).collect())
        .unwrap_or_default();
    assert!(leftover.is_empty(), "leftover table directories: {:?}", leftover);
}

#[test]
fn test_teardown_retry_does_not_drop_a_table_twice() {
    // Arrange
    let mut fx = fixture(OperatorPreset::Default, false);
    let store = StickyStore {
        failed_once: Cell::new(false),
    };
    let types = supported_types(Engine::Impala);
    let location = fx
        .cache
        .get_or_build(&mut fx.writer, &store, &types)
        .unwrap()
        .definition
        .location
        .clone();

    // Act
    let first = fx.cache.teardown(&mut [&mut fx.writer as &mut dyn TableWriter], &store);
    let second = fx.cache.teardown(&mut [&mut fx.writer as &mut dyn TableWriter], &store);

    // Assert
    assert!(matches!(first, Err(ColIndexError::Collaborator { .. })));
    assert!(second.is_ok());
    assert!(fx.cache.is_empty());
    assert_eq!(fx.writer.dropped.len(), 1);
    // The table is gone from the cache, so its directory is the caller's to clean up.
    assert!(location.is_dir());
    store.remove_dir_all(&location).unwrap();
}
