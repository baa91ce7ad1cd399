//! Generic read-only query execution.
//!
//! Catalog queries carry their own column lists, so execution here only
//! needs to read cells positionally and coerce `DuckDB` values into the
//! loosely typed [`CellValue`] rows the presentation layer renders.

use duckdb::Connection;
use duckdb::types::Value;
use stop_ledger_database_models::CellValue;

use crate::DbError;

/// Runs a read-only query and collects every row as loosely typed cells.
///
/// `column_count` is the number of columns the statement selects; cells
/// are read positionally.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails to prepare or execute, or a
/// cell cannot be converted.
pub fn run_query(
    conn: &Connection,
    sql: &str,
    column_count: usize,
) -> Result<Vec<Vec<CellValue>>, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut collected = Vec::new();

    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            let value: Value = row.get(idx)?;
            cells.push(convert_value(value)?);
        }
        collected.push(cells);
    }

    Ok(collected)
}

/// Coerces a `DuckDB` value into a [`CellValue`].
///
/// `SUM` over integer columns yields `HUGEINT`, so 128-bit values are
/// narrowed to 64 bits and overflow is reported as a conversion error
/// rather than silently wrapped.
fn convert_value(value: Value) -> Result<CellValue, DbError> {
    Ok(match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Bool(b),
        Value::TinyInt(i) => CellValue::Int(i64::from(i)),
        Value::SmallInt(i) => CellValue::Int(i64::from(i)),
        Value::Int(i) => CellValue::Int(i64::from(i)),
        Value::BigInt(i) => CellValue::Int(i),
        Value::HugeInt(i) => {
            CellValue::Int(i64::try_from(i).map_err(|_| DbError::Conversion {
                message: format!("HUGEINT value {i} does not fit in 64 bits"),
            })?)
        }
        Value::UTinyInt(i) => CellValue::Int(i64::from(i)),
        Value::USmallInt(i) => CellValue::Int(i64::from(i)),
        Value::UInt(i) => CellValue::Int(i64::from(i)),
        Value::UBigInt(i) => {
            CellValue::Int(i64::try_from(i).map_err(|_| DbError::Conversion {
                message: format!("UBIGINT value {i} does not fit in 64 bits"),
            })?)
        }
        Value::Float(f) => CellValue::Float(f64::from(f)),
        Value::Double(f) => CellValue::Float(f),
        Value::Text(s) => CellValue::Text(s),
        other => {
            return Err(DbError::Conversion {
                message: format!("unsupported column value: {other:?}"),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn collects_mixed_typed_rows() {
        let conn = open_in_memory().unwrap();
        let rows = run_query(
            &conn,
            "SELECT 'Speeding', 42, 7.5, TRUE, NULL",
            5,
        )
        .unwrap();

        assert_eq!(
            rows,
            vec![vec![
                CellValue::Text("Speeding".into()),
                CellValue::Int(42),
                CellValue::Float(7.5),
                CellValue::Bool(true),
                CellValue::Null,
            ]]
        );
    }

    #[test]
    fn narrows_hugeint_sums() {
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (n INTEGER); INSERT INTO t VALUES (1), (2), (3)")
            .unwrap();

        let rows = run_query(&conn, "SELECT SUM(n) FROM t", 1).unwrap();
        assert_eq!(rows, vec![vec![CellValue::Int(6)]]);
    }

    #[test]
    fn empty_result_collects_no_rows() {
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (n INTEGER)").unwrap();

        let rows = run_query(&conn, "SELECT n FROM t", 1).unwrap();
        assert!(rows.is_empty());
    }
}
