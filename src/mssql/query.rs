use std::sync::Arc;

use futures_util::TryStreamExt;
use tiberius::{ColumnData, FromSql, QueryItem, QueryStream};

use crate::error::SqlFacadeError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Drain a query stream into one result set per column-metadata token.
///
/// Column names are taken once from each result set's metadata, so empty
/// result sets keep their columns too.
///
/// # Errors
///
/// Returns the driver error if a row cannot be fetched or converted.
pub async fn build_result_sets(
    mut stream: QueryStream<'_>,
) -> Result<Vec<ResultSet>, SqlFacadeError> {
    let mut result_sets: Vec<ResultSet> = Vec::new();

    while let Some(item) = stream.try_next().await? {
        match item {
            QueryItem::Metadata(meta) => {
                let column_names: Vec<String> = meta
                    .columns()
                    .iter()
                    .map(|col| col.name().to_string())
                    .collect();
                result_sets.push(ResultSet::new(Arc::new(column_names)));
            }
            QueryItem::Row(row) => {
                let row_values = row
                    .into_iter()
                    .map(column_data_to_row_value)
                    .collect::<Result<Vec<_>, _>>()?;
                let result_set = result_sets.last_mut().ok_or_else(|| {
                    SqlFacadeError::ExecutionError(
                        "row received before column metadata".to_string(),
                    )
                })?;
                result_set.add_row_values(row_values);
            }
        }
    }

    Ok(result_sets)
}

/// Convert tiberius column data to a `RowValues`.
///
/// Exact numerics become floats, GUIDs and times become text, and
/// `datetimeoffset` values are normalized to UTC.
///
/// # Errors
///
/// Returns the driver error if a temporal value cannot be decoded.
pub fn column_data_to_row_value(data: ColumnData<'static>) -> Result<RowValues, SqlFacadeError> {
    let value = match data {
        ColumnData::Bit(v) => v.map(RowValues::Bool),
        ColumnData::U8(v) => v.map(|i| RowValues::Int(i64::from(i))),
        ColumnData::I16(v) => v.map(|i| RowValues::Int(i64::from(i))),
        ColumnData::I32(v) => v.map(|i| RowValues::Int(i64::from(i))),
        ColumnData::I64(v) => v.map(RowValues::Int),
        ColumnData::F32(v) => v.map(|f| RowValues::Float(f64::from(f))),
        ColumnData::F64(v) => v.map(RowValues::Float),
        ColumnData::String(v) => v.map(|s| RowValues::Text(s.into_owned())),
        ColumnData::Guid(v) => v.map(|g| RowValues::Text(g.to_string())),
        ColumnData::Binary(v) => v.map(|b| RowValues::Blob(b.into_owned())),
        ColumnData::Numeric(v) => v.map(|n| {
            #[allow(clippy::cast_precision_loss)]
            let scaled = n.value() as f64 / 10_f64.powi(i32::from(n.scale()));
            RowValues::Float(scaled)
        }),
        ColumnData::Xml(v) => v.map(|x| RowValues::Text(x.into_owned().into_string())),
        ref temporal @ (ColumnData::DateTime(_)
        | ColumnData::SmallDateTime(_)
        | ColumnData::DateTime2(_)) => {
            chrono::NaiveDateTime::from_sql(temporal)?.map(RowValues::Timestamp)
        }
        ref date @ ColumnData::Date(_) => chrono::NaiveDate::from_sql(date)?
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(RowValues::Timestamp),
        ref time @ ColumnData::Time(_) => chrono::NaiveTime::from_sql(time)?
            .map(|t| RowValues::Text(t.format("%H:%M:%S%.f").to_string())),
        ref offset @ ColumnData::DateTimeOffset(_) => {
            chrono::DateTime::<chrono::Utc>::from_sql(offset)?
                .map(|dt| RowValues::Timestamp(dt.naive_utc()))
        }
    };

    Ok(value.unwrap_or(RowValues::Null))
}
