#![cfg(feature = "sqlite")]

use serde_json::json;
use sql_facade::prelude::*;
use sql_facade::test_utils::TempSqliteDb;

#[tokio::test]
async fn scalar_returns_first_column_of_first_row() -> Result<(), SqlFacadeError> {
    let sql = SqlFacade::new(Some("sqlite::memory:".to_string()));

    let result = sql
        .scalar(&json!({ "commandText": "select 7 as a, 8 as b union all select 9, 10" }))
        .await?;
    assert_eq!(result, ExecutionResult::Scalar(RowValues::Int(7)));

    let result = sql
        .scalar(&json!({ "commandText": "select 1 where 0" }))
        .await?;
    assert_eq!(result.to_json(), json!(null));
    Ok(())
}

#[tokio::test]
async fn non_query_counts_changed_rows() -> Result<(), Box<dyn std::error::Error>> {
    let db = TempSqliteDb::new()?;
    let sql = SqlFacade::new(Some(db.connection_string()));

    let created = sql
        .non_query(&json!({ "commandText": "create table Tracks (Id INTEGER PRIMARY KEY, Name TEXT)" }))
        .await?;
    assert_eq!(created, ExecutionResult::AffectedCount(0));

    let inserted = sql
        .non_query(&json!({
            "commandText": "insert into Tracks (Name) values (@a), (@b), (@c)",
            "commandParameters": [{ "a": "one" }, { "b": "two" }, { "c": "three" }]
        }))
        .await?;
    assert_eq!(inserted.to_json(), json!(3));

    let updated = sql
        .non_query(&json!({
            "commandText": "update Tracks set Name = upper(Name) where Id > @Id",
            "commandParameters": { "Id": { "direction": "Input", "value": 1 } }
        }))
        .await?;
    assert_eq!(updated.to_json(), json!(2));

    let count = sql
        .scalar(&json!({ "commandText": "select count(*) from Tracks where Name = upper(Name)" }))
        .await?;
    assert_eq!(count.to_json(), json!(2));
    Ok(())
}

#[tokio::test]
async fn per_call_connection_string_is_used_when_none_is_bound() -> Result<(), Box<dyn std::error::Error>> {
    let db = TempSqliteDb::new()?;
    let sql = SqlFacade::from_args(&json!({}));

    sql.non_query(&json!({
        "connectionString": db.connection_string(),
        "commandText": "create table t (a int); insert into t values (5);"
    }))
    .await?;
    let value = sql
        .scalar(&json!({
            "connectionString": db.connection_string(),
            "commandText": "select a from t"
        }))
        .await?;
    assert_eq!(value.to_json(), json!(5));
    Ok(())
}

#[tokio::test]
async fn execute_dispatches_by_mode() -> Result<(), SqlFacadeError> {
    let sql = SqlFacade::new(Some("sqlite::memory:".to_string()));
    let input = json!({ "commandText": "select 3 as n" });

    assert_eq!(
        sql.execute(ExecutionMode::Query, &input).await?.to_json(),
        json!([{ "n": 3 }])
    );
    assert_eq!(
        sql.execute(ExecutionMode::Scalar, &input).await?.to_json(),
        json!(3)
    );
    assert_eq!(
        sql.execute(ExecutionMode::NonQuery, &input).await?.to_json(),
        json!(0)
    );
    Ok(())
}
