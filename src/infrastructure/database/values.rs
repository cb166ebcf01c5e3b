// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 记录字段与 SQL 值之间的转换

use chrono::NaiveDate;
use sea_orm::{DbErr, QueryResult, Value as SqlValue};
use serde_json::Value;

use crate::domain::models::{Record, ADD_TS, LAST_MODIFY_TS};
use crate::domain::schema::{FieldType, RecordSchema, DATE_FORMAT};

/// 把归一化后的字段值转换为绑定参数
///
/// 空值按列类型生成带类型的 NULL，Postgres 绑定时需要。
pub fn to_sql_value(ty: FieldType, value: &Value) -> Result<SqlValue, DbErr> {
    let mismatch = || DbErr::Type(format!("cannot bind {} as {:?}", value, ty));

    let bound: SqlValue = match ty {
        FieldType::Text | FieldType::Varchar(_) => match value {
            Value::Null => Option::<String>::None.into(),
            Value::String(s) => s.clone().into(),
            other => other.to_string().into(),
        },
        FieldType::BigInt => match value {
            Value::Null => Option::<i64>::None.into(),
            other => other.as_i64().ok_or_else(mismatch)?.into(),
        },
        FieldType::Int => match value {
            Value::Null => Option::<i32>::None.into(),
            other => other
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(mismatch)?
                .into(),
        },
        FieldType::Float => match value {
            Value::Null => Option::<f64>::None.into(),
            other => other.as_f64().ok_or_else(mismatch)?.into(),
        },
        FieldType::Date => match value {
            Value::Null => Option::<NaiveDate>::None.into(),
            other => other
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .ok_or_else(mismatch)?
                .into(),
        },
    };
    Ok(bound)
}

fn read_field(row: &QueryResult, name: &str, ty: FieldType) -> Result<Value, DbErr> {
    let value = match ty {
        FieldType::Text | FieldType::Varchar(_) => {
            row.try_get::<Option<String>>("", name)?.map(Value::from)
        }
        FieldType::BigInt => row.try_get::<Option<i64>>("", name)?.map(Value::from),
        FieldType::Int => row.try_get::<Option<i32>>("", name)?.map(Value::from),
        FieldType::Float => row.try_get::<Option<f64>>("", name)?.map(Value::from),
        FieldType::Date => row
            .try_get::<Option<NaiveDate>>("", name)?
            .map(|d| Value::from(d.format(DATE_FORMAT).to_string())),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// 把查询结果行还原为记录
///
/// 列里存不下"未提供"和显式 `null` 的区别，两者都落成 NULL，
/// 读回时一律省略该字段。
pub fn row_to_record(schema: &RecordSchema, row: &QueryResult) -> Result<Record, DbErr> {
    let mut record = Record::new();
    for field in &schema.fields {
        let value = read_field(row, field.name, field.ty)?;
        if !value.is_null() {
            record.insert(field.name, value);
        }
    }
    for audit in [ADD_TS, LAST_MODIFY_TS] {
        if let Some(ts) = row.try_get::<Option<i64>>("", audit)? {
            record.insert(audit, ts);
        }
    }
    Ok(record)
}
