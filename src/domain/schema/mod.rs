// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 记录模式模块
///
/// 定义各实体类型的字段布局、身份键与可变字段集合，
/// 并提供输入记录的校验、类型归一化与合并。所有存储后端共享这一层。
pub mod catalog;

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::{EntityKind, Record, ADD_TS, LAST_MODIFY_TS};

pub use catalog::{all_schemas, schema_for};

/// 日期字段的文本格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 字段的持久化类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Varchar(u32),
    BigInt,
    Int,
    Float,
    Date,
}

impl FieldType {
    fn describe(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Varchar(_) => "varchar",
            FieldType::BigInt => "bigint",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Date => "date (YYYY-MM-DD)",
        }
    }
}

/// 字段定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    /// 建普通索引
    pub indexed: bool,
    /// 建唯一索引
    pub unique: bool,
    /// 列不可为空，写入时必须给出非空值
    pub required: bool,
}

impl FieldDef {
    const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            indexed: false,
            unique: false,
            required: false,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub const fn varchar(name: &'static str, len: u32) -> Self {
        Self::new(name, FieldType::Varchar(len))
    }

    pub const fn bigint(name: &'static str) -> Self {
        Self::new(name, FieldType::BigInt)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// 记录校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("unknown field `{field}` for table {table}")]
    UnknownField { table: &'static str, field: String },

    #[error("identity field `{field}` missing or null for table {table}")]
    MissingIdentity {
        table: &'static str,
        field: &'static str,
    },

    #[error("required field `{field}` missing or null for table {table}")]
    MissingRequired {
        table: &'static str,
        field: &'static str,
    },

    #[error("field `{field}` of table {table} expects {expected}, got {found}")]
    TypeMismatch {
        table: &'static str,
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

/// 实体的记录模式
///
/// `identity` 为空表示该实体没有身份键，存储时直接追加；
/// 非空时存储按身份键做“存在则合并更新，否则插入”。
/// 每张表还隐含自增主键 `id` 以及审计列 `add_ts` / `last_modify_ts`。
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub table: &'static str,
    pub kind: EntityKind,
    pub identity: Vec<&'static str>,
    pub fields: Vec<FieldDef>,
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_identity(&self) -> bool {
        !self.identity.is_empty()
    }

    pub fn is_identity(&self, name: &str) -> bool {
        self.identity.iter().any(|id| *id == name)
    }

    /// 可变字段：除身份键和审计列以外的全部字段
    pub fn mutable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !self.is_identity(f.name))
    }

    /// 持久化列顺序：字段定义顺序，最后是审计列
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .map(|f| f.name)
            .chain([ADD_TS, LAST_MODIFY_TS])
            .collect()
    }

    /// 校验并归一化输入记录
    ///
    /// 拒绝未声明的字段，要求身份键与必填字段非空，并把值转换为声明类型。
    /// 输入中的审计时间戳会被忽略，由存储层重新盖章。
    pub fn normalize(&self, record: &Record) -> Result<Record, SchemaError> {
        let mut normalized = Record::new();

        for (key, value) in record.iter() {
            if key == ADD_TS || key == LAST_MODIFY_TS {
                continue;
            }
            let field = self.field(key).ok_or_else(|| SchemaError::UnknownField {
                table: self.table,
                field: key.clone(),
            })?;
            normalized.insert(key.clone(), self.coerce(field, value)?);
        }

        for name in &self.identity {
            if is_blank(normalized.get(name)) {
                return Err(SchemaError::MissingIdentity {
                    table: self.table,
                    field: *name,
                });
            }
        }

        for field in self.fields.iter().filter(|f| f.required) {
            if is_blank(normalized.get(field.name)) {
                return Err(SchemaError::MissingRequired {
                    table: self.table,
                    field: field.name,
                });
            }
        }

        Ok(normalized)
    }

    /// 身份键的 (字段, 值) 列表，按声明顺序
    pub fn identity_of(&self, record: &Record) -> Vec<(&'static str, Value)> {
        self.identity
            .iter()
            .map(|name| (*name, record.get(name).cloned().unwrap_or(Value::Null)))
            .collect()
    }

    /// 只归一化身份键，用于按身份查找
    pub fn key_of(&self, record: &Record) -> Result<Vec<(&'static str, Value)>, SchemaError> {
        self.identity
            .iter()
            .map(|name| {
                let missing = || SchemaError::MissingIdentity {
                    table: self.table,
                    field: *name,
                };
                let field = self.field(name).ok_or_else(missing)?;
                let value = record.get(name).filter(|v| !v.is_null()).ok_or_else(missing)?;
                Ok((*name, self.coerce(field, value)?))
            })
            .collect()
    }

    /// 把 `incoming` 中出现的可变字段覆盖到 `existing` 上
    ///
    /// 身份键与审计列保持 `existing` 的值；`incoming` 中未出现的字段保持不变。
    pub fn merge(&self, existing: &Record, incoming: &Record) -> Record {
        let mut merged = existing.clone();
        for (key, value) in incoming.iter() {
            if key == ADD_TS || key == LAST_MODIFY_TS || self.is_identity(key) {
                continue;
            }
            if self.field(key).is_some() {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    fn coerce(&self, field: &FieldDef, value: &Value) -> Result<Value, SchemaError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let mismatch = || SchemaError::TypeMismatch {
            table: self.table,
            field: field.name,
            expected: field.ty.describe(),
            found: value.to_string(),
        };

        match field.ty {
            FieldType::Text => Ok(Value::String(text_of(value))),
            FieldType::Varchar(len) => {
                let text = text_of(value);
                if text.chars().count() > len as usize {
                    return Err(mismatch());
                }
                Ok(Value::String(text))
            }
            FieldType::BigInt => integer_of(value).map(Value::from).ok_or_else(mismatch),
            FieldType::Int => integer_of(value)
                .and_then(|n| i32::try_from(n).ok())
                .map(Value::from)
                .ok_or_else(mismatch),
            FieldType::Float => {
                let number = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                number
                    .filter(|n| n.is_finite())
                    .map(Value::from)
                    .ok_or_else(mismatch)
            }
            FieldType::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
                .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
                .ok_or_else(mismatch),
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// 文本字段接受任意值，非字符串序列化为 JSON 文本
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
