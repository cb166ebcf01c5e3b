// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::sea_query::{Alias, ColumnDef, Index, IndexCreateStatement, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{debug, info};

use crate::domain::models::{ADD_TS, LAST_MODIFY_TS};
use crate::domain::schema::{all_schemas, FieldType, RecordSchema};

/// 按模式目录建表建索引
///
/// 所有语句都带 `IF NOT EXISTS`，可以在每次启动时重复执行。
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schemas = all_schemas();

    for schema in &schemas {
        db.execute(backend.build(&create_table(schema))).await?;
        for index in create_indexes(schema) {
            db.execute(backend.build(&index)).await?;
        }
        debug!(table = schema.table, "Table synced");
    }

    info!(tables = schemas.len(), backend = ?backend, "Schema synced");
    Ok(())
}

fn create_table(schema: &RecordSchema) -> TableCreateStatement {
    let mut table = Table::create();
    table.table(Alias::new(schema.table)).if_not_exists().col(
        ColumnDef::new(Alias::new("id"))
            .integer()
            .not_null()
            .auto_increment()
            .primary_key(),
    );

    for field in &schema.fields {
        let mut column = ColumnDef::new(Alias::new(field.name));
        match field.ty {
            FieldType::Text => column.text(),
            FieldType::Varchar(len) => column.string_len(len),
            FieldType::BigInt => column.big_integer(),
            FieldType::Int => column.integer(),
            FieldType::Float => column.double(),
            FieldType::Date => column.date(),
        };
        if field.required || schema.is_identity(field.name) {
            column.not_null();
        }
        table.col(&mut column);
    }

    for audit in [ADD_TS, LAST_MODIFY_TS] {
        table.col(ColumnDef::new(Alias::new(audit)).big_integer().not_null());
    }

    table.to_owned()
}

/// 身份键唯一索引、唯一字段索引和普通索引
pub(crate) fn create_indexes(schema: &RecordSchema) -> Vec<IndexCreateStatement> {
    let mut indexes = Vec::new();

    if schema.has_identity() {
        let mut identity = Index::create();
        identity
            .if_not_exists()
            .name(format!("uk_{}_identity", schema.table))
            .table(Alias::new(schema.table))
            .unique();
        for name in &schema.identity {
            identity.col(Alias::new(*name));
        }
        indexes.push(identity.to_owned());
    }

    for field in &schema.fields {
        if field.unique {
            indexes.push(
                Index::create()
                    .if_not_exists()
                    .name(format!("uk_{}_{}", schema.table, field.name))
                    .table(Alias::new(schema.table))
                    .col(Alias::new(field.name))
                    .unique()
                    .to_owned(),
            );
        } else if field.indexed {
            indexes.push(
                Index::create()
                    .if_not_exists()
                    .name(format!("idx_{}_{}", schema.table, field.name))
                    .table(Alias::new(schema.table))
                    .col(Alias::new(field.name))
                    .to_owned(),
            );
        }
    }

    indexes
}
