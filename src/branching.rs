//! Schema branches: full copies of a schema named `base$$label`.
//!
//! Nothing here is transactional. Branch creation runs its statements one
//! after another and stops at the first error, leaving whatever was already
//! created in place.

use crate::error::{Error, Result};
use crate::naming::{branch_label, parse_schema_name, validate_base_name, validate_branch_name};
use crate::session::{qualified, quote_ident, resolve_session, Session};
use serde::Serialize;
use tracing::{debug, info, warn};

const SCHEMA_EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?";

const LIST_TABLES_SQL: &str = "SELECT TABLE_NAME FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = ? ORDER BY TABLE_NAME";

// EXTRA reads DEFAULT_GENERATED for expression defaults; those columns hold data.
const COPYABLE_COLUMNS_SQL: &str = "SELECT COLUMN_NAME FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     AND EXTRA NOT LIKE '%VIRTUAL GENERATED%' AND EXTRA NOT LIKE '%STORED GENERATED%' \
     ORDER BY ORDINAL_POSITION";

const BASE_TABLE: &str = "BASE TABLE";
const VIEW: &str = "VIEW";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub schema_name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub schema_name: String,
    pub tables: Vec<String>,
    pub views: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(BranchSummary),
    AlreadyExists { schema_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Dropped,
    NotFound,
}

pub fn schema_exists<S: Session + ?Sized>(session: &mut S, name: &str) -> Result<bool> {
    let rs = session.query(SCHEMA_EXISTS_SQL, &[name])?;
    match rs.first_value().and_then(|c| c.as_i64()) {
        Some(count) => Ok(count > 0),
        None => Err(Error::database(format!(
            "unexpected schema count for '{name}': {:?}",
            rs.first_value()
        ))),
    }
}

fn list_objects<S: Session + ?Sized>(
    session: &mut S,
    schema: &str,
    table_type: &str,
) -> Result<Vec<String>> {
    Ok(session.query(LIST_TABLES_SQL, &[schema, table_type])?.text_column(0))
}

fn copyable_columns<S: Session + ?Sized>(
    session: &mut S,
    schema: &str,
    table: &str,
) -> Result<Vec<String>> {
    Ok(session.query(COPYABLE_COLUMNS_SQL, &[schema, table])?.text_column(0))
}

/// Every schema on the server whose base name is `schema`, with its branch
/// label. The schema itself shows up as `mainline`. Order is the server's.
pub fn list_branches<S: Session + ?Sized>(
    session: Option<&mut S>,
    schema: &str,
) -> Result<Vec<Branch>> {
    let session = resolve_session(session)?;
    validate_base_name(schema)?;

    let databases = session.query("SHOW DATABASES", &[])?;
    let branches = databases
        .text_column(0)
        .into_iter()
        .filter(|name| parse_schema_name(name).0 == schema)
        .map(|name| Branch {
            label: branch_label(&name).to_string(),
            schema_name: name,
        })
        .collect::<Vec<_>>();
    debug!(schema, count = branches.len(), "listed branches");
    Ok(branches)
}

/// Copies `schema` into `schema$$branch`: tables by structure plus rows of
/// their non-generated columns, views as `SELECT *` over the source schema's view.
pub fn create_branch<S: Session + ?Sized>(
    session: Option<&mut S>,
    schema: &str,
    branch: &str,
) -> Result<CreateOutcome> {
    let session = resolve_session(session)?;
    let target = validate_branch_name(schema, branch)?;

    if schema_exists(session, &target)? {
        info!(schema = %target, "branch already exists");
        return Ok(CreateOutcome::AlreadyExists {
            schema_name: target,
        });
    }
    if !schema_exists(session, schema)? {
        return Err(Error::UnknownSchema(schema.to_string()));
    }

    session.execute(&format!("CREATE DATABASE {}", quote_ident(&target)))?;
    info!(schema = %target, "created branch schema");

    let tables = list_objects(session, schema, BASE_TABLE)?;
    for table in &tables {
        copy_table(session, schema, &target, table)?;
    }

    // The new view selects from the source schema's view, not from the
    // copied tables, so its data still tracks the source.
    let views = list_objects(session, schema, VIEW)?;
    for view in &views {
        session.execute(&format!(
            "CREATE VIEW {} AS SELECT * FROM {}",
            qualified(&target, view),
            qualified(schema, view)
        ))?;
        info!(schema = %target, view = %view, "created view");
    }

    Ok(CreateOutcome::Created(BranchSummary {
        schema_name: target,
        tables,
        views,
    }))
}

fn copy_table<S: Session + ?Sized>(
    session: &mut S,
    source: &str,
    target: &str,
    table: &str,
) -> Result<()> {
    let columns = copyable_columns(session, source, table)?;
    session.execute(&format!(
        "CREATE TABLE {} LIKE {}",
        qualified(target, table),
        qualified(source, table)
    ))?;

    if columns.is_empty() {
        warn!(table, "no copyable columns, skipping data copy");
        return Ok(());
    }
    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    session.execute(&format!(
        "INSERT INTO {} ({column_list}) SELECT {column_list} FROM {}",
        qualified(target, table),
        qualified(source, table)
    ))?;
    info!(schema = %target, table, "copied table");
    Ok(())
}

/// Drops `schema$$branch`. A branch that does not exist is not an error.
pub fn delete_branch<S: Session + ?Sized>(
    session: Option<&mut S>,
    schema: &str,
    branch: &str,
) -> Result<DeleteOutcome> {
    let session = resolve_session(session)?;
    let target = validate_branch_name(schema, branch)?;

    let existed = schema_exists(session, &target)?;
    session.execute(&format!("DROP DATABASE IF EXISTS {}", quote_ident(&target)))?;
    if existed {
        info!(schema = %target, "dropped branch");
        Ok(DeleteOutcome::Dropped)
    } else {
        debug!(schema = %target, "branch not found, nothing to drop");
        Ok(DeleteOutcome::NotFound)
    }
}
