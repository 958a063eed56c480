use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row};
use time::{Duration, OffsetDateTime};

use crate::error::AppError;
use crate::models::{SortDirection, Todo, UpdateTodo};
use crate::ordering::{next_order, plan_reorder, Reorder, PARKED_ORDER};

pub type DbPool = Arc<Mutex<Connection>>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY,
        value TEXT NOT NULL,
        position INTEGER NOT NULL UNIQUE,
        done_at INTEGER
    );
";

const SELECT_TODO: &str = "SELECT id, value, position, done_at FROM todos";

pub fn init_db(path: impl AsRef<Path>) -> Result<DbPool> {
    prepare(Connection::open(path)?)
}

pub fn init_in_memory() -> Result<DbPool> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<DbPool> {
    conn.execute_batch(SCHEMA)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock()
        .map_err(|_| AppError::Server("database connection lock poisoned".to_string()))
}

/// Inserts a new item at the end of the list. Reading the current maximum and
/// inserting happen in one transaction under the connection lock.
pub fn create_todo(pool: &DbPool, value: &str) -> Result<Todo, AppError> {
    let mut conn = lock(pool)?;
    let tx = conn.transaction()?;

    let order = next_order(max_order(&tx)?)
        .ok_or_else(|| AppError::Server("no order left after the current maximum".to_string()))?;

    tx.execute(
        "INSERT INTO todos (value, position) VALUES (?1, ?2)",
        (value, order),
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Todo {
        id,
        value: value.to_string(),
        order,
        done_at: None,
    })
}

pub fn list_todos(pool: &DbPool, sort: SortDirection) -> Result<Vec<Todo>, AppError> {
    let conn = lock(pool)?;
    let query = match sort {
        SortDirection::Asc => format!("{SELECT_TODO} ORDER BY position ASC"),
        SortDirection::Desc => format!("{SELECT_TODO} ORDER BY position DESC"),
    };
    let mut stmt = conn.prepare(&query)?;
    let todos = stmt
        .query_map([], todo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(todos)
}

pub fn get_todo(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
    let conn = lock(pool)?;
    fetch_by_id(&conn, id)
}

/// Applies a patch in a single transaction: the order swap, the done flag and
/// the value change either all land or none do.
pub fn update_todo(
    pool: &DbPool,
    id: i64,
    update: &UpdateTodo,
    now: OffsetDateTime,
) -> Result<Option<Todo>, AppError> {
    let mut conn = lock(pool)?;
    let tx = conn.transaction()?;

    let Some(mut todo) = fetch_by_id(&tx, id)? else {
        return Ok(None);
    };

    if let Some(requested) = update.order {
        // items can only move within the occupied range
        let max = max_order(&tx)?.unwrap_or(todo.order);
        if requested > max {
            return Err(AppError::Validation(format!(
                "\"order\" must be less than or equal to {max}"
            )));
        }
        let holder = fetch_by_order(&tx, requested)?.map(|other| other.id);
        match plan_reorder(todo.order, requested, holder) {
            Reorder::Unchanged => {}
            Reorder::Move { to } => todo.order = to,
            Reorder::Swap {
                to,
                other_id,
                other_to,
            } => {
                set_position(&tx, todo.id, PARKED_ORDER)?;
                set_position(&tx, other_id, other_to)?;
                todo.order = to;
            }
        }
    }

    if let Some(done) = update.done {
        todo.done_at = done.then(|| truncate_to_millis(now));
    }

    if let Some(value) = update.value.as_deref().filter(|value| !value.is_empty()) {
        todo.value = value.to_string();
    }

    write_todo(&tx, &todo)?;
    tx.commit()?;

    Ok(Some(todo))
}

pub fn delete_todo(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = lock(pool)?;
    let rows = conn.execute("DELETE FROM todos WHERE id = ?1", [id])?;
    Ok(rows > 0)
}

fn max_order(conn: &Connection) -> Result<Option<i64>, AppError> {
    let max = conn.query_row("SELECT MAX(position) FROM todos", [], |row| row.get(0))?;
    Ok(max)
}

fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<Todo>, AppError> {
    let todo = conn
        .query_row(&format!("{SELECT_TODO} WHERE id = ?1"), [id], todo_from_row)
        .optional()?;
    Ok(todo)
}

fn fetch_by_order(conn: &Connection, order: i64) -> Result<Option<Todo>, AppError> {
    let todo = conn
        .query_row(
            &format!("{SELECT_TODO} WHERE position = ?1"),
            [order],
            todo_from_row,
        )
        .optional()?;
    Ok(todo)
}

fn set_position(conn: &Connection, id: i64, position: i64) -> Result<(), AppError> {
    conn.execute(
        "UPDATE todos SET position = ?1 WHERE id = ?2",
        (position, id),
    )?;
    Ok(())
}

/// Overwrites every column of an existing row.
fn write_todo(conn: &Connection, todo: &Todo) -> Result<usize, AppError> {
    let rows = conn.execute(
        "UPDATE todos SET value = ?1, position = ?2, done_at = ?3 WHERE id = ?4",
        (
            &todo.value,
            todo.order,
            todo.done_at.map(to_millis),
            todo.id,
        ),
    )?;
    Ok(rows)
}

fn todo_from_row(row: &Row<'_>) -> Result<Todo> {
    let done_at: Option<i64> = row.get(3)?;
    let done_at = done_at
        .map(from_millis)
        .transpose()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(err)))?;

    Ok(Todo {
        id: row.get(0)?,
        value: row.get(1)?,
        order: row.get(2)?,
        done_at,
    })
}

// done_at is stored as unix milliseconds
fn to_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
}

fn truncate_to_millis(at: OffsetDateTime) -> OffsetDateTime {
    at - Duration::nanoseconds(i64::from(at.nanosecond() % 1_000_000))
}
