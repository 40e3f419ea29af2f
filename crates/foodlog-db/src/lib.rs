// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod pattern;

use anyhow::{Context, Result, anyhow, bail};
use foodlog_app::{Dish, DishId, NewDish, format_iso_date, parse_iso_date};
use rusqlite::functions::{Context as FunctionContext, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::Date;

pub use pattern::{
    TextMatcher, UnicodeMatcher, like_matches, like_matches_escaped, nocase_compare,
};

pub const APP_NAME: &str = "foodlog";
pub const DB_FILE_NAME: &str = "food.db";

const DISH_TABLE: &str = "dishes";
const DISH_COLUMNS: [&str; 7] = [
    "id", "name", "calories", "proteins", "fats", "carbs", "date",
];
const DISH_SELECT: &str = "SELECT id, name, calories, proteins, fats, carbs, date FROM dishes";

/// Owner of the single long-lived SQLite connection.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        configure_connection(&conn)?;
        let store = Self { conn };
        store.register_matcher(UnicodeMatcher)?;
        Ok(store)
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the dish table when absent; an existing table is checked for
    /// the required columns and left untouched.
    pub fn ensure_schema(&self) -> Result<()> {
        if table_exists(&self.conn, DISH_TABLE)? {
            validate_schema(&self.conn)?;
        }
        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create schema")?;
        log::debug!("schema ensured for table {DISH_TABLE}");
        Ok(())
    }

    /// Routes `LIKE` and `COLLATE NOCASE` through `matcher`.
    pub fn register_matcher<M: TextMatcher>(&self, matcher: M) -> Result<()> {
        let matcher = Arc::new(matcher);
        let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

        let like = Arc::clone(&matcher);
        self.conn
            .create_scalar_function("like", 2, flags, move |ctx| {
                let (Some(pattern), Some(value)) = (text_arg(ctx, 0), text_arg(ctx, 1)) else {
                    return Ok(None);
                };
                Ok(Some(like.matches(&pattern, &value, None)))
            })
            .context("register like(X, Y)")?;

        let like_escape = Arc::clone(&matcher);
        self.conn
            .create_scalar_function("like", 3, flags, move |ctx| {
                let (Some(pattern), Some(value)) = (text_arg(ctx, 0), text_arg(ctx, 1)) else {
                    return Ok(None);
                };
                let escape = escape_arg(ctx, 2)?;
                Ok(Some(like_escape.matches(&pattern, &value, escape)))
            })
            .context("register like(X, Y, Z)")?;

        let collate = Arc::clone(&matcher);
        self.conn
            .create_collation("NOCASE", move |left, right| collate.compare(left, right))
            .context("register NOCASE collation")?;
        Ok(())
    }

    pub fn insert_dish(&self, dish: &NewDish) -> Result<DishId> {
        let date = format_iso_date(dish.date)
            .with_context(|| format!("format date of dish {:?}", dish.name))?;
        self.conn
            .execute(
                "
                INSERT INTO dishes (name, calories, proteins, fats, carbs, date)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
                params![
                    dish.name,
                    dish.calories,
                    dish.proteins,
                    dish.fats,
                    dish.carbs,
                    date,
                ],
            )
            .with_context(|| format!("insert dish {:?}", dish.name))?;

        let id = DishId::new(self.conn.last_insert_rowid());
        log::info!("inserted dish {id} dated {date}");
        Ok(id)
    }

    /// Every dish in insertion order.
    pub fn list_dishes(&self) -> Result<Vec<Dish>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DISH_SELECT} ORDER BY id ASC"))
            .context("prepare dishes query")?;
        let rows = stmt.query_map([], dish_from_row).context("query dishes")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect dishes")
    }

    /// Dishes dated within `[from, to]`; an inverted range is empty.
    pub fn list_dishes_in_range(&self, from: Date, to: Date) -> Result<Vec<Dish>> {
        if from > to {
            return Ok(Vec::new());
        }
        let from = format_iso_date(from).context("format range start")?;
        let to = format_iso_date(to).context("format range end")?;
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{DISH_SELECT} WHERE date >= ? AND date <= ? ORDER BY id ASC"
            ))
            .context("prepare dish range query")?;
        let rows = stmt
            .query_map(params![from, to], dish_from_row)
            .context("query dish range")?;
        let dishes = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect dish range")?;
        log::debug!("range {from}..={to} returned {} dishes", dishes.len());
        Ok(dishes)
    }

    /// Name search with `LIKE` wildcards, ordered case-insensitively.
    pub fn search_dishes(&self, pattern: &str) -> Result<Vec<Dish>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{DISH_SELECT} WHERE name LIKE ? ORDER BY name COLLATE NOCASE ASC, id ASC"
            ))
            .context("prepare dish search")?;
        let rows = stmt
            .query_map(params![pattern], dish_from_row)
            .with_context(|| format!("search dishes matching {pattern:?}"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect dish search")
    }

    pub fn count_dishes(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dishes", [], |row| row.get(0))
            .context("count dishes")?;
        usize::try_from(count).context("dish count out of range")
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("FOODLOG_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let app_dir = data_dir()?;
    Ok(app_dir.join(DB_FILE_NAME))
}

/// Per-user data directory, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set FOODLOG_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn dish_from_row(row: &Row<'_>) -> rusqlite::Result<Dish> {
    let date_raw: String = row.get(6)?;
    let date = parse_iso_date(&date_raw)
        .ok_or_else(|| anyhow!("unsupported dish date {date_raw:?}; expected YYYY-MM-DD"))
        .map_err(to_sql_error)?;

    Ok(Dish {
        id: DishId::new(row.get(0)?),
        name: row.get(1)?,
        calories: row.get(2)?,
        proteins: row.get(3)?,
        fats: row.get(4)?,
        carbs: row.get(5)?,
        date,
    })
}

fn text_arg(ctx: &FunctionContext<'_>, index: usize) -> Option<String> {
    value_ref_to_text(ctx.get_raw(index))
}

fn escape_arg(ctx: &FunctionContext<'_>, index: usize) -> rusqlite::Result<Option<char>> {
    let Some(raw) = text_arg(ctx, index) else {
        return Ok(None);
    };
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(escape), None) => Ok(Some(escape)),
        _ => Err(rusqlite::Error::UserFunctionError(
            "ESCAPE expression must be a single character".into(),
        )),
    }
}

fn value_ref_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
        ValueRef::Text(value) | ValueRef::Blob(value) => {
            Some(String::from_utf8_lossy(value).into_owned())
        }
    }
}

fn validate_schema(conn: &Connection) -> Result<()> {
    let columns = table_columns(conn, DISH_TABLE)?;
    let missing: Vec<&str> = DISH_COLUMNS
        .iter()
        .copied()
        .filter(|column| !columns.contains(*column))
        .collect();

    if !missing.is_empty() {
        bail!(
            "table `{DISH_TABLE}` is missing required columns: {}; point [storage].db_path at a foodlog database",
            missing.join(", ")
        );
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn to_sql_error(error: anyhow::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            error.to_string(),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::{Store, value_ref_to_text};
    use anyhow::Result;
    use rusqlite::types::ValueRef;

    #[test]
    fn like_operator_uses_unicode_folding() -> Result<()> {
        let store = Store::open_memory()?;
        let matched: bool = store.raw_connection().query_row(
            "SELECT 'МойБлюдоВариант' LIKE '%блюдо%'",
            [],
            |row| row.get(0),
        )?;
        assert!(matched);
        Ok(())
    }

    #[test]
    fn like_escape_clause_is_honored() -> Result<()> {
        let store = Store::open_memory()?;
        let conn = store.raw_connection();
        let literal: bool =
            conn.query_row("SELECT '100%' LIKE '100!%' ESCAPE '!'", [], |row| row.get(0))?;
        let wildcard: bool =
            conn.query_row("SELECT '1000' LIKE '100!%' ESCAPE '!'", [], |row| row.get(0))?;
        assert!(literal);
        assert!(!wildcard);

        let error = conn
            .query_row("SELECT 'a' LIKE 'a' ESCAPE '!!'", [], |row| row.get::<_, bool>(0))
            .expect_err("multi-character escape should fail");
        assert!(error.to_string().contains("single character"));
        Ok(())
    }

    #[test]
    fn like_with_null_operand_is_null() -> Result<()> {
        let store = Store::open_memory()?;
        let matched: Option<bool> =
            store
                .raw_connection()
                .query_row("SELECT NULL LIKE '%'", [], |row| row.get(0))?;
        assert_eq!(matched, None);
        Ok(())
    }

    #[test]
    fn nocase_collation_folds_cyrillic() -> Result<()> {
        let store = Store::open_memory()?;
        let equal: bool = store.raw_connection().query_row(
            "SELECT 'БОРЩ' = 'борщ' COLLATE NOCASE",
            [],
            |row| row.get(0),
        )?;
        assert!(equal);
        Ok(())
    }

    #[test]
    fn numeric_values_are_matched_as_text() {
        assert_eq!(value_ref_to_text(ValueRef::Integer(42)).as_deref(), Some("42"));
        assert_eq!(value_ref_to_text(ValueRef::Null), None);
    }
}
