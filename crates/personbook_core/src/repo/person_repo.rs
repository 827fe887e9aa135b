//! Person repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide document-style CRUD over the `people` collection.
//! - Keep SQL and JSON column details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate the document before any SQL mutation.
//! - `id` is written on insert only; no update statement touches it.
//! - Unsorted reads return documents in insertion order.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::person::{
    DeleteSummary, NewPerson, Person, PersonId, PersonSummary, PersonValidationError,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_COLUMNS: &str = "id, name, age, favorite_foods";
const SUMMARY_COLUMNS: &str = "id, name, favorite_foods";
const PEOPLE_TABLE: &str = "people";
const REQUIRED_PEOPLE_COLUMNS: &[&str] = &["seq", "id", "name", "age", "favorite_foods"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    NotFound(PersonId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Document field usable as a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Age,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Chainable filter/sort/paging options for person reads.
///
/// Filters combine with AND. Ties under `sort_by` fall back to insertion
/// order so paging stays stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonQuery {
    pub name: Option<String>,
    /// Matches documents whose `favorite_foods` contains this exact value.
    pub favorite_food: Option<String>,
    pub sort: Option<(SortField, SortOrder)>,
    /// `Some(0)` behaves like `None`.
    pub limit: Option<u32>,
    pub skip: u32,
}

impl PersonQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn favorite_food(mut self, food: impl Into<String>) -> Self {
        self.favorite_food = Some(food.into());
        self
    }

    pub fn sort_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    fn to_sql(&self, columns: &str) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {columns} FROM {PEOPLE_TABLE} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &self.name {
            sql.push_str(" AND name = ?");
            bind_values.push(Value::Text(name.clone()));
        }

        if let Some(food) = &self.favorite_food {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM json_each(people.favorite_foods) AS food WHERE food.value = ?)",
            );
            bind_values.push(Value::Text(food.clone()));
        }

        match self.sort {
            Some((field, order)) => {
                sql.push_str(&format!(
                    " ORDER BY {} {}, seq ASC",
                    field.column(),
                    order.keyword()
                ));
            }
            None => sql.push_str(" ORDER BY seq ASC"),
        }

        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if self.skip > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(self.skip)));
            }
        } else if self.skip > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(self.skip)));
        }

        (sql, bind_values)
    }
}

/// Repository interface for person documents.
pub trait PersonRepository {
    /// Persists one document and returns it with its assigned id.
    fn insert_person(&self, input: &NewPerson) -> RepoResult<Person>;
    /// Persists all documents in one transaction, preserving input order.
    fn insert_people(&self, inputs: &[NewPerson]) -> RepoResult<Vec<Person>>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn find_people(&self, query: &PersonQuery) -> RepoResult<Vec<Person>>;
    /// Same as `find_people` but never reads `age`.
    fn find_summaries(&self, query: &PersonQuery) -> RepoResult<Vec<PersonSummary>>;
    /// Overwrites the stored document with the same id.
    fn save_person(&self, person: &Person) -> RepoResult<()>;
    /// Sets `age` on the first document named `name` in one statement.
    fn update_age_by_name(&self, name: &str, age: i64) -> RepoResult<Option<Person>>;
    /// Removes one document and returns what was removed.
    fn delete_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn delete_people_by_name(&self, name: &str) -> RepoResult<DeleteSummary>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for a foreign schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_person(&self, input: &NewPerson) -> RepoResult<Person> {
        input.validate()?;

        let person = Person::from_new(Uuid::new_v4(), input.clone());
        insert_row(self.conn, &person)?;
        Ok(person)
    }

    fn insert_people(&self, inputs: &[NewPerson]) -> RepoResult<Vec<Person>> {
        for input in inputs {
            input.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut people = Vec::with_capacity(inputs.len());
        for input in inputs {
            let person = Person::from_new(Uuid::new_v4(), input.clone());
            insert_row(&tx, &person)?;
            people.push(person);
        }
        tx.commit()?;

        Ok(people)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM {PEOPLE_TABLE} WHERE id = ?1;"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn find_people(&self, query: &PersonQuery) -> RepoResult<Vec<Person>> {
        let (sql, bind_values) = query.to_sql(PERSON_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn find_summaries(&self, query: &PersonQuery) -> RepoResult<Vec<PersonSummary>> {
        let (sql, bind_values) = query.to_sql(SUMMARY_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summaries = Vec::new();

        while let Some(row) = rows.next()? {
            summaries.push(PersonSummary {
                id: parse_id(row)?,
                name: row.get("name")?,
                favorite_foods: parse_foods(row)?,
            });
        }

        Ok(summaries)
    }

    fn save_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE {PEOPLE_TABLE}
                 SET
                    name = ?1,
                    age = ?2,
                    favorite_foods = ?3
                 WHERE id = ?4;"
            ),
            params![
                person.name.as_str(),
                person.age,
                encode_foods(&person.favorite_foods)?,
                person.id().to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id()));
        }

        Ok(())
    }

    fn update_age_by_name(&self, name: &str, age: i64) -> RepoResult<Option<Person>> {
        let sql = format!(
            "UPDATE {PEOPLE_TABLE}
             SET age = ?2
             WHERE seq = (
                SELECT seq FROM {PEOPLE_TABLE} WHERE name = ?1 ORDER BY seq ASC LIMIT 1
             )
             RETURNING {PERSON_COLUMNS};"
        );
        let updated = query_returning(self.conn, &sql, params![name, age])?;
        Ok(updated.into_iter().next())
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let sql = format!("DELETE FROM {PEOPLE_TABLE} WHERE id = ?1 RETURNING {PERSON_COLUMNS};");
        let removed = query_returning(self.conn, &sql, params![id.to_string()])?;
        Ok(removed.into_iter().next())
    }

    fn delete_people_by_name(&self, name: &str) -> RepoResult<DeleteSummary> {
        let deleted = self.conn.execute(
            &format!("DELETE FROM {PEOPLE_TABLE} WHERE name = ?1;"),
            [name],
        )?;

        Ok(DeleteSummary {
            deleted_count: deleted as u64,
        })
    }
}

fn insert_row(conn: &Connection, person: &Person) -> RepoResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {PEOPLE_TABLE} (id, name, age, favorite_foods)
             VALUES (?1, ?2, ?3, ?4);"
        ),
        params![
            person.id().to_string(),
            person.name.as_str(),
            person.age,
            encode_foods(&person.favorite_foods)?,
        ],
    )?;
    Ok(())
}

// RETURNING rows are drained fully so the statement completes before drop.
fn query_returning(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<Person>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut people = Vec::new();

    while let Some(row) = rows.next()? {
        people.push(parse_person_row(row)?);
    }

    Ok(people)
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let person = Person::from_parts(
        parse_id(row)?,
        row.get("name")?,
        row.get("age")?,
        parse_foods(row)?,
    );
    person.validate().map_err(|err| {
        RepoError::InvalidData(format!("person {} in people: {err}", person.id()))
    })?;
    Ok(person)
}

fn parse_id(row: &Row<'_>) -> RepoResult<PersonId> {
    let id_text: String = row.get("id")?;
    Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in people.id"))
    })
}

fn parse_foods(row: &Row<'_>) -> RepoResult<Vec<String>> {
    let foods_text: String = row.get("favorite_foods")?;
    serde_json::from_str(&foods_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid favorite_foods value `{foods_text}` in people.favorite_foods: {err}"
        ))
    })
}

fn encode_foods(foods: &[String]) -> RepoResult<String> {
    serde_json::to_string(foods)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode favorite_foods: {err}")))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [PEOPLE_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(PEOPLE_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({PEOPLE_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<HashSet<_>, _>>()?;
    for &column in REQUIRED_PEOPLE_COLUMNS {
        if !columns.contains(column) {
            return Err(RepoError::MissingRequiredColumn {
                table: PEOPLE_TABLE,
                column,
            });
        }
    }

    Ok(())
}
