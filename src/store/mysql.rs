use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};

use super::{StoreError, VacationStore};
use crate::model::vacation::{Status, Vacation};

#[derive(FromRow)]
struct VacationRow {
    id: u64, // BIGINT UNSIGNED
    username: String,
    date_from: NaiveDate,
    date_to: NaiveDate,
    hours: u64,
    status: String,
}

impl TryFrom<VacationRow> for Vacation {
    type Error = StoreError;

    fn try_from(row: VacationRow) -> Result<Self, Self::Error> {
        let status = Status::from_str(&row.status).map_err(|_| {
            StoreError::CorruptRow(format!("vacation {} has status '{}'", row.id, row.status))
        })?;

        Ok(Vacation {
            id: Some(row.id),
            username: row.username,
            date_from: row.date_from,
            date_to: row.date_to,
            hours: row.hours,
            status,
        })
    }
}

fn into_vacations(rows: Vec<VacationRow>) -> Result<Vec<Vacation>, StoreError> {
    rows.into_iter().map(Vacation::try_from).collect()
}

/// Not a backslash: that breaks under `NO_BACKSLASH_ESCAPES`.
const LIKE_ESCAPE: char = '!';

/// Escapes LIKE wildcards so the fragment is matched literally.
pub(crate) fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

const SELECT_COLUMNS: &str = "SELECT id, username, date_from, date_to, hours, status FROM vacations";

fn matching_sql() -> String {
    format!(
        r#"{SELECT_COLUMNS}
        WHERE LOWER(username) LIKE CONCAT('%', LOWER(?), '%') ESCAPE '{LIKE_ESCAPE}'
        ORDER BY id ASC"#
    )
}

#[derive(Clone)]
pub struct MySqlVacationStore {
    pool: MySqlPool,
}

impl MySqlVacationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacationStore for MySqlVacationStore {
    async fn create(&self, vacation: Vacation) -> Result<Vacation, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO vacations (username, date_from, date_to, hours, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vacation.username)
        .bind(vacation.date_from)
        .bind(vacation.date_to)
        .bind(vacation.hours)
        .bind(vacation.status.to_string())
        .execute(&self.pool)
        .await?;

        Ok(Vacation {
            id: Some(result.last_insert_id()),
            ..vacation
        })
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Vacation>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row = sqlx::query_as::<_, VacationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Vacation::try_from).transpose()
    }

    async fn find_all_ordered_by_id(&self) -> Result<Vec<Vacation>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id ASC");
        let rows = sqlx::query_as::<_, VacationRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        into_vacations(rows)
    }

    async fn find_all_matching(&self, fragment: &str) -> Result<Vec<Vacation>, StoreError> {
        let rows = sqlx::query_as::<_, VacationRow>(&matching_sql())
            .bind(escape_like(fragment))
            .fetch_all(&self.pool)
            .await?;

        into_vacations(rows)
    }

    async fn save(&self, vacation: Vacation) -> Result<Vacation, StoreError> {
        let Some(id) = vacation.id else {
            return self.create(vacation).await;
        };

        sqlx::query(
            r#"
            INSERT INTO vacations (id, username, date_from, date_to, hours, status)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                username = VALUES(username),
                date_from = VALUES(date_from),
                date_to = VALUES(date_to),
                hours = VALUES(hours),
                status = VALUES(status)
            "#,
        )
        .bind(id)
        .bind(&vacation.username)
        .bind(vacation.date_from)
        .bind(vacation.date_to)
        .bind(vacation.hours)
        .bind(vacation.status.to_string())
        .execute(&self.pool)
        .await?;

        Ok(vacation)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM vacations")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
