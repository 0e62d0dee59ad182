use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Created,
    Declined,
    Approved,
}

/// A time-off request as stored and returned over the wire.
///
/// Every field is optional on input: a missing `dateFrom`/`dateTo` falls back to
/// today's local date and a missing `status` to `CREATED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[schema(example = json!({
    "id": 1,
    "username": "daggerok",
    "dateFrom": "2026-01-05",
    "dateTo": "2026-01-09",
    "hours": 40,
    "status": "CREATED"
}))]
pub struct Vacation {
    #[schema(example = 1, nullable = true)]
    /// assigned by the store on first save
    pub id: Option<u64>,
    #[schema(example = "daggerok")]
    /// requester display name
    pub username: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date_from: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub date_to: NaiveDate,
    #[schema(example = 40)]
    pub hours: u64,
    pub status: Status,
}

impl Default for Vacation {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            id: None,
            username: String::new(),
            date_from: today,
            date_to: today,
            hours: 0,
            status: Status::Created,
        }
    }
}

impl Vacation {
    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }
}
