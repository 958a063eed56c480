use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub value: String,
    pub order: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub done_at: Option<OffsetDateTime>,
}

/// A creation payload that already passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTodo {
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub order: Option<i64>,
    pub done: Option<bool>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: SortDirection,
}
