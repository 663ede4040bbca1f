use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Prateleira física. O nome carrega o corredor (letra) e a posição (dígitos),
// ex: "A40", "B2".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prateleira {
    pub id: i64,
    pub nome: String,
    pub created_at: DateTime<Utc>,
}
