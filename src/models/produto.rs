use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Catálogo de produtos. `quantidade_caixa` é o número de unidades por caixa,
// usado no cálculo de unidades do romaneio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    pub sku: String,
    pub cod_barras: Option<String>,
    pub quantidade_caixa: i32,
    pub estoque_baixo: i32,
    pub created_at: DateTime<Utc>,
}
