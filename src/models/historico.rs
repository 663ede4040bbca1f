use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Entrada do log de auditoria. `entidade_id` é texto porque referencia tanto
// ids numéricos (produtos, prateleiras, estoque) quanto UUIDs (usuários).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Historico {
    pub id: i64,
    pub user_id: Uuid,
    pub entidade: String,
    pub entidade_id: String,
    pub acao: String,
    pub quantidade: Option<i32>,
    pub created_at: DateTime<Utc>,
}

// Linha de listagem enriquecida: `quem` é o nome do usuário que agiu,
// `atualizacao` é um rótulo legível da entidade afetada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoricoDetalhado {
    pub id: i64,
    pub user_id: Uuid,
    pub entidade: String,
    pub entidade_id: String,
    pub acao: String,
    pub quantidade: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub quem: Option<String>,
    pub atualizacao: Option<String>,
}
