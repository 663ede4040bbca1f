use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Uma linha da tabela `estoque`: a quantidade de um produto numa prateleira,
// particionada por distribuidor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estoque {
    pub id: i64,
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub distribuidor_id: i64,
    pub quantidade: i32,
}

// Linha de listagem com os nomes já resolvidos (JOIN com produtos,
// prateleiras e distribuidores).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstoqueDetalhado {
    pub id: i64,
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub distribuidor_id: i64,
    pub quantidade: i32,
    pub produto_nome: String,
    pub produto_sku: String,
    pub produto_cod_barras: Option<String>,
    pub quantidade_caixa: i32,
    pub estoque_baixo: i32,
    pub prateleira_nome: String,
    pub distribuidor_nome: String,
}

// Fotografia do estoque de um produto usada pelo motor de alocação.
// Imutável durante um cálculo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstoqueDisponivel {
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub prateleira_nome: String,
    pub quantidade: i32,
    pub distribuidor_id: Option<i64>,
}

// Resultado da busca por código de barras durante a bipagem.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstoqueLocalizado {
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub produto_nome: String,
    pub produto_sku: String,
    pub prateleira_nome: String,
    pub quantidade_caixa: i32,
    pub quantidade: i32,
    pub distribuidor_id: Option<i64>,
}
