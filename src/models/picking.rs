use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RomaneioStatus {
    Pendente,
    EmAndamento,
    Concluido,
}

impl RomaneioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RomaneioStatus::Pendente => "pendente",
            RomaneioStatus::EmAndamento => "em_andamento",
            RomaneioStatus::Concluido => "concluido",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Romaneio {
    pub id: i64,
    pub numero: String,
    pub descricao: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Uma linha (produto, prateleira) da lista de bipagem. `quantidade` está em
// caixas; `quantidade_caixa` é o fator de unidades por caixa do produto.
// Invariante: quantidade >= 1 enquanto a linha existir.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemBipado {
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub produto_nome: String,
    pub produto_sku: String,
    pub prateleira_nome: String,
    pub quantidade: i32,
    pub quantidade_caixa: i32,
}

impl ItemBipado {
    pub fn unidades_por_caixa(&self) -> i32 {
        self.quantidade_caixa.max(1)
    }
}

// Resultado do motor para uma prateleira de um produto.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alocacao {
    pub prateleira_id: i64,
    pub prateleira_nome: String,
    pub caixas: i32,
    pub unidades: i32,
    pub insuficiente: bool,
    pub distribuidor_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRota {
    pub produto_id: i64,
    pub produto_nome: String,
    pub produto_sku: String,
    pub caixas: i32,
    pub unidades: i32,
    pub insuficiente: bool,
}

// Uma parada da rota de separação: a prateleira e o que recolher nela.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrupoRota {
    pub prateleira_id: i64,
    pub prateleira: String,
    pub itens: Vec<ItemRota>,
}

// Saída completa de um cálculo de alocação.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoAlocacao {
    // Alocações por produto, na chave o id do produto.
    pub alocacoes: HashMap<i64, Vec<Alocacao>>,
    // Rota de separação já ordenada (serpentina por corredor).
    pub rota: Vec<GrupoRota>,
    // Avisos de falta, um por produto em déficit.
    pub avisos: Vec<String>,
}

// Resumo devolvido ao finalizar: quantas retiradas foram aplicadas e quantas
// foram puladas (sem distribuidor resolvível ou recusadas pelo estoque).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoFinalizacao {
    pub retiradas: u32,
    pub ignoradas: u32,
}

// Estado corrente de uma sessão de bipagem devolvido aos handlers.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessaoSnapshot {
    pub romaneio: Romaneio,
    pub itens: Vec<ItemBipado>,
    pub rota: Vec<GrupoRota>,
    pub alocacoes: HashMap<i64, Vec<Alocacao>>,
    pub avisos: Vec<String>,
}
