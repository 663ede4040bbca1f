use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    models::historico::HistoricoDetalhado,
};

// Filtros opcionais da listagem de auditoria.
#[derive(Debug, Default)]
pub struct FiltroHistorico {
    pub data: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub entidade: Option<String>,
    pub acao: Option<String>,
}

#[derive(Clone)]
pub struct HistoricoRepository {
    pool: PgPool,
}

impl HistoricoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava uma entrada de auditoria. Chamado pelos handlers de mutação;
    /// nunca pelo motor de alocação.
    pub async fn registrar(
        &self,
        user_id: Uuid,
        entidade: &str,
        entidade_id: &str,
        acao: &str,
        quantidade: Option<i32>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO historico (user_id, entidade, entidade_id, acao, quantidade)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(entidade)
        .bind(entidade_id)
        .bind(acao)
        .bind(quantidade)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Lista o histórico, mais recente primeiro, enriquecido numa única
    /// consulta com o nome de quem agiu e um rótulo da entidade afetada.
    pub async fn listar(
        &self,
        paginacao: &Paginacao,
        filtro: &FiltroHistorico,
    ) -> Result<(Vec<HistoricoDetalhado>, i64), AppError> {
        let linhas = sqlx::query_as::<_, HistoricoDetalhado>(
            r#"
            SELECT h.id, h.user_id, h.entidade, h.entidade_id, h.acao, h.quantidade, h.created_at,
                   u.nome AS quem,
                   CASE h.entidade
                       WHEN 'produto' THEN
                           (SELECT p.nome FROM produtos p WHERE p.id::text = h.entidade_id)
                       WHEN 'prateleira' THEN
                           (SELECT pr.nome FROM prateleiras pr WHERE pr.id::text = h.entidade_id)
                       WHEN 'distribuidor' THEN
                           (SELECT d.nome FROM distribuidores d WHERE d.id::text = h.entidade_id)
                       WHEN 'user' THEN
                           (SELECT u2.nome FROM users u2 WHERE u2.id::text = h.entidade_id)
                       WHEN 'romaneio' THEN
                           (SELECT r.numero FROM romaneios r WHERE r.id::text = h.entidade_id)
                       WHEN 'estoque' THEN
                           (SELECT p.nome || ' - ' || pr.nome
                            FROM estoque e
                            JOIN produtos p ON p.id = e.produto_id
                            JOIN prateleiras pr ON pr.id = e.prateleira_id
                            WHERE e.id::text = h.entidade_id)
                   END AS atualizacao
            FROM historico h
            LEFT JOIN users u ON u.id = h.user_id
            WHERE ($3::date IS NULL OR h.created_at::date = $3)
              AND ($4::uuid IS NULL OR h.user_id = $4)
              AND ($5::text IS NULL OR h.entidade = $5)
              AND ($6::text IS NULL OR h.acao = $6)
            ORDER BY h.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(paginacao.limite())
        .bind(paginacao.offset())
        .bind(filtro.data)
        .bind(filtro.user_id)
        .bind(filtro.entidade.as_deref())
        .bind(filtro.acao.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM historico h
            WHERE ($1::date IS NULL OR h.created_at::date = $1)
              AND ($2::uuid IS NULL OR h.user_id = $2)
              AND ($3::text IS NULL OR h.entidade = $3)
              AND ($4::text IS NULL OR h.acao = $4)
            "#,
        )
        .bind(filtro.data)
        .bind(filtro.user_id)
        .bind(filtro.entidade.as_deref())
        .bind(filtro.acao.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((linhas, total))
    }
}
