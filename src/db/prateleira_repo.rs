use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    models::prateleira::Prateleira,
};

#[derive(Clone)]
pub struct PrateleiraRepository {
    pool: PgPool,
}

impl PrateleiraRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(
        &self,
        paginacao: &Paginacao,
        busca: Option<&str>,
    ) -> Result<(Vec<Prateleira>, i64), AppError> {
        let (prateleiras, total) = match busca {
            Some(termo) => {
                let padrao = format!("%{termo}%");
                let linhas = sqlx::query_as::<_, Prateleira>(
                    "SELECT * FROM prateleiras WHERE nome ILIKE $3 ORDER BY nome ASC LIMIT $1 OFFSET $2",
                )
                .bind(paginacao.limite())
                .bind(paginacao.offset())
                .bind(&padrao)
                .fetch_all(&self.pool)
                .await?;
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM prateleiras WHERE nome ILIKE $1")
                        .bind(&padrao)
                        .fetch_one(&self.pool)
                        .await?;
                (linhas, total)
            }
            None => {
                let linhas = sqlx::query_as::<_, Prateleira>(
                    "SELECT * FROM prateleiras ORDER BY nome ASC LIMIT $1 OFFSET $2",
                )
                .bind(paginacao.limite())
                .bind(paginacao.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prateleiras")
                    .fetch_one(&self.pool)
                    .await?;
                (linhas, total)
            }
        };
        Ok((prateleiras, total))
    }

    /// Busca pelo nome exato, sem distinção de caixa (importação de CSV).
    pub async fn buscar_por_nome(&self, nome: &str) -> Result<Option<Prateleira>, AppError> {
        let prateleira =
            sqlx::query_as::<_, Prateleira>("SELECT * FROM prateleiras WHERE nome ILIKE $1")
                .bind(nome)
                .fetch_optional(&self.pool)
                .await?;
        Ok(prateleira)
    }

    pub async fn criar(&self, nome: &str) -> Result<Prateleira, AppError> {
        sqlx::query_as::<_, Prateleira>(
            "INSERT INTO prateleiras (nome) VALUES ($1) RETURNING *",
        )
        .bind(nome)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Já existe uma prateleira com este nome."))
    }

    pub async fn atualizar(&self, id: i64, nome: &str) -> Result<Prateleira, AppError> {
        sqlx::query_as::<_, Prateleira>(
            "UPDATE prateleiras SET nome = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(nome)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Já existe uma prateleira com este nome."))?
        .ok_or(AppError::RegistroNaoEncontrado)
    }

    pub async fn excluir(&self, id: i64) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM prateleiras WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if resultado.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }
}
