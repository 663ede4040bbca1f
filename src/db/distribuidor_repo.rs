use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    models::distribuidor::Distribuidor,
};

#[derive(Clone)]
pub struct DistribuidorRepository {
    pool: PgPool,
}

impl DistribuidorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(
        &self,
        paginacao: &Paginacao,
        busca: Option<&str>,
    ) -> Result<(Vec<Distribuidor>, i64), AppError> {
        let (distribuidores, total) = match busca {
            Some(termo) => {
                let padrao = format!("%{termo}%");
                let linhas = sqlx::query_as::<_, Distribuidor>(
                    "SELECT * FROM distribuidores WHERE nome ILIKE $3 ORDER BY nome ASC LIMIT $1 OFFSET $2",
                )
                .bind(paginacao.limite())
                .bind(paginacao.offset())
                .bind(&padrao)
                .fetch_all(&self.pool)
                .await?;
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM distribuidores WHERE nome ILIKE $1")
                        .bind(&padrao)
                        .fetch_one(&self.pool)
                        .await?;
                (linhas, total)
            }
            None => {
                let linhas = sqlx::query_as::<_, Distribuidor>(
                    "SELECT * FROM distribuidores ORDER BY nome ASC LIMIT $1 OFFSET $2",
                )
                .bind(paginacao.limite())
                .bind(paginacao.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM distribuidores")
                    .fetch_one(&self.pool)
                    .await?;
                (linhas, total)
            }
        };
        Ok((distribuidores, total))
    }

    pub async fn buscar_por_nome(&self, nome: &str) -> Result<Option<Distribuidor>, AppError> {
        let distribuidor =
            sqlx::query_as::<_, Distribuidor>("SELECT * FROM distribuidores WHERE nome ILIKE $1")
                .bind(nome)
                .fetch_optional(&self.pool)
                .await?;
        Ok(distribuidor)
    }

    pub async fn criar(&self, nome: &str) -> Result<Distribuidor, AppError> {
        sqlx::query_as::<_, Distribuidor>(
            "INSERT INTO distribuidores (nome) VALUES ($1) RETURNING *",
        )
        .bind(nome)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Já existe um distribuidor com este nome."))
    }

    pub async fn atualizar(&self, id: i64, nome: &str) -> Result<Distribuidor, AppError> {
        sqlx::query_as::<_, Distribuidor>(
            "UPDATE distribuidores SET nome = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(nome)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Já existe um distribuidor com este nome."))?
        .ok_or(AppError::RegistroNaoEncontrado)
    }

    pub async fn excluir(&self, id: i64) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM distribuidores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if resultado.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }
}
