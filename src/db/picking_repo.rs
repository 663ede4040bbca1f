use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    models::picking::{ItemBipado, Romaneio, RomaneioStatus},
    services::picking_service::PickingStore,
};

#[derive(Clone)]
pub struct PickingRepository {
    pool: PgPool,
}

impl PickingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista romaneios, mais recentes primeiro, com filtro opcional por uma
    /// ou mais situações.
    pub async fn listar(
        &self,
        paginacao: &Paginacao,
        status: Option<&[String]>,
    ) -> Result<(Vec<Romaneio>, i64), AppError> {
        match status {
            Some(lista) if !lista.is_empty() => {
                let romaneios = sqlx::query_as::<_, Romaneio>(
                    r#"
                    SELECT * FROM romaneios
                    WHERE status = ANY($3)
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(paginacao.limite())
                .bind(paginacao.offset())
                .bind(lista)
                .fetch_all(&self.pool)
                .await?;
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM romaneios WHERE status = ANY($1)")
                        .bind(lista)
                        .fetch_one(&self.pool)
                        .await?;
                Ok((romaneios, total))
            }
            _ => {
                let romaneios = sqlx::query_as::<_, Romaneio>(
                    "SELECT * FROM romaneios ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(paginacao.limite())
                .bind(paginacao.offset())
                .fetch_all(&self.pool)
                .await?;
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM romaneios")
                    .fetch_one(&self.pool)
                    .await?;
                Ok((romaneios, total))
            }
        }
    }

    pub async fn criar(&self, numero: &str, descricao: &str) -> Result<Romaneio, AppError> {
        sqlx::query_as::<_, Romaneio>(
            r#"
            INSERT INTO romaneios (numero, descricao, status)
            VALUES ($1, $2, 'pendente')
            RETURNING *
            "#,
        )
        .bind(numero)
        .bind(descricao)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Já existe um romaneio com este número."))
    }

    pub async fn buscar(&self, id: i64) -> Result<Option<Romaneio>, AppError> {
        let romaneio = sqlx::query_as::<_, Romaneio>("SELECT * FROM romaneios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(romaneio)
    }

    pub async fn atualizar_status(&self, id: i64, status: &str) -> Result<(), AppError> {
        let resultado =
            sqlx::query("UPDATE romaneios SET status = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await?;
        if resultado.rows_affected() == 0 {
            return Err(AppError::RomaneioNaoEncontrado);
        }
        Ok(())
    }

    pub async fn excluir(&self, id: i64) -> Result<(), AppError> {
        // O cascade do banco removeria os itens; apagamos antes mesmo assim.
        sqlx::query("DELETE FROM romaneio_items WHERE romaneio_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let resultado = sqlx::query("DELETE FROM romaneios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if resultado.rows_affected() == 0 {
            return Err(AppError::RomaneioNaoEncontrado);
        }
        Ok(())
    }

    /// Itens do romaneio na ordem de bipagem, com os dados do produto e da
    /// prateleira já resolvidos.
    pub async fn listar_itens_detalhados(
        &self,
        romaneio_id: i64,
    ) -> Result<Vec<ItemBipado>, AppError> {
        let itens = sqlx::query_as::<_, ItemBipado>(
            r#"
            SELECT ri.produto_id, ri.prateleira_id,
                   p.nome AS produto_nome, p.sku AS produto_sku,
                   pr.nome AS prateleira_nome,
                   ri.quantidade, p.quantidade_caixa
            FROM romaneio_items ri
            JOIN produtos p ON p.id = ri.produto_id
            JOIN prateleiras pr ON pr.id = ri.prateleira_id
            WHERE ri.romaneio_id = $1
            ORDER BY ri.ordem ASC
            "#,
        )
        .bind(romaneio_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(itens)
    }
}

#[async_trait]
impl PickingStore for PickingRepository {
    async fn buscar_romaneio(&self, id: i64) -> Result<Option<Romaneio>, AppError> {
        self.buscar(id).await
    }

    async fn listar_itens(&self, romaneio_id: i64) -> Result<Vec<ItemBipado>, AppError> {
        self.listar_itens_detalhados(romaneio_id).await
    }

    async fn upsert_item(
        &self,
        romaneio_id: i64,
        produto_id: i64,
        prateleira_id: i64,
        quantidade: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO romaneio_items (romaneio_id, produto_id, prateleira_id, quantidade)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (romaneio_id, produto_id, prateleira_id)
            DO UPDATE SET quantidade = EXCLUDED.quantidade
            "#,
        )
        .bind(romaneio_id)
        .bind(produto_id)
        .bind(prateleira_id)
        .bind(quantidade)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remover_item(
        &self,
        romaneio_id: i64,
        produto_id: i64,
        prateleira_id: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM romaneio_items
            WHERE romaneio_id = $1 AND produto_id = $2 AND prateleira_id = $3
            "#,
        )
        .bind(romaneio_id)
        .bind(produto_id)
        .bind(prateleira_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn definir_status(
        &self,
        romaneio_id: i64,
        status: RomaneioStatus,
    ) -> Result<(), AppError> {
        self.atualizar_status(romaneio_id, status.as_str()).await
    }
}
