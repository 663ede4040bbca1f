use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    models::produto::Produto,
};

#[derive(Clone)]
pub struct ProdutoRepository {
    pool: PgPool,
}

impl ProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista paginada, com busca opcional por nome, SKU ou código de barras.
    pub async fn listar(
        &self,
        paginacao: &Paginacao,
        busca: Option<(&str, &str)>,
    ) -> Result<(Vec<Produto>, i64), AppError> {
        let (filtro, termo) = match busca {
            Some((campo, termo)) => {
                let coluna = match campo {
                    "nome" => "nome",
                    "sku" => "sku",
                    "cod_barras" => "cod_barras",
                    outro => return Err(AppError::CampoBuscaInvalido(outro.to_string())),
                };
                (format!(" WHERE {coluna} ILIKE $3"), Some(format!("%{termo}%")))
            }
            None => (String::new(), None),
        };

        let sql = format!("SELECT * FROM produtos{filtro} ORDER BY nome ASC LIMIT $1 OFFSET $2");
        let mut query = sqlx::query_as::<_, Produto>(&sql)
            .bind(paginacao.limite())
            .bind(paginacao.offset());
        if let Some(termo) = &termo {
            query = query.bind(termo);
        }
        let produtos = query.fetch_all(&self.pool).await?;

        let sql_total = format!("SELECT COUNT(*) FROM produtos{}", filtro.replace("$3", "$1"));
        let mut query_total = sqlx::query_scalar::<_, i64>(&sql_total);
        if let Some(termo) = &termo {
            query_total = query_total.bind(termo);
        }
        let total = query_total.fetch_one(&self.pool).await?;

        Ok((produtos, total))
    }

    pub async fn buscar_por_id(&self, id: i64) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produtos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(produto)
    }

    pub async fn buscar_por_sku(&self, sku: &str) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produtos WHERE sku = $1")
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;
        Ok(produto)
    }

    pub async fn criar(
        &self,
        nome: &str,
        sku: &str,
        cod_barras: Option<&str>,
        quantidade_caixa: i32,
        estoque_baixo: i32,
    ) -> Result<Produto, AppError> {
        sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produtos (nome, sku, cod_barras, quantidade_caixa, estoque_baixo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(sku)
        .bind(cod_barras)
        .bind(quantidade_caixa)
        .bind(estoque_baixo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Este SKU já está em uso."))
    }

    pub async fn atualizar(
        &self,
        id: i64,
        nome: Option<&str>,
        sku: Option<&str>,
        cod_barras: Option<&str>,
        quantidade_caixa: Option<i32>,
        estoque_baixo: Option<i32>,
    ) -> Result<Produto, AppError> {
        sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos SET
                nome = COALESCE($2, nome),
                sku = COALESCE($3, sku),
                cod_barras = COALESCE($4, cod_barras),
                quantidade_caixa = COALESCE($5, quantidade_caixa),
                estoque_baixo = COALESCE($6, estoque_baixo)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(sku)
        .bind(cod_barras)
        .bind(quantidade_caixa)
        .bind(estoque_baixo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Este SKU já está em uso."))?
        .ok_or(AppError::ProdutoNaoEncontrado)
    }

    pub async fn excluir(&self, id: i64) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM produtos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if resultado.rows_affected() == 0 {
            return Err(AppError::ProdutoNaoEncontrado);
        }
        Ok(())
    }
}
