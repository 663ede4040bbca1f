use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    models::estoque::{Estoque, EstoqueDetalhado, EstoqueDisponivel, EstoqueLocalizado},
    services::picking_service::EstoqueLedger,
};

// SELECT base das listagens, com os nomes já resolvidos.
const SELECT_DETALHADO: &str = r#"
    SELECT e.id, e.produto_id, e.prateleira_id, e.distribuidor_id, e.quantidade,
           p.nome AS produto_nome, p.sku AS produto_sku, p.cod_barras AS produto_cod_barras,
           p.quantidade_caixa, p.estoque_baixo,
           pr.nome AS prateleira_nome, d.nome AS distribuidor_nome
    FROM estoque e
    JOIN produtos p ON p.id = e.produto_id
    JOIN prateleiras pr ON pr.id = e.prateleira_id
    JOIN distribuidores d ON d.id = e.distribuidor_id
"#;

const FROM_DETALHADO: &str = r#"
    FROM estoque e
    JOIN produtos p ON p.id = e.produto_id
    JOIN prateleiras pr ON pr.id = e.prateleira_id
    JOIN distribuidores d ON d.id = e.distribuidor_id
"#;

enum Filtro {
    Nenhum,
    Texto(&'static str, String),
    Id(&'static str, i64),
}

#[derive(Clone)]
pub struct EstoqueRepository {
    pool: PgPool,
}

impl EstoqueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista paginada do estoque. Campos de busca aceitos: produto.nome,
    /// produto.sku, produto.cod_barras (texto, ILIKE) e produto_id,
    /// prateleira_id (numéricos, igualdade).
    pub async fn listar(
        &self,
        paginacao: &Paginacao,
        busca: Option<(&str, &str)>,
    ) -> Result<(Vec<EstoqueDetalhado>, i64), AppError> {
        let filtro = match busca {
            None => Filtro::Nenhum,
            Some((campo, termo)) => match campo {
                "produto.nome" => Filtro::Texto("p.nome", format!("%{termo}%")),
                "produto.sku" => Filtro::Texto("p.sku", format!("%{termo}%")),
                "produto.cod_barras" => Filtro::Texto("p.cod_barras", format!("%{termo}%")),
                "produto_id" | "prateleira_id" => {
                    let valor: i64 = termo.parse().map_err(|_| {
                        AppError::CampoBuscaInvalido(format!(
                            "valor inválido para campo numérico: {termo}"
                        ))
                    })?;
                    let coluna =
                        if campo == "produto_id" { "e.produto_id" } else { "e.prateleira_id" };
                    Filtro::Id(coluna, valor)
                }
                outro => return Err(AppError::CampoBuscaInvalido(outro.to_string())),
            },
        };

        match filtro {
            Filtro::Nenhum => {
                let sql = format!("{SELECT_DETALHADO} ORDER BY e.id ASC LIMIT $1 OFFSET $2");
                let linhas = sqlx::query_as::<_, EstoqueDetalhado>(&sql)
                    .bind(paginacao.limite())
                    .bind(paginacao.offset())
                    .fetch_all(&self.pool)
                    .await?;
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estoque")
                    .fetch_one(&self.pool)
                    .await?;
                Ok((linhas, total))
            }
            Filtro::Texto(coluna, padrao) => {
                let sql = format!(
                    "{SELECT_DETALHADO} WHERE {coluna} ILIKE $3 ORDER BY e.id ASC LIMIT $1 OFFSET $2"
                );
                let linhas = sqlx::query_as::<_, EstoqueDetalhado>(&sql)
                    .bind(paginacao.limite())
                    .bind(paginacao.offset())
                    .bind(&padrao)
                    .fetch_all(&self.pool)
                    .await?;
                let sql_total =
                    format!("SELECT COUNT(*) {FROM_DETALHADO} WHERE {coluna} ILIKE $1");
                let total: i64 = sqlx::query_scalar(&sql_total)
                    .bind(&padrao)
                    .fetch_one(&self.pool)
                    .await?;
                Ok((linhas, total))
            }
            Filtro::Id(coluna, valor) => {
                let sql = format!(
                    "{SELECT_DETALHADO} WHERE {coluna} = $3 ORDER BY e.id ASC LIMIT $1 OFFSET $2"
                );
                let linhas = sqlx::query_as::<_, EstoqueDetalhado>(&sql)
                    .bind(paginacao.limite())
                    .bind(paginacao.offset())
                    .bind(valor)
                    .fetch_all(&self.pool)
                    .await?;
                let sql_total = format!("SELECT COUNT(*) {FROM_DETALHADO} WHERE {coluna} = $1");
                let total: i64 = sqlx::query_scalar(&sql_total)
                    .bind(valor)
                    .fetch_one(&self.pool)
                    .await?;
                Ok((linhas, total))
            }
        }
    }

    /// Cria a partição (produto, prateleira, distribuidor) ou soma na
    /// existente. Upsert atômico, sem janela de corrida.
    pub async fn criar_ou_somar(
        &self,
        produto_id: i64,
        prateleira_id: i64,
        distribuidor_id: i64,
        quantidade: i32,
    ) -> Result<Estoque, AppError> {
        let estoque = sqlx::query_as::<_, Estoque>(
            r#"
            INSERT INTO estoque (produto_id, prateleira_id, distribuidor_id, quantidade)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (produto_id, prateleira_id, distribuidor_id)
            DO UPDATE SET quantidade = estoque.quantidade + EXCLUDED.quantidade
            RETURNING id, produto_id, prateleira_id, distribuidor_id, quantidade
            "#,
        )
        .bind(produto_id)
        .bind(prateleira_id)
        .bind(distribuidor_id)
        .bind(quantidade)
        .fetch_one(&self.pool)
        .await?;
        Ok(estoque)
    }

    /// Baixa guardada: recusa (não trunca) uma retirada maior que o saldo.
    pub async fn retirar(
        &self,
        produto_id: i64,
        prateleira_id: i64,
        distribuidor_id: i64,
        quantidade: i32,
    ) -> Result<Estoque, AppError> {
        let atualizado = sqlx::query_as::<_, Estoque>(
            r#"
            UPDATE estoque SET quantidade = quantidade - $4
            WHERE produto_id = $1 AND prateleira_id = $2 AND distribuidor_id = $3
              AND quantidade >= $4
            RETURNING id, produto_id, prateleira_id, distribuidor_id, quantidade
            "#,
        )
        .bind(produto_id)
        .bind(prateleira_id)
        .bind(distribuidor_id)
        .bind(quantidade)
        .fetch_optional(&self.pool)
        .await?;

        match atualizado {
            Some(estoque) => Ok(estoque),
            None => {
                let existe: Option<i64> = sqlx::query_scalar(
                    "SELECT id FROM estoque WHERE produto_id = $1 AND prateleira_id = $2 AND distribuidor_id = $3",
                )
                .bind(produto_id)
                .bind(prateleira_id)
                .bind(distribuidor_id)
                .fetch_optional(&self.pool)
                .await?;
                match existe {
                    Some(_) => Err(AppError::EstoqueInsuficiente),
                    None => Err(AppError::RegistroNaoEncontrado),
                }
            }
        }
    }

    /// Move produto/prateleira/distribuidor de uma linha de estoque.
    pub async fn reatribuir(
        &self,
        id: i64,
        produto_id: Option<i64>,
        prateleira_id: Option<i64>,
        distribuidor_id: Option<i64>,
    ) -> Result<Estoque, AppError> {
        sqlx::query_as::<_, Estoque>(
            r#"
            UPDATE estoque SET
                produto_id = COALESCE($2, produto_id),
                prateleira_id = COALESCE($3, prateleira_id),
                distribuidor_id = COALESCE($4, distribuidor_id)
            WHERE id = $1
            RETURNING id, produto_id, prateleira_id, distribuidor_id, quantidade
            "#,
        )
        .bind(id)
        .bind(produto_id)
        .bind(prateleira_id)
        .bind(distribuidor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::de_violacao_unica(e, "Já existe estoque para esta combinação."))?
        .ok_or(AppError::RegistroNaoEncontrado)
    }

    pub async fn excluir(&self, id: i64) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM estoque WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if resultado.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }
}

#[async_trait]
impl EstoqueLedger for EstoqueRepository {
    async fn buscar_por_produto(
        &self,
        produto_id: i64,
    ) -> Result<Vec<EstoqueDisponivel>, AppError> {
        let entradas = sqlx::query_as::<_, EstoqueDisponivel>(
            r#"
            SELECT e.produto_id, e.prateleira_id, pr.nome AS prateleira_nome,
                   e.quantidade, e.distribuidor_id
            FROM estoque e
            JOIN prateleiras pr ON pr.id = e.prateleira_id
            WHERE e.produto_id = $1
            ORDER BY e.id ASC
            "#,
        )
        .bind(produto_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entradas)
    }

    async fn buscar_por_cod_barras(
        &self,
        cod_barras: &str,
    ) -> Result<Option<EstoqueLocalizado>, AppError> {
        let achado = sqlx::query_as::<_, EstoqueLocalizado>(
            r#"
            SELECT e.produto_id, e.prateleira_id,
                   p.nome AS produto_nome, p.sku AS produto_sku,
                   pr.nome AS prateleira_nome,
                   p.quantidade_caixa, e.quantidade, e.distribuidor_id
            FROM estoque e
            JOIN produtos p ON p.id = e.produto_id
            JOIN prateleiras pr ON pr.id = e.prateleira_id
            WHERE p.cod_barras = $1
            ORDER BY e.id ASC
            LIMIT 1
            "#,
        )
        .bind(cod_barras)
        .fetch_optional(&self.pool)
        .await?;
        Ok(achado)
    }

    async fn ajustar_quantidade(
        &self,
        produto_id: i64,
        prateleira_id: i64,
        distribuidor_id: i64,
        delta: i32,
    ) -> Result<(), AppError> {
        if delta >= 0 {
            self.criar_ou_somar(produto_id, prateleira_id, distribuidor_id, delta).await?;
        } else {
            self.retirar(produto_id, prateleira_id, distribuidor_id, -delta).await?;
        }
        Ok(())
    }
}
