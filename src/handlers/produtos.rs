use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    config::AppState,
    middleware::auth::AuthenticatedUser,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BuscaParams {
    pub search: Option<String>,
    pub search_field: Option<String>,
}

impl BuscaParams {
    // (campo, termo) quando há busca; campo padrão quando só veio o termo.
    pub fn como_filtro<'a>(&'a self, campo_padrao: &'a str) -> Option<(&'a str, &'a str)> {
        let termo = self.search.as_deref()?.trim();
        if termo.is_empty() {
            return None;
        }
        Some((self.search_field.as_deref().unwrap_or(campo_padrao), termo))
    }
}

#[utoipa::path(
    get,
    path = "/api/produtos",
    params(Paginacao, BuscaParams),
    responses((status = 200, description = "Lista de produtos")),
    security(("api_jwt" = [])),
    tag = "Produtos"
)]
pub async fn listar_produtos(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
    Query(busca): Query<BuscaParams>,
) -> Result<impl IntoResponse, AppError> {
    let (produtos, total) = app_state
        .produto_repo
        .listar(&paginacao, busca.como_filtro("nome"))
        .await?;

    Ok((StatusCode::OK, Json(json!({ "produtos": produtos, "total": total }))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarProdutoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    pub cod_barras: Option<String>,

    #[validate(range(min = 1, message = "A quantidade por caixa deve ser ao menos 1."))]
    #[serde(default = "caixa_padrao")]
    pub quantidade_caixa: i32,

    #[validate(range(min = 0, message = "O limite de estoque baixo não pode ser negativo."))]
    #[serde(default)]
    pub estoque_baixo: i32,
}

fn caixa_padrao() -> i32 {
    1
}

#[utoipa::path(
    post,
    path = "/api/produtos",
    request_body = CriarProdutoPayload,
    responses(
        (status = 201, description = "Produto criado", body = crate::models::produto::Produto),
        (status = 409, description = "SKU duplicado")
    ),
    security(("api_jwt" = [])),
    tag = "Produtos"
)]
pub async fn criar_produto(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarProdutoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let produto = app_state
        .produto_repo
        .criar(
            &payload.nome,
            &payload.sku,
            payload.cod_barras.as_deref(),
            payload.quantidade_caixa,
            payload.estoque_baixo,
        )
        .await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "produto", &produto.id.to_string(), "criado", None)
        .await?;

    Ok((StatusCode::CREATED, Json(produto)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarProdutoPayload {
    pub id: i64,

    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,

    #[validate(length(min = 1, message = "O SKU não pode ser vazio."))]
    pub sku: Option<String>,

    pub cod_barras: Option<String>,

    #[validate(range(min = 1, message = "A quantidade por caixa deve ser ao menos 1."))]
    pub quantidade_caixa: Option<i32>,

    #[validate(range(min = 0, message = "O limite de estoque baixo não pode ser negativo."))]
    pub estoque_baixo: Option<i32>,
}

#[utoipa::path(
    patch,
    path = "/api/produtos",
    request_body = AtualizarProdutoPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = crate::models::produto::Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Produtos"
)]
pub async fn atualizar_produto(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AtualizarProdutoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let produto = app_state
        .produto_repo
        .atualizar(
            payload.id,
            payload.nome.as_deref(),
            payload.sku.as_deref(),
            payload.cod_barras.as_deref(),
            payload.quantidade_caixa,
            payload.estoque_baixo,
        )
        .await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "produto", &produto.id.to_string(), "editado", None)
        .await?;

    Ok((StatusCode::OK, Json(produto)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExcluirParams {
    pub id: i64,
}

#[utoipa::path(
    delete,
    path = "/api/produtos",
    params(ExcluirParams),
    responses(
        (status = 200, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Produtos"
)]
pub async fn excluir_produto(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ExcluirParams>,
) -> Result<impl IntoResponse, AppError> {
    app_state.produto_repo.excluir(params.id).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "produto", &params.id.to_string(), "excluido", None)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Produto excluído com sucesso" }))))
}
