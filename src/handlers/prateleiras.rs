use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    config::AppState,
    handlers::produtos::{BuscaParams, ExcluirParams},
    middleware::auth::AuthenticatedUser,
};

#[utoipa::path(
    get,
    path = "/api/prateleiras",
    params(Paginacao, BuscaParams),
    responses((status = 200, description = "Lista de prateleiras")),
    security(("api_jwt" = [])),
    tag = "Prateleiras"
)]
pub async fn listar_prateleiras(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
    Query(busca): Query<BuscaParams>,
) -> Result<impl IntoResponse, AppError> {
    let termo = busca.como_filtro("nome").map(|(_, termo)| termo);
    let (prateleiras, total) = app_state.prateleira_repo.listar(&paginacao, termo).await?;

    Ok((StatusCode::OK, Json(json!({ "prateleiras": prateleiras, "total": total }))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarPrateleiraPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
}

#[utoipa::path(
    post,
    path = "/api/prateleiras",
    request_body = CriarPrateleiraPayload,
    responses(
        (status = 201, description = "Prateleira criada", body = crate::models::prateleira::Prateleira),
        (status = 409, description = "Nome duplicado")
    ),
    security(("api_jwt" = [])),
    tag = "Prateleiras"
)]
pub async fn criar_prateleira(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarPrateleiraPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prateleira = app_state.prateleira_repo.criar(&payload.nome).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "prateleira", &prateleira.id.to_string(), "criado", None)
        .await?;

    Ok((StatusCode::CREATED, Json(prateleira)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarPrateleiraPayload {
    pub id: i64,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
}

#[utoipa::path(
    patch,
    path = "/api/prateleiras",
    request_body = AtualizarPrateleiraPayload,
    responses(
        (status = 200, description = "Prateleira atualizada", body = crate::models::prateleira::Prateleira),
        (status = 404, description = "Prateleira não encontrada")
    ),
    security(("api_jwt" = [])),
    tag = "Prateleiras"
)]
pub async fn atualizar_prateleira(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AtualizarPrateleiraPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prateleira = app_state.prateleira_repo.atualizar(payload.id, &payload.nome).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "prateleira", &prateleira.id.to_string(), "editado", None)
        .await?;

    Ok((StatusCode::OK, Json(prateleira)))
}

#[utoipa::path(
    delete,
    path = "/api/prateleiras",
    params(ExcluirParams),
    responses(
        (status = 200, description = "Prateleira excluída"),
        (status = 404, description = "Prateleira não encontrada")
    ),
    security(("api_jwt" = [])),
    tag = "Prateleiras"
)]
pub async fn excluir_prateleira(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ExcluirParams>,
) -> Result<impl IntoResponse, AppError> {
    app_state.prateleira_repo.excluir(params.id).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "prateleira", &params.id.to_string(), "excluido", None)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Prateleira excluída com sucesso" }))))
}
