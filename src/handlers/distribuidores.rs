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
    path = "/api/distribuidores",
    params(Paginacao, BuscaParams),
    responses((status = 200, description = "Lista de distribuidores")),
    security(("api_jwt" = [])),
    tag = "Distribuidores"
)]
pub async fn listar_distribuidores(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
    Query(busca): Query<BuscaParams>,
) -> Result<impl IntoResponse, AppError> {
    let termo = busca.como_filtro("nome").map(|(_, termo)| termo);
    let (distribuidores, total) = app_state.distribuidor_repo.listar(&paginacao, termo).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "distribuidores": distribuidores, "total": total })),
    ))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarDistribuidorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
}

#[utoipa::path(
    post,
    path = "/api/distribuidores",
    request_body = CriarDistribuidorPayload,
    responses(
        (status = 201, description = "Distribuidor criado", body = crate::models::distribuidor::Distribuidor),
        (status = 409, description = "Nome duplicado")
    ),
    security(("api_jwt" = [])),
    tag = "Distribuidores"
)]
pub async fn criar_distribuidor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarDistribuidorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let distribuidor = app_state.distribuidor_repo.criar(&payload.nome).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "distribuidor", &distribuidor.id.to_string(), "criado", None)
        .await?;

    Ok((StatusCode::CREATED, Json(distribuidor)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarDistribuidorPayload {
    pub id: i64,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
}

#[utoipa::path(
    patch,
    path = "/api/distribuidores",
    request_body = AtualizarDistribuidorPayload,
    responses(
        (status = 200, description = "Distribuidor atualizado", body = crate::models::distribuidor::Distribuidor),
        (status = 404, description = "Distribuidor não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Distribuidores"
)]
pub async fn atualizar_distribuidor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AtualizarDistribuidorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let distribuidor =
        app_state.distribuidor_repo.atualizar(payload.id, &payload.nome).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "distribuidor", &distribuidor.id.to_string(), "editado", None)
        .await?;

    Ok((StatusCode::OK, Json(distribuidor)))
}

#[utoipa::path(
    delete,
    path = "/api/distribuidores",
    params(ExcluirParams),
    responses(
        (status = 200, description = "Distribuidor excluído"),
        (status = 404, description = "Distribuidor não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Distribuidores"
)]
pub async fn excluir_distribuidor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ExcluirParams>,
) -> Result<impl IntoResponse, AppError> {
    app_state.distribuidor_repo.excluir(params.id).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "distribuidor", &params.id.to_string(), "excluido", None)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Distribuidor excluído com sucesso" }))))
}
