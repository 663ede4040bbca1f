use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
    models::picking::RomaneioStatus,
    services::documento_service,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListarRomaneiosParams {
    // Uma ou mais situações separadas por vírgula, ex: "pendente,em_andamento".
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/picking",
    params(Paginacao, ListarRomaneiosParams),
    responses((status = 200, description = "Romaneios, mais recentes primeiro")),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn listar_romaneios(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
    Query(params): Query<ListarRomaneiosParams>,
) -> Result<impl IntoResponse, AppError> {
    let status: Option<Vec<String>> = params.status.map(|s| {
        s.split(',')
            .map(|parte| parte.trim().to_string())
            .filter(|parte| !parte.is_empty())
            .collect()
    });

    let (romaneios, total) =
        app_state.picking_repo.listar(&paginacao, status.as_deref()).await?;

    Ok((StatusCode::OK, Json(json!({ "data": romaneios, "total": total }))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarRomaneioPayload {
    #[validate(length(min = 1, message = "O número do romaneio é obrigatório."))]
    pub numero: String,

    #[serde(default)]
    pub descricao: String,
}

#[utoipa::path(
    post,
    path = "/api/picking",
    request_body = CriarRomaneioPayload,
    responses(
        (status = 201, description = "Romaneio criado", body = crate::models::picking::Romaneio),
        (status = 409, description = "Número duplicado")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn criar_romaneio(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarRomaneioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let romaneio = app_state.picking_repo.criar(&payload.numero, &payload.descricao).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "romaneio", &romaneio.id.to_string(), "criado", None)
        .await?;

    Ok((StatusCode::CREATED, Json(romaneio)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarStatusPayload {
    pub id: i64,
    pub status: RomaneioStatus,
}

#[utoipa::path(
    patch,
    path = "/api/picking",
    request_body = AtualizarStatusPayload,
    responses(
        (status = 200, description = "Situação atualizada"),
        (status = 404, description = "Romaneio não encontrado"),
        (status = 409, description = "Romaneio já concluído")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn atualizar_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AtualizarStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let atual = app_state
        .picking_repo
        .buscar(payload.id)
        .await?
        .ok_or(AppError::RomaneioNaoEncontrado)?;

    // "concluido" é terminal.
    if atual.status == RomaneioStatus::Concluido.as_str() {
        return Err(AppError::RomaneioJaConcluido);
    }

    app_state.picking_repo.atualizar_status(payload.id, payload.status.as_str()).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "romaneio", &payload.id.to_string(), payload.status.as_str(), None)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Romaneio atualizado com sucesso" }))))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExcluirRomaneioParams {
    pub id: i64,
}

#[utoipa::path(
    delete,
    path = "/api/picking",
    params(ExcluirRomaneioParams),
    responses(
        (status = 200, description = "Romaneio excluído"),
        (status = 404, description = "Romaneio não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn excluir_romaneio(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ExcluirRomaneioParams>,
) -> Result<impl IntoResponse, AppError> {
    app_state.picking_repo.excluir(params.id).await?;
    app_state.picking_service.descartar(params.id).await;

    app_state
        .historico_repo
        .registrar(user.0.id, "romaneio", &params.id.to_string(), "excluido", None)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Romaneio deletado com sucesso" }))))
}

#[utoipa::path(
    get,
    path = "/api/picking/{id}",
    responses(
        (status = 200, description = "Sessão de bipagem com itens, rota e avisos",
         body = crate::models::picking::SessaoSnapshot),
        (status = 404, description = "Romaneio não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn abrir_romaneio(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state.picking_service.abrir(id).await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiparPayload {
    #[validate(length(min = 1, message = "O código de barras é obrigatório."))]
    pub cod_barras: String,
}

#[utoipa::path(
    post,
    path = "/api/picking/{id}/bipar",
    request_body = BiparPayload,
    responses(
        (status = 200, description = "Item registrado, alocações recalculadas",
         body = crate::models::picking::SessaoSnapshot),
        (status = 404, description = "Código de barras desconhecido"),
        (status = 409, description = "Romaneio já concluído")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn bipar(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<BiparPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let snapshot = app_state.picking_service.bipar(id, payload.cod_barras.trim()).await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarItemPayload {
    pub romaneio_id: i64,
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub quantidade: i32,
}

#[utoipa::path(
    patch,
    path = "/api/picking/item",
    request_body = AtualizarItemPayload,
    responses(
        (status = 200, description = "Quantidade atualizada",
         body = crate::models::picking::SessaoSnapshot),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn atualizar_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<AtualizarItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .picking_service
        .alterar_quantidade(
            payload.romaneio_id,
            payload.produto_id,
            payload.prateleira_id,
            payload.quantidade,
        )
        .await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RemoverItemParams {
    pub romaneio_id: i64,
    pub produto_id: i64,
    pub prateleira_id: i64,
}

#[utoipa::path(
    delete,
    path = "/api/picking/item",
    params(RemoverItemParams),
    responses(
        (status = 200, description = "Item removido",
         body = crate::models::picking::SessaoSnapshot)
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn remover_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<RemoverItemParams>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .picking_service
        .remover_item(params.romaneio_id, params.produto_id, params.prateleira_id)
        .await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

#[utoipa::path(
    post,
    path = "/api/picking/{id}/finalizar",
    responses(
        (status = 200, description = "Baixas aplicadas e romaneio concluído",
         body = crate::models::picking::ResumoFinalizacao),
        (status = 400, description = "Romaneio sem itens"),
        (status = 409, description = "Romaneio já concluído")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn finalizar_romaneio(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let resumo = app_state.picking_service.finalizar(id).await?;

    app_state
        .historico_repo
        .registrar(
            user.0.id,
            "romaneio",
            &id.to_string(),
            "concluido",
            Some(resumo.retiradas as i32),
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Romaneio finalizado com sucesso!", "resumo": resumo })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/picking/{id}/pdf",
    responses(
        (status = 200, description = "Romaneio em PDF para impressão"),
        (status = 404, description = "Romaneio não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Picking"
)]
pub async fn gerar_pdf(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state.picking_service.abrir(id).await?;

    // A renderização é pesada; roda fora do executor async.
    let pdf = tokio::task::spawn_blocking(move || documento_service::gerar_pdf_romaneio(&snapshot))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))??;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        pdf,
    ))
}
