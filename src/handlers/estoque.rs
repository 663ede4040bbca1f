use axum::{
    extract::{Multipart, Query, State},
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
    path = "/api/estoque",
    params(Paginacao, BuscaParams),
    responses(
        (status = 200, description = "Lista de estoque com nomes resolvidos"),
        (status = 400, description = "Campo de busca inválido")
    ),
    security(("api_jwt" = [])),
    tag = "Estoque"
)]
pub async fn listar_estoque(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
    Query(busca): Query<BuscaParams>,
) -> Result<impl IntoResponse, AppError> {
    let (estoque, total) = app_state
        .estoque_repo
        .listar(&paginacao, busca.como_filtro("produto.nome"))
        .await?;

    Ok((StatusCode::OK, Json(json!({ "estoque": estoque, "total": total }))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarEstoquePayload {
    pub produto_id: i64,
    pub prateleira_id: i64,
    pub distribuidor_id: i64,

    #[validate(range(min = 1, message = "A quantidade deve ser ao menos 1."))]
    pub quantidade: i32,
}

#[utoipa::path(
    post,
    path = "/api/estoque",
    request_body = CriarEstoquePayload,
    responses((status = 201, description = "Estoque criado ou somado", body = crate::models::estoque::Estoque)),
    security(("api_jwt" = [])),
    tag = "Estoque"
)]
pub async fn criar_estoque(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CriarEstoquePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let estoque = app_state
        .estoque_repo
        .criar_ou_somar(
            payload.produto_id,
            payload.prateleira_id,
            payload.distribuidor_id,
            payload.quantidade,
        )
        .await?;

    app_state
        .historico_repo
        .registrar(
            user.0.id,
            "estoque",
            &estoque.id.to_string(),
            "adicionado",
            Some(payload.quantidade),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(estoque)))
}

// PATCH com dois modos: movimentação (tipo + quantidade + chave da partição)
// ou reatribuição de uma linha pelo id.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovimentarEstoquePayload {
    pub id: Option<i64>,
    pub produto_id: Option<i64>,
    pub prateleira_id: Option<i64>,
    pub distribuidor_id: Option<i64>,

    // "adicionar" ou "retirar"
    pub tipo: Option<String>,

    #[validate(range(min = 1, message = "A quantidade deve ser ao menos 1."))]
    pub quantidade: Option<i32>,
}

#[utoipa::path(
    patch,
    path = "/api/estoque",
    request_body = MovimentarEstoquePayload,
    responses(
        (status = 200, description = "Movimentação ou reatribuição aplicada"),
        (status = 400, description = "Requisição inválida ou saldo insuficiente"),
        (status = 404, description = "Linha de estoque não encontrada")
    ),
    security(("api_jwt" = [])),
    tag = "Estoque"
)]
pub async fn movimentar_estoque(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<MovimentarEstoquePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Modo movimentação
    if let (Some(tipo), Some(quantidade), Some(produto_id), Some(prateleira_id), Some(distribuidor_id)) = (
        payload.tipo.as_deref(),
        payload.quantidade,
        payload.produto_id,
        payload.prateleira_id,
        payload.distribuidor_id,
    ) {
        let (estoque, acao) = match tipo {
            "adicionar" => {
                let estoque = app_state
                    .estoque_repo
                    .criar_ou_somar(produto_id, prateleira_id, distribuidor_id, quantidade)
                    .await?;
                (estoque, "adicionado")
            }
            "retirar" => {
                let estoque = app_state
                    .estoque_repo
                    .retirar(produto_id, prateleira_id, distribuidor_id, quantidade)
                    .await?;
                (estoque, "retirado")
            }
            outro => return Err(AppError::CampoBuscaInvalido(format!("tipo: {outro}"))),
        };

        app_state
            .historico_repo
            .registrar(user.0.id, "estoque", &estoque.id.to_string(), acao, Some(quantidade))
            .await?;

        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Movimentação realizada com sucesso", "estoque": estoque })),
        ));
    }

    // Modo reatribuição
    if let Some(id) = payload.id {
        let estoque = app_state
            .estoque_repo
            .reatribuir(id, payload.produto_id, payload.prateleira_id, payload.distribuidor_id)
            .await?;

        app_state
            .historico_repo
            .registrar(user.0.id, "estoque", &estoque.id.to_string(), "editado", None)
            .await?;

        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Estoque atualizado com sucesso", "estoque": estoque })),
        ));
    }

    Err(AppError::CampoBuscaInvalido("requisição sem tipo nem id".to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/estoque",
    params(ExcluirParams),
    responses(
        (status = 200, description = "Linha de estoque excluída"),
        (status = 404, description = "Linha de estoque não encontrada")
    ),
    security(("api_jwt" = [])),
    tag = "Estoque"
)]
pub async fn excluir_estoque(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ExcluirParams>,
) -> Result<impl IntoResponse, AppError> {
    app_state.estoque_repo.excluir(params.id).await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "estoque", &params.id.to_string(), "excluido", None)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Estoque excluído com sucesso" }))))
}

#[utoipa::path(
    post,
    path = "/api/estoque/import-csv",
    responses(
        (status = 200, description = "Importação concluída"),
        (status = 400, description = "CSV inválido ou sem linhas aproveitáveis")
    ),
    security(("api_jwt" = [])),
    tag = "Estoque"
)]
pub async fn importar_csv(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut conteudo: Option<Vec<u8>> = None;
    while let Some(campo) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::CsvInvalido(e.to_string()))?
    {
        if campo.name() == Some("file") {
            let bytes = campo
                .bytes()
                .await
                .map_err(|e| AppError::CsvInvalido(e.to_string()))?;
            conteudo = Some(bytes.to_vec());
        }
    }

    let conteudo =
        conteudo.ok_or_else(|| AppError::CsvInvalido("arquivo não enviado".to_string()))?;

    let resumo = app_state.importacao_service.importar_estoque_csv(&conteudo).await?;

    app_state
        .historico_repo
        .registrar(
            user.0.id,
            "estoque",
            "import-csv",
            "importado",
            Some(resumo.importados as i32),
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("Importação concluída. {} itens importados.", resumo.importados),
            "importados": resumo.importados,
            "ignorados": resumo.ignorados,
        })),
    ))
}
