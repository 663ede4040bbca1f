use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    config::AppState,
    db::historico_repo::FiltroHistorico,
    middleware::auth::AuthenticatedUser,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoricoParams {
    // Dia exato, formato YYYY-MM-DD.
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub entidade: Option<String>,
    pub acao: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/historico",
    params(Paginacao, HistoricoParams),
    responses((status = 200, description = "Histórico de ações, mais recente primeiro")),
    security(("api_jwt" = [])),
    tag = "Historico"
)]
pub async fn listar_historico(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
    Query(params): Query<HistoricoParams>,
) -> Result<impl IntoResponse, AppError> {
    let filtro = FiltroHistorico {
        data: params.start_date,
        user_id: params.user_id,
        entidade: params.entidade.filter(|e| !e.is_empty()),
        acao: params.acao.filter(|a| !a.is_empty()),
    };

    let (historico, total) = app_state.historico_repo.listar(&paginacao, &filtro).await?;

    Ok((StatusCode::OK, Json(json!({ "historico": historico, "total": total }))))
}
