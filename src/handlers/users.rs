use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Paginacao},
    config::AppState,
    middleware::auth::AuthenticatedUser,
};

fn exige_admin(user: &AuthenticatedUser) -> Result<(), AppError> {
    if !user.0.is_admin() {
        return Err(AppError::AcessoNegado);
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(Paginacao),
    responses((status = 200, description = "Lista de usuários")),
    security(("api_jwt" = [])),
    tag = "Users"
)]
pub async fn listar_users(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(paginacao): Query<Paginacao>,
) -> Result<impl IntoResponse, AppError> {
    exige_admin(&user)?;

    let (users, total) = app_state.user_repo.listar(&paginacao).await?;
    Ok((StatusCode::OK, Json(json!({ "users": users, "total": total }))))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarUserPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,

    // "admin" ou "operador"
    pub role: Option<String>,

    // "ativo" ou "inativo"
    pub status: Option<String>,
}

impl AtualizarUserPayload {
    fn validar_valores(&self) -> Result<(), AppError> {
        let mut errors = validator::ValidationErrors::new();
        if let Some(role) = &self.role {
            if role != "admin" && role != "operador" {
                let mut erro = validator::ValidationError::new("valor_invalido");
                erro.message = Some("O cargo deve ser 'admin' ou 'operador'.".into());
                errors.add("role", erro);
            }
        }
        if let Some(status) = &self.status {
            if status != "ativo" && status != "inativo" {
                let mut erro = validator::ValidationError::new("valor_invalido");
                erro.message = Some("A situação deve ser 'ativo' ou 'inativo'.".into());
                errors.add("status", erro);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(errors))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    request_body = AtualizarUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = crate::models::auth::User),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Users"
)]
pub async fn atualizar_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    exige_admin(&user)?;
    payload.validate()?;
    payload.validar_valores()?;

    let atualizado = app_state
        .user_repo
        .atualizar(
            id,
            payload.nome.as_deref(),
            payload.role.as_deref(),
            payload.status.as_deref(),
        )
        .await?;

    app_state
        .historico_repo
        .registrar(user.0.id, "user", &id.to_string(), "editado", None)
        .await?;

    Ok((StatusCode::OK, Json(atualizado)))
}
