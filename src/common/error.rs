use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário inativo")]
    UsuarioInativo,

    #[error("Acesso negado")]
    AcessoNegado,

    #[error("Produto não encontrado")]
    ProdutoNaoEncontrado,

    #[error("Código de barras sem estoque correspondente")]
    CodigoBarrasNaoEncontrado,

    #[error("Romaneio não encontrado")]
    RomaneioNaoEncontrado,

    #[error("Romaneio sem itens")]
    RomaneioVazio,

    #[error("Romaneio já concluído")]
    RomaneioJaConcluido,

    #[error("Quantidade a retirar maior que o estoque disponível")]
    EstoqueInsuficiente,

    #[error("Registro não encontrado")]
    RegistroNaoEncontrado,

    #[error("Registro duplicado: {0}")]
    RegistroDuplicado(String),

    #[error("Campo de busca inválido: {0}")]
    CampoBuscaInvalido(String),

    #[error("CSV inválido: {0}")]
    CsvInvalido(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` captura o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::RegistroDuplicado(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UsuarioInativo => (
                StatusCode::FORBIDDEN,
                "Usuário está inativo. Contate o administrador.".to_string(),
            ),
            AppError::AcessoNegado => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para esta operação.".to_string(),
            ),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::ProdutoNaoEncontrado | AppError::CodigoBarrasNaoEncontrado => {
                (StatusCode::NOT_FOUND, "Produto não encontrado.".to_string())
            }
            AppError::RomaneioNaoEncontrado => {
                (StatusCode::NOT_FOUND, "Romaneio não encontrado.".to_string())
            }
            AppError::RegistroNaoEncontrado => {
                (StatusCode::NOT_FOUND, "Registro não encontrado.".to_string())
            }
            AppError::RomaneioVazio => {
                (StatusCode::BAD_REQUEST, "Nenhum item para finalizar.".to_string())
            }
            AppError::RomaneioJaConcluido => {
                (StatusCode::CONFLICT, "Este romaneio já foi concluído.".to_string())
            }
            AppError::EstoqueInsuficiente => (
                StatusCode::BAD_REQUEST,
                "Quantidade a retirar maior que o estoque disponível.".to_string(),
            ),
            AppError::CampoBuscaInvalido(campo) => (
                StatusCode::BAD_REQUEST,
                format!("Campo de busca inválido: {campo}"),
            ),
            AppError::CsvInvalido(msg) => {
                (StatusCode::BAD_REQUEST, format!("Erro ao ler o CSV: {msg}"))
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl AppError {
    /// Converte violação de chave única do Postgres em erro 409 com mensagem própria.
    pub fn de_violacao_unica(e: sqlx::Error, mensagem: &str) -> AppError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::RegistroDuplicado(mensagem.to_string());
            }
        }
        AppError::DatabaseError(e)
    }
}
