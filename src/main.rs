//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/", get(handlers::users::listar_users))
        .route("/{id}", axum::routing::patch(handlers::users::atualizar_user))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let produto_routes = Router::new()
        .route(
            "/",
            get(handlers::produtos::listar_produtos)
                .post(handlers::produtos::criar_produto)
                .patch(handlers::produtos::atualizar_produto)
                .delete(handlers::produtos::excluir_produto),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let prateleira_routes = Router::new()
        .route(
            "/",
            get(handlers::prateleiras::listar_prateleiras)
                .post(handlers::prateleiras::criar_prateleira)
                .patch(handlers::prateleiras::atualizar_prateleira)
                .delete(handlers::prateleiras::excluir_prateleira),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let distribuidor_routes = Router::new()
        .route(
            "/",
            get(handlers::distribuidores::listar_distribuidores)
                .post(handlers::distribuidores::criar_distribuidor)
                .patch(handlers::distribuidores::atualizar_distribuidor)
                .delete(handlers::distribuidores::excluir_distribuidor),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let estoque_routes = Router::new()
        .route(
            "/",
            get(handlers::estoque::listar_estoque)
                .post(handlers::estoque::criar_estoque)
                .patch(handlers::estoque::movimentar_estoque)
                .delete(handlers::estoque::excluir_estoque),
        )
        .route("/import-csv", post(handlers::estoque::importar_csv))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let historico_routes = Router::new()
        .route("/", get(handlers::historico::listar_historico))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let picking_routes = Router::new()
        .route(
            "/",
            get(handlers::picking::listar_romaneios)
                .post(handlers::picking::criar_romaneio)
                .patch(handlers::picking::atualizar_status)
                .delete(handlers::picking::excluir_romaneio),
        )
        .route(
            "/item",
            axum::routing::patch(handlers::picking::atualizar_item)
                .delete(handlers::picking::remover_item),
        )
        .route("/{id}", get(handlers::picking::abrir_romaneio))
        .route("/{id}/bipar", post(handlers::picking::bipar))
        .route("/{id}/finalizar", post(handlers::picking::finalizar_romaneio))
        .route("/{id}/pdf", get(handlers::picking::gerar_pdf))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/produtos", produto_routes)
        .nest("/api/prateleiras", prateleira_routes)
        .nest("/api/distribuidores", distribuidor_routes)
        .nest("/api/estoque", estoque_routes)
        .nest("/api/historico", historico_routes)
        .nest("/api/picking", picking_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
