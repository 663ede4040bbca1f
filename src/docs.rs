use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::listar_users,
        handlers::users::atualizar_user,

        // --- Produtos ---
        handlers::produtos::listar_produtos,
        handlers::produtos::criar_produto,
        handlers::produtos::atualizar_produto,
        handlers::produtos::excluir_produto,

        // --- Prateleiras ---
        handlers::prateleiras::listar_prateleiras,
        handlers::prateleiras::criar_prateleira,
        handlers::prateleiras::atualizar_prateleira,
        handlers::prateleiras::excluir_prateleira,

        // --- Distribuidores ---
        handlers::distribuidores::listar_distribuidores,
        handlers::distribuidores::criar_distribuidor,
        handlers::distribuidores::atualizar_distribuidor,
        handlers::distribuidores::excluir_distribuidor,

        // --- Estoque ---
        handlers::estoque::listar_estoque,
        handlers::estoque::criar_estoque,
        handlers::estoque::movimentar_estoque,
        handlers::estoque::excluir_estoque,
        handlers::estoque::importar_csv,

        // --- Historico ---
        handlers::historico::listar_historico,

        // --- Picking ---
        handlers::picking::listar_romaneios,
        handlers::picking::criar_romaneio,
        handlers::picking::atualizar_status,
        handlers::picking::excluir_romaneio,
        handlers::picking::abrir_romaneio,
        handlers::picking::bipar,
        handlers::picking::atualizar_item,
        handlers::picking::remover_item,
        handlers::picking::finalizar_romaneio,
        handlers::picking::gerar_pdf,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Cadastro ---
            models::produto::Produto,
            models::prateleira::Prateleira,
            models::distribuidor::Distribuidor,

            // --- Estoque ---
            models::estoque::Estoque,
            models::estoque::EstoqueDetalhado,
            models::estoque::EstoqueDisponivel,
            models::estoque::EstoqueLocalizado,

            // --- Historico ---
            models::historico::Historico,
            models::historico::HistoricoDetalhado,

            // --- Picking ---
            models::picking::RomaneioStatus,
            models::picking::Romaneio,
            models::picking::ItemBipado,
            models::picking::Alocacao,
            models::picking::ItemRota,
            models::picking::GrupoRota,
            models::picking::ResultadoAlocacao,
            models::picking::ResumoFinalizacao,
            models::picking::SessaoSnapshot,

            // --- Payloads ---
            handlers::users::AtualizarUserPayload,
            handlers::produtos::CriarProdutoPayload,
            handlers::produtos::AtualizarProdutoPayload,
            handlers::prateleiras::CriarPrateleiraPayload,
            handlers::prateleiras::AtualizarPrateleiraPayload,
            handlers::distribuidores::CriarDistribuidorPayload,
            handlers::distribuidores::AtualizarDistribuidorPayload,
            handlers::estoque::CriarEstoquePayload,
            handlers::estoque::MovimentarEstoquePayload,
            handlers::picking::CriarRomaneioPayload,
            handlers::picking::AtualizarStatusPayload,
            handlers::picking::BiparPayload,
            handlers::picking::AtualizarItemPayload,

            // --- Serviços ---
            services::importacao_service::ResumoImportacao,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Gestão de Usuários"),
        (name = "Produtos", description = "Catálogo de Produtos"),
        (name = "Prateleiras", description = "Prateleiras do Almoxarifado"),
        (name = "Distribuidores", description = "Distribuidores"),
        (name = "Estoque", description = "Saldo e Movimentação de Estoque"),
        (name = "Historico", description = "Auditoria de Ações"),
        (name = "Picking", description = "Romaneios e Separação")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
