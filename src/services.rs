pub mod alocacao;
pub mod auth_service;
pub mod documento_service;
pub mod importacao_service;
pub mod picking_service;
pub mod rota;

pub use auth_service::AuthService;
pub use importacao_service::ImportacaoService;
pub use picking_service::PickingService;
