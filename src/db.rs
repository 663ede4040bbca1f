pub mod distribuidor_repo;
pub use distribuidor_repo::DistribuidorRepository;
pub mod estoque_repo;
pub use estoque_repo::EstoqueRepository;
pub mod historico_repo;
pub use historico_repo::HistoricoRepository;
pub mod picking_repo;
pub use picking_repo::PickingRepository;
pub mod prateleira_repo;
pub use prateleira_repo::PrateleiraRepository;
pub mod produto_repo;
pub use produto_repo::ProdutoRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
