pub mod auth;
pub mod distribuidor;
pub mod estoque;
pub mod historico;
pub mod picking;
pub mod prateleira;
pub mod produto;
