use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        DistribuidorRepository, EstoqueRepository, HistoricoRepository, PickingRepository,
        PrateleiraRepository, ProdutoRepository, UserRepository,
    },
    services::{
        picking_service::{EstoqueLedger, PickingStore},
        AuthService, ImportacaoService, PickingService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub picking_service: Arc<PickingService>,
    pub importacao_service: ImportacaoService,
    pub user_repo: UserRepository,
    pub produto_repo: ProdutoRepository,
    pub prateleira_repo: PrateleiraRepository,
    pub distribuidor_repo: DistribuidorRepository,
    pub estoque_repo: EstoqueRepository,
    pub picking_repo: PickingRepository,
    pub historico_repo: HistoricoRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let prateleira_repo = PrateleiraRepository::new(db_pool.clone());
        let distribuidor_repo = DistribuidorRepository::new(db_pool.clone());
        let estoque_repo = EstoqueRepository::new(db_pool.clone());
        let picking_repo = PickingRepository::new(db_pool.clone());
        let historico_repo = HistoricoRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let picking_service = Arc::new(PickingService::new(
            Arc::new(estoque_repo.clone()) as Arc<dyn EstoqueLedger>,
            Arc::new(picking_repo.clone()) as Arc<dyn PickingStore>,
        ));
        let importacao_service = ImportacaoService::new(
            produto_repo.clone(),
            prateleira_repo.clone(),
            distribuidor_repo.clone(),
            estoque_repo.clone(),
        );

        Ok(Self {
            db_pool,
            auth_service,
            picking_service,
            importacao_service,
            user_repo,
            produto_repo,
            prateleira_repo,
            distribuidor_repo,
            estoque_repo,
            picking_repo,
            historico_repo,
        })
    }
}
