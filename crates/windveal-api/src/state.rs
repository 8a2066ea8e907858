//! Application state wiring all services together.
//!
//! AppState holds the fallback chain and the concrete storage-backed
//! services. Services are generic over repository/hasher traits, but
//! AppState pins them to the concrete infra implementations.

use std::path::Path;
use std::sync::Arc;

use windveal_core::llm::fallback::FallbackChain;
use windveal_core::service::auth::AuthService;
use windveal_infra::crypto::password::Argon2CredentialHasher;
use windveal_infra::llm::{api_key_from_env, build_chain, http_client};
use windveal_infra::persona::load_persona_or_default;
use windveal_infra::sqlite::history::SqliteHistoryRepository;
use windveal_infra::sqlite::pool::{DatabasePool, default_database_url};
use windveal_infra::sqlite::user::SqliteUserRepository;
use windveal_types::config::AppConfig;

/// Concrete type alias for the auth service pinned to infra implementations.
pub type ConcreteAuthService = AuthService<SqliteUserRepository, Argon2CredentialHasher>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup; shared by all in-flight chat requests.
    pub chain: Arc<FallbackChain>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub history_repo: Arc<SqliteHistoryRepository>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Load the persona, build the provider chain and open the database.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let persona = load_persona_or_default(Path::new(&config.persona.path)).await?;
        tracing::info!(persona = %persona.name, "Persona loaded");

        let client = http_client()?;
        let chain = build_chain(
            &config.chain_config(),
            Arc::new(persona),
            client,
            api_key_from_env,
        );

        let db_url = match &config.database.url {
            Some(url) => url.clone(),
            None => {
                let url = default_database_url();
                if let Some(dir) = url
                    .strip_prefix("sqlite://")
                    .and_then(|path| Path::new(path).parent())
                {
                    tokio::fs::create_dir_all(dir).await?;
                }
                url
            }
        };
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self::from_parts(chain, db_pool))
    }

    /// Wire repositories and services around an existing chain and pool.
    pub fn from_parts(chain: FallbackChain, db_pool: DatabasePool) -> Self {
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2CredentialHasher::default(),
        );

        Self {
            chain: Arc::new(chain),
            auth_service: Arc::new(auth_service),
            history_repo: Arc::new(SqliteHistoryRepository::new(db_pool.clone())),
            db_pool,
        }
    }
}
