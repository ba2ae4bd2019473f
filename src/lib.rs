pub mod config;
pub mod database;
pub mod redis_client;
pub mod models;
pub mod seatmap;
pub mod services;
pub mod cache;
pub mod controllers;
pub mod error;

use std::sync::Arc;
#[cfg(feature = "cache-warmup")]
use tokio::task;
use tracing::info;

use models::SeatPlan;
use seatmap::{normalize_with_overrides, CoordinateOverrides};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub redis: redis_client::RedisClient,
    pub cache: cache::CacheService,
    pub repo: services::SeatPlanRepository,
    pub config: config::Config,
    pub overrides: Arc<CoordinateOverrides>,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let redis = redis_client::RedisClient::new(&config.redis.url).await?;
        let repo = services::SeatPlanRepository::new(db.pool.clone());
        let cache = cache::CacheService::new(redis.clone(), repo.clone(), config.redis.seat_plan_ttl_seconds);

        let overrides = match &config.seatmap.overrides_path {
            Some(path) => CoordinateOverrides::load(path).map_err(config::ConfigError::from)?,
            None => {
                info!("No coordinate overrides configured");
                CoordinateOverrides::new()
            }
        };

        let state = Arc::new(Self {
            db,
            redis,
            cache,
            repo,
            config,
            overrides: Arc::new(overrides),
        });

        #[cfg(feature = "cache-warmup")]
        {
            if state.config.features.enable_cache_warmup {
                let state_for_bg = state.clone();
                task::spawn(async move {
                    // Warmup cache в фоне
                    state_for_bg.cache.warmup_cache().await;
                });
            }
        }

        Ok(state)
    }

    /// Схема зала, готовая к отображению: из кеша, с нормализацией
    /// и поправками координат.
    pub async fn normalized_seat_plan(&self, theater_id: i64) -> Result<Option<SeatPlan>, sqlx::Error> {
        let plan = self.cache.get_seat_plan(theater_id).await?;
        Ok(plan.map(|plan| normalize_with_overrides(&plan, &self.overrides)))
    }
}
