use crate::{redis_client::RedisClient, services::SeatPlanRepository};
use tracing::{info, warn};

pub mod seat_plans;

#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    repo: SeatPlanRepository,
    seat_plan_ttl: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, repo: SeatPlanRepository, seat_plan_ttl: u64) -> Self {
        Self { redis, repo, seat_plan_ttl }
    }

    // Прогрев кеша при старте: схемы всех залов
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");

        let theaters = match self.repo.list_theaters().await {
            Ok(theaters) => theaters,
            Err(e) => {
                warn!("Cache warmup skipped, cannot list theaters: {:?}", e);
                return;
            }
        };

        let mut warmed = 0;
        for theater in &theaters {
            match self.get_seat_plan(theater.id).await {
                Ok(Some(_)) => warmed += 1,
                Ok(None) => {}
                Err(e) => warn!("Failed to warm seat plan for theater {}: {:?}", theater.id, e),
            }
        }

        info!("Cache warmup done: {}/{} seat plans", warmed, theaters.len());
    }
}
