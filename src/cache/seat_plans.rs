use crate::cache::CacheService;
use crate::models::SeatPlan;
use redis::AsyncCommands;
use tracing::{debug, warn};

pub fn seat_plan_key(theater_id: i64) -> String {
    format!("seatplan:{}", theater_id)
}

impl CacheService {
    /// Сырая схема зала: сначала Redis, затем база с записью в кеш.
    /// Ошибки Redis не мешают ответу, они только логируются.
    pub async fn get_seat_plan(&self, theater_id: i64) -> Result<Option<SeatPlan>, sqlx::Error> {
        match self.get_seat_plan_from_cache(theater_id).await {
            Ok(Some(plan)) => {
                debug!("Seat plan cache hit for theater {}", theater_id);
                return Ok(Some(plan));
            }
            Ok(None) => debug!("Seat plan cache miss for theater {}", theater_id),
            Err(e) => warn!("Seat plan cache read failed for theater {}: {:?}", theater_id, e),
        }

        let plan = self.repo.get_seat_plan(theater_id).await?;
        if let Some(plan) = &plan {
            if let Err(e) = self.save_seat_plan_to_cache(theater_id, plan).await {
                warn!("Seat plan cache write failed for theater {}: {:?}", theater_id, e);
            }
        }
        Ok(plan)
    }

    // === Работа с кешем ===
    async fn get_seat_plan_from_cache(&self, theater_id: i64) -> Result<Option<SeatPlan>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(seat_plan_key(theater_id)).await?;
        let Some(data) = data else {
            return Ok(None);
        };
        let plan = serde_json::from_str(&data).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
        })?;
        Ok(Some(plan))
    }

    async fn save_seat_plan_to_cache(&self, theater_id: i64, plan: &SeatPlan) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(plan).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(seat_plan_key(theater_id), data, self.seat_plan_ttl).await
    }
}
