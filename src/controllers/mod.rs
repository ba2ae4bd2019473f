pub mod theaters;
pub mod scenarios;
#[cfg(feature = "analytics")]
pub mod analytics;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    let router = Router::new()
        .merge(theaters::routes())
        .merge(scenarios::routes());

    #[cfg(feature = "analytics")]
    let router = router.merge(analytics::routes());

    router
}
