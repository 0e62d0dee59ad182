use crate::{api::vacation, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

fn build_limiter(requests_per_min: u32) -> anyhow::Result<VacationLimiter> {
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min}/min"))?;
    Ok(Governor::new(&cfg))
}

/// `/vacations` resources without any middleware.
pub fn vacation_scope() -> actix_web::Scope {
    web::scope("/vacations")
        .app_data(vacation::json_config())
        .app_data(vacation::path_config())
        // /vacations
        .service(
            web::resource("")
                .route(web::post().to(vacation::create_vacation))
                .route(web::get().to(vacation::search_vacations)),
        )
        // /vacations/{id}
        .service(
            web::resource("/{id}")
                .route(web::get().to(vacation::get_vacation))
                .route(web::put().to(vacation::approve_vacation))
                .route(web::delete().to(vacation::decline_vacation)),
        )
}

pub type VacationLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer limiter for `/vacations`, `None` when the budget is 0.
/// Shared by every worker, so the budget is per process.
pub fn limiter(config: &Config) -> anyhow::Result<Option<Arc<VacationLimiter>>> {
    match config.rate_vacations_per_min {
        0 => Ok(None),
        per_min => Ok(Some(Arc::new(build_limiter(per_min)?))),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, limiter: Option<Arc<VacationLimiter>>) {
    match limiter {
        Some(limiter) => {
            cfg.service(vacation_scope().wrap(limiter));
        }
        None => {
            cfg.service(vacation_scope());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_accepts_large_budgets() {
        assert!(build_limiter(1000).is_ok());
        assert!(build_limiter(120_000).is_ok());
    }

    #[test]
    fn zero_budget_disables_limiting() {
        let config = Config::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            "RATE_VACATIONS_PER_MIN" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(limiter(&config).unwrap().is_none());
    }
}
