use crate::{
    api::{absence, arreglo, employee, expense, payroll},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer-IP limiter allowing `requests_per_min` requests a minute.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min} per minute"))?;
    Ok(Governor::new(&cfg))
}

pub fn payroll_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll")
            .service(web::resource("/roster").route(web::get().to(payroll::get_roster)))
            .service(
                web::resource("/roster/current").route(web::get().to(payroll::current_roster)),
            )
            .service(
                web::resource("/adjustments")
                    .route(web::get().to(payroll::list_adjustments))
                    .route(web::put().to(payroll::save_adjustment)),
            )
            // /payroll/adjustments/{empleado_id}/{anio}/{mes}
            .service(
                web::resource("/adjustments/{empleado_id}/{anio}/{mes}")
                    .route(web::patch().to(payroll::quick_edit)),
            ),
    );
}

pub fn employee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .service(
                web::resource("")
                    .route(web::post().to(employee::create_employee))
                    .route(web::get().to(employee::list_employees)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(employee::update_employee))
                    .route(web::get().to(employee::get_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    );
}

pub fn absence_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/absences")
            .service(
                web::resource("")
                    .route(web::get().to(absence::list_absences))
                    .route(web::post().to(absence::create_absence)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(absence::get_absence))
                    .route(web::delete().to(absence::delete_absence)),
            ),
    );
}

pub fn expense_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/expenses")
            .service(
                web::resource("")
                    .route(web::get().to(expense::list_expenses))
                    .route(web::post().to(expense::create_expense)),
            )
            .service(web::resource("/{id}").route(web::delete().to(expense::delete_expense))),
    );
}

pub fn arreglo_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/arreglos")
            .service(
                web::resource("")
                    .route(web::get().to(arreglo::list_arreglos))
                    .route(web::post().to(arreglo::create_arreglo)),
            )
            .service(web::resource("/{id}").route(web::delete().to(arreglo::delete_arreglo)))
            // /arreglos/{id}/complete
            .service(
                web::resource("/{id}/complete").route(web::put().to(arreglo::complete_arreglo)),
            ),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config, limiter: Arc<Limiter>) {
    // Every business route needs a bearer token
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiter) // rate limiting
            .configure(payroll_routes)
            .configure(employee_routes)
            .configure(absence_routes)
            .configure(expense_routes)
            .configure(arreglo_routes),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_accepts_zero_and_high_rates() {
        assert!(build_limiter(0).is_ok());
        assert!(build_limiter(120_000).is_ok());
        assert!(build_limiter(1000).is_ok());
    }
}
