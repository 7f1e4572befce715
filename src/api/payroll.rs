use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::salary::{
    AdjustmentField, AdjustmentKey, Period, SalaryAdjustment, SalaryCalculationRow,
};
use crate::payroll::service::PayrollService;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PeriodQuery {
    /// Month, 1-12
    #[schema(example = 3)]
    pub mes: u8,
    #[schema(example = 2026)]
    pub anio: u16,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveAdjustment {
    #[schema(example = 1)]
    pub empleado_id: u64,
    #[schema(example = 3)]
    pub mes: u8,
    #[schema(example = 2026)]
    pub anio: u16,
    #[serde(default)]
    #[schema(value_type = f64, example = 1000000)]
    pub facturacion: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 50000)]
    pub adelanto: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 0)]
    pub vacaciones: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 0)]
    pub recepcion: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 0)]
    pub otros: Decimal,
    #[serde(default)]
    #[schema(value_type = f64, example = 100000)]
    pub recibo: Decimal,
}

#[derive(Deserialize, ToSchema)]
pub struct QuickEdit {
    #[schema(example = "adelanto")]
    pub field: AdjustmentField,
    #[schema(value_type = f64, example = 25000)]
    pub value: Decimal,
}

#[derive(Serialize, ToSchema)]
pub struct RosterResponse {
    pub mes: u8,
    pub anio: u16,
    pub rows: Vec<SalaryCalculationRow>,
}

#[utoipa::path(
    get,
    path = "/api/payroll/roster",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Salary roster of active employees", body = RosterResponse),
        (status = 400, description = "Invalid period"),
        (status = 409, description = "Caller switched to another period before this roster loaded"),
        (status = 500, description = "Database error")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_roster(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let period = Period::new(query.mes, query.anio)?;
    let rows = service.roster(&auth.username, period).await?;

    Ok(HttpResponse::Ok().json(RosterResponse {
        mes: period.mes,
        anio: period.anio,
        rows,
    }))
}

#[utoipa::path(
    get,
    path = "/api/payroll/roster/current",
    responses(
        (status = 200, description = "Last roster computed for the caller", body = RosterResponse),
        (status = 404, description = "No roster loaded yet", body = Object, example = json!({
            "message": "No roster loaded yet"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn current_roster(
    auth: AuthUser,
    service: web::Data<PayrollService>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    match service.current_roster(&auth.username).await {
        Some((period, rows)) => Ok(HttpResponse::Ok().json(RosterResponse {
            mes: period.mes,
            anio: period.anio,
            rows,
        })),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No roster loaded yet"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/payroll/adjustments",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Stored adjustments of the period", body = [SalaryAdjustment]),
        (status = 400, description = "Invalid period")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_adjustments(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let period = Period::new(query.mes, query.anio)?;
    let adjustments = service.adjustments(period).await?;

    Ok(HttpResponse::Ok().json(adjustments))
}

#[utoipa::path(
    put,
    path = "/api/payroll/adjustments",
    request_body = SaveAdjustment,
    responses(
        (status = 200, description = "Adjustment stored", body = SalaryAdjustment),
        (status = 400, description = "Invalid period"),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Database error")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn save_adjustment(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    payload: web::Json<SaveAdjustment>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let payload = payload.into_inner();
    let period = Period::new(payload.mes, payload.anio)?;

    let adjustment = SalaryAdjustment {
        facturacion: payload.facturacion,
        adelanto: payload.adelanto,
        vacaciones: payload.vacaciones,
        recepcion: payload.recepcion,
        otros: payload.otros,
        recibo: payload.recibo,
        ..SalaryAdjustment::zeroed(AdjustmentKey::new(payload.empleado_id, period))
    };

    let stored = service.save_adjustment(&auth.username, adjustment).await?;
    Ok(HttpResponse::Ok().json(stored))
}

#[utoipa::path(
    patch,
    path = "/api/payroll/adjustments/{empleado_id}/{anio}/{mes}",
    params(
        ("empleado_id" = u64, Path, description = "Employee ID"),
        ("anio" = u16, Path, description = "Year"),
        ("mes" = u8, Path, description = "Month, 1-12")
    ),
    request_body = QuickEdit,
    responses(
        (status = 200, description = "Field updated", body = SalaryAdjustment),
        (status = 400, description = "Invalid period or field"),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Database error")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn quick_edit(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<(u64, u16, u8)>,
    body: web::Json<QuickEdit>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let (empleado_id, anio, mes) = path.into_inner();
    let key = AdjustmentKey::new(empleado_id, Period::new(mes, anio)?);

    let stored = service
        .quick_edit(&auth.username, key, body.field, body.value)
        .await?;

    Ok(HttpResponse::Ok().json(stored))
}
