use crate::auth::auth::AuthUser;
use crate::model::absence::Absence;
use crate::utils::dates::month_bounds;
use crate::utils::pagination::PageWindow;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateAbsence {
    #[schema(example = 3)]
    pub empleado_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub fecha_inicio: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub fecha_fin: NaiveDate,
    #[schema(example = "Enfermedad")]
    pub motivo: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AbsenceFilter {
    /// Filter by employee ID
    pub empleado_id: Option<u64>,
    /// Month (1-12); only used together with `anio`
    pub mes: Option<u32>,
    pub anio: Option<i32>,
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AbsenceListResponse {
    pub data: Vec<Absence>,
    /// Calendar days covered by the listed absences
    pub total_days: i64,
    pub page: u64,
    pub per_page: u64,
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

/* =========================
Register absence
========================= */
#[utoipa::path(
    post,
    path = "/api/absences",
    request_body = CreateAbsence,
    responses(
        (status = 201, description = "Absence registered", body = Object, example = json!({
            "message": "Absence registered",
            "id": 5
        })),
        (status = 400, description = "fecha_inicio after fecha_fin"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Absence"
)]
pub async fn create_absence(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateAbsence>,
) -> actix_web::Result<impl Responder> {
    if payload.fecha_inicio > payload.fecha_fin {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "fecha_inicio cannot be after fecha_fin"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO absences (empleado_id, fecha_inicio, fecha_fin, motivo)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.empleado_id)
    .bind(payload.fecha_inicio)
    .bind(payload.fecha_fin)
    .bind(&payload.motivo)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, empleado_id = payload.empleado_id, "Failed to register absence");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Absence registered",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    get,
    path = "/api/absences/{absence_id}",
    params(
        ("absence_id" = u64, Path, description = "Absence ID")
    ),
    responses(
        (status = 200, description = "Absence found", body = Absence),
        (status = 404, description = "Absence not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Absence"
)]
pub async fn get_absence(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let absence_id = path.into_inner();

    let absence = sqlx::query_as::<_, Absence>(
        r#"
        SELECT id, empleado_id, fecha_inicio, fecha_fin, motivo, created_at
        FROM absences
        WHERE id = ?
        "#,
    )
    .bind(absence_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, absence_id, "Failed to fetch absence");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match absence {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Absence not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/absences",
    params(AbsenceFilter),
    responses(
        (status = 200, description = "Paginated absence list", body = AbsenceListResponse),
        (status = 400, description = "Invalid month")
    ),
    security(("bearer_auth" = [])),
    tag = "Absence"
)]
pub async fn list_absences(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AbsenceFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let PageWindow {
        page,
        per_page,
        offset,
    } = PageWindow::new(query.page, query.per_page);

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.empleado_id {
        where_sql.push_str(" AND empleado_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let (Some(mes), Some(anio)) = (query.mes, query.anio) {
        let Some((first, last)) = month_bounds(mes, anio) else {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid month"
            })));
        };
        // any overlap with the month
        where_sql.push_str(" AND fecha_inicio <= ? AND fecha_fin >= ?");
        args.push(FilterValue::Date(last));
        args.push(FilterValue::Date(first));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM absences{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count absences");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, empleado_id, fecha_inicio, fecha_fin, motivo, created_at
        FROM absences
        {}
        ORDER BY fecha_inicio DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Absence>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let absences = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch absence list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let total_days = absences.iter().map(Absence::days).sum();

    Ok(HttpResponse::Ok().json(AbsenceListResponse {
        data: absences,
        total_days,
        page,
        per_page,
        total,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/absences/{absence_id}",
    params(
        ("absence_id" = u64, Path, description = "Absence ID")
    ),
    responses(
        (status = 200, description = "Absence deleted"),
        (status = 404, description = "Absence not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Absence"
)]
pub async fn delete_absence(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let absence_id = path.into_inner();

    let result = sqlx::query("DELETE FROM absences WHERE id = ?")
        .bind(absence_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, absence_id, "Failed to delete absence");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Absence not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Absence deleted"
    })))
}
