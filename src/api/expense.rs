use crate::auth::auth::AuthUser;
use crate::model::expense::{Expense, total};
use crate::utils::dates::month_bounds;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateExpense {
    #[schema(example = "Tinturas")]
    pub descripcion: String,
    #[schema(value_type = f64, example = 85000)]
    pub monto: Decimal,
    #[schema(example = "insumos")]
    pub categoria: Option<String>,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub fecha: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ExpenseMonth {
    #[schema(example = 3)]
    pub mes: u32,
    #[schema(example = 2026)]
    pub anio: i32,
    pub categoria: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ExpenseListResponse {
    pub data: Vec<Expense>,
    #[schema(value_type = f64)]
    pub total: Decimal,
}

fn validate_expense(payload: &CreateExpense) -> Result<(), &'static str> {
    if payload.descripcion.trim().is_empty() {
        return Err("descripcion is required");
    }
    if payload.monto <= Decimal::ZERO {
        return Err("monto must be greater than zero");
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpense,
    responses(
        (status = 201, description = "Expense recorded", body = Object, example = json!({
            "message": "Expense recorded",
            "id": 14
        })),
        (status = 400, description = "Missing description or non-positive amount"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn create_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateExpense>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    if let Err(message) = validate_expense(&payload) {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO expenses (descripcion, monto, categoria, fecha, created_by)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.descripcion.trim())
    .bind(payload.monto)
    .bind(&payload.categoria)
    .bind(payload.fecha)
    .bind(&auth.username)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to record expense");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    info!(operator = %auth.username, monto = %payload.monto, "Expense recorded");

    Ok(HttpResponse::Created().json(json!({
        "message": "Expense recorded",
        "id": result.last_insert_id()
    })))
}

#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ExpenseMonth),
    responses(
        (status = 200, description = "Expenses of the month and their sum", body = ExpenseListResponse),
        (status = 400, description = "Invalid month")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn list_expenses(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ExpenseMonth>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let Some((first, last)) = month_bounds(query.mes, query.anio) else {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": "Invalid month" })));
    };

    let mut sql = String::from(
        "SELECT id, descripcion, monto, categoria, fecha, created_by FROM expenses \
         WHERE fecha BETWEEN ? AND ?",
    );
    if query.categoria.is_some() {
        sql.push_str(" AND categoria = ?");
    }
    sql.push_str(" ORDER BY fecha, id");

    let mut data_q = sqlx::query_as::<_, Expense>(&sql).bind(first).bind(last);
    if let Some(categoria) = &query.categoria {
        data_q = data_q.bind(categoria);
    }

    let expenses = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, mes = query.mes, anio = query.anio, "Failed to fetch expenses");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let total = total(&expenses);
    Ok(HttpResponse::Ok().json(ExpenseListResponse {
        data: expenses,
        total,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = u64, Path, description = "Expense ID")
    ),
    responses(
        (status = 200, description = "Expense deleted"),
        (status = 404, description = "Expense not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Expense"
)]
pub async fn delete_expense(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let expense_id = path.into_inner();

    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(expense_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, expense_id, "Failed to delete expense");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Expense not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Expense deleted" })))
}
