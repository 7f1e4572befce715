use crate::auth::auth::AuthUser;
use crate::model::arreglo::{Arreglo, ArregloEstado};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateArreglo {
    #[schema(example = "Maria Gomez")]
    pub cliente: String,
    #[schema(example = "Retoque de color")]
    pub servicio: String,
    #[schema(example = 3)]
    pub empleado_id: Option<u64>,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub fecha: NaiveDate,
    pub observacion: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ArregloFilter {
    pub estado: Option<ArregloEstado>,
    pub empleado_id: Option<u64>,
}

const SELECT_ARREGLOS: &str =
    "SELECT id, cliente, servicio, empleado_id, fecha, estado, observacion FROM arreglos";

#[utoipa::path(
    post,
    path = "/api/arreglos",
    request_body = CreateArreglo,
    responses(
        (status = 201, description = "Arreglo registered as pending", body = Object, example = json!({
            "message": "Arreglo registered",
            "id": 8,
            "estado": "pendiente"
        })),
        (status = 400, description = "Missing client or service")
    ),
    security(("bearer_auth" = [])),
    tag = "Arreglo"
)]
pub async fn create_arreglo(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateArreglo>,
) -> actix_web::Result<impl Responder> {
    if payload.cliente.trim().is_empty() || payload.servicio.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "cliente and servicio are required"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO arreglos (cliente, servicio, empleado_id, fecha, estado, observacion)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.cliente.trim())
    .bind(payload.servicio.trim())
    .bind(payload.empleado_id)
    .bind(payload.fecha)
    .bind(ArregloEstado::Pendiente.as_ref())
    .bind(&payload.observacion)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to register arreglo");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Arreglo registered",
        "id": result.last_insert_id(),
        "estado": ArregloEstado::Pendiente.as_ref()
    })))
}

#[utoipa::path(
    get,
    path = "/api/arreglos",
    params(ArregloFilter),
    responses(
        (status = 200, description = "Arreglos, newest first", body = [Arreglo])
    ),
    security(("bearer_auth" = [])),
    tag = "Arreglo"
)]
pub async fn list_arreglos(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ArregloFilter>,
) -> actix_web::Result<impl Responder> {
    let mut conditions = Vec::new();
    if query.estado.is_some() {
        conditions.push("estado = ?");
    }
    if query.empleado_id.is_some() {
        conditions.push("empleado_id = ?");
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("{SELECT_ARREGLOS}{where_clause} ORDER BY fecha DESC, id DESC");

    let mut data_q = sqlx::query_as::<_, Arreglo>(&sql);
    if let Some(estado) = query.estado {
        data_q = data_q.bind(estado.as_ref().to_string());
    }
    if let Some(empleado_id) = query.empleado_id {
        data_q = data_q.bind(empleado_id);
    }

    let arreglos = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, sql = %sql, "Failed to fetch arreglos");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(arreglos))
}

/* =========================
Mark arreglo as done
========================= */
#[utoipa::path(
    put,
    path = "/api/arreglos/{arreglo_id}/complete",
    params(
        ("arreglo_id" = u64, Path, description = "ID of the pending arreglo")
    ),
    responses(
        (status = 200, description = "Arreglo marked as done", body = Object, example = json!({
            "message": "Arreglo completed"
        })),
        (status = 400, description = "Arreglo not found or already done", body = Object, example = json!({
            "message": "Arreglo not found or already done"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Arreglo"
)]
pub async fn complete_arreglo(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let arreglo_id = path.into_inner();

    let result = sqlx::query("UPDATE arreglos SET estado = ? WHERE id = ? AND estado = ?")
        .bind(ArregloEstado::Realizado.as_ref())
        .bind(arreglo_id)
        .bind(ArregloEstado::Pendiente.as_ref())
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, arreglo_id, "Complete arreglo failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Arreglo not found or already done"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Arreglo completed"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/arreglos/{arreglo_id}",
    params(
        ("arreglo_id" = u64, Path, description = "Arreglo ID")
    ),
    responses(
        (status = 200, description = "Arreglo deleted"),
        (status = 404, description = "Arreglo not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Arreglo"
)]
pub async fn delete_arreglo(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let arreglo_id = path.into_inner();

    let result = sqlx::query("DELETE FROM arreglos WHERE id = ?")
        .bind(arreglo_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, arreglo_id, "Failed to delete arreglo");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Arreglo not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Arreglo deleted" })))
}
