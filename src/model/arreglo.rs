use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a rework ticket: `pendiente` until the service is redone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArregloEstado {
    Pendiente,
    Realizado,
}

/// A client's request to redo or fix a service.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Arreglo {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Maria Gomez")]
    pub cliente: String,
    #[schema(example = "Retoque de color")]
    pub servicio: String,
    #[schema(example = 3, nullable = true)]
    pub empleado_id: Option<u64>,
    #[schema(example = "2026-03-12", format = "date", value_type = String)]
    pub fecha: NaiveDate,
    #[schema(example = "pendiente")]
    pub estado: String,
    #[schema(nullable = true)]
    pub observacion: Option<String>,
}
