use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use utoipa::ToSchema;

use crate::error::AppError;

/// A payroll period: calendar month (1-12) and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Period {
    #[schema(example = 3)]
    pub mes: u8,
    #[schema(example = 2026)]
    pub anio: u16,
}

impl Period {
    pub fn new(mes: u8, anio: u16) -> Result<Self, AppError> {
        if !(1..=12).contains(&mes) {
            return Err(AppError::InvalidPeriod { mes, anio });
        }
        Ok(Self { mes, anio })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.mes, self.anio)
    }
}

/// Composite key of a salary adjustment. At most one record exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdjustmentKey {
    pub empleado_id: u64,
    pub period: Period,
}

impl AdjustmentKey {
    pub fn new(empleado_id: u64, period: Period) -> Self {
        Self {
            empleado_id,
            period,
        }
    }
}

/// Manually entered amounts for one employee in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "empleado_id": 1,
    "mes": 3,
    "anio": 2026,
    "facturacion": "1000000",
    "adelanto": "50000",
    "vacaciones": "0",
    "recepcion": "0",
    "otros": "0",
    "recibo": "100000",
    "created_by": "clerk@salon.example"
}))]
pub struct SalaryAdjustment {
    pub empleado_id: u64,
    pub mes: u8,
    pub anio: u16,
    #[schema(value_type = f64)]
    pub facturacion: Decimal,
    #[schema(value_type = f64)]
    pub adelanto: Decimal,
    #[schema(value_type = f64)]
    pub vacaciones: Decimal,
    #[schema(value_type = f64)]
    pub recepcion: Decimal,
    #[schema(value_type = f64)]
    pub otros: Decimal,
    #[schema(value_type = f64)]
    pub recibo: Decimal,
    pub created_by: Option<String>,
}

impl SalaryAdjustment {
    /// The record an unedited employee/period behaves as.
    pub fn zeroed(key: AdjustmentKey) -> Self {
        Self {
            empleado_id: key.empleado_id,
            mes: key.period.mes,
            anio: key.period.anio,
            facturacion: Decimal::ZERO,
            adelanto: Decimal::ZERO,
            vacaciones: Decimal::ZERO,
            recepcion: Decimal::ZERO,
            otros: Decimal::ZERO,
            recibo: Decimal::ZERO,
            created_by: None,
        }
    }

    pub fn period(&self) -> Period {
        Period {
            mes: self.mes,
            anio: self.anio,
        }
    }

    pub fn key(&self) -> AdjustmentKey {
        AdjustmentKey::new(self.empleado_id, self.period())
    }

    pub fn field(&self, field: AdjustmentField) -> Decimal {
        match field {
            AdjustmentField::Facturacion => self.facturacion,
            AdjustmentField::Adelanto => self.adelanto,
            AdjustmentField::Vacaciones => self.vacaciones,
            AdjustmentField::Recepcion => self.recepcion,
            AdjustmentField::Otros => self.otros,
            AdjustmentField::Recibo => self.recibo,
        }
    }

    /// Returns a copy with one amount replaced.
    pub fn with_field(&self, field: AdjustmentField, value: Decimal) -> Self {
        let mut next = self.clone();
        match field {
            AdjustmentField::Facturacion => next.facturacion = value,
            AdjustmentField::Adelanto => next.adelanto = value,
            AdjustmentField::Vacaciones => next.vacaciones = value,
            AdjustmentField::Recepcion => next.recepcion = value,
            AdjustmentField::Otros => next.otros = value,
            AdjustmentField::Recibo => next.recibo = value,
        }
        next
    }
}

/// Amount columns that can be edited one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdjustmentField {
    Facturacion,
    Adelanto,
    Vacaciones,
    Recepcion,
    Otros,
    Recibo,
}

/// One roster line: employee identity, the period's adjustment and the derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalaryCalculationRow {
    pub empleado_id: u64,
    pub nombre: String,
    pub puesto: String,
    pub mes: u8,
    pub anio: u16,
    #[schema(value_type = f64)]
    pub facturacion: Decimal,
    #[schema(value_type = f64)]
    pub adelanto: Decimal,
    #[schema(value_type = f64)]
    pub vacaciones: Decimal,
    #[schema(value_type = f64)]
    pub recepcion: Decimal,
    #[schema(value_type = f64)]
    pub otros: Decimal,
    #[schema(value_type = f64)]
    pub recibo: Decimal,
    #[schema(value_type = f64)]
    pub comision: Decimal,
    #[schema(value_type = f64)]
    pub total_efectivo: Decimal,
    #[schema(value_type = f64)]
    pub total_completo: Decimal,
    #[schema(value_type = f64)]
    pub asegurado: Decimal,
    pub created_by: Option<String>,
}
