use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::model::employee::Employee;
use crate::model::salary::{AdjustmentKey, Period, SalaryAdjustment};
use crate::payroll::store::{AdjustmentStore, EmployeeDirectory};

const ADJUSTMENT_COLUMNS: &str = "empleado_id, mes, anio, facturacion, adelanto, vacaciones, \
     recepcion, otros, recibo, created_by";

#[derive(Clone)]
pub struct MySqlEmployeeDirectory {
    pool: MySqlPool,
}

impl MySqlEmployeeDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for MySqlEmployeeDirectory {
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, position, status FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}

#[derive(Clone)]
pub struct MySqlAdjustmentStore {
    pool: MySqlPool,
}

impl MySqlAdjustmentStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdjustmentStore for MySqlAdjustmentStore {
    async fn fetch_period(&self, period: Period) -> Result<Vec<SalaryAdjustment>> {
        let sql = format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM salary_adjustments \
             WHERE mes = ? AND anio = ? ORDER BY empleado_id"
        );
        debug!(sql = %sql, mes = period.mes, anio = period.anio, "Fetching adjustments");

        let rows = sqlx::query_as::<_, SalaryAdjustment>(&sql)
            .bind(period.mes)
            .bind(period.anio)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get(&self, key: AdjustmentKey) -> Result<Option<SalaryAdjustment>> {
        let sql = format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM salary_adjustments \
             WHERE empleado_id = ? AND mes = ? AND anio = ?"
        );

        let row = sqlx::query_as::<_, SalaryAdjustment>(&sql)
            .bind(key.empleado_id)
            .bind(key.period.mes)
            .bind(key.period.anio)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn upsert(&self, adjustment: SalaryAdjustment) -> Result<SalaryAdjustment> {
        // Relies on UNIQUE KEY (empleado_id, mes, anio).
        sqlx::query(
            r#"
            INSERT INTO salary_adjustments
                (empleado_id, mes, anio, facturacion, adelanto, vacaciones, recepcion, otros, recibo, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                facturacion = VALUES(facturacion),
                adelanto = VALUES(adelanto),
                vacaciones = VALUES(vacaciones),
                recepcion = VALUES(recepcion),
                otros = VALUES(otros),
                recibo = VALUES(recibo),
                created_by = VALUES(created_by)
            "#,
        )
        .bind(adjustment.empleado_id)
        .bind(adjustment.mes)
        .bind(adjustment.anio)
        .bind(adjustment.facturacion)
        .bind(adjustment.adelanto)
        .bind(adjustment.vacaciones)
        .bind(adjustment.recepcion)
        .bind(adjustment.otros)
        .bind(adjustment.recibo)
        .bind(&adjustment.created_by)
        .execute(&self.pool)
        .await?;

        let key = adjustment.key();
        self.get(key).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Adjustment for employee {} in {}",
                key.empleado_id, key.period
            ))
        })
    }
}
