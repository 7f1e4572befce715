use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Absence {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 3)]
    pub empleado_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub fecha_inicio: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub fecha_fin: NaiveDate,
    #[schema(example = "Enfermedad", nullable = true)]
    pub motivo: Option<String>,
    #[schema(example = "2026-03-01T10:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Absence {
    /// Calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.fecha_fin - self.fecha_inicio).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_both_ends() {
        let absence = Absence {
            id: 1,
            empleado_id: 1,
            fecha_inicio: NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(),
            fecha_fin: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            motivo: None,
            created_at: None,
        };
        assert_eq!(absence.days(), 4);
    }
}
