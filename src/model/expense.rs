use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Expense {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Tinturas")]
    pub descripcion: String,
    #[schema(value_type = f64, example = 85000)]
    pub monto: Decimal,
    #[schema(example = "insumos", nullable = true)]
    pub categoria: Option<String>,
    #[schema(example = "2026-03-10", format = "date", value_type = String)]
    pub fecha: NaiveDate,
    pub created_by: Option<String>,
}

pub fn total(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.monto).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sums_amounts() {
        let expense = |id, monto| Expense {
            id,
            descripcion: "x".into(),
            monto,
            categoria: None,
            fecha: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            created_by: None,
        };

        assert_eq!(total(&[]), Decimal::ZERO);
        assert_eq!(total(&[expense(1, dec!(1000.50)), expense(2, dec!(250))]), dec!(1250.50));
    }
}
