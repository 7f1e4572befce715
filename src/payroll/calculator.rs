//! Salary calculation rules.
//!
//! Every function here is pure: callers hand in the employee list and the
//! adjustments of a period and get back display-ready rows.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::employee::Employee;
use crate::model::salary::{AdjustmentKey, Period, SalaryAdjustment, SalaryCalculationRow};

/// Reported compensation floor. Rows below it get the difference as `asegurado`.
pub const INSURED_MINIMUM: Decimal = dec!(500000);

pub const MANICURE_RATE: Decimal = dec!(0.32);
pub const DEFAULT_RATE: Decimal = dec!(0.30);

/// Positions whose title contains this text (any case) earn the manicure rate.
/// Titles are free text, so "Manicurista", "MANICURE" and "Jefa de manicuría" all match.
const MANICURE_MARKER: &str = "manicur";

pub fn commission_rate(position: &str) -> Decimal {
    if position.to_lowercase().contains(MANICURE_MARKER) {
        MANICURE_RATE
    } else {
        DEFAULT_RATE
    }
}

pub fn compute_commission(facturacion: Decimal, position: &str) -> Decimal {
    facturacion * commission_rate(position)
}

/// What the employee receives outside the payslip. May be negative.
pub fn compute_cash_total(
    comision: Decimal,
    adelanto: Decimal,
    vacaciones: Decimal,
    recepcion: Decimal,
    otros: Decimal,
    recibo: Decimal,
) -> Decimal {
    comision - adelanto + vacaciones + recepcion + otros - recibo
}

/// Total compensation including the payslip amount. Advances are excluded.
pub fn compute_full_total(
    comision: Decimal,
    vacaciones: Decimal,
    recepcion: Decimal,
    otros: Decimal,
    recibo: Decimal,
) -> Decimal {
    comision + vacaciones + recepcion + otros + recibo
}

pub fn compute_insured_top_up(total_completo: Decimal) -> Decimal {
    if total_completo < INSURED_MINIMUM {
        INSURED_MINIMUM - total_completo
    } else {
        Decimal::ZERO
    }
}

pub fn calculate_row(employee: &Employee, adjustment: &SalaryAdjustment) -> SalaryCalculationRow {
    let comision = compute_commission(adjustment.facturacion, &employee.position);
    let total_efectivo = compute_cash_total(
        comision,
        adjustment.adelanto,
        adjustment.vacaciones,
        adjustment.recepcion,
        adjustment.otros,
        adjustment.recibo,
    );
    let total_completo = compute_full_total(
        comision,
        adjustment.vacaciones,
        adjustment.recepcion,
        adjustment.otros,
        adjustment.recibo,
    );

    SalaryCalculationRow {
        empleado_id: employee.id,
        nombre: employee.name.clone(),
        puesto: employee.position.clone(),
        mes: adjustment.mes,
        anio: adjustment.anio,
        facturacion: adjustment.facturacion,
        adelanto: adjustment.adelanto,
        vacaciones: adjustment.vacaciones,
        recepcion: adjustment.recepcion,
        otros: adjustment.otros,
        recibo: adjustment.recibo,
        comision,
        total_efectivo,
        total_completo,
        asegurado: compute_insured_top_up(total_completo),
        created_by: adjustment.created_by.clone(),
    }
}

/// One row per active employee, in input order. Employees without an
/// adjustment for `period` are computed from an all-zero record; adjustments
/// for other periods are ignored.
pub fn build_roster(
    employees: &[Employee],
    adjustments: &[SalaryAdjustment],
    period: Period,
) -> Vec<SalaryCalculationRow> {
    let by_key: HashMap<AdjustmentKey, &SalaryAdjustment> = adjustments
        .iter()
        .filter(|a| a.period() == period)
        .map(|a| (a.key(), a))
        .collect();

    employees
        .iter()
        .filter(|e| e.is_active())
        .map(|employee| {
            let key = AdjustmentKey::new(employee.id, period);
            match by_key.get(&key) {
                Some(adjustment) => calculate_row(employee, adjustment),
                None => calculate_row(employee, &SalaryAdjustment::zeroed(key)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        Period::new(3, 2026).unwrap()
    }

    fn employee(id: u64, position: &str, status: &str) -> Employee {
        Employee {
            id,
            name: format!("Empleado {id}"),
            position: position.into(),
            status: status.into(),
        }
    }

    fn adjustment(empleado_id: u64) -> SalaryAdjustment {
        SalaryAdjustment {
            facturacion: dec!(1000000),
            adelanto: dec!(50000),
            recibo: dec!(100000),
            ..SalaryAdjustment::zeroed(AdjustmentKey::new(empleado_id, period()))
        }
    }

    #[test]
    fn manicure_positions_earn_32_percent_in_any_case() {
        for position in ["Manicurista", "MANICURE", "jefa de manicuría", "manicur"] {
            assert_eq!(commission_rate(position), dec!(0.32), "{position}");
            assert_eq!(compute_commission(dec!(250000), position), dec!(80000));
        }
    }

    #[test]
    fn other_positions_earn_30_percent() {
        for position in ["Estilista", "Recepcionista", "", "Mani"] {
            assert_eq!(compute_commission(dec!(250000), position), dec!(75000), "{position}");
        }
    }

    #[test]
    fn zero_billing_yields_zero_commission() {
        assert_eq!(compute_commission(Decimal::ZERO, "Manicurista"), Decimal::ZERO);
    }

    #[test]
    fn full_minus_cash_equals_advance_plus_twice_payslip() {
        let cases = [
            (dec!(320000), dec!(50000), dec!(0), dec!(0), dec!(0), dec!(100000)),
            (dec!(0), dec!(900000), dec!(12000.50), dec!(3000), dec!(1.25), dec!(0)),
            (dec!(123456.78), dec!(0), dec!(1), dec!(2), dec!(3), dec!(456789.01)),
            (dec!(1000), dec!(-500), dec!(0), dec!(0), dec!(-10), dec!(250)),
        ];

        for (c, adelanto, vac, rec, otros, recibo) in cases {
            let full = compute_full_total(c, vac, rec, otros, recibo);
            let cash = compute_cash_total(c, adelanto, vac, rec, otros, recibo);
            assert_eq!(full - cash, adelanto + dec!(2) * recibo);
        }
    }

    #[test]
    fn cash_total_can_go_negative() {
        let cash = compute_cash_total(dec!(30000), dec!(200000), dec!(0), dec!(0), dec!(0), dec!(0));
        assert_eq!(cash, dec!(-170000));
    }

    #[test]
    fn insured_top_up_fills_gap_to_minimum() {
        assert_eq!(compute_insured_top_up(dec!(420000)), dec!(80000));
        assert_eq!(compute_insured_top_up(Decimal::ZERO), dec!(500000));
        assert_eq!(compute_insured_top_up(dec!(500000)), Decimal::ZERO);
        assert_eq!(compute_insured_top_up(dec!(750000)), Decimal::ZERO);
        assert_eq!(compute_insured_top_up(dec!(499999.99)), dec!(0.01));
    }

    #[test]
    fn manicurist_scenario() {
        let row = calculate_row(&employee(1, "Manicurista", "active"), &adjustment(1));

        assert_eq!(row.comision, dec!(320000));
        assert_eq!(row.total_efectivo, dec!(170000));
        assert_eq!(row.total_completo, dec!(420000));
        assert_eq!(row.asegurado, dec!(80000));
    }

    #[test]
    fn stylist_scenario() {
        let row = calculate_row(&employee(1, "Estilista", "active"), &adjustment(1));

        assert_eq!(row.comision, dec!(300000));
        assert_eq!(row.total_efectivo, dec!(150000));
        assert_eq!(row.total_completo, dec!(400000));
        assert_eq!(row.asegurado, dec!(100000));
    }

    #[test]
    fn roster_skips_inactive_employees_in_every_order() {
        let a = employee(1, "Estilista", "active");
        let b = employee(2, "Manicurista", "inactive");
        let c = employee(3, "Colorista", "active");
        let d = employee(4, "Recepcion", "retired");

        let orders = [
            vec![a.clone(), b.clone(), c.clone(), d.clone()],
            vec![d.clone(), c.clone(), b.clone(), a.clone()],
            vec![b.clone(), a.clone(), d.clone(), c.clone()],
            vec![c.clone(), d.clone(), a.clone(), b.clone()],
        ];

        for employees in orders {
            let roster = build_roster(&employees, &[], period());
            let expected: Vec<u64> = employees
                .iter()
                .filter(|e| e.id == 1 || e.id == 3)
                .map(|e| e.id)
                .collect();
            let ids: Vec<u64> = roster.iter().map(|r| r.empleado_id).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn roster_excludes_status_that_is_not_exactly_active() {
        let employees = [
            employee(1, "Estilista", "ACTIVE"),
            employee(2, "Estilista", " active"),
            employee(3, "Estilista", "Active"),
        ];

        assert!(build_roster(&employees, &[], period()).is_empty());
    }

    #[test]
    fn roster_defaults_missing_adjustment_to_zero() {
        let roster = build_roster(&[employee(9, "Estilista", "active")], &[], period());

        assert_eq!(roster.len(), 1);
        let row = &roster[0];
        assert_eq!(row.facturacion, Decimal::ZERO);
        assert_eq!(row.comision, Decimal::ZERO);
        assert_eq!(row.total_efectivo, Decimal::ZERO);
        assert_eq!(row.total_completo, Decimal::ZERO);
        assert_eq!(row.asegurado, dec!(500000));
        assert_eq!((row.mes, row.anio), (3, 2026));
    }

    #[test]
    fn roster_matches_adjustments_by_employee_and_period() {
        let employees = vec![
            employee(1, "Manicurista", "active"),
            employee(2, "Estilista", "active"),
        ];
        let other_period = SalaryAdjustment {
            mes: 4,
            ..adjustment(2)
        };

        let roster = build_roster(&employees, &[adjustment(1), other_period], period());

        assert_eq!(roster[0].comision, dec!(320000));
        assert_eq!(roster[1].facturacion, Decimal::ZERO);
        assert_eq!(roster[1].asegurado, dec!(500000));
    }
}
