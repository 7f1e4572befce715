use crate::api::absence::{AbsenceFilter, AbsenceListResponse, CreateAbsence};
use crate::api::arreglo::{ArregloFilter, CreateArreglo};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::expense::{CreateExpense, ExpenseListResponse, ExpenseMonth};
use crate::api::payroll::{PeriodQuery, QuickEdit, RosterResponse, SaveAdjustment};
use crate::model::absence::Absence;
use crate::model::arreglo::{Arreglo, ArregloEstado};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::expense::Expense;
use crate::model::salary::{AdjustmentField, Period, SalaryAdjustment, SalaryCalculationRow};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Back-Office API",
        version = "1.0.0",
        description = r#"
## Salon Back-Office

Monthly payroll for a beauty salon plus the small registers the front desk keeps.

### Key Features
- **Payroll**
  - Salary roster per month with commission, cash total, full total and insured top-up
  - Save a month's adjustments or quick-edit a single amount
- **Employees**
  - Create, update, list, and view staff
- **Absences, Expenses, Arreglos**
  - Day-off register, monthly expense ledger, and rework jobs

### Security
Every endpoint expects a **JWT Bearer** token issued by the salon's login service.
Payroll and expenses are limited to **Admin** and **Manager** roles.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::get_roster,
        crate::api::payroll::current_roster,
        crate::api::payroll::list_adjustments,
        crate::api::payroll::save_adjustment,
        crate::api::payroll::quick_edit,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::absence::create_absence,
        crate::api::absence::get_absence,
        crate::api::absence::list_absences,
        crate::api::absence::delete_absence,

        crate::api::expense::create_expense,
        crate::api::expense::list_expenses,
        crate::api::expense::delete_expense,

        crate::api::arreglo::create_arreglo,
        crate::api::arreglo::list_arreglos,
        crate::api::arreglo::complete_arreglo,
        crate::api::arreglo::delete_arreglo
    ),
    components(
        schemas(
            Period,
            PeriodQuery,
            AdjustmentField,
            SalaryAdjustment,
            SalaryCalculationRow,
            SaveAdjustment,
            QuickEdit,
            RosterResponse,
            Employee,
            EmployeeStatus,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Absence,
            CreateAbsence,
            AbsenceFilter,
            AbsenceListResponse,
            Expense,
            CreateExpense,
            ExpenseMonth,
            ExpenseListResponse,
            Arreglo,
            ArregloEstado,
            CreateArreglo,
            ArregloFilter
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Payroll", description = "Monthly salary calculation APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Absence", description = "Absence register APIs"),
        (name = "Expense", description = "Expense ledger APIs"),
        (name = "Arreglo", description = "Rework job APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_payroll_paths_with_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/payroll/roster"));
        assert!(
            doc.paths
                .paths
                .contains_key("/api/payroll/adjustments/{empleado_id}/{anio}/{mes}")
        );
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
