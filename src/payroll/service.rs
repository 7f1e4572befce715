use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::error::{AppError, Result};
use crate::model::salary::{
    AdjustmentField, AdjustmentKey, Period, SalaryAdjustment, SalaryCalculationRow,
};
use crate::payroll::notifier::{Notice, Notifier};
use crate::payroll::store::{AdjustmentStore, EmployeeDirectory};
use crate::payroll::view::RosterView;

const MAX_OPEN_VIEWS: u64 = 10_000;

/// Payroll operations for authenticated operators. Each operator gets a
/// private [`RosterView`]; views idle for longer than `view_idle` are dropped.
pub struct PayrollService {
    employees: Arc<dyn EmployeeDirectory>,
    adjustments: Arc<dyn AdjustmentStore>,
    notifier: Arc<dyn Notifier>,
    views: Cache<String, Arc<Mutex<RosterView>>>,
}

fn lock(view: &Mutex<RosterView>) -> MutexGuard<'_, RosterView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PayrollService {
    pub fn new(
        employees: Arc<dyn EmployeeDirectory>,
        adjustments: Arc<dyn AdjustmentStore>,
        notifier: Arc<dyn Notifier>,
        view_idle: Duration,
    ) -> Self {
        Self {
            employees,
            adjustments,
            notifier,
            views: Cache::builder()
                .max_capacity(MAX_OPEN_VIEWS)
                .time_to_idle(view_idle)
                .build(),
        }
    }

    async fn view(&self, operator: &str) -> Arc<Mutex<RosterView>> {
        self.views
            .get_with(operator.to_string(), async {
                Arc::new(Mutex::new(RosterView::new()))
            })
            .await
    }

    fn report_failure(&self, operator: &str, message: String, err: &AppError) {
        error!(error = %err, operator, "{}", message);
        self.notifier.notify(Notice::error(operator, message));
    }

    /// Fetches the period and returns its roster. A failed fetch returns the
    /// error and leaves the operator's last roster untouched.
    pub async fn roster(&self, operator: &str, period: Period) -> Result<Vec<SalaryCalculationRow>> {
        let view = self.view(operator).await;
        let ticket = lock(&view).select_period(period);

        let fetched = async {
            let employees = self.employees.list_employees().await?;
            let adjustments = self.adjustments.fetch_period(period).await?;
            Ok::<_, AppError>((employees, adjustments))
        }
        .await;

        let (employees, adjustments) = match fetched {
            Ok(data) => data,
            Err(e) => {
                self.report_failure(operator, format!("Could not load payroll for {period}"), &e);
                return Err(e);
            }
        };

        let mut guard = lock(&view);
        if !guard.apply_fetch(ticket, employees, adjustments) {
            if guard.shows(period) {
                // a newer fetch of the same period already landed
                debug!(operator, %period, "Serving roster from newer fetch");
                return Ok(guard.rows());
            }
            debug!(operator, %period, "Discarding superseded roster fetch");
            return Err(AppError::Superseded(period));
        }

        Ok(guard.rows())
    }

    /// The roster the operator last saw successfully, if any.
    pub async fn current_roster(&self, operator: &str) -> Option<(Period, Vec<SalaryCalculationRow>)> {
        let view = self.views.get(operator).await?;
        let snapshot = lock(&view).snapshot();
        snapshot
    }

    pub async fn adjustments(&self, period: Period) -> Result<Vec<SalaryAdjustment>> {
        self.adjustments.fetch_period(period).await
    }

    /// Adjustments may only be recorded for employees in the directory.
    async fn ensure_employee(&self, operator: &str, empleado_id: u64) -> Result<()> {
        let employees = match self.employees.list_employees().await {
            Ok(employees) => employees,
            Err(e) => {
                self.report_failure(operator, "Could not load employees".into(), &e);
                return Err(e);
            }
        };

        if employees.iter().any(|e| e.id == empleado_id) {
            Ok(())
        } else {
            debug!(operator, empleado_id, "Adjustment for unknown employee rejected");
            Err(AppError::NotFound(format!("Employee {empleado_id}")))
        }
    }

    /// Persists a full adjustment record on behalf of `operator`.
    pub async fn save_adjustment(
        &self,
        operator: &str,
        adjustment: SalaryAdjustment,
    ) -> Result<SalaryAdjustment> {
        self.ensure_employee(operator, adjustment.empleado_id).await?;

        let adjustment = SalaryAdjustment {
            created_by: Some(operator.to_string()),
            ..adjustment
        };
        let key = adjustment.key();

        let stored = match self.adjustments.upsert(adjustment).await {
            Ok(stored) => stored,
            Err(e) => {
                self.report_failure(operator, "Could not save salary adjustment".into(), &e);
                return Err(e);
            }
        };

        info!(
            operator,
            empleado_id = key.empleado_id,
            mes = key.period.mes,
            anio = key.period.anio,
            "Salary adjustment saved"
        );

        let view = self.view(operator).await;
        lock(&view).confirm_saved(stored.clone());
        self.notifier
            .notify(Notice::success(operator, "Salary adjustment saved"));

        Ok(stored)
    }

    /// Changes one amount. The edit is visible in the operator's roster
    /// immediately and stays there even if the write fails, until the period
    /// is fetched again.
    pub async fn quick_edit(
        &self,
        operator: &str,
        key: AdjustmentKey,
        field: AdjustmentField,
        value: Decimal,
    ) -> Result<SalaryAdjustment> {
        self.ensure_employee(operator, key.empleado_id).await?;

        let view = self.view(operator).await;

        let seen = lock(&view).effective(key);
        let base = match seen {
            Some(adjustment) => adjustment,
            None => match self.adjustments.get(key).await {
                Ok(stored) => stored.unwrap_or_else(|| SalaryAdjustment::zeroed(key)),
                Err(e) => {
                    self.report_failure(operator, "Could not load salary adjustment".into(), &e);
                    return Err(e);
                }
            },
        };

        let edited = SalaryAdjustment {
            created_by: Some(operator.to_string()),
            ..base.with_field(field, value)
        };
        lock(&view).stage_edit(edited.clone());

        match self.adjustments.upsert(edited).await {
            Ok(stored) => {
                debug!(
                    operator,
                    empleado_id = key.empleado_id,
                    field = field.as_ref(),
                    %value,
                    "Quick edit saved"
                );
                lock(&view).confirm_saved(stored.clone());
                self.notifier
                    .notify(Notice::success(operator, format!("{} updated", field.as_ref())));
                Ok(stored)
            }
            Err(e) => {
                self.report_failure(operator, format!("Could not save {}", field.as_ref()), &e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::Employee;
    use crate::payroll::notifier::{NoticeLevel, RecordingNotifier};
    use crate::payroll::store::{InMemoryAdjustmentStore, InMemoryEmployeeDirectory};
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};

    const OPERATOR: &str = "caja@salon";

    fn march() -> Period {
        Period::new(3, 2026).unwrap()
    }

    fn directory() -> Arc<InMemoryEmployeeDirectory> {
        Arc::new(InMemoryEmployeeDirectory::new(vec![
            Employee {
                id: 1,
                name: "Lucia".into(),
                position: "Manicurista".into(),
                status: "active".into(),
            },
            Employee {
                id: 2,
                name: "Marta".into(),
                position: "Estilista".into(),
                status: "inactive".into(),
            },
            Employee {
                id: 3,
                name: "Sofia".into(),
                position: "Estilista".into(),
                status: "active".into(),
            },
        ]))
    }

    fn service(
        adjustments: Arc<dyn AdjustmentStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> PayrollService {
        PayrollService::new(directory(), adjustments, notifier, Duration::from_secs(60))
    }

    /// Fails every call.
    struct UnavailableStore;

    #[async_trait]
    impl AdjustmentStore for UnavailableStore {
        async fn fetch_period(&self, _: Period) -> Result<Vec<SalaryAdjustment>> {
            Err(AppError::Persistence(sqlx::Error::PoolTimedOut))
        }
        async fn get(&self, _: AdjustmentKey) -> Result<Option<SalaryAdjustment>> {
            Err(AppError::Persistence(sqlx::Error::PoolTimedOut))
        }
        async fn upsert(&self, _: SalaryAdjustment) -> Result<SalaryAdjustment> {
            Err(AppError::Persistence(sqlx::Error::PoolTimedOut))
        }
    }

    /// Fails while `down` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryAdjustmentStore,
        down: AtomicBool,
    }

    #[async_trait]
    impl AdjustmentStore for FlakyStore {
        async fn fetch_period(&self, period: Period) -> Result<Vec<SalaryAdjustment>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(AppError::Persistence(sqlx::Error::PoolTimedOut));
            }
            self.inner.fetch_period(period).await
        }
        async fn get(&self, key: AdjustmentKey) -> Result<Option<SalaryAdjustment>> {
            self.inner.get(key).await
        }
        async fn upsert(&self, adjustment: SalaryAdjustment) -> Result<SalaryAdjustment> {
            if self.down.load(Ordering::SeqCst) {
                return Err(AppError::Persistence(sqlx::Error::PoolTimedOut));
            }
            self.inner.upsert(adjustment).await
        }
    }

    /// Holds the first fetch of `held` until released.
    struct GatedStore {
        inner: InMemoryAdjustmentStore,
        held: Period,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl AdjustmentStore for GatedStore {
        async fn fetch_period(&self, period: Period) -> Result<Vec<SalaryAdjustment>> {
            if period == self.held {
                let gate = self.gate.lock().unwrap().take();
                if let Some(rx) = gate {
                    let _ = rx.await;
                }
            }
            self.inner.fetch_period(period).await
        }
        async fn get(&self, key: AdjustmentKey) -> Result<Option<SalaryAdjustment>> {
            self.inner.get(key).await
        }
        async fn upsert(&self, adjustment: SalaryAdjustment) -> Result<SalaryAdjustment> {
            self.inner.upsert(adjustment).await
        }
    }

    #[actix_web::test]
    async fn roster_lists_active_employees_with_defaults() {
        let notifier = Arc::new(RecordingNotifier::new());
        let service = service(Arc::new(InMemoryAdjustmentStore::new()), notifier);

        let rows = service.roster(OPERATOR, march()).await.unwrap();

        let ids: Vec<u64> = rows.iter().map(|r| r.empleado_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(rows.iter().all(|r| r.asegurado == dec!(500000)));
    }

    #[actix_web::test]
    async fn saved_adjustment_shows_in_next_roster() {
        let store = Arc::new(InMemoryAdjustmentStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = service(store.clone(), notifier.clone());

        let adjustment = SalaryAdjustment {
            facturacion: dec!(1000000),
            adelanto: dec!(50000),
            recibo: dec!(100000),
            ..SalaryAdjustment::zeroed(AdjustmentKey::new(1, march()))
        };
        let stored = service.save_adjustment(OPERATOR, adjustment).await.unwrap();
        assert_eq!(stored.created_by.as_deref(), Some(OPERATOR));

        let rows = service.roster("otro@salon", march()).await.unwrap();
        assert_eq!(rows[0].comision, dec!(320000));
        assert_eq!(rows[0].total_efectivo, dec!(170000));
        assert_eq!(rows[0].total_completo, dec!(420000));
        assert_eq!(rows[0].asegurado, dec!(80000));
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Success);
    }

    #[actix_web::test]
    async fn saving_same_adjustment_twice_keeps_one_record() {
        let store = Arc::new(InMemoryAdjustmentStore::new());
        let service = service(store.clone(), Arc::new(RecordingNotifier::new()));
        let adjustment = SalaryAdjustment {
            otros: dec!(20000),
            ..SalaryAdjustment::zeroed(AdjustmentKey::new(3, march()))
        };

        service.save_adjustment(OPERATOR, adjustment.clone()).await.unwrap();
        service.save_adjustment(OPERATOR, adjustment).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(service.adjustments(march()).await.unwrap()[0].otros, dec!(20000));
    }

    #[actix_web::test]
    async fn failed_fetch_notifies_and_keeps_last_roster() {
        let store = Arc::new(FlakyStore::default());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = service(store.clone(), notifier.clone());
        service.roster(OPERATOR, march()).await.unwrap();

        store.down.store(true, Ordering::SeqCst);
        let err = service
            .roster(OPERATOR, Period::new(4, 2026).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence(_)));
        let (period, rows) = service.current_roster(OPERATOR).await.unwrap();
        assert_eq!(period, march());
        assert_eq!(rows.len(), 2);
        let last = notifier.notices().pop().unwrap();
        assert_eq!(last.level, NoticeLevel::Error);
        assert_eq!(last.operator, OPERATOR);
    }

    #[actix_web::test]
    async fn failed_quick_edit_stays_visible_until_refetch() {
        let store = Arc::new(FlakyStore::default());
        let service = service(store.clone(), Arc::new(RecordingNotifier::new()));
        let key = AdjustmentKey::new(1, march());
        service.roster(OPERATOR, march()).await.unwrap();

        store.down.store(true, Ordering::SeqCst);
        let result = service
            .quick_edit(OPERATOR, key, AdjustmentField::Facturacion, dec!(100000))
            .await;
        assert!(result.is_err());
        let (_, rows) = service.current_roster(OPERATOR).await.unwrap();
        assert_eq!(rows[0].comision, dec!(32000));

        store.down.store(false, Ordering::SeqCst);
        let rows = service.roster(OPERATOR, march()).await.unwrap();
        assert_eq!(rows[0].comision, Decimal::ZERO);
    }

    #[actix_web::test]
    async fn failed_save_is_reported() {
        let notifier = Arc::new(RecordingNotifier::new());
        let service = service(Arc::new(UnavailableStore), notifier.clone());

        let result = service
            .save_adjustment(OPERATOR, SalaryAdjustment::zeroed(AdjustmentKey::new(1, march())))
            .await;

        assert!(result.is_err());
        assert_eq!(notifier.notices().len(), 1);
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Error);
    }

    #[actix_web::test]
    async fn quick_edit_changes_one_field_of_the_seen_record() {
        let store = Arc::new(InMemoryAdjustmentStore::new());
        let service = service(store.clone(), Arc::new(RecordingNotifier::new()));
        let key = AdjustmentKey::new(1, march());
        store
            .upsert(SalaryAdjustment {
                facturacion: dec!(1000000),
                ..SalaryAdjustment::zeroed(key)
            })
            .await
            .unwrap();
        service.roster(OPERATOR, march()).await.unwrap();

        let stored = service
            .quick_edit(OPERATOR, key, AdjustmentField::Recibo, dec!(100000))
            .await
            .unwrap();

        assert_eq!(stored.facturacion, dec!(1000000));
        assert_eq!(stored.recibo, dec!(100000));
        let (_, rows) = service.current_roster(OPERATOR).await.unwrap();
        assert_eq!(rows[0].total_completo, dec!(420000));
    }

    #[actix_web::test]
    async fn quick_edit_without_open_roster_starts_from_stored_record() {
        let store = Arc::new(InMemoryAdjustmentStore::new());
        let service = service(store.clone(), Arc::new(RecordingNotifier::new()));
        let key = AdjustmentKey::new(3, march());
        store
            .upsert(SalaryAdjustment {
                vacaciones: dec!(40000),
                ..SalaryAdjustment::zeroed(key)
            })
            .await
            .unwrap();

        let stored = service
            .quick_edit(OPERATOR, key, AdjustmentField::Adelanto, dec!(10000))
            .await
            .unwrap();

        assert_eq!(stored.vacaciones, dec!(40000));
        assert_eq!(stored.adelanto, dec!(10000));
    }

    #[actix_web::test]
    async fn superseded_fetch_is_discarded() {
        let (tx, rx) = oneshot::channel();
        let store = Arc::new(GatedStore {
            inner: InMemoryAdjustmentStore::new(),
            held: march(),
            gate: Mutex::new(Some(rx)),
        });
        let service = service(store, Arc::new(RecordingNotifier::new()));
        let april = Period::new(4, 2026).unwrap();
        service.roster(OPERATOR, april).await.unwrap();

        let svc = &service;
        let (first, second) = futures::join!(svc.roster(OPERATOR, march()), async move {
            let rows = svc.roster(OPERATOR, april).await;
            let _ = tx.send(());
            rows
        });

        assert!(matches!(first, Err(AppError::Superseded(p)) if p == march()));
        assert!(second.is_ok());
        assert_eq!(service.current_roster(OPERATOR).await.unwrap().0, april);
    }

    #[actix_web::test]
    async fn adjustments_for_unknown_employee_are_rejected() {
        let store = Arc::new(InMemoryAdjustmentStore::new());
        let service = service(store.clone(), Arc::new(RecordingNotifier::new()));
        let key = AdjustmentKey::new(99, march());

        let saved = service
            .save_adjustment(OPERATOR, SalaryAdjustment::zeroed(key))
            .await;
        assert!(matches!(saved, Err(AppError::NotFound(_))));

        let edited = service
            .quick_edit(OPERATOR, key, AdjustmentField::Otros, dec!(100))
            .await;
        assert!(matches!(edited, Err(AppError::NotFound(_))));

        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn double_request_for_same_period_both_succeed() {
        let (tx, rx) = oneshot::channel();
        let store = Arc::new(GatedStore {
            inner: InMemoryAdjustmentStore::new(),
            held: march(),
            gate: Mutex::new(Some(rx)),
        });
        let service = service(store, Arc::new(RecordingNotifier::new()));

        let svc = &service;
        let (first, second) = futures::join!(svc.roster(OPERATOR, march()), async move {
            let rows = svc.roster(OPERATOR, march()).await;
            let _ = tx.send(());
            rows
        });

        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 2);
        assert_eq!(service.current_roster(OPERATOR).await.unwrap().0, march());
    }
}
