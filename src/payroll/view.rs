//! Roster state for one operator.
//!
//! Two layers: `confirmed` holds what the last accepted fetch (plus completed
//! writes) returned, `pending` holds optimistic edits that have not been
//! written yet. Pending edits win until the next accepted fetch of their
//! period. A fetch is dropped once the operator has moved to another period,
//! or when a newer fetch of the same period has already been applied.

use std::collections::HashMap;

use crate::model::employee::Employee;
use crate::model::salary::{AdjustmentKey, Period, SalaryAdjustment, SalaryCalculationRow};
use crate::payroll::calculator::build_roster;

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    period: Period,
}

impl FetchTicket {
    pub fn period(&self) -> Period {
        self.period
    }
}

struct ConfirmedLayer {
    generation: u64,
    period: Period,
    employees: Vec<Employee>,
    adjustments: HashMap<AdjustmentKey, SalaryAdjustment>,
}

#[derive(Default)]
pub struct RosterView {
    generation: u64,
    selected: Option<Period>,
    confirmed: Option<ConfirmedLayer>,
    pending: HashMap<AdjustmentKey, SalaryAdjustment>,
    snapshot: Option<(Period, Vec<SalaryCalculationRow>)>,
}

impl RosterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Period> {
        self.selected
    }

    /// Starts a fetch for `period`. Fetches still in flight for other periods
    /// are superseded.
    pub fn select_period(&mut self, period: Period) -> FetchTicket {
        self.generation += 1;
        self.selected = Some(period);
        FetchTicket {
            generation: self.generation,
            period,
        }
    }

    /// Applies a completed fetch. Returns `false` and changes nothing when the
    /// selected period has changed since `ticket` was issued, or when a newer
    /// fetch of the same period is already applied.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        employees: Vec<Employee>,
        adjustments: Vec<SalaryAdjustment>,
    ) -> bool {
        if self.selected != Some(ticket.period) {
            return false;
        }
        let newer_applied = self
            .confirmed
            .as_ref()
            .is_some_and(|l| l.period == ticket.period && l.generation > ticket.generation);
        if newer_applied {
            return false;
        }

        let period = ticket.period;
        self.confirmed = Some(ConfirmedLayer {
            generation: ticket.generation,
            period,
            employees,
            adjustments: adjustments
                .into_iter()
                .filter(|a| a.period() == period)
                .map(|a| (a.key(), a))
                .collect(),
        });
        self.pending.retain(|key, _| key.period != period);
        self.refresh_snapshot();
        true
    }

    /// Records an optimistic edit that has not been persisted yet.
    pub fn stage_edit(&mut self, adjustment: SalaryAdjustment) {
        self.pending.insert(adjustment.key(), adjustment);
        self.refresh_snapshot();
    }

    /// Records a value the store has acknowledged.
    pub fn confirm_saved(&mut self, adjustment: SalaryAdjustment) {
        let key = adjustment.key();
        self.pending.remove(&key);
        if let Some(layer) = self.confirmed.as_mut().filter(|l| l.period == key.period) {
            layer.adjustments.insert(key, adjustment);
        }
        self.refresh_snapshot();
    }

    /// Whether `period` is both selected and loaded.
    pub fn shows(&self, period: Period) -> bool {
        self.selected == Some(period) && self.confirmed.as_ref().is_some_and(|l| l.period == period)
    }

    /// Value the operator currently sees for `key`, if any.
    pub fn effective(&self, key: AdjustmentKey) -> Option<SalaryAdjustment> {
        if let Some(pending) = self.pending.get(&key) {
            return Some(pending.clone());
        }
        self.confirmed
            .as_ref()
            .filter(|l| l.period == key.period)
            .and_then(|l| l.adjustments.get(&key).cloned())
    }

    /// Roster of the confirmed period with pending edits applied.
    pub fn rows(&self) -> Vec<SalaryCalculationRow> {
        let Some(layer) = self.confirmed.as_ref() else {
            return Vec::new();
        };

        let mut merged = layer.adjustments.clone();
        for (key, adjustment) in &self.pending {
            if key.period == layer.period {
                merged.insert(*key, adjustment.clone());
            }
        }
        let adjustments: Vec<SalaryAdjustment> = merged.into_values().collect();

        build_roster(&layer.employees, &adjustments, layer.period)
    }

    /// Last successfully computed roster, kept across failed fetches.
    pub fn snapshot(&self) -> Option<(Period, Vec<SalaryCalculationRow>)> {
        self.snapshot.clone()
    }

    fn refresh_snapshot(&mut self) {
        if let Some(period) = self.confirmed.as_ref().map(|l| l.period) {
            self.snapshot = Some((period, self.rows()));
        }
    }
}
