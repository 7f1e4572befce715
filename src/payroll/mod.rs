//! Payroll: salary calculation rules, their persistence ports and the
//! per-operator roster view.

pub mod calculator;
pub mod mysql;
pub mod notifier;
pub mod service;
pub mod store;
pub mod view;
