pub mod absence;
pub mod arreglo;
pub mod employee;
pub mod expense;
pub mod payroll;
