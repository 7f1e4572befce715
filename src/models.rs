use serde::{Deserialize, Serialize};

/// Claims of the bearer tokens issued by the hosted database's auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Operator identity; stored as `created_by` on payroll records.
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
}
