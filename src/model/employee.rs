use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Lucia Fernandez",
        "position": "Manicurista",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Lucia Fernandez")]
    pub name: String,

    /// Free-text job title; commission rate is derived from it.
    #[schema(example = "Manicurista")]
    pub position: String,

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    /// Parsed status. Only the exact lowercase values are recognised; any
    /// other text yields `None`.
    pub fn status(&self) -> Option<EmployeeStatus> {
        self.status.parse().ok()
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some(EmployeeStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(status: &str) -> Employee {
        Employee {
            id: 7,
            name: "Ana".into(),
            position: "Estilista".into(),
            status: status.into(),
        }
    }

    #[test]
    fn parses_status_text() {
        assert!(employee("active").is_active());
        assert_eq!(employee("inactive").status(), Some(EmployeeStatus::Inactive));
        assert!(!employee("inactive").is_active());
    }

    #[test]
    fn unknown_status_is_not_active() {
        assert_eq!(employee("suspended").status(), None);
        assert!(!employee("").is_active());
    }

    #[test]
    fn status_match_is_exact() {
        assert!(!employee(" Active ").is_active());
        assert!(!employee("ACTIVE").is_active());
        assert_eq!(employee("Inactive").status(), None);
    }

    #[test]
    fn status_renders_lowercase() {
        assert_eq!(EmployeeStatus::Active.as_ref(), "active");
        assert_eq!(EmployeeStatus::Inactive.to_string(), "inactive");
    }
}
