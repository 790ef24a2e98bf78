//! Wire types shared by several resource modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Audit, CascadeReport};

/// Creation and modification stamps flattened into every resource.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl From<&Audit> for AuditFields {
    fn from(audit: &Audit) -> Self {
        Self {
            created_at: audit.created_at,
            created_by: audit.created_by.map(Uuid::from),
            updated_at: audit.updated_at,
            updated_by: audit.updated_by.map(Uuid::from),
        }
    }
}

/// Query string accepted by list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Include deactivated records (default `false`).
    #[serde(default)]
    pub include_inactive: bool,
}

/// Records removed alongside a cascading delete.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReportResponse {
    pub teams: u64,
    pub assignments: u64,
}

impl From<CascadeReport> for CascadeReportResponse {
    fn from(report: CascadeReport) -> Self {
        Self {
            teams: report.teams,
            assignments: report.assignments,
        }
    }
}
