//! Caller identity records parsed from request headers.
//!
//! Both records are built once per request by the pipeline and stored in
//! request extensions; handlers read them through the extractors in
//! [`crate::extractors`]. Fields are independently optional — a missing
//! header simply yields `None`, never an error.

use serde::{Deserialize, Serialize};

/// Tenant/user identity of the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Tenant the caller belongs to, if supplied.
    pub tenant_id: Option<String>,
    /// End-user identifier, if supplied.
    pub user_id: Option<String>,
}

/// Tenant/staff identity of the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffInfo {
    /// Tenant the caller belongs to, if supplied.
    pub tenant_id: Option<String>,
    /// Staff identifier, if supplied.
    pub staff_id: Option<String>,
}
