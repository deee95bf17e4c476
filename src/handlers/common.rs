use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

/// `?groupid=` filter shared by the listing routes
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GroupQuery {
    /// Only endpoints owned by this flow group
    pub groupid: Option<String>,
}

impl GroupQuery {
    /// The requested group; an empty value names no group
    pub fn group(&self) -> Option<&str> {
        self.groupid.as_deref().filter(|g| !g.is_empty())
    }
}

/// Validate that a required path or body value is not blank
pub fn validate_required(value: &str, field_name: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field_name)));
    }
    Ok(())
}
