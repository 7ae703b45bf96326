//! Construction site records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// A construction site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier for the site.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Address or free-form location.
    pub location: String,
    /// Free-form status (e.g. "active", "finished").
    pub status: String,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "active".to_string()
}

/// Fields for creating a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSite {
    /// Display name.
    pub name: String,
    /// Address or free-form location.
    #[serde(default)]
    pub location: String,
    /// Status, "active" when omitted.
    #[serde(default = "default_status")]
    pub status: String,
}

impl NewSite {
    /// Checks the name.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.name.trim().is_empty() {
            return Err(PayrollError::invalid("site", "name must not be empty"));
        }
        Ok(())
    }

    /// Builds the stored site.
    pub fn into_site(self, id: String, created_at: DateTime<Utc>) -> Site {
        Site {
            id,
            name: self.name,
            location: self.location,
            status: self.status,
            created_at: Some(created_at),
        }
    }
}

/// A partial update to a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUpdate {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
    /// New status.
    #[serde(default)]
    pub status: Option<String>,
}

impl SiteUpdate {
    /// Validates the supplied fields and applies them to `site`.
    pub fn apply_to(self, site: &mut Site) -> PayrollResult<()> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(PayrollError::invalid("site", "name must not be empty"));
            }
            site.name = name;
        }
        if let Some(location) = self.location {
            site.location = location;
        }
        if let Some(status) = self.status {
            site.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_site_status_defaults_to_active() {
        let site: NewSite = serde_json::from_str(r#"{"name": "Tower A"}"#).unwrap();
        assert_eq!(site.status, "active");
        assert_eq!(site.location, "");
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let mut site = NewSite {
            name: "Tower A".to_string(),
            location: "Rua 1".to_string(),
            status: "active".to_string(),
        }
        .into_site("s-1".to_string(), Utc::now());

        let update = SiteUpdate {
            name: Some(String::new()),
            ..SiteUpdate::default()
        };
        assert!(update.apply_to(&mut site).is_err());
        assert_eq!(site.name, "Tower A");
    }
}
