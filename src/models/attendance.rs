//! Attendance records and the roles that carry rate overrides.
//!
//! An [`AttendanceRecord`] is one logged day for one worker on one site. It may
//! link to a [`Role`] whose daily rate overrides the worker's default; when the
//! store returns a record for payroll it joins that role as a [`RoleLink`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::limits::{MAX_RATE, MAX_WORKED_HOURS, check_bounds};

/// A function on site (e.g. "mason", "helper") with its own daily rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier for the role.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Daily rate paid for a day worked in this role.
    pub daily_rate: Decimal,
}

/// Fields for creating a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRole {
    /// Display name.
    pub name: String,
    /// Daily rate.
    pub daily_rate: Decimal,
}

impl Role {
    /// Checks the name and rate.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_role(&self.name, self.daily_rate)
    }
}

impl NewRole {
    /// Checks the name and rate.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_role(&self.name, self.daily_rate)
    }
}

fn validate_role(name: &str, daily_rate: Decimal) -> PayrollResult<()> {
    if name.trim().is_empty() {
        return Err(PayrollError::invalid("role", "name must not be empty"));
    }
    check_bounds(daily_rate, MAX_RATE)
        .map_err(|reason| PayrollError::invalid("role", format!("daily_rate {}", reason)))
}

/// A role joined onto an attendance record.
///
/// The rate arrives from the store as loosely typed data; anything that does not
/// parse as a number is kept as `None` so the worker default applies instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleLink {
    /// The linked role.
    pub role_id: String,
    /// The role's daily rate, if it parsed.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub daily_rate: Option<Decimal>,
}

impl From<&Role> for RoleLink {
    fn from(role: &Role) -> Self {
        Self {
            role_id: role.id.clone(),
            daily_rate: Some(role.daily_rate),
        }
    }
}

/// Accepts numbers, numeric strings, or null; maps anything unparseable to `None`.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(number) => parse_decimal(&number.to_string()),
        serde_json::Value::String(text) => parse_decimal(text.trim()),
        _ => None,
    }))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// One logged day of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// Site the work was done on.
    pub site_id: String,
    /// The worker this record belongs to.
    pub worker_id: String,
    /// The calendar date worked.
    pub date: NaiveDate,
    /// Hours actually worked, when logged.
    #[serde(default)]
    pub worked_hours: Option<Decimal>,
    /// The role worked, if any.
    #[serde(default)]
    pub role_id: Option<String>,
    /// Roles joined by the store, in fetch order. Only the first is consulted.
    #[serde(default)]
    pub roles: Vec<RoleLink>,
    /// A value logged alongside the day, kept for statistics.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Free-form note.
    #[serde(default)]
    pub description: Option<String>,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Checks required references and that hours fit in a day.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_attendance(&self.site_id, &self.worker_id, self.worked_hours)
    }
}

/// Fields for logging a day of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    /// Site the work was done on.
    pub site_id: String,
    /// The worker.
    pub worker_id: String,
    /// The calendar date worked.
    pub date: NaiveDate,
    /// Hours actually worked.
    #[serde(default)]
    pub worked_hours: Option<Decimal>,
    /// The role worked.
    #[serde(default)]
    pub role_id: Option<String>,
    /// A value logged alongside the day.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Free-form note.
    #[serde(default)]
    pub description: Option<String>,
}

impl NewAttendance {
    /// Checks required references and that hours fit in a day.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_attendance(&self.site_id, &self.worker_id, self.worked_hours)
    }

    /// Builds the stored record. Roles are joined at fetch time, not stored.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id,
            site_id: self.site_id,
            worker_id: self.worker_id,
            date: self.date,
            worked_hours: self.worked_hours,
            role_id: self.role_id,
            roles: Vec::new(),
            amount: self.amount,
            description: self.description,
            created_at: Some(created_at),
        }
    }
}

/// A partial update to an attendance record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    /// New site.
    #[serde(default)]
    pub site_id: Option<String>,
    /// New date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New worked hours.
    #[serde(default)]
    pub worked_hours: Option<Decimal>,
    /// New role.
    #[serde(default)]
    pub role_id: Option<String>,
    /// New logged value.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New note.
    #[serde(default)]
    pub description: Option<String>,
}

impl AttendanceUpdate {
    /// Validates the supplied fields and applies them to `record`.
    pub fn apply_to(self, record: &mut AttendanceRecord) -> PayrollResult<()> {
        validate_hours(self.worked_hours)?;
        if let Some(site_id) = self.site_id {
            record.site_id = site_id;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if self.worked_hours.is_some() {
            record.worked_hours = self.worked_hours;
        }
        if self.role_id.is_some() {
            record.role_id = self.role_id;
        }
        if self.amount.is_some() {
            record.amount = self.amount;
        }
        if self.description.is_some() {
            record.description = self.description;
        }
        Ok(())
    }
}

fn validate_attendance(site_id: &str, worker_id: &str, hours: Option<Decimal>) -> PayrollResult<()> {
    if site_id.trim().is_empty() {
        return Err(PayrollError::invalid("attendance", "site_id is required"));
    }
    if worker_id.trim().is_empty() {
        return Err(PayrollError::invalid("attendance", "worker_id is required"));
    }
    validate_hours(hours)
}

fn validate_hours(hours: Option<Decimal>) -> PayrollResult<()> {
    match hours {
        Some(hours) => check_bounds(hours, MAX_WORKED_HOURS).map_err(|reason| {
            PayrollError::invalid("attendance", format!("worked_hours {}", reason))
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_link_accepts_numeric_string() {
        let link: RoleLink =
            serde_json::from_str(r#"{"role_id": "r-1", "daily_rate": "120.50"}"#).unwrap();
        assert_eq!(link.daily_rate, Some(Decimal::new(12050, 2)));
    }

    #[test]
    fn test_role_link_accepts_number() {
        let link: RoleLink =
            serde_json::from_str(r#"{"role_id": "r-1", "daily_rate": 100}"#).unwrap();
        assert_eq!(link.daily_rate, Some(Decimal::new(100, 0)));
    }

    #[test]
    fn test_role_link_unparseable_rate_becomes_none() {
        let link: RoleLink =
            serde_json::from_str(r#"{"role_id": "r-1", "daily_rate": "n/a"}"#).unwrap();
        assert_eq!(link.daily_rate, None);

        let link: RoleLink = serde_json::from_str(r#"{"role_id": "r-1", "daily_rate": null}"#).unwrap();
        assert_eq!(link.daily_rate, None);

        let link: RoleLink = serde_json::from_str(r#"{"role_id": "r-1"}"#).unwrap();
        assert_eq!(link.daily_rate, None);
    }

    #[test]
    fn test_deserialize_record_without_optional_fields() {
        let json = r#"{
            "id": "a-1",
            "site_id": "s-1",
            "worker_id": "w-1",
            "date": "2026-10-13"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert!(record.worked_hours.is_none());
        assert!(record.roles.is_empty());
    }

    #[test]
    fn test_new_attendance_rejects_negative_hours() {
        let new_attendance = NewAttendance {
            site_id: "s-1".to_string(),
            worker_id: "w-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
            worked_hours: Some(Decimal::new(-2, 0)),
            role_id: None,
            amount: None,
            description: None,
        };
        assert!(new_attendance.validate().is_err());
    }

    #[test]
    fn test_hours_beyond_one_day_are_rejected() {
        let mut new_attendance = NewAttendance {
            site_id: "s-1".to_string(),
            worker_id: "w-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
            worked_hours: Some(Decimal::new(24, 0)),
            role_id: None,
            amount: None,
            description: None,
        };
        assert!(new_attendance.validate().is_ok());

        new_attendance.worked_hours = Some(Decimal::new(10_000_000_000, 0));
        let error = new_attendance.validate().unwrap_err();
        assert!(error.to_string().contains("must not exceed 24"));

        let mut record = new_attendance.into_record("a-1".to_string(), Utc::now());
        assert!(record.validate().is_err());

        let update = AttendanceUpdate {
            worked_hours: Some(Decimal::new(25, 0)),
            ..Default::default()
        };
        assert!(update.apply_to(&mut record).is_err());
    }

    #[test]
    fn test_role_rate_is_bounded() {
        let role = Role {
            id: "r-1".to_string(),
            name: "Mason".to_string(),
            daily_rate: MAX_RATE + Decimal::ONE,
        };
        assert!(role.validate().is_err());
    }

    #[test]
    fn test_new_role_rejects_negative_rate() {
        let role = NewRole {
            name: "Helper".to_string(),
            daily_rate: Decimal::new(-10, 0),
        };
        assert!(role.validate().is_err());
    }
}
