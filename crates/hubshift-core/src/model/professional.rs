use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Responsible Service of Alcohol certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaCertificate {
    pub number: String,
    pub expires_on: NaiveDate,
}

impl RsaCertificate {
    /// Valid for work on `date` (the expiry day itself still counts)
    pub fn covers(&self, date: NaiveDate) -> bool {
        date <= self.expires_on
    }
}

/// Worker-side profile: reliability record and compliance documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalProfile {
    pub user_id: Uuid,
    pub strikes: u32,
    pub completed_shifts: u32,
    pub rsa: Option<RsaCertificate>,
}

impl ProfessionalProfile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            strikes: 0,
            completed_shifts: 0,
            rsa: None,
        }
    }
}

/// Reliability strike, at most one per accepted application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strike {
    pub application_id: Uuid,
    pub professional_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Strike {
    pub fn new(application_id: Uuid, professional_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            application_id,
            professional_id,
            reason: reason.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_covers_through_expiry_day() {
        let cert = RsaCertificate {
            number: "RSA-001".to_string(),
            expires_on: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        };
        assert!(cert.covers(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()));
        assert!(!cert.covers(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()));
    }
}
