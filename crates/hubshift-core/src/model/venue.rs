use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::HubError;

/// Day of the week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub fn previous(self) -> Day {
        match self {
            Day::Monday => Day::Sunday,
            Day::Tuesday => Day::Monday,
            Day::Wednesday => Day::Tuesday,
            Day::Thursday => Day::Wednesday,
            Day::Friday => Day::Thursday,
            Day::Saturday => Day::Friday,
            Day::Sunday => Day::Saturday,
        }
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
            chrono::Weekday::Sun => Day::Sunday,
        }
    }
}

/// Opening window for one day. `close` earlier than `open` means the venue
/// trades past midnight into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayHours {
    pub fn spans_midnight(&self) -> bool {
        self.close < self.open
    }
}

/// Weekly trading hours; a day missing from the map is closed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(BTreeMap<Day, DayHours>);

impl OperatingHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, day: Day, hours: DayHours) {
        self.0.insert(day, hours);
    }

    pub fn get(&self, day: Day) -> Option<&DayHours> {
        self.0.get(&day)
    }

    pub fn days(&self) -> impl Iterator<Item = (&Day, &DayHours)> {
        self.0.iter()
    }

    /// Reject zero-length windows
    pub fn validate(&self) -> Result<(), HubError> {
        for (day, hours) in &self.0 {
            if hours.open == hours.close {
                return Err(HubError::InvalidTimeRange {
                    reason: format!("{:?} opens and closes at the same time", day),
                });
            }
        }
        Ok(())
    }

    /// Whether the venue is trading at `time` on `day`, counting the tail of
    /// the previous day's overnight window
    pub fn is_open_at(&self, day: Day, time: NaiveTime) -> bool {
        let today = self.get(day).is_some_and(|h| {
            if h.spans_midnight() {
                time >= h.open
            } else {
                time >= h.open && time < h.close
            }
        });
        let carried_over = self
            .get(day.previous())
            .is_some_and(|h| h.spans_midnight() && time < h.close);
        today || carried_over
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address: String,
    pub operating_hours: OperatingHours,
    pub updated_at: DateTime<Utc>,
}

impl VenueProfile {
    pub fn new(user_id: Uuid, address: String, operating_hours: OperatingHours) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            address,
            operating_hours,
            updated_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), HubError> {
        if self.address.trim().is_empty() {
            return Err(HubError::InvalidInput {
                reason: "Venue address cannot be empty".to_string(),
            });
        }
        self.operating_hours.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_is_open_within_regular_window() {
        let mut hours = OperatingHours::new();
        hours.set(Day::Monday, DayHours { open: t(9, 0), close: t(17, 0) });

        assert!(hours.is_open_at(Day::Monday, t(9, 0)));
        assert!(!hours.is_open_at(Day::Monday, t(17, 0)));
        assert!(!hours.is_open_at(Day::Tuesday, t(10, 0)));
    }

    #[test]
    fn test_overnight_window_carries_into_next_day() {
        let mut hours = OperatingHours::new();
        hours.set(Day::Sunday, DayHours { open: t(18, 0), close: t(2, 0) });

        assert!(hours.is_open_at(Day::Sunday, t(23, 30)));
        assert!(hours.is_open_at(Day::Monday, t(1, 59)));
        assert!(!hours.is_open_at(Day::Monday, t(2, 0)));
        assert!(!hours.is_open_at(Day::Sunday, t(1, 0)));
    }

    #[test]
    fn test_validate_rejects_blank_address_and_empty_window() {
        let profile = VenueProfile::new(Uuid::now_v7(), "  ".to_string(), OperatingHours::new());
        assert!(matches!(profile.validate(), Err(HubError::InvalidInput { .. })));

        let mut hours = OperatingHours::new();
        hours.set(Day::Friday, DayHours { open: t(12, 0), close: t(12, 0) });
        let profile = VenueProfile::new(Uuid::now_v7(), "1 George St".to_string(), hours);
        assert!(matches!(
            profile.validate(),
            Err(HubError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_operating_hours_json_shape() {
        let mut hours = OperatingHours::new();
        hours.set(Day::Friday, DayHours { open: t(16, 0), close: t(1, 0) });
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["friday"]["open"], "16:00:00");
        assert_eq!(json["friday"]["close"], "01:00:00");
    }
}
