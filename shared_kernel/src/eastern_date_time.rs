use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
/// EasternTZDateTime stores the time as `DateTime<Utc>` for easier
/// serialization and deserialization. The booking site publishes all of its
/// schedules in Eastern time, so every instant in the system renders through
/// this single zone.
pub struct EasternTZDateTime(DateTime<Utc>);

impl EasternTZDateTime {
    pub fn now() -> Self {
        EasternTZDateTime(Utc::now())
    }

    /// The calendar date as observed in the Eastern zone, not in UTC.
    /// Late-evening UTC instants fall on the previous Eastern day.
    pub fn date(&self) -> NaiveDate {
        self.to_date_time().date_naive()
    }

    pub fn to_date_time(&self) -> DateTime<Tz> {
        New_York.from_utc_datetime(&self.0.naive_utc())
    }
}

impl From<DateTime<Utc>> for EasternTZDateTime {
    fn from(data: DateTime<Utc>) -> EasternTZDateTime {
        EasternTZDateTime(data)
    }
}

impl TryFrom<NaiveDateTime> for EasternTZDateTime {
    type Error = String;

    fn try_from(value: NaiveDateTime) -> Result<Self, Self::Error> {
        New_York
            .from_local_datetime(&value)
            .single()
            .ok_or_else(|| format!("Failed to convert {value} to Eastern time"))
            .map(|date_time| {
                let date_time = date_time.naive_utc();
                let date_time = Utc.from_utc_datetime(&date_time);
                Self(date_time)
            })
    }
}
