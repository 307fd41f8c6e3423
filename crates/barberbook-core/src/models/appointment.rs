use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A booked appointment as returned by `POST /appointments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Appointment {
    pub id: String,
    pub provider_id: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub date: DateTime<Utc>,
}

/// Request body for booking a slot.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub provider_id: String,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_appointment() {
        let json = r#"{"id":"a1","provider_id":"p1","user_id":"u1","date":"2026-10-20T14:00:00.000Z"}"#;
        let appt: Appointment = serde_json::from_str(json).expect("appointment should parse");
        assert_eq!(appt.provider_id, "p1");
        assert_eq!(appt.date, Utc.with_ymd_and_hms(2026, 10, 20, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_serialize_new_appointment() {
        let body = NewAppointment {
            provider_id: "p1".to_string(),
            date: Utc.with_ymd_and_hms(2026, 10, 20, 14, 0, 0).unwrap(),
        };
        let value = serde_json::to_value(&body).expect("body should serialize");
        assert_eq!(value["provider_id"], "p1");
        assert_eq!(value["date"], "2026-10-20T14:00:00Z");
    }
}
