use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time: TimeSlot,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub admin_notes: Option<String>,
    pub is_read: bool,
    pub responded_at: Option<NaiveDateTime>,
    pub responded_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// Property label used in emails and live events.
    pub fn property_label(&self) -> &str {
        self.project_name.as_deref().unwrap_or("General Inquiry")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed viewing slots a customer can pick from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeSlot {
    #[serde(rename = "8:00 AM")]
    EightAm,
    #[serde(rename = "9:00 AM")]
    NineAm,
    #[serde(rename = "10:00 AM")]
    TenAm,
    #[serde(rename = "11:00 AM")]
    ElevenAm,
    #[serde(rename = "1:00 PM")]
    OnePm,
    #[serde(rename = "2:00 PM")]
    TwoPm,
    #[serde(rename = "3:00 PM")]
    ThreePm,
    #[serde(rename = "4:00 PM")]
    FourPm,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot::EightAm,
        TimeSlot::NineAm,
        TimeSlot::TenAm,
        TimeSlot::ElevenAm,
        TimeSlot::OnePm,
        TimeSlot::TwoPm,
        TimeSlot::ThreePm,
        TimeSlot::FourPm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::EightAm => "8:00 AM",
            TimeSlot::NineAm => "9:00 AM",
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::OnePm => "1:00 PM",
            TimeSlot::TwoPm => "2:00 PM",
            TimeSlot::ThreePm => "3:00 PM",
            TimeSlot::FourPm => "4:00 PM",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw public submission, as it arrives from the booking form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub message: Option<String>,
}

/// A submission that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time: TimeSlot,
    pub message: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BookingRequest {
    pub fn validate(self) -> Result<NewBooking, AppError> {
        let name = non_empty(self.name);
        let email = non_empty(self.email);
        let phone = non_empty(self.phone);
        let preferred_date = non_empty(self.preferred_date);
        let preferred_time = non_empty(self.preferred_time);

        let missing: Vec<&str> = [
            ("name", name.is_none()),
            ("email", email.is_none()),
            ("phone", phone.is_none()),
            ("preferred_date", preferred_date.is_none()),
            ("preferred_time", preferred_time.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let (Some(name), Some(email), Some(phone), Some(date), Some(time)) =
            (name, email, phone, preferred_date, preferred_time)
        else {
            return Err(AppError::Validation("missing required fields".to_string()));
        };

        if !email.contains('@') {
            return Err(AppError::Validation(format!("invalid email address: {email}")));
        }

        let preferred_date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|_| {
            AppError::Validation(format!("preferred_date must be YYYY-MM-DD, got {date}"))
        })?;

        let preferred_time = TimeSlot::parse(&time).ok_or_else(|| {
            AppError::Validation(format!("preferred_time {time:?} is not an available slot"))
        })?;

        Ok(NewBooking {
            name,
            email,
            phone,
            project_id: non_empty(self.project_id),
            project_name: non_empty(self.project_name),
            preferred_date,
            preferred_time,
            message: non_empty(self.message),
        })
    }
}

/// Partial update; `None` leaves the stored value untouched.
///
/// `admin_notes` is nullable, so `Some(None)` clears the stored notes.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub admin_notes: Option<Option<String>>,
    pub is_read: Option<bool>,
    pub responded_at: Option<NaiveDateTime>,
    pub responded_by: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub is_read: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> BookingRequest {
        BookingRequest {
            name: Some("Ana Cruz".to_string()),
            email: Some("ana@x.com".to_string()),
            phone: Some("+639170000000".to_string()),
            project_id: None,
            project_name: Some("Woodridge Garden Village".to_string()),
            preferred_date: Some("2026-03-10".to_string()),
            preferred_time: Some("10:00 AM".to_string()),
            message: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let booking = valid_request().validate().unwrap();
        assert_eq!(booking.name, "Ana Cruz");
        assert_eq!(booking.preferred_time, TimeSlot::TenAm);
        assert_eq!(
            booking.preferred_date,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
        assert_eq!(booking.message, None);
    }

    #[test]
    fn test_validate_lists_every_missing_field() {
        let request = BookingRequest {
            name: Some(" ".to_string()),
            ..BookingRequest::default()
        };
        let err = request.validate().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, AppError::Validation(_)));
        for field in ["name", "email", "phone", "preferred_date", "preferred_time"] {
            assert!(msg.contains(field), "{field} not reported in {msg}");
        }
    }

    #[test]
    fn test_validate_rejects_unknown_slot() {
        let mut request = valid_request();
        request.preferred_time = Some("12:00 PM".to_string());
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_date_and_email() {
        let mut request = valid_request();
        request.preferred_date = Some("10/03/2026".to_string());
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let mut request = valid_request();
        request.email = Some("not-an-email".to_string());
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(BookingStatus::parse("Approved"), Some(BookingStatus::Approved));
        assert_eq!(BookingStatus::parse("cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("archived"), None);
    }

    #[test]
    fn test_time_slot_serializes_as_label() {
        let json = serde_json::to_string(&TimeSlot::OnePm).unwrap();
        assert_eq!(json, "\"1:00 PM\"");
        assert_eq!(TimeSlot::ALL.len(), 8);
    }

    #[test]
    fn test_property_label_falls_back() {
        let new = valid_request().validate().unwrap();
        let now = chrono::Utc::now().naive_utc();
        let mut booking = Booking {
            id: "b1".to_string(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            project_id: None,
            project_name: None,
            preferred_date: new.preferred_date,
            preferred_time: new.preferred_time,
            message: None,
            status: BookingStatus::Pending,
            admin_notes: None,
            is_read: false,
            responded_at: None,
            responded_by: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(booking.property_label(), "General Inquiry");
        booking.project_name = Some("Woodridge".to_string());
        assert_eq!(booking.property_label(), "Woodridge");
    }
}
