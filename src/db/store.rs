use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDateTime, Timelike, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingFilter, BookingPatch, BookingRequest, BookingStatus};

/// Durable booking records over the shared SQLite connection.
#[derive(Clone)]
pub struct BookingStore {
    db: Arc<Mutex<Connection>>,
}

/// Current UTC time at the resolution the store persists.
pub fn now_utc() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

impl BookingStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))
    }

    /// Validates a public submission and stores it as a new, unread, pending booking.
    pub fn create(&self, request: BookingRequest) -> Result<Booking, AppError> {
        let new = request.validate()?;
        let now = now_utc();

        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            project_id: new.project_id,
            project_name: new.project_name,
            preferred_date: new.preferred_date,
            preferred_time: new.preferred_time,
            message: new.message,
            status: BookingStatus::Pending,
            admin_notes: None,
            is_read: false,
            responded_at: None,
            responded_by: None,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        queries::create_booking(&conn, &booking)?;
        Ok(booking)
    }

    pub fn get(&self, id: &str) -> Result<Booking, AppError> {
        let conn = self.conn()?;
        queries::get_booking_by_id(&conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
    }

    pub fn update(&self, id: &str, patch: &BookingPatch) -> Result<Booking, AppError> {
        let conn = self.conn()?;
        if !queries::update_booking(&conn, id, patch, now_utc())? {
            return Err(AppError::NotFound(format!("booking {id}")));
        }
        queries::get_booking_by_id(&conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
    }

    pub fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let conn = self.conn()?;
        Ok(queries::list_bookings(&conn, filter)?)
    }

    pub fn count_by_status(&self) -> Result<BTreeMap<BookingStatus, i64>, AppError> {
        let conn = self.conn()?;
        Ok(queries::count_by_status(&conn)?)
    }

    pub fn count_unread(&self) -> Result<i64, AppError> {
        let conn = self.conn()?;
        Ok(queries::count_unread(&conn)?)
    }

    /// Returns how many bookings flipped from unread to read.
    pub fn mark_read(&self, ids: &[String]) -> Result<usize, AppError> {
        let conn = self.conn()?;
        Ok(queries::mark_bookings_read(&conn, ids, now_utc())?)
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        let conn = self.conn()?;
        if queries::delete_booking(&conn, id)? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("booking {id}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn store() -> BookingStore {
        BookingStore::new(Arc::new(Mutex::new(db::init_db(":memory:").unwrap())))
    }

    fn request() -> BookingRequest {
        BookingRequest {
            name: Some("Ana Cruz".to_string()),
            email: Some("ana@x.com".to_string()),
            phone: Some("+639170000000".to_string()),
            preferred_date: Some("2026-03-10".to_string()),
            preferred_time: Some("10:00 AM".to_string()),
            ..BookingRequest::default()
        }
    }

    #[test]
    fn test_create_defaults() {
        let store = store();
        let booking = store.create(request()).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(!booking.is_read);
        assert!(!booking.id.is_empty());
        assert_eq!(booking.created_at, booking.updated_at);
        assert_eq!(store.get(&booking.id).unwrap(), booking);
    }

    #[test]
    fn test_create_rejects_invalid_without_persisting() {
        let store = store();
        let mut bad = request();
        bad.phone = None;
        assert!(matches!(store.create(bad), Err(AppError::Validation(_))));
        assert!(store.list(&BookingFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_retried_submissions_are_not_deduplicated() {
        let store = store();
        let first = store.create(request()).unwrap();
        let second = store.create(request()).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.count_unread().unwrap(), 2);
    }

    #[test]
    fn test_dashboard_operations() {
        let store = store();
        let first = store.create(request()).unwrap();
        let second = store.create(request()).unwrap();

        let listed = store.list(&BookingFilter::default()).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(store.count_by_status().unwrap()[&BookingStatus::Pending], 2);
        assert_eq!(store.count_unread().unwrap(), 2);

        assert_eq!(store.mark_read(&[first.id.clone()]).unwrap(), 1);
        assert_eq!(store.mark_read(&[first.id.clone()]).unwrap(), 0);
        assert_eq!(store.count_unread().unwrap(), 1);

        store.delete(&second.id).unwrap();
        let remaining = store.list(&BookingFilter::default()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].is_read);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let store = store();
        assert!(matches!(store.get("nope"), Err(AppError::NotFound(_))));
        assert!(matches!(
            store.update("nope", &BookingPatch::default()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.delete("nope"), Err(AppError::NotFound(_))));
    }
}
