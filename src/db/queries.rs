use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, Connection};

use crate::models::booking::DATE_FORMAT;
use crate::models::{Booking, BookingFilter, BookingPatch, BookingStatus, TimeSlot};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

const BOOKING_COLUMNS: &str = "id, name, email, phone, project_id, project_name, preferred_date, \
     preferred_time, message, status, admin_notes, is_read, responded_at, responded_by, \
     created_at, updated_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, name, email, phone, project_id, project_name, preferred_date,
             preferred_time, message, status, admin_notes, is_read, responded_at, responded_by,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            booking.id,
            booking.name,
            booking.email,
            booking.phone,
            booking.project_id,
            booking.project_name,
            booking.preferred_date.format(DATE_FORMAT).to_string(),
            booking.preferred_time.as_str(),
            booking.message,
            booking.status.as_str(),
            booking.admin_notes,
            booking.is_read,
            booking.responded_at.map(format_timestamp),
            booking.responded_by,
            format_timestamp(booking.created_at),
            format_timestamp(booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Applies the set fields of `patch` and bumps `updated_at`. Returns false if no row matched.
pub fn update_booking(
    conn: &Connection,
    id: &str,
    patch: &BookingPatch,
    now: NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET
           status = COALESCE(?1, status),
           admin_notes = CASE WHEN ?2 THEN ?3 ELSE admin_notes END,
           is_read = COALESCE(?4, is_read),
           responded_at = COALESCE(?5, responded_at),
           responded_by = COALESCE(?6, responded_by),
           updated_at = ?7
         WHERE id = ?8",
        params![
            patch.status.map(|s| s.as_str()),
            patch.admin_notes.is_some(),
            patch.admin_notes.clone().flatten(),
            patch.is_read,
            patch.responded_at.map(format_timestamp),
            patch.responded_by,
            format_timestamp(now),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> rusqlite::Result<Vec<Booking>> {
    let mut clauses: Vec<String> = vec![];
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

    if let Some(status) = filter.status {
        params_vec.push(Box::new(status.as_str()));
        clauses.push(format!("status = ?{}", params_vec.len()));
    }
    if let Some(is_read) = filter.is_read {
        params_vec.push(Box::new(is_read));
        clauses.push(format!("is_read = ?{}", params_vec.len()));
    }

    let mut sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = filter.offset.unwrap_or(0).max(0);
    params_vec.push(Box::new(limit));
    params_vec.push(Box::new(offset));
    sql.push_str(&format!(
        " ORDER BY created_at DESC, rowid DESC LIMIT ?{} OFFSET ?{}",
        params_vec.len() - 1,
        params_vec.len()
    ));

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn delete_booking(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

/// Flags the given bookings as read. Already-read and unknown ids are skipped.
pub fn mark_bookings_read(
    conn: &Connection,
    ids: &[String],
    now: NaiveDateTime,
) -> rusqlite::Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut updated = 0;
    {
        let mut stmt = tx.prepare(
            "UPDATE bookings SET is_read = 1, updated_at = ?1 WHERE id = ?2 AND is_read = 0",
        )?;
        let now = format_timestamp(now);
        for id in ids {
            updated += stmt.execute(params![now, id])?;
        }
    }
    tx.commit()?;
    Ok(updated)
}

/// Count per status; every status is present, zero when unused.
pub fn count_by_status(conn: &Connection) -> rusqlite::Result<BTreeMap<BookingStatus, i64>> {
    let mut counts: BTreeMap<BookingStatus, i64> =
        BookingStatus::ALL.into_iter().map(|s| (s, 0)).collect();

    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM bookings GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        let status: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((status, count))
    })?;

    for row in rows {
        let (status, count) = row?;
        match BookingStatus::parse(&status) {
            Some(status) => {
                counts.insert(status, count);
            }
            None => tracing::warn!(status = %status, "unknown booking status in database"),
        }
    }
    Ok(counts)
}

pub fn count_unread(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE is_read = 0",
        [],
        |row| row.get(0),
    )
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn conversion_error(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let preferred_date_str: String = row.get(6)?;
    let preferred_time_str: String = row.get(7)?;
    let status_str: String = row.get(9)?;
    let responded_at_str: Option<String> = row.get(12)?;
    let created_at_str: String = row.get(14)?;
    let updated_at_str: String = row.get(15)?;

    let preferred_date = NaiveDate::parse_from_str(&preferred_date_str, DATE_FORMAT)
        .map_err(|e| conversion_error(6, e))?;
    let preferred_time = TimeSlot::parse(&preferred_time_str)
        .ok_or_else(|| conversion_error(7, format!("unknown time slot: {preferred_time_str}")))?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| conversion_error(9, format!("unknown status: {status_str}")))?;
    let responded_at = responded_at_str
        .as_deref()
        .map(|s| parse_timestamp(12, s))
        .transpose()?;

    Ok(Booking {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        project_id: row.get(4)?,
        project_name: row.get(5)?,
        preferred_date,
        preferred_time,
        message: row.get(8)?,
        status,
        admin_notes: row.get(10)?,
        is_read: row.get(11)?,
        responded_at,
        responded_by: row.get(13)?,
        created_at: parse_timestamp(14, &created_at_str)?,
        updated_at: parse_timestamp(15, &updated_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn booking(id: &str, created_at: &str) -> Booking {
        Booking {
            id: id.to_string(),
            name: "Ana Cruz".to_string(),
            email: "ana@x.com".to_string(),
            phone: "+639170000000".to_string(),
            project_id: Some("proj-1".to_string()),
            project_name: Some("Woodridge Garden Village".to_string()),
            preferred_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            preferred_time: TimeSlot::TenAm,
            message: None,
            status: BookingStatus::Pending,
            admin_notes: None,
            is_read: false,
            responded_at: None,
            responded_by: None,
            created_at: ts(created_at),
            updated_at: ts(created_at),
        }
    }

    #[test]
    fn test_create_and_get_booking() {
        let conn = setup_db();
        let original = booking("b1", "2026-03-01 09:00:00");
        create_booking(&conn, &original).unwrap();

        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(get_booking_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_update_booking_keeps_unset_fields() {
        let conn = setup_db();
        let mut original = booking("b1", "2026-03-01 09:00:00");
        original.admin_notes = Some("call first".to_string());
        create_booking(&conn, &original).unwrap();

        let patch = BookingPatch {
            status: Some(BookingStatus::Approved),
            responded_by: Some("admin-1".to_string()),
            responded_at: Some(ts("2026-03-02 08:00:00")),
            ..BookingPatch::default()
        };
        assert!(update_booking(&conn, "b1", &patch, ts("2026-03-02 08:00:00")).unwrap());

        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Approved);
        assert_eq!(loaded.admin_notes.as_deref(), Some("call first"));
        assert_eq!(loaded.responded_by.as_deref(), Some("admin-1"));
        assert_eq!(loaded.updated_at, ts("2026-03-02 08:00:00"));
        assert!(!loaded.is_read);

        assert!(!update_booking(&conn, "missing", &patch, ts("2026-03-02 08:00:00")).unwrap());
    }

    #[test]
    fn test_update_booking_sets_and_clears_notes() {
        let conn = setup_db();
        let mut original = booking("b1", "2026-03-01 09:00:00");
        original.admin_notes = Some("call first".to_string());
        create_booking(&conn, &original).unwrap();

        let replace = BookingPatch {
            admin_notes: Some(Some("bring ID".to_string())),
            ..BookingPatch::default()
        };
        assert!(update_booking(&conn, "b1", &replace, ts("2026-03-02 08:00:00")).unwrap());
        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.admin_notes.as_deref(), Some("bring ID"));

        let clear = BookingPatch {
            admin_notes: Some(None),
            ..BookingPatch::default()
        };
        assert!(update_booking(&conn, "b1", &clear, ts("2026-03-02 09:00:00")).unwrap());
        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.admin_notes, None);
    }

    #[test]
    fn test_list_bookings_filters_and_orders_newest_first() {
        let conn = setup_db();
        create_booking(&conn, &booking("old", "2026-03-01 09:00:00")).unwrap();
        let mut approved = booking("mid", "2026-03-02 09:00:00");
        approved.status = BookingStatus::Approved;
        approved.is_read = true;
        create_booking(&conn, &approved).unwrap();
        create_booking(&conn, &booking("new", "2026-03-03 09:00:00")).unwrap();

        let all = list_bookings(&conn, &BookingFilter::default()).unwrap();
        let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        let pending = list_bookings(
            &conn,
            &BookingFilter {
                status: Some(BookingStatus::Pending),
                ..BookingFilter::default()
            },
        )
        .unwrap();
        assert_eq!(pending.len(), 2);

        let read = list_bookings(
            &conn,
            &BookingFilter {
                is_read: Some(true),
                ..BookingFilter::default()
            },
        )
        .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, "mid");

        let page = list_bookings(
            &conn,
            &BookingFilter {
                limit: Some(1),
                offset: Some(1),
                ..BookingFilter::default()
            },
        )
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "mid");
    }

    #[test]
    fn test_counts() {
        let conn = setup_db();
        create_booking(&conn, &booking("a", "2026-03-01 09:00:00")).unwrap();
        create_booking(&conn, &booking("b", "2026-03-01 10:00:00")).unwrap();
        let mut done = booking("c", "2026-03-01 11:00:00");
        done.status = BookingStatus::Completed;
        done.is_read = true;
        create_booking(&conn, &done).unwrap();

        let counts = count_by_status(&conn).unwrap();
        assert_eq!(counts[&BookingStatus::Pending], 2);
        assert_eq!(counts[&BookingStatus::Completed], 1);
        assert_eq!(counts[&BookingStatus::Rejected], 0);
        assert_eq!(counts.len(), 5);

        assert_eq!(count_unread(&conn).unwrap(), 2);
    }

    #[test]
    fn test_mark_read_and_delete() {
        let conn = setup_db();
        create_booking(&conn, &booking("a", "2026-03-01 09:00:00")).unwrap();
        create_booking(&conn, &booking("b", "2026-03-01 10:00:00")).unwrap();

        let ids = vec!["a".to_string(), "missing".to_string()];
        assert_eq!(mark_bookings_read(&conn, &ids, ts("2026-03-02 00:00:00")).unwrap(), 1);
        assert_eq!(mark_bookings_read(&conn, &ids, ts("2026-03-02 00:00:00")).unwrap(), 0);
        assert_eq!(count_unread(&conn).unwrap(), 1);

        assert!(delete_booking(&conn, "b").unwrap());
        assert!(!delete_booking(&conn, "b").unwrap());
        assert_eq!(count_unread(&conn).unwrap(), 0);
    }
}
