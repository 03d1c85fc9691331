use anyhow::Context;
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, Delivery, NewBooking, NotificationKind, NotificationRecord};

const BOOKING_COLUMNS: &str =
    "id, name, email, event_type, event_date, details, status, created_at, updated_at";

// Microsecond RFC 3339 in UTC sorts lexically in time order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid stored timestamp: {raw}"))?
        .with_timezone(&Utc))
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, new: &NewBooking) -> anyhow::Result<Booking> {
    // Truncated so the returned record equals what a later read produces.
    let now = Utc::now().trunc_subsecs(6);
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        name: new.name.clone(),
        email: new.email.clone(),
        event_type: new.event_type.clone(),
        event_date: new.event_date,
        details: new.details.clone(),
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO bookings (id, name, email, event_type, event_date, details, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.id,
            booking.name,
            booking.email,
            booking.event_type,
            booking.event_date.format("%Y-%m-%d").to_string(),
            booking.details,
            booking.status.as_str(),
            format_timestamp(&booking.created_at),
            format_timestamp(&booking.updated_at),
        ],
    )
    .context("failed to insert booking")?;

    Ok(booking)
}

/// Newest first. Rows created within the same instant keep insertion order.
pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<BookingStatus>,
    limit: Option<i64>,
) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE (?1 IS NULL OR status = ?1)
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;

    let status = status_filter.map(|s| s.as_str());
    let rows = stmt.query_map(params![status, limit.unwrap_or(-1)], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns the updated booking, or `None` when no booking has this id.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<Option<Booking>> {
    let now = format_timestamp(&Utc::now());
    let count = conn
        .execute(
            "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now, id],
        )
        .context("failed to update booking status")?;

    if count == 0 {
        return Ok(None);
    }
    get_booking_by_id(conn, id)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let event_date_str: String = row.get(4)?;
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("unknown stored booking status: {status_str}"))?;
    let event_date = NaiveDate::parse_from_str(&event_date_str, "%Y-%m-%d")
        .with_context(|| format!("invalid stored event date: {event_date_str}"))?;

    Ok(Booking {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        event_type: row.get(3)?,
        event_date,
        details: row.get(5)?,
        status,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

// ── Notifications ──

pub fn insert_notification(
    conn: &Connection,
    booking_id: &str,
    delivery: &Delivery,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO notifications (booking_id, kind, recipient, subject, delivered, error, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking_id,
            delivery.kind.as_str(),
            delivery.recipient,
            delivery.subject,
            delivery.delivered(),
            delivery.error,
            format_timestamp(&Utc::now()),
        ],
    )
    .context("failed to record notification")?;
    Ok(conn.last_insert_rowid())
}

pub fn get_notifications_for_booking(
    conn: &Connection,
    booking_id: &str,
) -> anyhow::Result<Vec<NotificationRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, booking_id, kind, recipient, subject, delivered, error, created_at
         FROM notifications WHERE booking_id = ?1 ORDER BY id DESC",
    )?;

    let rows = stmt.query_map(params![booking_id], |row| {
        let kind_str: String = row.get(2)?;
        let created_at_str: String = row.get(7)?;
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            kind_str,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, bool>(5)?,
            row.get::<_, Option<String>>(6)?,
            created_at_str,
        ))
    })?;

    let mut records = vec![];
    for row in rows {
        let (id, booking_id, kind_str, recipient, subject, delivered, error, created_at_str) = row?;
        let kind = NotificationKind::parse(&kind_str)
            .with_context(|| format!("unknown stored notification kind: {kind_str}"))?;
        records.push(NotificationRecord {
            id,
            booking_id,
            kind,
            recipient,
            subject,
            delivered,
            error,
            created_at: parse_timestamp(&created_at_str)?,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn new_booking(name: &str) -> NewBooking {
        NewBooking {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            event_type: "Birthday".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(),
            details: Some("Backyard party".to_string()),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let conn = db::init_db(":memory:").unwrap();
        let created = insert_booking(&conn, &new_booking("Alice")).unwrap();
        assert_eq!(created.status, BookingStatus::Pending);

        let loaded = get_booking_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_ids_are_unique() {
        let conn = db::init_db(":memory:").unwrap();
        let a = insert_booking(&conn, &new_booking("Alice")).unwrap();
        let b = insert_booking(&conn, &new_booking("Alice")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_get_missing_booking() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(get_booking_by_id(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let conn = db::init_db(":memory:").unwrap();
        let first = insert_booking(&conn, &new_booking("First")).unwrap();
        let second = insert_booking(&conn, &new_booking("Second")).unwrap();
        let third = insert_booking(&conn, &new_booking("Third")).unwrap();

        let all = get_all_bookings(&conn, None, None).unwrap();
        let ids: Vec<_> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);

        let limited = get_all_bookings(&conn, None, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_list_with_status_filter() {
        let conn = db::init_db(":memory:").unwrap();
        let a = insert_booking(&conn, &new_booking("Alice")).unwrap();
        insert_booking(&conn, &new_booking("Bob")).unwrap();
        update_booking_status(&conn, &a.id, BookingStatus::Confirmed).unwrap();

        let confirmed = get_all_bookings(&conn, Some(BookingStatus::Confirmed), None).unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, a.id);

        let pending = get_all_bookings(&conn, Some(BookingStatus::Pending), None).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Bob");
    }

    #[test]
    fn test_update_status_keeps_created_at() {
        let conn = db::init_db(":memory:").unwrap();
        let created = insert_booking(&conn, &new_booking("Alice")).unwrap();

        let updated = update_booking_status(&conn, &created.id, BookingStatus::Cancelled)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Cancelled);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_missing_booking() {
        let conn = db::init_db(":memory:").unwrap();
        let res = update_booking_status(&conn, "nope", BookingStatus::Confirmed).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn test_notification_log() {
        let conn = db::init_db(":memory:").unwrap();
        let booking = insert_booking(&conn, &new_booking("Alice")).unwrap();

        insert_notification(
            &conn,
            &booking.id,
            &Delivery {
                kind: NotificationKind::Confirmation,
                recipient: booking.email.clone(),
                subject: "Confirmed".to_string(),
                error: None,
            },
        )
        .unwrap();
        insert_notification(
            &conn,
            &booking.id,
            &Delivery {
                kind: NotificationKind::Cancellation,
                recipient: booking.email.clone(),
                subject: "Cancelled".to_string(),
                error: Some("timed out".to_string()),
            },
        )
        .unwrap();

        let records = get_notifications_for_booking(&conn, &booking.id).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, NotificationKind::Cancellation);
        assert!(!records[0].delivered);
        assert_eq!(records[0].error.as_deref(), Some("timed out"));
        assert_eq!(records[1].kind, NotificationKind::Confirmation);
        assert!(records[1].delivered);
    }
}
