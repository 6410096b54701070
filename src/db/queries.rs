use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Booking, BookingStatus, Gallery, GalleryImage, GalleryInput};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn now_timestamp() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts both the fractional form we write and SQLite's `datetime('now')`.
fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .with_context(|| format!("invalid timestamp: {s}"))
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, name, email, phone, appointment_date, appointment_time, \
     service_type, message, status, created_at";

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, name, email, phone, appointment_date, appointment_time, service_type, message, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.name,
            booking.email,
            booking.phone,
            booking.appointment_date.format(DATE_FORMAT).to_string(),
            booking.appointment_time,
            booking.service_type,
            booking.message,
            booking.status.as_str(),
            format_timestamp(&booking.created_at),
        ],
    )?;
    Ok(())
}

pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_booking_row(row)))
        .optional()?;

    result.transpose()
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let appointment_date_str: String = row.get(4)?;
    let status_str: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    let appointment_date = NaiveDate::parse_from_str(&appointment_date_str, DATE_FORMAT)
        .with_context(|| format!("booking {id}: invalid appointment_date {appointment_date_str}"))?;
    let created_at = parse_timestamp(&created_at_str).with_context(|| format!("booking {id}"))?;

    Ok(Booking {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        appointment_date,
        appointment_time: row.get(5)?,
        service_type: row.get(6)?,
        message: row.get(7)?,
        status: status_str
            .as_deref()
            .map(BookingStatus::parse)
            .unwrap_or_default(),
        created_at,
    })
}

// ── Galleries ──

const GALLERY_COLUMNS: &str = "id, title, description, images, published, created_at";

pub fn insert_gallery(conn: &Connection, gallery: &Gallery) -> anyhow::Result<()> {
    let images_json = serde_json::to_string(&gallery.images)?;
    conn.execute(
        "INSERT INTO galleries (id, title, description, images, published, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            gallery.id,
            gallery.title,
            gallery.description,
            images_json,
            gallery.published as i32,
            format_timestamp(&gallery.created_at),
        ],
    )?;
    Ok(())
}

pub fn list_galleries(conn: &Connection, published_only: bool) -> anyhow::Result<Vec<Gallery>> {
    let sql = if published_only {
        format!(
            "SELECT {GALLERY_COLUMNS} FROM galleries WHERE published = 1 \
             ORDER BY created_at DESC, rowid DESC"
        )
    } else {
        format!("SELECT {GALLERY_COLUMNS} FROM galleries ORDER BY created_at DESC, rowid DESC")
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_gallery_row(row)))?;

    let mut galleries = vec![];
    for row in rows {
        galleries.push(row??);
    }
    Ok(galleries)
}

pub fn get_gallery(conn: &Connection, id: &str) -> anyhow::Result<Option<Gallery>> {
    let sql = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_gallery_row(row)))
        .optional()?;

    result.transpose()
}

pub fn update_gallery(conn: &Connection, id: &str, input: &GalleryInput) -> anyhow::Result<bool> {
    let images_json = serde_json::to_string(&input.images)?;
    let count = conn.execute(
        "UPDATE galleries SET title = ?1, description = ?2, images = ?3, published = ?4 WHERE id = ?5",
        params![
            input.title,
            input.description,
            images_json,
            input.published as i32,
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn set_gallery_published(conn: &Connection, id: &str, published: bool) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE galleries SET published = ?1 WHERE id = ?2",
        params![published as i32, id],
    )?;
    Ok(count > 0)
}

pub fn delete_gallery(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM galleries WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_gallery_row(row: &rusqlite::Row) -> anyhow::Result<Gallery> {
    let id: String = row.get(0)?;
    let images_json: String = row.get(3)?;
    let created_at_str: String = row.get(5)?;

    let images: Vec<GalleryImage> = serde_json::from_str(&images_json)
        .with_context(|| format!("gallery {id}: invalid images column"))?;
    let created_at = parse_timestamp(&created_at_str).with_context(|| format!("gallery {id}"))?;

    Ok(Gallery {
        id,
        title: row.get(1)?,
        description: row.get(2)?,
        images,
        published: row.get::<_, i32>(4)? != 0,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn booking(id: &str, created_at: &str) -> Booking {
        Booking {
            id: id.to_string(),
            name: "Alice".to_string(),
            email: None,
            phone: "+1 555 123 4567".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            appointment_time: "09:30".to_string(),
            service_type: "Consultation".to_string(),
            message: None,
            status: BookingStatus::Pending,
            created_at: parse_timestamp(created_at).unwrap(),
        }
    }

    #[test]
    fn test_bookings_newest_first() {
        let conn = db::init_db(":memory:").unwrap();
        insert_booking(&conn, &booking("old", "2025-01-01 10:00:00")).unwrap();
        insert_booking(&conn, &booking("new", "2025-02-01 10:00:00")).unwrap();

        let ids: Vec<String> = list_bookings(&conn).unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_missing_status_reads_as_pending() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO bookings (id, name, phone, appointment_date, appointment_time, status)
             VALUES ('legacy', 'Bob', '5551234567', '2025-06-16', '10:00', 'unknown')",
            [],
        )
        .unwrap();

        let b = get_booking(&conn, "legacy").unwrap().unwrap();
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.service_type, "Consultation");
    }

    #[test]
    fn test_update_booking_status_unknown_id() {
        let conn = db::init_db(":memory:").unwrap();
        assert!(!update_booking_status(&conn, "nope", BookingStatus::Confirmed).unwrap());
        assert!(get_booking(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_gallery_images_round_trip_in_order() {
        let conn = db::init_db(":memory:").unwrap();
        let gallery = Gallery {
            id: "g1".to_string(),
            title: "Smile makeovers".to_string(),
            description: None,
            images: vec![
                GalleryImage {
                    url: "http://x/b.jpg".to_string(),
                    path: "gallery/b.jpg".to_string(),
                },
                GalleryImage {
                    url: "http://x/a.jpg".to_string(),
                    path: "gallery/a.jpg".to_string(),
                },
            ],
            published: false,
            created_at: now_timestamp(),
        };
        insert_gallery(&conn, &gallery).unwrap();

        let loaded = get_gallery(&conn, "g1").unwrap().unwrap();
        assert_eq!(loaded.images, gallery.images);
        assert!(list_galleries(&conn, true).unwrap().is_empty());

        assert!(set_gallery_published(&conn, "g1", true).unwrap());
        assert_eq!(list_galleries(&conn, true).unwrap().len(), 1);

        assert!(delete_gallery(&conn, "g1").unwrap());
        assert!(!delete_gallery(&conn, "g1").unwrap());
    }

    #[test]
    fn test_corrupt_rows_are_errors() {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO bookings (id, name, phone, appointment_date, appointment_time, created_at)
             VALUES ('b-bad', 'Bob', '5551234567', '2025-06-16', '10:00', 'garbage')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO galleries (id, title, images) VALUES ('g-bad', 'Crowns', 'not json')",
            [],
        )
        .unwrap();

        let err = get_booking(&conn, "b-bad").unwrap_err();
        assert!(format!("{err:#}").contains("booking b-bad"));
        assert!(list_bookings(&conn).is_err());

        let err = get_gallery(&conn, "g-bad").unwrap_err();
        assert!(format!("{err:#}").contains("gallery g-bad: invalid images column"));
        assert!(list_galleries(&conn, false).is_err());
    }
}
