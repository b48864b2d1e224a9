use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    Booking, BookingStatus, Customer, Discount, Service, ShopConfig, Therapist, TherapistStatus,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_dt(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .with_context(|| format!("invalid timestamp in database: {s}"))
}

fn day_bounds(date: &NaiveDate) -> (String, String) {
    let start = date.format("%Y-%m-%d 00:00:00").to_string();
    let end = date.format("%Y-%m-%d 23:59:59").to_string();
    (start, end)
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, customer_name, customer_phone, service_id, therapist_id, start_time, duration_minutes, \
     status, final_price, discount, shop_revenue, therapist_commission, notes, created_at, updated_at";

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let discount = booking.discount.map(|d| serde_json::to_string(&d)).transpose()?;

    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ),
        params![
            booking.id,
            booking.customer_name,
            booking.customer_phone,
            booking.service_id,
            booking.therapist_id,
            fmt_dt(&booking.start_time),
            booking.duration_minutes,
            booking.status.as_str(),
            booking.final_price,
            discount,
            booking.shop_revenue,
            booking.therapist_commission,
            booking.notes,
            fmt_dt(&booking.created_at),
            fmt_dt(&booking.updated_at),
        ],
    )
    .context("failed to insert booking")?;
    Ok(())
}

/// Writes every mutable column of an existing booking. Returns false if the id is unknown.
pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let discount = booking.discount.map(|d| serde_json::to_string(&d)).transpose()?;

    let count = conn
        .execute(
            "UPDATE bookings SET
               customer_name = ?1,
               customer_phone = ?2,
               service_id = ?3,
               therapist_id = ?4,
               start_time = ?5,
               duration_minutes = ?6,
               status = ?7,
               final_price = ?8,
               discount = ?9,
               shop_revenue = ?10,
               therapist_commission = ?11,
               notes = ?12,
               updated_at = ?13
             WHERE id = ?14",
            params![
                booking.customer_name,
                booking.customer_phone,
                booking.service_id,
                booking.therapist_id,
                fmt_dt(&booking.start_time),
                booking.duration_minutes,
                booking.status.as_str(),
                booking.final_price,
                discount,
                booking.shop_revenue,
                booking.therapist_commission,
                booking.notes,
                fmt_dt(&booking.updated_at),
                booking.id,
            ],
        )
        .context("failed to update booking")?;
    Ok(count > 0)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn get_bookings_in_range(
    conn: &Connection,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE start_time >= ?1 AND start_time <= ?2
         ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(params![fmt_dt(start), fmt_dt(end)], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_bookings_for_day(conn: &Connection, date: &NaiveDate) -> anyhow::Result<Vec<Booking>> {
    let (start, end) = day_bounds(date);
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE start_time >= ?1 AND start_time <= ?2
         ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(params![start, end], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub date: Option<NaiveDate>,
    pub therapist_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
}

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
    let mut sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE 1 = 1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(date) = &filter.date {
        let (start, end) = day_bounds(date);
        params_vec.push(Box::new(start));
        sql.push_str(&format!(" AND start_time >= ?{}", params_vec.len()));
        params_vec.push(Box::new(end));
        sql.push_str(&format!(" AND start_time <= ?{}", params_vec.len()));
    }
    if let Some(therapist_id) = &filter.therapist_id {
        params_vec.push(Box::new(therapist_id.clone()));
        sql.push_str(&format!(" AND therapist_id = ?{}", params_vec.len()));
    }
    if let Some(status) = &filter.status {
        params_vec.push(Box::new(status.as_str().to_string()));
        sql.push_str(&format!(" AND status = ?{}", params_vec.len()));
    }
    params_vec.push(Box::new(filter.limit.unwrap_or(500)));
    sql.push_str(&format!(" ORDER BY start_time ASC LIMIT ?{}", params_vec.len()));

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_done_bookings_between(
    conn: &Connection,
    from: &NaiveDate,
    to: &NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let (start, _) = day_bounds(from);
    let (_, end) = day_bounds(to);
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE status = 'done' AND start_time >= ?1 AND start_time <= ?2
         ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(params![start, end], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let start_time_str: String = row.get(5)?;
    let status_str: String = row.get(7)?;
    let discount_json: Option<String> = row.get(9)?;
    let created_at_str: String = row.get(13)?;
    let updated_at_str: String = row.get(14)?;

    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("booking {id} has unknown status: {status_str}"))?;
    let discount: Option<Discount> = match discount_json {
        Some(json) => Some(
            serde_json::from_str(&json)
                .with_context(|| format!("booking {id} has malformed discount"))?,
        ),
        None => None,
    };

    Ok(Booking {
        customer_name: row.get(1)?,
        customer_phone: row.get(2)?,
        service_id: row.get(3)?,
        therapist_id: row.get(4)?,
        start_time: parse_dt(&start_time_str)?,
        duration_minutes: row.get(6)?,
        status,
        final_price: row.get(8)?,
        discount,
        shop_revenue: row.get(10)?,
        therapist_commission: row.get(11)?,
        notes: row.get(12)?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
        id,
    })
}

// ── Services ──

pub fn list_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt =
        conn.prepare("SELECT id, name, category, prices FROM services ORDER BY category, name")?;
    let rows = stmt.query_map([], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

pub fn get_service(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn
        .query_row(
            "SELECT id, name, category, prices FROM services WHERE id = ?1",
            params![id],
            |row| Ok(parse_service_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn save_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    let prices = serde_json::to_string(&service.prices)?;
    conn.execute(
        "INSERT INTO services (id, name, category, prices) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           name = excluded.name,
           category = excluded.category,
           prices = excluded.prices,
           updated_at = datetime('now')",
        params![service.id, service.name, service.category, prices],
    )
    .context("failed to save service")?;
    Ok(())
}

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let id: String = row.get(0)?;
    let prices_json: String = row.get(3)?;
    let prices = serde_json::from_str(&prices_json)
        .with_context(|| format!("service {id} has malformed prices"))?;

    Ok(Service {
        name: row.get(1)?,
        category: row.get(2)?,
        prices,
        id,
    })
}

// ── Therapists ──

pub fn list_therapists(conn: &Connection) -> anyhow::Result<Vec<Therapist>> {
    let mut stmt =
        conn.prepare("SELECT id, name, status, start_date FROM therapists ORDER BY name")?;
    let rows = stmt.query_map([], |row| Ok(parse_therapist_row(row)))?;

    let mut therapists = vec![];
    for row in rows {
        therapists.push(row??);
    }
    Ok(therapists)
}

pub fn get_therapist(conn: &Connection, id: &str) -> anyhow::Result<Option<Therapist>> {
    let result = conn
        .query_row(
            "SELECT id, name, status, start_date FROM therapists WHERE id = ?1",
            params![id],
            |row| Ok(parse_therapist_row(row)),
        )
        .optional()?;

    result.transpose()
}

pub fn create_therapist(conn: &Connection, therapist: &Therapist) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO therapists (id, name, status, start_date) VALUES (?1, ?2, ?3, ?4)",
        params![
            therapist.id,
            therapist.name,
            therapist.status.as_str(),
            therapist.start_date.format(DATE_FMT).to_string(),
        ],
    )
    .context("failed to insert therapist")?;
    Ok(())
}

pub fn set_therapist_status(
    conn: &Connection,
    id: &str,
    status: TherapistStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE therapists SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_therapist_row(row: &rusqlite::Row) -> anyhow::Result<Therapist> {
    let id: String = row.get(0)?;
    let status_str: String = row.get(2)?;
    let start_date_str: String = row.get(3)?;

    let status = TherapistStatus::parse(&status_str)
        .with_context(|| format!("therapist {id} has unknown status: {status_str}"))?;

    Ok(Therapist {
        name: row.get(1)?,
        status,
        start_date: NaiveDate::parse_from_str(&start_date_str, DATE_FMT)
            .with_context(|| format!("invalid therapist start date: {start_date_str}"))?,
        id,
    })
}

// ── Shop Config ──

pub fn get_shop_config(conn: &Connection) -> anyhow::Result<Option<ShopConfig>> {
    let config = conn
        .query_row(
            "SELECT commission_rate, shop_name, shop_phone, shop_address FROM shop_config WHERE id = 1",
            [],
            |row| {
                Ok(ShopConfig {
                    commission_rate: row.get(0)?,
                    shop_name: row.get(1)?,
                    shop_phone: row.get(2)?,
                    shop_address: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(config)
}

pub fn save_shop_config(conn: &Connection, config: &ShopConfig) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO shop_config (id, commission_rate, shop_name, shop_phone, shop_address)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           commission_rate = excluded.commission_rate,
           shop_name = excluded.shop_name,
           shop_phone = excluded.shop_phone,
           shop_address = excluded.shop_address,
           updated_at = datetime('now')",
        params![
            config.commission_rate,
            config.shop_name,
            config.shop_phone,
            config.shop_address,
        ],
    )
    .context("failed to save shop config")?;
    Ok(())
}

// ── Customers ──

/// Records a visit: inserts the customer or bumps their visit count and refreshes the name.
pub fn upsert_customer(
    conn: &Connection,
    phone: &str,
    name: &str,
    visit: &NaiveDateTime,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO customers (phone, name, total_visits, last_visit) VALUES (?1, ?2, 1, ?3)
         ON CONFLICT(phone) DO UPDATE SET
           name = excluded.name,
           total_visits = total_visits + 1,
           last_visit = MAX(last_visit, excluded.last_visit)",
        params![phone, name, fmt_dt(visit)],
    )
    .context("failed to upsert customer")?;
    Ok(())
}

pub fn search_customers(conn: &Connection, query: &str, limit: i64) -> anyhow::Result<Vec<Customer>> {
    let pattern = format!("%{}%", query.trim());
    let mut stmt = conn.prepare(
        "SELECT phone, name, total_visits, last_visit FROM customers
         WHERE phone LIKE ?1 OR name LIKE ?1
         ORDER BY last_visit DESC LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![pattern, limit], |row| Ok(parse_customer_row(row)))?;

    let mut customers = vec![];
    for row in rows {
        customers.push(row??);
    }
    Ok(customers)
}

fn parse_customer_row(row: &rusqlite::Row) -> anyhow::Result<Customer> {
    let last_visit: String = row.get(3)?;

    Ok(Customer {
        phone: row.get(0)?,
        name: row.get(1)?,
        total_visits: row.get(2)?,
        last_visit: parse_dt(&last_visit)?,
    })
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
