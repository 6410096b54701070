use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::Backend;
use crate::models::{Booking, BookingStatus, Gallery, GalleryImage, GalleryInput};

/// Tables served by a hosted PostgREST endpoint (`<project>/rest/v1`).
pub struct SupabaseBackend {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseBackend {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_rows<T: DeserializeOwned>(
        resp: reqwest::Response,
        what: &str,
    ) -> anyhow::Result<Vec<T>> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{what} failed ({status}): {body}");
        }
        resp.json()
            .await
            .with_context(|| format!("failed to parse {what} response"))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<Vec<T>> {
        let resp = self
            .request(reqwest::Method::GET, &self.table_url(table))
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to select from {table}"))?;
        Self::read_rows(resp, &format!("select from {table}")).await
    }

    /// PATCH or DELETE filtered by id; returns how many rows matched.
    async fn mutate_by_id(
        &self,
        method: reqwest::Method,
        table: &str,
        id: &str,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<usize> {
        let filter = format!("eq.{id}");
        let mut req = self
            .request(method, &self.table_url(table))
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation");
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("failed to update {table}"))?;
        let rows: Vec<serde_json::Value> =
            Self::read_rows(resp, &format!("update of {table}")).await?;
        Ok(rows.len())
    }

    /// Inserts one row and returns it as the table stored it, defaults included.
    async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: serde_json::Value,
    ) -> anyhow::Result<T> {
        let resp = self
            .request(reqwest::Method::POST, &self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&json!([row]))
            .send()
            .await
            .with_context(|| format!("failed to insert into {table}"))?;

        Self::read_rows(resp, &format!("insert into {table}"))
            .await?
            .into_iter()
            .next()
            .with_context(|| format!("insert into {table} returned no row"))
    }
}

// ── Row shapes as the remote returns them ──

#[derive(Debug, Deserialize)]
struct BookingRow {
    id: serde_json::Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    appointment_date: String,
    #[serde(default)]
    appointment_time: Option<String>,
    #[serde(default)]
    service_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct GalleryRow {
    id: serde_json::Value,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Option<Vec<GalleryImage>>,
    #[serde(default)]
    published: Option<bool>,
    created_at: String,
}

fn id_to_string(id: serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn parse_remote_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .with_context(|| format!("invalid created_at: {s}"))
}

impl TryFrom<BookingRow> for Booking {
    type Error = anyhow::Error;

    fn try_from(row: BookingRow) -> anyhow::Result<Self> {
        // Date columns may come back with a time component appended.
        let date_part = row.appointment_date.get(..10).unwrap_or(row.appointment_date.as_str());
        let appointment_date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .with_context(|| format!("invalid appointment_date: {}", row.appointment_date))?;

        Ok(Booking {
            id: id_to_string(row.id),
            name: row.name.unwrap_or_default(),
            email: row.email.filter(|e| !e.is_empty()),
            phone: row.phone.unwrap_or_default(),
            appointment_date,
            appointment_time: row
                .appointment_time
                .map(|t| t.chars().take(5).collect())
                .unwrap_or_default(),
            service_type: row
                .service_type
                .unwrap_or_else(|| "Consultation".to_string()),
            message: row.message.filter(|m| !m.is_empty()),
            status: row
                .status
                .as_deref()
                .map(BookingStatus::parse)
                .unwrap_or_default(),
            created_at: parse_remote_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<GalleryRow> for Gallery {
    type Error = anyhow::Error;

    fn try_from(row: GalleryRow) -> anyhow::Result<Self> {
        let created_at = parse_remote_timestamp(&row.created_at)
            .with_context(|| format!("gallery {}", row.id))?;
        Ok(Gallery {
            id: id_to_string(row.id),
            title: row.title,
            description: row.description,
            images: row.images.unwrap_or_default(),
            published: row.published.unwrap_or(false),
            created_at,
        })
    }
}

fn parse_bookings(rows: Vec<BookingRow>) -> anyhow::Result<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

fn parse_galleries(rows: Vec<GalleryRow>) -> anyhow::Result<Vec<Gallery>> {
    rows.into_iter().map(Gallery::try_from).collect()
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn list_bookings(&self) -> anyhow::Result<Vec<Booking>> {
        let rows = self
            .select::<BookingRow>("bookings", &[("order", "created_at.desc")])
            .await?;
        parse_bookings(rows)
    }

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        let filter = format!("eq.{id}");
        let rows = self
            .select::<BookingRow>("bookings", &[("id", filter.as_str())])
            .await?;
        Ok(parse_bookings(rows)?.into_iter().next())
    }

    async fn insert_booking(&self, booking: &Booking) -> anyhow::Result<Booking> {
        // id and created_at come from the table defaults.
        let row: BookingRow = self
            .insert(
                "bookings",
                json!({
                    "name": booking.name,
                    "email": booking.email,
                    "phone": booking.phone,
                    "appointment_date": booking.appointment_date.format("%Y-%m-%d").to_string(),
                    "appointment_time": booking.appointment_time,
                    "service_type": booking.service_type,
                    "message": booking.message,
                    "status": booking.status.as_str(),
                }),
            )
            .await?;
        Booking::try_from(row)
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> anyhow::Result<bool> {
        let matched = self
            .mutate_by_id(
                reqwest::Method::PATCH,
                "bookings",
                id,
                Some(json!({ "status": status.as_str() })),
            )
            .await?;
        Ok(matched > 0)
    }

    async fn list_galleries(&self, published_only: bool) -> anyhow::Result<Vec<Gallery>> {
        let mut query = vec![("order", "created_at.desc")];
        if published_only {
            query.push(("published", "eq.true"));
        }
        let rows = self.select::<GalleryRow>("galleries", &query).await?;
        parse_galleries(rows)
    }

    async fn get_gallery(&self, id: &str) -> anyhow::Result<Option<Gallery>> {
        let filter = format!("eq.{id}");
        let rows = self
            .select::<GalleryRow>("galleries", &[("id", filter.as_str())])
            .await?;
        Ok(parse_galleries(rows)?.into_iter().next())
    }

    async fn insert_gallery(&self, gallery: &Gallery) -> anyhow::Result<Gallery> {
        let row: GalleryRow = self
            .insert(
                "galleries",
                json!({
                    "title": gallery.title,
                    "description": gallery.description,
                    "images": gallery.images,
                    "published": gallery.published,
                }),
            )
            .await?;
        Gallery::try_from(row)
    }

    async fn update_gallery(&self, id: &str, input: &GalleryInput) -> anyhow::Result<bool> {
        let matched = self
            .mutate_by_id(
                reqwest::Method::PATCH,
                "galleries",
                id,
                Some(json!({
                    "title": input.title,
                    "description": input.description,
                    "images": input.images,
                    "published": input.published,
                })),
            )
            .await?;
        Ok(matched > 0)
    }

    async fn set_gallery_published(&self, id: &str, published: bool) -> anyhow::Result<bool> {
        let matched = self
            .mutate_by_id(
                reqwest::Method::PATCH,
                "galleries",
                id,
                Some(json!({ "published": published })),
            )
            .await?;
        Ok(matched > 0)
    }

    async fn delete_gallery(&self, id: &str) -> anyhow::Result<bool> {
        let matched = self
            .mutate_by_id(reqwest::Method::DELETE, "galleries", id, None)
            .await?;
        Ok(matched > 0)
    }
}
