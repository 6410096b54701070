use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;

use super::Backend;
use crate::db::queries;
use crate::models::{Booking, BookingStatus, Gallery, GalleryInput};

pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn db(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection lock poisoned"))
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn list_bookings(&self) -> anyhow::Result<Vec<Booking>> {
        queries::list_bookings(&*self.db()?)
    }

    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        queries::get_booking(&*self.db()?, id)
    }

    async fn insert_booking(&self, booking: &Booking) -> anyhow::Result<Booking> {
        queries::insert_booking(&*self.db()?, booking)?;
        Ok(booking.clone())
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> anyhow::Result<bool> {
        queries::update_booking_status(&*self.db()?, id, status)
    }

    async fn list_galleries(&self, published_only: bool) -> anyhow::Result<Vec<Gallery>> {
        queries::list_galleries(&*self.db()?, published_only)
    }

    async fn get_gallery(&self, id: &str) -> anyhow::Result<Option<Gallery>> {
        queries::get_gallery(&*self.db()?, id)
    }

    async fn insert_gallery(&self, gallery: &Gallery) -> anyhow::Result<Gallery> {
        queries::insert_gallery(&*self.db()?, gallery)?;
        Ok(gallery.clone())
    }

    async fn update_gallery(&self, id: &str, input: &GalleryInput) -> anyhow::Result<bool> {
        queries::update_gallery(&*self.db()?, id, input)
    }

    async fn set_gallery_published(&self, id: &str, published: bool) -> anyhow::Result<bool> {
        queries::set_gallery_published(&*self.db()?, id, published)
    }

    async fn delete_gallery(&self, id: &str) -> anyhow::Result<bool> {
        queries::delete_gallery(&*self.db()?, id)
    }
}
