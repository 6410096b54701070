pub mod sqlite;
pub mod supabase;

use async_trait::async_trait;

use crate::models::{Booking, BookingStatus, Gallery, GalleryInput};

/// Typed access to the `bookings` and `galleries` tables.
///
/// Inserts return the record as stored, which may carry an id or timestamp
/// assigned by the store. Update and delete methods return `false` when no
/// row matched the id.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_bookings(&self) -> anyhow::Result<Vec<Booking>>;
    async fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>>;
    async fn insert_booking(&self, booking: &Booking) -> anyhow::Result<Booking>;
    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> anyhow::Result<bool>;

    async fn list_galleries(&self, published_only: bool) -> anyhow::Result<Vec<Gallery>>;
    async fn get_gallery(&self, id: &str) -> anyhow::Result<Option<Gallery>>;
    async fn insert_gallery(&self, gallery: &Gallery) -> anyhow::Result<Gallery>;
    async fn update_gallery(&self, id: &str, input: &GalleryInput) -> anyhow::Result<bool>;
    async fn set_gallery_published(&self, id: &str, published: bool) -> anyhow::Result<bool>;
    async fn delete_gallery(&self, id: &str) -> anyhow::Result<bool>;
}
