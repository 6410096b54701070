use crate::db::queries::now_timestamp;
use crate::errors::AppError;
use crate::models::{Gallery, GalleryImage, GalleryInput};
use crate::services::backend::Backend;
use crate::services::storage::ImageStorage;

/// A file received from the gallery editor, not yet stored.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn validate_gallery(input: GalleryInput) -> Result<GalleryInput, AppError> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("title", "Title is required"));
    }
    if input.images.is_empty() {
        return Err(AppError::validation(
            "images",
            "At least one image is required",
        ));
    }

    Ok(GalleryInput {
        title,
        description: input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        images: input.images,
        published: input.published,
    })
}

pub async fn create_gallery(backend: &dyn Backend, input: GalleryInput) -> Result<Gallery, AppError> {
    let input = validate_gallery(input)?;
    let gallery = Gallery {
        id: uuid::Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        images: input.images,
        published: input.published,
        created_at: now_timestamp(),
    };

    let gallery = backend.insert_gallery(&gallery).await?;
    tracing::info!(gallery_id = %gallery.id, images = gallery.images.len(), "gallery created");
    Ok(gallery)
}

pub async fn update_gallery(
    backend: &dyn Backend,
    id: &str,
    input: GalleryInput,
) -> Result<Gallery, AppError> {
    let input = validate_gallery(input)?;
    if !backend.update_gallery(id, &input).await? {
        return Err(AppError::NotFound(format!("gallery {id}")));
    }
    tracing::info!(gallery_id = %id, "gallery updated");

    backend
        .get_gallery(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("gallery {id}")))
}

/// Flips the published flag and returns the new value.
pub async fn toggle_published(backend: &dyn Backend, id: &str) -> Result<bool, AppError> {
    let gallery = backend
        .get_gallery(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("gallery {id}")))?;

    let published = !gallery.published;
    if !backend.set_gallery_published(id, published).await? {
        return Err(AppError::NotFound(format!("gallery {id}")));
    }
    tracing::info!(gallery_id = %id, published, "gallery visibility changed");
    Ok(published)
}

pub async fn delete_gallery(backend: &dyn Backend, id: &str) -> Result<(), AppError> {
    if !backend.delete_gallery(id).await? {
        return Err(AppError::NotFound(format!("gallery {id}")));
    }
    tracing::info!(gallery_id = %id, "gallery deleted");
    Ok(())
}

pub fn search_galleries(galleries: Vec<Gallery>, query: Option<&str>) -> Vec<Gallery> {
    let needle = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q.to_lowercase(),
        None => return galleries,
    };

    galleries
        .into_iter()
        .filter(|g| {
            g.title.to_lowercase().contains(&needle)
                || g.description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect()
}

/// `gallery/<millis>-<random>.<ext>`, keeping the uploaded file's extension.
pub fn storage_path(file_name: &str, millis: i64, random: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    format!("gallery/{millis}-{random}.{ext}")
}

/// Uploads files one at a time, in order. The first failure aborts the rest;
/// objects already written stay in storage.
pub async fn upload_images(
    storage: &dyn ImageStorage,
    files: Vec<UploadFile>,
) -> Result<Vec<GalleryImage>, AppError> {
    let mut uploaded = Vec::with_capacity(files.len());

    for file in files {
        let random = uuid::Uuid::new_v4().simple().to_string();
        let path = storage_path(
            &file.file_name,
            chrono::Utc::now().timestamp_millis(),
            &random[..10],
        );

        if let Err(e) = storage.upload(&path, file.bytes, &file.content_type).await {
            tracing::error!(
                error = %e,
                file = %file.file_name,
                stored = uploaded.len(),
                "image upload failed, aborting batch"
            );
            return Err(AppError::Storage(format!(
                "failed to upload {}",
                file.file_name
            )));
        }

        uploaded.push(GalleryImage {
            url: storage.public_url(&path),
            path,
        });
    }

    tracing::info!(count = uploaded.len(), "images uploaded");
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    fn image(n: usize) -> GalleryImage {
        GalleryImage {
            url: format!("http://cdn.test/{n}.jpg"),
            path: format!("gallery/{n}.jpg"),
        }
    }

    fn input(title: &str, images: usize) -> GalleryInput {
        GalleryInput {
            title: title.to_string(),
            description: Some("  ".to_string()),
            images: (0..images).map(image).collect(),
            published: false,
        }
    }

    #[test]
    fn test_gallery_needs_title_and_images() {
        let err = validate_gallery(input("   ", 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "title", .. }));

        let err = validate_gallery(input("Before & after", 0)).unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "images", .. }));

        let ok = validate_gallery(input(" Before & after ", 2)).unwrap();
        assert_eq!(ok.title, "Before & after");
        assert_eq!(ok.description, None);
    }

    #[test]
    fn test_storage_path() {
        assert_eq!(
            storage_path("Smile.JPG", 1718000000000, "abc123"),
            "gallery/1718000000000-abc123.jpg"
        );
        assert_eq!(storage_path("noext", 1, "r"), "gallery/1-r.bin");
        assert_eq!(storage_path("weird.", 1, "r"), "gallery/1-r.bin");
        assert_eq!(storage_path("a.b/../c", 1, "r"), "gallery/1-r.bin");
    }

    #[test]
    fn test_search_galleries() {
        let g = |title: &str, description: Option<&str>| Gallery {
            id: title.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            images: vec![image(0)],
            published: true,
            created_at: now_timestamp(),
        };
        let all = vec![
            g("Implants", None),
            g("Whitening", Some("Before and after IMPLANT crowns")),
            g("Braces", None),
        ];

        let found = search_galleries(all.clone(), Some("implant"));
        assert_eq!(found.len(), 2);
        assert_eq!(search_galleries(all, None).len(), 3);
    }

    struct FlakyStorage {
        fail_on: usize,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageStorage for FlakyStorage {
        async fn upload(&self, path: &str, _bytes: Vec<u8>, _ct: &str) -> anyhow::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(path.to_string());
            if calls.len() == self.fail_on {
                anyhow::bail!("bucket unavailable");
            }
            Ok(())
        }

        fn public_url(&self, path: &str) -> String {
            format!("http://cdn.test/{path}")
        }
    }

    fn files(n: usize) -> Vec<UploadFile> {
        (0..n)
            .map(|i| UploadFile {
                file_name: format!("photo{i}.png"),
                content_type: "image/png".to_string(),
                bytes: vec![i as u8],
            })
            .collect()
    }

    #[tokio::test]
    async fn test_upload_keeps_order() {
        let storage = FlakyStorage {
            fail_on: usize::MAX,
            calls: Mutex::new(vec![]),
        };
        let images = upload_images(&storage, files(3)).await.unwrap();

        let calls = storage.calls.lock().unwrap().clone();
        assert_eq!(images.len(), 3);
        for (image, path) in images.iter().zip(&calls) {
            assert_eq!(&image.path, path);
            assert_eq!(image.url, format!("http://cdn.test/{path}"));
            assert!(path.starts_with("gallery/") && path.ends_with(".png"));
        }
    }

    #[tokio::test]
    async fn test_upload_stops_at_first_failure() {
        let storage = FlakyStorage {
            fail_on: 2,
            calls: Mutex::new(vec![]),
        };
        let err = upload_images(&storage, files(4)).await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(storage.calls.lock().unwrap().len(), 2);
    }
}
