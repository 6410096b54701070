use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Gallery;
use crate::services::carousel::Carousel;
use crate::state::AppState;

static INDEX_HTML: &str = include_str!("../web/index.html");

pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> &'static str {
    "ok"
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_gallery(gallery: &Gallery, position: Carousel) -> String {
    let image = &gallery.images[position.index()];
    let id = escape_html(&gallery.id);
    let title = escape_html(&gallery.title);
    let description = gallery
        .description
        .as_deref()
        .map(|d| format!("<p class=\"description\">{}</p>", escape_html(d)))
        .unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 0; background: #f0f9ff; color: #0f172a; }}
main {{ max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }}
figure {{ margin: 0; background: #fff; border-radius: 1rem; overflow: hidden; box-shadow: 0 10px 30px rgba(14,116,144,.15); }}
figure img {{ width: 100%; max-height: 70vh; object-fit: contain; background: #0f172a; }}
nav {{ display: flex; justify-content: space-between; align-items: center; margin-top: 1rem; }}
nav a {{ padding: .5rem 1rem; border-radius: .5rem; background: #06b6d4; color: #fff; text-decoration: none; }}
</style>
</head>
<body>
<main>
<p><a href="/#gallery">&larr; Back to gallery</a></p>
<h1>{title}</h1>
{description}
<figure><img src="{src}" alt="{title} {position}"></figure>
<nav>
<a href="/gallery/{id}?image={prev}" rel="prev">Previous</a>
<span class="position">{position}</span>
<a href="/gallery/{id}?image={next}" rel="next">Next</a>
</nav>
</main>
</body>
</html>
"##,
        src = escape_html(&image.url),
        position = position.position_label(),
        prev = position.prev().index(),
        next = position.next().index(),
    )
}

#[derive(Deserialize)]
pub struct ViewerQuery {
    pub image: Option<usize>,
}

// GET /gallery/:id
pub async fn gallery_viewer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Html<String>, AppError> {
    let gallery = state
        .backend
        .get_gallery(&id)
        .await?
        .filter(|g| g.published)
        .ok_or_else(|| AppError::NotFound(format!("gallery {id}")))?;

    let position = Carousel::new(query.image.unwrap_or(0), gallery.images.len())
        .ok_or_else(|| AppError::NotFound(format!("gallery {id} has no images")))?;

    Ok(Html(render_gallery(&gallery, position)))
}
