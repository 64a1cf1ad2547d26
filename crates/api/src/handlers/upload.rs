//! Character image upload.
//!
//! `POST /characters/{id}/image` takes a multipart `file` field, sniffs
//! the format with the `image` crate, writes the bytes into the media
//! directory under a fresh UUID name, and stores the public URL on the
//! character row. The media directory is served at `/media`.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use image::ImageFormat;
use taverna_core::error::CoreError;
use taverna_core::types::DbId;
use taverna_db::models::character::CharacterWithFriendships;
use taverna_db::repositories::CharacterRepo;
use taverna_events::GalleryEvent;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::character::require_owned;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum accepted image size.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// POST /api/v1/characters/{id}/image
///
/// Owner or admin only. Accepts PNG, JPEG, and WebP.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<CharacterWithFriendships>> {
    require_owned(&state, id, &user).await?;

    let mut file_data: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some(data.to_vec());
            }
            _ => {} // ignore unknown fields
        }
    }

    let data =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(format!(
            "Image exceeds the {} MiB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    // Trust the bytes, not the filename or content-type header.
    let format = image::guess_format(&data)
        .map_err(|_| AppError::BadRequest("Unrecognized image data".into()))?;
    let ext = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported image format {other:?}. Supported: PNG, JPEG, WebP"
            )))
        }
    };

    tokio::fs::create_dir_all(&state.config.media_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let stored_filename = format!("{}.{ext}", Uuid::new_v4());
    let file_path = state.config.media_dir.join(&stored_filename);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let image_url = format!("/media/{stored_filename}");
    let updated = CharacterRepo::set_image_url(&state.pool, id, &image_url)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    state
        .event_bus
        .publish(GalleryEvent::character_changed(id, user.user_id));

    let character = CharacterRepo::find_with_friendships(&state.pool, updated.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(character))
}
