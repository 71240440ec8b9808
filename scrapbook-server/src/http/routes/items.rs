//! Item endpoints
//!
//! All four operations live on one resource path; the method router is the
//! dispatch table and answers 405 for anything else. Validation happens
//! before any I/O, and the partial update only carries fields the caller
//! actually sent.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::media::MediaUploader;
use crate::models::{ImageInput, ItemPatch, ItemText, PaginationParams, ValidationError};
use crate::store::{Item, ItemSummary, NewItem};

/// Create item request
#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub text: Option<String>,
    /// URL, data URI, or bare base64
    pub image: Option<String>,
}

/// Update item request; omitted fields keep their stored values
#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub id: Option<String>,
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub image: Option<String>,
}

/// Query parameters for delete
#[derive(Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// Full item echo for create responses
#[derive(Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub image: Option<String>,
    pub created_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            text: item.text,
            completed: item.completed,
            image: item.image,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Projected item for list responses
#[derive(Serialize)]
pub struct ItemSummaryResponse {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub image: Option<String>,
}

impl From<ItemSummary> for ItemSummaryResponse {
    fn from(item: ItemSummary) -> Self {
        Self {
            id: item.id,
            text: item.text,
            completed: item.completed,
            image: item.image,
        }
    }
}

/// Update acknowledgement
#[derive(Serialize)]
pub struct UpdateAck {
    pub updated: u64,
}

/// Delete acknowledgement
#[derive(Serialize)]
pub struct DeleteAck {
    pub deleted: u64,
}

/// GET /todos - one page of items in insertion order
async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<ItemSummaryResponse>>, ApiError> {
    let page = params.resolve(state.page_size);

    let store = state.store.acquire().await?;
    let items = store.list(page).await?;

    Ok(Json(
        items.into_iter().map(ItemSummaryResponse::from).collect(),
    ))
}

/// POST /todos - create an item
async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let text = ItemText::new(req.text.as_deref().unwrap_or_default())?;
    let image_input = parse_image(req.image.as_deref())?;

    let store = state.store.acquire().await?;
    let image = resolve_image(state.uploader.as_ref(), image_input).await?;
    let item = store
        .insert(NewItem {
            text,
            image,
            created_at: Utc::now(),
        })
        .await?;

    Ok(Json(ItemResponse::from(item)))
}

/// PUT /todos - partial update; only supplied fields reach the store
async fn update_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<UpdateAck>, ApiError> {
    let id = parse_id(req.id.as_deref())?;
    let text = req.text.as_deref().map(ItemText::new).transpose()?;
    let image_input = parse_image(req.image.as_deref())?;

    let store = state.store.acquire().await?;
    let patch = ItemPatch {
        text,
        completed: req.completed,
        image: resolve_image(state.uploader.as_ref(), image_input).await?,
    };

    if patch.is_empty() {
        return Ok(Json(UpdateAck { updated: 0 }));
    }

    let updated = store.update(id, patch).await?;
    Ok(Json(UpdateAck { updated }))
}

/// DELETE /todos?id=... - remove an item
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id = parse_id(params.id.as_deref())?;

    let store = state.store.acquire().await?;
    let deleted = store.delete(id).await?;

    Ok(Json(DeleteAck { deleted }))
}

/// Validate the identifier before any I/O.
fn parse_id(id: Option<&str>) -> Result<Uuid, ApiError> {
    let id = id.ok_or(ValidationError::Empty { field: "id" })?;

    Uuid::parse_str(id).map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field: "id",
            reason: "invalid UUID format",
        })
    })
}

/// Parse the image request field; an empty string means no image.
fn parse_image(image: Option<&str>) -> Result<Option<ImageInput>, ApiError> {
    Ok(image
        .filter(|s| !s.is_empty())
        .map(ImageInput::parse)
        .transpose()?)
}

/// Resolve an optional image input to a stored URL.
///
/// Inline payloads go through the uploader; resolved URLs pass through
/// verbatim without invoking it.
async fn resolve_image(
    uploader: &dyn MediaUploader,
    input: Option<ImageInput>,
) -> Result<Option<String>, ApiError> {
    match input {
        None => Ok(None),
        Some(ImageInput::Url(url)) => Ok(Some(url)),
        Some(ImageInput::Inline(payload)) => Ok(Some(uploader.upload(&payload).await?)),
    }
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/todos",
        get(list_items)
            .post(create_item)
            .put(update_item)
            .delete(delete_item),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_validation_fails_fast() {
        assert!(parse_id(None).is_err());
        assert!(parse_id(Some("not-an-id")).is_err());
        assert!(parse_id(Some("")).is_err());
        assert!(parse_id(Some("550e8400-e29b-41d4-a716-446655440000")).is_ok());
    }

    #[test]
    fn empty_image_means_no_image() {
        assert!(parse_image(None).unwrap().is_none());
        assert!(parse_image(Some("")).unwrap().is_none());
        assert!(parse_image(Some("https://cdn.example.com/x.jpg"))
            .unwrap()
            .is_some());
    }
}
