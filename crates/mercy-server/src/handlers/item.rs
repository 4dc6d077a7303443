use crate::context::Resolved;
use crate::error::ApiError;
use crate::payload::Payload;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use mercy_core::{EntityKind, ErrorCode, Item, ObjectId};
use mercy_runtime::{UpdateOutcome, active_items, apply_update, create_item};
use serde::Serialize;

pub async fn add(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> Result<Json<Item>, ApiError> {
    let item = create_item(state.store(), &body)
        .await
        .map_err(|e| ApiError::create(EntityKind::Item, e))?;
    Ok(Json(item))
}

pub async fn update(
    State(state): State<AppState>,
    Resolved(item): Resolved<Item>,
    Payload(body): Payload,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let outcome = apply_update(state.store(), &item, &body)
        .await
        .map_err(|e| ApiError::update(EntityKind::Item, e))?;
    Ok(Json(outcome))
}

pub async fn show(Resolved(item): Resolved<Item>) -> Json<Item> {
    Json(item)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicItem {
    pub name: String,
    pub description: String,
    pub creation_time: DateTime<Utc>,
    pub price: Option<f64>,
    pub rent: Option<f64>,
    pub poor_price_factor: f64,
}

/// `GET /item?id=..`; deactivated items do not exist publicly.
pub async fn public(Resolved(item): Resolved<Item>) -> Result<Json<PublicItem>, ApiError> {
    if !item.active {
        return Err(ApiError::new(ErrorCode::ItemNotFound));
    }
    Ok(Json(item.into()))
}

impl From<Item> for PublicItem {
    fn from(item: Item) -> Self {
        Self {
            name: item.name,
            description: item.description,
            creation_time: item.creation_time,
            price: item.price,
            rent: item.rent,
            poor_price_factor: item.poor_price_factor,
        }
    }
}

/// An entry of the public catalogue; the id leads to `GET /item`.
#[derive(Debug, Serialize)]
pub struct CatalogueEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub item: PublicItem,
}

/// `GET /op/items`: every active item, in full.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(active_items(state.store()).await?))
}

/// `GET /items`: the public catalogue of active items.
pub async fn catalogue(State(state): State<AppState>) -> Result<Json<Vec<CatalogueEntry>>, ApiError> {
    let entries = active_items(state.store())
        .await?
        .into_iter()
        .map(|item| CatalogueEntry {
            id: item.id,
            item: item.into(),
        })
        .collect();
    Ok(Json(entries))
}
