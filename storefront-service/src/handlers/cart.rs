//! Cart handlers.
//!
//! Cart identity is an opaque token in the `x-cart-token` header. A
//! request without one gets a fresh token minted server-side; the
//! client picks it up from `cart_token` in the response and presents
//! it on subsequent requests. Tokens never expire server-side.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CartView, MenuItem};
use crate::AppState;

pub const CART_TOKEN_HEADER: &str = "x-cart-token";

/// Extracts the cart token header, minting a fresh token when the
/// request carries none.
#[derive(Debug, Clone)]
pub struct CartToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CartToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(CART_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let token = match token {
            Some(t) if t.len() > 128 => {
                return Err(AppError::BadRequest(anyhow::anyhow!("Cart token too long")));
            }
            Some(t) => t.to_string(),
            None => format!("cart_{}", Uuid::new_v4().simple()),
        };

        Ok(CartToken(token))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
    #[serde(default)]
    pub special_instructions: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuantityRequest {
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
}

pub async fn get_cart(
    State(state): State<AppState>,
    token: CartToken,
) -> Result<Json<CartView>, AppError> {
    let cart = state.db.get_or_create_cart(&token.0).await?;
    let items = state.db.list_cart_items(cart.cart_id).await?;
    Ok(Json(CartView::new(&cart, items)))
}

pub async fn add_item(
    State(state): State<AppState>,
    token: CartToken,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>), AppError> {
    payload.validate()?;

    let item: MenuItem = state
        .db
        .get_menu_item(payload.menu_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Menu item not found")))?;

    if !item.is_available {
        return Err(AppError::Unprocessable(anyhow::anyhow!(
            "{} is not currently available",
            item.name
        )));
    }

    let cart = state.db.get_or_create_cart(&token.0).await?;
    state
        .db
        .add_cart_item(
            cart.cart_id,
            &item,
            payload.quantity,
            &payload.special_instructions,
        )
        .await?;

    let items = state.db.list_cart_items(cart.cart_id).await?;
    Ok((StatusCode::CREATED, Json(CartView::new(&cart, items))))
}

pub async fn update_item_quantity(
    State(state): State<AppState>,
    token: CartToken,
    Path(cart_item_id): Path<Uuid>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>, AppError> {
    payload.validate()?;

    let cart = state
        .db
        .get_cart(&token.0)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Cart not found")))?;

    state
        .db
        .update_cart_item_quantity(cart.cart_id, cart_item_id, payload.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Cart item not found")))?;

    let items = state.db.list_cart_items(cart.cart_id).await?;
    Ok(Json(CartView::new(&cart, items)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    token: CartToken,
    Path(cart_item_id): Path<Uuid>,
) -> Result<Json<CartView>, AppError> {
    let cart = state
        .db
        .get_cart(&token.0)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Cart not found")))?;

    let removed = state.db.remove_cart_item(cart.cart_id, cart_item_id).await?;
    if !removed {
        return Err(AppError::NotFound(anyhow::anyhow!("Cart item not found")));
    }

    let items = state.db.list_cart_items(cart.cart_id).await?;
    Ok(Json(CartView::new(&cart, items)))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    token: CartToken,
) -> Result<StatusCode, AppError> {
    let cart = state
        .db
        .get_cart(&token.0)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Cart not found")))?;

    state.db.clear_cart(cart.cart_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
