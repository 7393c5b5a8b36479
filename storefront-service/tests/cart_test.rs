mod common;

use common::TestApp;
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn missing_token_mints_a_fresh_cart() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Puff Puff", "puff-puff", Decimal::new(500_00, 2))
        .await;

    let response = app
        .http
        .get(app.url("/cart"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let cart: serde_json::Value = response.json().await.expect("Invalid body");
    assert_eq!(cart["item_count"], 0);
    let token = cart["cart_token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // The minted token identifies a usable cart.
    app.add_to_cart(&token, item, 1).await;
    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", &token)
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["item_count"], 1);
}

#[tokio::test]
async fn empty_cart_returns_zero_totals() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-abc")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let cart: serde_json::Value = response.json().await.expect("Invalid body");
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["subtotal"], "0");
}

#[tokio::test]
async fn adding_same_item_twice_merges_the_line() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Jollof Rice", "jollof-rice", Decimal::new(3_500_00, 2))
        .await;

    app.add_to_cart("cart-merge", item, 2).await;
    app.add_to_cart("cart-merge", item, 1).await;

    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-merge")
        .send()
        .await
        .expect("Failed to execute request");
    let cart: serde_json::Value = response.json().await.expect("Invalid body");

    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["subtotal"], "10500.00");
}

#[tokio::test]
async fn unavailable_item_cannot_be_added() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Off Menu", "off-menu", Decimal::new(2_000_00, 2))
        .await;
    sqlx::query("UPDATE menu_items SET is_available = FALSE WHERE item_id = $1")
        .bind(item)
        .execute(app.pool())
        .await
        .unwrap();

    let response = app
        .http
        .post(app.url("/cart/items"))
        .header("x-cart-token", "cart-unavail")
        .json(&json!({ "menu_item_id": item, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn line_quantity_can_be_updated_and_removed() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Pepper Soup", "pepper-soup", Decimal::new(4_000_00, 2))
        .await;
    app.add_to_cart("cart-edit", item, 1).await;

    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-edit")
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = response.json().await.unwrap();
    let line_id = cart["items"][0]["cart_item_id"].as_str().unwrap().to_string();

    let response = app
        .http
        .patch(app.url(&format!("/cart/items/{}", line_id)))
        .header("x-cart-token", "cart-edit")
        .json(&json!({ "quantity": 4 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["items"][0]["quantity"], 4);
    assert_eq!(cart["subtotal"], "16000.00");

    let response = app
        .http
        .delete(app.url(&format!("/cart/items/{}", line_id)))
        .header("x-cart-token", "cart-edit")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn price_captured_at_add_does_not_move_with_the_menu() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Fried Rice", "fried-rice", Decimal::new(3_000_00, 2))
        .await;
    app.add_to_cart("cart-frozen", item, 2).await;

    sqlx::query("UPDATE menu_items SET price = 9999.00 WHERE item_id = $1")
        .bind(item)
        .execute(app.pool())
        .await
        .unwrap();

    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-frozen")
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["subtotal"], "6000.00");
}

#[tokio::test]
async fn carts_are_isolated_per_token() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Akara", "akara", Decimal::new(800_00, 2))
        .await;
    app.add_to_cart("cart-one", item, 5).await;

    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-two")
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["item_count"], 0);
}
