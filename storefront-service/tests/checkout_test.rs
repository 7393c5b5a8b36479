mod common;

use common::TestApp;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn decimal(value: &serde_json::Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("Expected decimal string")).unwrap()
}

#[tokio::test]
async fn checkout_totals_add_up() {
    let app = TestApp::spawn().await;
    let rice = app
        .seed_menu_item("Jollof Rice", "jollof-rice", Decimal::new(3_500_00, 2))
        .await;
    let soup = app
        .seed_menu_item("Egusi Soup", "egusi-soup", Decimal::new(4_500_00, 2))
        .await;
    app.add_to_cart("cart-checkout", rice, 2).await;
    app.add_to_cart("cart-checkout", soup, 1).await;

    let order = app.checkout("cart-checkout", "ngozi@example.com").await;

    // 2 x 3500 + 4500 = 11500; delivery 5000; VAT 7.5% of 11500 = 862.50
    assert_eq!(decimal(&order["subtotal"]), Decimal::new(11_500_00, 2));
    assert_eq!(decimal(&order["shipping_fee"]), Decimal::new(5_000_00, 2));
    assert_eq!(decimal(&order["tax"]), Decimal::new(862_50, 2));
    assert_eq!(
        decimal(&order["total"]),
        decimal(&order["subtotal"]) + decimal(&order["shipping_fee"]) + decimal(&order["tax"])
            - decimal(&order["discount"])
    );

    // A fresh checkout sits in payment_pending until the gateway settles.
    assert_eq!(order["status"], "payment_pending");
    assert_eq!(order["payment_status"], "pending");
    let order_number = order["order_number"].as_str().unwrap();
    assert!(order_number.starts_with("ORD-"));
    let reference = order["payment_reference"].as_str().unwrap();
    assert!(reference.starts_with("PAY_"));
}

#[tokio::test]
async fn checkout_with_empty_cart_is_rejected() {
    let app = TestApp::spawn().await;

    // Materialize an empty cart for the token.
    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-empty")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .http
        .post(app.url("/orders/checkout"))
        .header("x-cart-token", "cart-empty")
        .json(&json!({
            "name": "Ngozi Okafor",
            "email": "ngozi@example.com",
            "phone": "+2348012345678",
            "address": "14 Admiralty Way",
            "city": "Lagos",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn cart_survives_checkout_until_payment() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Moi Moi", "moi-moi", Decimal::new(1_500_00, 2))
        .await;
    app.add_to_cart("cart-keep", item, 2).await;

    app.checkout("cart-keep", "ngozi@example.com").await;

    let response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "cart-keep")
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = response.json().await.unwrap();
    assert_eq!(cart["item_count"], 2);
}

#[tokio::test]
async fn order_lines_snapshot_name_and_price() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Ofada Rice", "ofada-rice", Decimal::new(4_200_00, 2))
        .await;
    app.add_to_cart("cart-snapshot", item, 1).await;

    let order = app.checkout("cart-snapshot", "ngozi@example.com").await;
    let order_number = order["order_number"].as_str().unwrap().to_string();

    // The menu moves on; the order must not.
    sqlx::query("UPDATE menu_items SET name = 'Renamed Dish', price = 9000.00 WHERE item_id = $1")
        .bind(item)
        .execute(app.pool())
        .await
        .unwrap();

    let response = app
        .http
        .get(app.url(&format!("/orders/{}", order_number)))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = response.json().await.unwrap();
    let lines = fetched["items"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["item_name"], "Ofada Rice");
    assert_eq!(decimal(&lines[0]["unit_price"]), Decimal::new(4_200_00, 2));
}

#[tokio::test]
async fn orders_listed_by_customer_email() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Suya", "suya", Decimal::new(2_000_00, 2))
        .await;

    app.add_to_cart("cart-a", item, 1).await;
    app.checkout("cart-a", "buyer@example.com").await;
    app.add_to_cart("cart-b", item, 1).await;
    app.checkout("cart-b", "buyer@example.com").await;
    app.add_to_cart("cart-c", item, 1).await;
    app.checkout("cart-c", "someone-else@example.com").await;

    let response = app
        .http
        .get(app.url("/orders?email=buyer@example.com"))
        .send()
        .await
        .unwrap();
    let orders: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn unknown_order_status_is_rejected() {
    let app = TestApp::spawn().await;
    let item = app
        .seed_menu_item("Akara", "akara", Decimal::new(800_00, 2))
        .await;
    app.add_to_cart("cart-status", item, 1).await;
    let order = app.checkout("cart-status", "ngozi@example.com").await;
    let order_number = order["order_number"].as_str().unwrap();

    let response = app
        .http
        .patch(app.url(&format!("/orders/{}/status", order_number)))
        .json(&json!({ "status": "shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .http
        .patch(app.url(&format!("/orders/{}/status", order_number)))
        .json(&json!({ "status": "processing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["status"], "processing");
}
