mod common;

use common::TestApp;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn decimal(value: &serde_json::Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("Expected decimal string")).unwrap()
}

#[tokio::test]
async fn international_quote_is_base_plus_per_kg() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "United Kingdom",
            "international",
            Decimal::ZERO,
            Decimal::new(25_000_00, 2),
            Decimal::new(8_000_00, 2),
        )
        .await;

    let response = app
        .http
        .post(app.url("/shipping/quote"))
        .json(&json!({ "destination_id": destination, "weight_kg": "2.5" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let quote: serde_json::Value = response.json().await.unwrap();
    assert_eq!(decimal(&quote["base_fee"]), Decimal::new(25_000_00, 2));
    assert_eq!(decimal(&quote["weight_fee"]), Decimal::new(20_000_00, 2));
    assert_eq!(decimal(&quote["total_fee"]), Decimal::new(45_000_00, 2));
    assert_eq!(quote["zone"], "International");
}

#[tokio::test]
async fn domestic_quote_falls_back_to_flat_fee() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "Abuja",
            "domestic",
            Decimal::new(3_500_00, 2),
            Decimal::ZERO,
            Decimal::ZERO,
        )
        .await;

    let response = app
        .http
        .post(app.url("/shipping/quote"))
        .json(&json!({ "destination_id": destination, "weight_kg": "10" }))
        .send()
        .await
        .expect("Failed to execute request");
    let quote: serde_json::Value = response.json().await.unwrap();
    assert_eq!(decimal(&quote["base_fee"]), Decimal::new(3_500_00, 2));
    assert_eq!(decimal(&quote["total_fee"]), Decimal::new(3_500_00, 2));
    assert_eq!(quote["zone"], "Nigeria-wide");
}

#[tokio::test]
async fn quote_rejects_non_positive_weight() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "Lagos",
            "domestic",
            Decimal::new(2_000_00, 2),
            Decimal::ZERO,
            Decimal::ZERO,
        )
        .await;

    let response = app
        .http
        .post(app.url("/shipping/quote"))
        .json(&json!({ "destination_id": destination, "weight_kg": "0" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn shipping_order_fees_come_from_the_destination() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "United States",
            "international",
            Decimal::ZERO,
            Decimal::new(30_000_00, 2),
            Decimal::new(10_000_00, 2),
        )
        .await;

    let response = app
        .http
        .post(app.url("/shipping/orders"))
        .json(&json!({
            "destination_id": destination,
            "contact_email": "diaspora@example.com",
            "items": [{ "name": "Egusi soup (frozen)", "qty": 4 }],
            "weight_kg": "3",
            "customs_info": "Frozen food declaration attached",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let order: serde_json::Value = response.json().await.unwrap();
    assert_eq!(decimal(&order["weight_fee"]), Decimal::new(30_000_00, 2));
    assert_eq!(decimal(&order["shipping_fee"]), Decimal::new(60_000_00, 2));
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn shipping_order_walks_fulfilment_states() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "Canada",
            "international",
            Decimal::ZERO,
            Decimal::new(28_000_00, 2),
            Decimal::new(9_000_00, 2),
        )
        .await;

    let response = app
        .http
        .post(app.url("/shipping/orders"))
        .json(&json!({
            "destination_id": destination,
            "contact_email": "family@example.com",
            "items": [{ "name": "Chin chin", "qty": 10 }],
            "weight_kg": "1.5",
        }))
        .send()
        .await
        .unwrap();
    let order: serde_json::Value = response.json().await.unwrap();
    let id = order["shipping_order_id"].as_str().unwrap();

    let response = app
        .http
        .patch(app.url(&format!("/shipping/orders/{}/status", id)))
        .json(&json!({ "status": "shipped", "tracking_number": "DHL-998877" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["status"], "shipped");
    assert_eq!(updated["tracking_number"], "DHL-998877");

    let response = app
        .http
        .patch(app.url(&format!("/shipping/orders/{}/status", id)))
        .json(&json!({ "status": "returned" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn shipping_orders_listed_by_contact_email() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "Ireland",
            "international",
            Decimal::ZERO,
            Decimal::new(20_000_00, 2),
            Decimal::new(7_000_00, 2),
        )
        .await;

    for (email, qty) in [
        ("sender@example.com", 2),
        ("sender@example.com", 5),
        ("other@example.com", 1),
    ] {
        let response = app
            .http
            .post(app.url("/shipping/orders"))
            .json(&json!({
                "destination_id": destination,
                "contact_email": email,
                "items": [{ "name": "Ogbono soup", "qty": qty }],
                "weight_kg": "2",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = app
        .http
        .get(app.url("/shipping/orders?email=sender@example.com"))
        .send()
        .await
        .expect("Failed to execute request");
    let orders: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn tracking_view_shows_fulfilment_progress() {
    let app = TestApp::spawn().await;
    let destination = app
        .seed_destination(
            "Germany",
            "international",
            Decimal::ZERO,
            Decimal::new(22_000_00, 2),
            Decimal::new(8_500_00, 2),
        )
        .await;

    let response = app
        .http
        .post(app.url("/shipping/orders"))
        .json(&json!({
            "destination_id": destination,
            "contact_email": "tracker@example.com",
            "items": [{ "name": "Dried fish", "qty": 3 }],
            "weight_kg": "2",
        }))
        .send()
        .await
        .unwrap();
    let order: serde_json::Value = response.json().await.unwrap();
    let id = order["shipping_order_id"].as_str().unwrap();

    app.http
        .patch(app.url(&format!("/shipping/orders/{}/status", id)))
        .json(&json!({ "status": "shipped", "tracking_number": "UPS-112233" }))
        .send()
        .await
        .unwrap();

    let response = app
        .http
        .get(app.url(&format!("/shipping/orders/{}/tracking", id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let view: serde_json::Value = response.json().await.unwrap();
    assert_eq!(view["status"], "shipped");
    assert_eq!(view["tracking_number"], "UPS-112233");
    // The manifest stays off the tracking view.
    assert!(view.get("items").is_none());
}

#[tokio::test]
async fn destinations_filtered_by_type() {
    let app = TestApp::spawn().await;
    app.seed_destination(
        "Lagos",
        "domestic",
        Decimal::new(2_000_00, 2),
        Decimal::ZERO,
        Decimal::ZERO,
    )
    .await;
    app.seed_destination(
        "Ghana",
        "international",
        Decimal::ZERO,
        Decimal::new(15_000_00, 2),
        Decimal::new(5_000_00, 2),
    )
    .await;

    let response = app
        .http
        .get(app.url("/shipping/destinations?destination_type=international"))
        .send()
        .await
        .unwrap();
    let destinations: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(destinations.len(), 1);
    assert_eq!(destinations[0]["name"], "Ghana");
}
