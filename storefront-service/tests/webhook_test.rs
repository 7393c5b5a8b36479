mod common;

use common::{sign_webhook, TestApp};
use rust_decimal::Decimal;
use serde_json::json;

async fn checkout_reference(app: &TestApp, cart_token: &str) -> String {
    let item = app
        .seed_menu_item(
            &format!("Dish {}", cart_token),
            &format!("dish-{}", cart_token),
            Decimal::new(3_000_00, 2),
        )
        .await;
    app.add_to_cart(cart_token, item, 1).await;
    let order = app.checkout(cart_token, "ngozi@example.com").await;
    order["payment_reference"].as_str().unwrap().to_string()
}

fn charge_body(event: &str, reference: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": event,
        "data": {
            "reference": reference,
            "status": if event == "charge.success" { "success" } else { "failed" },
            "amount": 837500,
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn webhook_without_signature_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .post(app.url("/webhooks/paystack"))
        .body(charge_body("charge.success", "PAY_MISSING"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn webhook_with_bad_signature_is_unauthorized() {
    let app = TestApp::spawn().await;
    let body = charge_body("charge.success", "PAY_FORGED");

    let response = app
        .http
        .post(app.url("/webhooks/paystack"))
        .header("X-Paystack-Signature", "deadbeef".repeat(16))
        .body(body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn charge_success_settles_order_and_clears_cart() {
    let app = TestApp::spawn().await;
    let reference = checkout_reference(&app, "hooked").await;

    let body = charge_body("charge.success", &reference);
    let response = app
        .http
        .post(app.url("/webhooks/paystack"))
        .header("X-Paystack-Signature", sign_webhook(&body))
        .body(body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let order = app
        .db
        .get_order_by_payment_reference(&reference)
        .await
        .unwrap()
        .expect("Order should exist");
    assert_eq!(order.status, "processing");
    assert_eq!(order.payment_status, "paid");
    assert!(order.paid_utc.is_some());

    // Settlement empties the cart the order came from.
    let cart_response = app
        .http
        .get(app.url("/cart"))
        .header("x-cart-token", "hooked")
        .send()
        .await
        .unwrap();
    let cart: serde_json::Value = cart_response.json().await.unwrap();
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn replayed_delivery_is_detected_and_ignored() {
    let app = TestApp::spawn().await;
    let reference = checkout_reference(&app, "replayed").await;
    let body = charge_body("charge.success", &reference);
    let signature = sign_webhook(&body);

    for expect_duplicate in [false, true] {
        let response = app
            .http
            .post(app.url("/webhooks/paystack"))
            .header("X-Paystack-Signature", signature.clone())
            .body(body.clone())
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        let ack: serde_json::Value = response.json().await.unwrap();
        assert_eq!(ack["received"], true);
        assert_eq!(ack["duplicate"].as_bool().unwrap_or(false), expect_duplicate);
    }
}

#[tokio::test]
async fn charge_failed_closes_the_payment_but_leaves_the_order_alone() {
    let app = TestApp::spawn().await;
    let reference = checkout_reference(&app, "failed").await;
    let order = app
        .db
        .get_order_by_payment_reference(&reference)
        .await
        .unwrap()
        .expect("Order should exist");
    app.db
        .create_payment(
            order.order_id,
            order.total,
            "NGN",
            "paystack",
            &reference,
            None,
        )
        .await
        .expect("Failed to record payment attempt");

    let body = charge_body("charge.failed", &reference);
    let response = app
        .http
        .post(app.url("/webhooks/paystack"))
        .header("X-Paystack-Signature", sign_webhook(&body))
        .body(body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let payment = app
        .db
        .get_payment_by_reference(&reference)
        .await
        .unwrap()
        .expect("Payment should exist");
    assert_eq!(payment.status, "failed");

    // Only the payment attempt fails; the order keeps waiting so the
    // customer can retry.
    let order = app
        .db
        .get_order_by_payment_reference(&reference)
        .await
        .unwrap()
        .expect("Order should exist");
    assert_eq!(order.payment_status, "pending");
    assert_eq!(order.status, "payment_pending");
    assert!(order.paid_utc.is_none());
}

#[tokio::test]
async fn unrelated_events_are_acknowledged() {
    let app = TestApp::spawn().await;
    let body = serde_json::to_vec(&json!({
        "event": "transfer.success",
        "data": { "reference": "TRF_123", "status": "success" }
    }))
    .unwrap();

    let response = app
        .http
        .post(app.url("/webhooks/paystack"))
        .header("X-Paystack-Signature", sign_webhook(&body))
        .body(body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
}
