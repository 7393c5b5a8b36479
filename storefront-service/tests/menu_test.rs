mod common;

use common::TestApp;
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn create_and_fetch_menu_item_by_slug() {
    let app = TestApp::spawn().await;
    let category_id = app.seed_menu_category("Soups", "soups").await;

    let response = app
        .http
        .post(app.url("/menu/items"))
        .json(&json!({
            "category_id": category_id,
            "name": "Egusi Soup",
            "description": "Melon seed soup with assorted meat",
            "price": "4500.00",
            "servings": 2,
            "is_featured": true,
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let created: serde_json::Value = response.json().await.expect("Invalid body");
    assert_eq!(created["slug"], "egusi-soup");

    let response = app
        .http
        .get(app.url("/menu/items/egusi-soup"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let fetched: serde_json::Value = response.json().await.expect("Invalid body");
    assert_eq!(fetched["name"], "Egusi Soup");
    assert_eq!(fetched["is_featured"], true);
}

#[tokio::test]
async fn duplicate_item_slug_conflicts() {
    let app = TestApp::spawn().await;
    app.seed_menu_item("Jollof Rice", "jollof-rice", Decimal::new(3_000_00, 2))
        .await;

    let response = app
        .http
        .post(app.url("/menu/items"))
        .json(&json!({ "name": "Jollof Rice", "price": "3200.00" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn non_positive_price_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .post(app.url("/menu/items"))
        .json(&json!({ "name": "Free Lunch", "price": "0" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn listing_filters_by_category_and_featured() {
    let app = TestApp::spawn().await;
    let soups = app.seed_menu_category("Soups", "soups").await;

    for (name, slug, featured) in [
        ("Egusi Soup", "egusi-soup", true),
        ("Ogbono Soup", "ogbono-soup", false),
    ] {
        let id = app.seed_menu_item(name, slug, Decimal::new(4_000_00, 2)).await;
        sqlx::query("UPDATE menu_items SET category_id = $2, is_featured = $3 WHERE item_id = $1")
            .bind(id)
            .bind(soups)
            .bind(featured)
            .execute(app.pool())
            .await
            .unwrap();
    }
    // An item in no category should not match the filter.
    app.seed_menu_item("Chin Chin", "chin-chin", Decimal::new(1_000_00, 2))
        .await;

    let response = app
        .http
        .get(app.url("/menu/items?category=soups"))
        .send()
        .await
        .expect("Failed to execute request");
    let items: Vec<serde_json::Value> = response.json().await.expect("Invalid body");
    assert_eq!(items.len(), 2);

    let response = app
        .http
        .get(app.url("/menu/items?category=soups&featured=true"))
        .send()
        .await
        .expect("Failed to execute request");
    let items: Vec<serde_json::Value> = response.json().await.expect("Invalid body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["slug"], "egusi-soup");
}

#[tokio::test]
async fn unavailable_items_are_hidden_from_listing() {
    let app = TestApp::spawn().await;
    let id = app
        .seed_menu_item("Sold Out Stew", "sold-out-stew", Decimal::new(2_500_00, 2))
        .await;
    sqlx::query("UPDATE menu_items SET is_available = FALSE WHERE item_id = $1")
        .bind(id)
        .execute(app.pool())
        .await
        .unwrap();

    let response = app
        .http
        .get(app.url("/menu/items"))
        .send()
        .await
        .expect("Failed to execute request");
    let items: Vec<serde_json::Value> = response.json().await.expect("Invalid body");
    assert!(items.iter().all(|i| i["slug"] != "sold-out-stew"));

    // Direct fetch by slug still works for the detail page.
    let response = app
        .http
        .get(app.url("/menu/items/sold-out-stew"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn resubmitted_review_replaces_previous_rating() {
    let app = TestApp::spawn().await;
    app.seed_menu_item("Moi Moi", "moi-moi", Decimal::new(1_500_00, 2))
        .await;

    for (rating, comment) in [(3, "Decent"), (5, "Excellent after all")] {
        let response = app
            .http
            .post(app.url("/menu/items/moi-moi/reviews"))
            .json(&json!({
                "reviewer_name": "Tunde",
                "reviewer_email": "tunde@example.com",
                "rating": rating,
                "comment": comment,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = app
        .http
        .get(app.url("/menu/items/moi-moi/reviews"))
        .send()
        .await
        .expect("Failed to execute request");
    let reviews: Vec<serde_json::Value> = response.json().await.expect("Invalid body");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
    assert_eq!(reviews[0]["comment"], "Excellent after all");
}

#[tokio::test]
async fn review_rating_must_be_in_range() {
    let app = TestApp::spawn().await;
    app.seed_menu_item("Suya", "suya", Decimal::new(2_000_00, 2))
        .await;

    let response = app
        .http
        .post(app.url("/menu/items/suya/reviews"))
        .json(&json!({
            "reviewer_name": "Ada",
            "reviewer_email": "ada@example.com",
            "rating": 6,
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 422);
}
