mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn packages_filtered_by_type() {
    let app = TestApp::spawn().await;
    app.seed_training_package("Full Chef Course", "full-chef-course", "six_months")
        .await;
    app.seed_training_package("Weekend Intensive", "weekend-intensive", "two_weeks")
        .await;

    let response = app
        .http
        .get(app.url("/training/packages?package_type=two_weeks"))
        .send()
        .await
        .expect("Failed to execute request");
    let packages: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0]["slug"], "weekend-intensive");

    let response = app
        .http
        .get(app.url("/training/packages?package_type=forever"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn enquiry_requires_an_existing_package() {
    let app = TestApp::spawn().await;
    let package = app
        .seed_training_package("Full Chef Course", "full-chef-course", "six_months")
        .await;

    let response = app
        .http
        .post(app.url("/training/enquiries"))
        .json(&json!({
            "package_id": package,
            "name": "Yemi Alade",
            "email": "yemi@example.com",
            "phone": "+2348033344455",
            "message": "When does the next cohort start?",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    let enquiry: serde_json::Value = response.json().await.unwrap();
    assert_eq!(enquiry["status"], "pending");

    let response = app
        .http
        .post(app.url("/training/enquiries"))
        .json(&json!({
            "package_id": uuid::Uuid::new_v4(),
            "name": "Yemi Alade",
            "email": "yemi@example.com",
            "phone": "+2348033344455",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn enquiry_status_can_be_updated() {
    let app = TestApp::spawn().await;
    let package = app
        .seed_training_package("Weekend Intensive", "weekend-intensive", "two_weeks")
        .await;

    let response = app
        .http
        .post(app.url("/training/enquiries"))
        .json(&json!({
            "package_id": package,
            "name": "Yemi Alade",
            "email": "yemi@example.com",
            "phone": "+2348033344455",
        }))
        .send()
        .await
        .unwrap();
    let enquiry: serde_json::Value = response.json().await.unwrap();
    let id = enquiry["enquiry_id"].as_str().unwrap();

    let response = app
        .http
        .patch(app.url(&format!("/training/enquiries/{}/status", id)))
        .json(&json!({ "status": "responded" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["status"], "responded");
}

#[tokio::test]
async fn cancelled_enquiry_is_terminal() {
    let app = TestApp::spawn().await;
    let package = app
        .seed_training_package("Full Chef Course", "full-chef-course", "six_months")
        .await;

    let response = app
        .http
        .post(app.url("/training/enquiries"))
        .json(&json!({
            "package_id": package,
            "name": "Yemi Alade",
            "email": "yemi@example.com",
            "phone": "+2348033344455",
        }))
        .send()
        .await
        .unwrap();
    let enquiry: serde_json::Value = response.json().await.unwrap();
    let id = enquiry["enquiry_id"].as_str().unwrap();

    let response = app
        .http
        .patch(app.url(&format!("/training/enquiries/{}/status", id)))
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .http
        .patch(app.url(&format!("/training/enquiries/{}/status", id)))
        .json(&json!({ "status": "responded" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}
