mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn each_fetch_counts_a_view() {
    let app = TestApp::spawn().await;
    app.seed_blog_post("How to make party jollof", "party-jollof")
        .await;

    for expected in 1..=3 {
        let response = app
            .http
            .get(app.url("/blog/posts/party-jollof"))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        let post: serde_json::Value = response.json().await.unwrap();
        assert_eq!(post["view_count"], expected);
    }
}

#[tokio::test]
async fn drafts_are_hidden_from_readers() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .post(app.url("/blog/posts"))
        .json(&json!({
            "title": "Unfinished Draft",
            "author_name": "Chef Adaeze",
            "body": "Work in progress",
            "is_published": false,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let response = app.http.get(app.url("/blog/posts")).send().await.unwrap();
    let posts: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(posts.is_empty());

    let response = app
        .http
        .get(app.url("/blog/posts/unfinished-draft"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn publishing_stamps_the_publish_time() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .post(app.url("/blog/posts"))
        .json(&json!({
            "title": "Five Soups for the Rainy Season",
            "author_name": "Chef Adaeze",
            "excerpt": "Warm up with these.",
            "body": "Full article text",
            "is_published": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let post: serde_json::Value = response.json().await.unwrap();
    assert_eq!(post["slug"], "five-soups-for-the-rainy-season");
    assert!(post["publish_utc"].is_string());
    assert_eq!(post["view_count"], 0);
}

#[tokio::test]
async fn duplicate_title_slug_is_a_conflict() {
    let app = TestApp::spawn().await;
    let body = json!({
        "title": "Party Jollof",
        "author_name": "Chef Adaeze",
        "body": "Text",
        "is_published": true,
    });

    let response = app
        .http
        .post(app.url("/blog/posts"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .http
        .post(app.url("/blog/posts"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn comments_attach_to_the_post() {
    let app = TestApp::spawn().await;
    app.seed_blog_post("Suya at home", "suya-at-home").await;

    let response = app
        .http
        .post(app.url("/blog/posts/suya-at-home/comments"))
        .json(&json!({
            "author": "Ibrahim",
            "email": "ibrahim@example.com",
            "content": "Tried this last weekend, came out great.",
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .http
        .get(app.url("/blog/posts/suya-at-home/comments"))
        .send()
        .await
        .unwrap();
    let comments: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author"], "Ibrahim");
}

#[tokio::test]
async fn hidden_comments_drop_out_of_the_listing() {
    let app = TestApp::spawn().await;
    app.seed_blog_post("Moi moi secrets", "moi-moi-secrets").await;

    let response = app
        .http
        .post(app.url("/blog/posts/moi-moi-secrets/comments"))
        .json(&json!({
            "author": "Ibrahim",
            "email": "ibrahim@example.com",
            "content": "Spam link here",
        }))
        .send()
        .await
        .unwrap();
    let comment: serde_json::Value = response.json().await.unwrap();
    let id = comment["comment_id"].as_str().unwrap();

    let response = app
        .http
        .patch(app.url(&format!("/blog/comments/{}", id)))
        .json(&json!({ "is_approved": false }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .http
        .get(app.url("/blog/posts/moi-moi-secrets/comments"))
        .send()
        .await
        .unwrap();
    let comments: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(comments.is_empty());

    // Re-approving brings it back; the row was never deleted.
    let response = app
        .http
        .patch(app.url(&format!("/blog/comments/{}", id)))
        .json(&json!({ "is_approved": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .http
        .get(app.url("/blog/posts/moi-moi-secrets/comments"))
        .send()
        .await
        .unwrap();
    let comments: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(comments.len(), 1);

    let response = app
        .http
        .patch(app.url(&format!("/blog/comments/{}", uuid::Uuid::new_v4())))
        .json(&json!({ "is_approved": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn commenting_on_an_unknown_post_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .post(app.url("/blog/posts/no-such-post/comments"))
        .json(&json!({
            "author": "Ibrahim",
            "email": "ibrahim@example.com",
            "content": "Hello?",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn gallery_images_filtered_by_category() {
    let app = TestApp::spawn().await;

    let weddings = uuid::Uuid::new_v4();
    sqlx::query("INSERT INTO gallery_categories (category_id, name, slug) VALUES ($1, 'Weddings', 'weddings')")
        .bind(weddings)
        .execute(app.pool())
        .await
        .unwrap();
    let corporate = uuid::Uuid::new_v4();
    sqlx::query("INSERT INTO gallery_categories (category_id, name, slug) VALUES ($1, 'Corporate', 'corporate')")
        .bind(corporate)
        .execute(app.pool())
        .await
        .unwrap();
    for (category, title) in [(weddings, "Cake table"), (corporate, "Buffet line")] {
        sqlx::query(
            "INSERT INTO gallery_images (image_id, category_id, title, image_url) VALUES ($1, $2, $3, 'https://cdn.example.com/img.jpg')",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(category)
        .bind(title)
        .execute(app.pool())
        .await
        .unwrap();
    }

    let response = app
        .http
        .get(app.url("/gallery/images?category=weddings"))
        .send()
        .await
        .unwrap();
    let images: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["title"], "Cake table");

    let response = app
        .http
        .get(app.url("/gallery/images"))
        .send()
        .await
        .unwrap();
    let images: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(images.len(), 2);
}
