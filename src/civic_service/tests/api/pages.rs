use civic_core::{Udo, UserId};

use crate::helpers::{TestApp, location};

#[tokio::test]
async fn should_redirect_anonymous_visitors_to_login() {
    let app = TestApp::new().await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), Some("/login"));

    let page: serde_json::Value = app.get("/login").await.json().await.unwrap();
    assert_eq!(page["error"], "You are not authenticated");
}

#[tokio::test]
async fn should_show_dashboard_to_logged_in_user() {
    let app = TestApp::new().await;
    let (udo, _) = app.logged_in_user().await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Udo = response.json().await.unwrap();
    assert_eq!(body, udo);
    assert_eq!(body.full_name, "Jane Doe");
}

#[tokio::test]
async fn should_only_show_own_user_page() {
    let app = TestApp::new().await;
    let (udo, _) = app.logged_in_user().await;

    let own = app.get(&format!("/users/{}", udo.id)).await;
    assert_eq!(own.status().as_u16(), 200);

    let other = app.get(&format!("/users/{}", UserId::new())).await;
    assert_eq!(other.status().as_u16(), 303);
    assert_eq!(location(&other), Some("/login"));
}

#[tokio::test]
async fn should_block_admin_for_everyone() {
    let app = TestApp::new().await;
    app.logged_in_user().await;

    let response = app.get("/admin").await;

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), Some("/login"));
}
