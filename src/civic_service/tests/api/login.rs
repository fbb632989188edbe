use crate::helpers::{PASSWORD, TestApp, location, session_token};

#[tokio::test]
async fn should_redirect_to_dashboard_with_session_cookie() {
    let app = TestApp::new().await;
    app.add_user("jane@example.com", "Jane", "Doe").await;

    let response = app.post_login("jane@example.com", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), Some("/dashboard"));
    assert!(session_token(&response).is_some());
    assert_eq!(app.session_store.len().await, 1);
}

#[tokio::test]
async fn should_flash_the_same_message_for_unknown_email_and_wrong_password() {
    let app = TestApp::new().await;
    app.add_user("jane@example.com", "Jane", "Doe").await;

    let mut flashes = Vec::new();
    for (email, password) in [
        ("john@example.com", PASSWORD),
        ("jane@example.com", "wrong password"),
        ("not-an-email", PASSWORD),
    ] {
        let response = app.post_login(email, password).await;
        assert_eq!(response.status().as_u16(), 303, "{email}");
        assert_eq!(location(&response), Some("/login"));
        assert!(session_token(&response).is_none());

        let page: serde_json::Value = app.get("/login").await.json().await.unwrap();
        flashes.push(page["error"].as_str().unwrap().to_string());
    }

    assert!(
        flashes
            .iter()
            .all(|flash| flash == "Email / Password combination is wrong.")
    );
    assert!(app.session_store.is_empty().await);
}

#[tokio::test]
async fn should_consume_the_flash_message() {
    let app = TestApp::new().await;
    app.post_login("john@example.com", PASSWORD).await;

    let first: serde_json::Value = app.get("/login").await.json().await.unwrap();
    let second: serde_json::Value = app.get("/login").await.json().await.unwrap();

    assert!(first["error"].is_string());
    assert!(second["error"].is_null());
}
