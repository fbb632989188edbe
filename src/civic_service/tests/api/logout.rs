use crate::helpers::{TestApp, location};

#[tokio::test]
async fn should_destroy_the_session_and_redirect_home() {
    let app = TestApp::new().await;
    app.logged_in_user().await;
    assert_eq!(app.get("/dashboard").await.status().as_u16(), 200);

    let response = app.post_logout().await;

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), Some("/"));
    assert!(app.session_store.is_empty().await);
    assert_eq!(app.get("/dashboard").await.status().as_u16(), 303);
}

#[tokio::test]
async fn should_accept_logout_without_a_session() {
    let app = TestApp::new().await;

    let response = app.post_logout().await;

    assert_eq!(response.status().as_u16(), 303);
}
