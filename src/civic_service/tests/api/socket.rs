use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::helpers::TestApp;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(app: &TestApp) -> Client {
    let (stream, _) = connect_async(app.socket_address.as_str())
        .await
        .expect("Failed to open websocket");
    stream
}

async fn send(client: &mut Client, event: &str, data: Value) {
    let frame = json!({ "event": event, "data": data }).to_string();
    client
        .send(Message::text(frame))
        .await
        .expect("Failed to send frame");
}

/// Next JSON event, or `None` once the server closed the socket.
async fn receive(client: &mut Client) -> Option<Value> {
    loop {
        match client.next().await? {
            Ok(Message::Text(text)) => return Some(serde_json::from_str(text.as_str()).unwrap()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

#[tokio::test]
async fn should_authorize_a_logged_in_session() {
    let app = TestApp::new().await;
    let (udo, token) = app.logged_in_user().await;
    let mut client = connect(&app).await;

    let challenge = receive(&mut client).await.unwrap();
    assert_eq!(challenge["event"], "challenge");

    send(&mut client, "challenge", json!(token)).await;
    let authorized = receive(&mut client).await.unwrap();
    assert_eq!(authorized["event"], "authorized");

    send(&mut client, "session:whoami", Value::Null).await;
    let whoami = receive(&mut client).await.unwrap();
    assert_eq!(whoami["event"], "session:whoami:ack");
    assert_eq!(whoami["data"], serde_json::to_value(&udo).unwrap());
}

#[tokio::test]
async fn should_reject_an_unknown_token_and_close() {
    let app = TestApp::new().await;
    let mut client = connect(&app).await;

    receive(&mut client).await.unwrap();
    send(&mut client, "challenge", json!("not-a-session")).await;

    let rejected = receive(&mut client).await.unwrap();
    assert_eq!(rejected["event"], "unauthorized");
    assert_eq!(rejected["data"]["error"], "unknown-token");
    assert!(receive(&mut client).await.is_none());
}

#[tokio::test]
async fn should_reject_a_non_string_reply() {
    let app = TestApp::new().await;
    let mut client = connect(&app).await;

    receive(&mut client).await.unwrap();
    send(&mut client, "challenge", json!({ "token": "abc" })).await;

    let rejected = receive(&mut client).await.unwrap();
    assert_eq!(rejected["event"], "unauthorized");
    assert_eq!(rejected["data"]["error"], "malformed-response");
}

#[tokio::test]
async fn should_time_out_a_silent_client() {
    let app = TestApp::new().await;
    let mut client = connect(&app).await;

    receive(&mut client).await.unwrap();

    let rejected = receive(&mut client).await.unwrap();
    assert_eq!(rejected["event"], "unauthorized");
    assert_eq!(rejected["data"]["error"], "timeout");
    assert!(receive(&mut client).await.is_none());
}

#[tokio::test]
async fn should_not_dispatch_messages_before_the_challenge_is_answered() {
    let app = TestApp::new().await;
    let (_, token) = app.logged_in_user().await;
    let mut client = connect(&app).await;

    receive(&mut client).await.unwrap();
    send(&mut client, "session:whoami", Value::Null).await;
    send(&mut client, "challenge", json!(token)).await;

    let next = receive(&mut client).await.unwrap();
    assert_eq!(next["event"], "authorized");
}
