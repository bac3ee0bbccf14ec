use std::time::Duration;

use super::*;
use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::{net::TcpListener, time::timeout};

use crate::{FrameSink, GameController};
use shared::domain::Roster;

#[derive(Clone)]
struct ServerState {
    received: mpsc::UnboundedSender<String>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| game_session(state, socket))
}

/// Sends an intro, then answers every second frame the way the game server does.
async fn game_session(state: ServerState, mut socket: WebSocket) {
    use axum::extract::ws::Message;

    let intro = serde_json::json!({
        "type": "intro",
        "message": "Algo terrible ha ocurrido en el circo...",
        "characters": {"characters": {"Jack Domador": {}}},
        "killer": "Jack Domador",
    });
    if socket.send(Message::Text(intro.to_string())).await.is_err() {
        return;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        let Message::Text(text) = msg else { continue };
        let _ = state.received.send(text.clone());
        if text == "close" {
            let _ = socket.send(Message::Close(None)).await;
            break;
        }
        if !text.starts_with("interrogar ") {
            let answer = serde_json::json!({"type": "answer", "message": format!("re: {text}")});
            if socket.send(Message::Text(answer.to_string())).await.is_err() {
                break;
            }
        }
    }
}

async fn spawn_game_server() -> (String, mpsc::UnboundedReceiver<String>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route(GAME_WS_PATH, get(ws_handler))
        .with_state(ServerState { received: tx });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

async fn next_event(conn: &mut Connection) -> TransportEvent {
    timeout(Duration::from_secs(5), conn.next_event())
        .await
        .expect("event in time")
        .expect("event")
}

#[test]
fn http_base_maps_to_game_websocket() {
    let url = game_ws_url("http://localhost:8080").expect("url");
    assert_eq!(url.as_str(), "ws://localhost:8080/ws/game");

    let url = game_ws_url("https://example.com/circus/").expect("url");
    assert_eq!(url.as_str(), "wss://example.com/circus/ws/game");

    let url = game_ws_url("ws://127.0.0.1:9000/ws/game").expect("url");
    assert_eq!(url.as_str(), "ws://127.0.0.1:9000/ws/game");
}

#[test]
fn unsupported_scheme_is_rejected() {
    assert!(matches!(
        game_ws_url("ftp://example.com"),
        Err(TransportError::InvalidUrl { .. })
    ));
    assert!(matches!(
        game_ws_url("not a url"),
        Err(TransportError::InvalidUrl { .. })
    ));
}

#[tokio::test]
async fn question_round_trip_through_controller() {
    let (server_url, mut received) = spawn_game_server().await;
    let mut conn = connect(&server_url).await.expect("connect");
    assert_eq!(conn.url.scheme(), "ws");
    assert_eq!(conn.url.path(), GAME_WS_PATH);
    let mut game = GameController::new(Roster::circus(), conn.sender());
    game.start_game();

    let TransportEvent::Frame(intro) = next_event(&mut conn).await else {
        panic!("expected intro frame");
    };
    game.handle_frame(&intro).expect("intro");
    assert_eq!(
        game.case_facts().and_then(|c| c.killer.as_deref()),
        Some("Jack Domador")
    );

    assert!(game.send_question("¿Dónde estaba anoche?").expect("send"));
    let route = timeout(Duration::from_secs(5), received.recv())
        .await
        .expect("in time")
        .expect("route");
    let question = timeout(Duration::from_secs(5), received.recv())
        .await
        .expect("in time")
        .expect("question");
    assert_eq!(route, "interrogar Jack Domador");
    assert_eq!(question, "¿Dónde estaba anoche?");

    let TransportEvent::Frame(answer) = next_event(&mut conn).await else {
        panic!("expected answer frame");
    };
    game.handle_frame(&answer).expect("answer");
    assert_eq!(
        game.transcript().last().map(|m| m.text.as_str()),
        Some("re: ¿Dónde estaba anoche?")
    );
}

#[tokio::test]
async fn server_close_is_reported_and_later_sends_fail() {
    let (server_url, _received) = spawn_game_server().await;
    let mut conn = connect(&server_url).await.expect("connect");
    let sink = conn.sender();

    assert!(matches!(next_event(&mut conn).await, TransportEvent::Frame(_)));
    sink.send_frame(ClientFrame::Question {
        text: "close".into(),
    })
    .expect("send close request");

    assert_eq!(next_event(&mut conn).await, TransportEvent::Closed);

    let mut closed = false;
    for _ in 0..50 {
        if sink
            .send_frame(ClientFrame::Question { text: "late".into() })
            .is_err()
        {
            closed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(closed, "sink should report closed after the socket ends");
}

#[tokio::test]
async fn connect_to_missing_server_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let result = connect(&format!("http://{addr}")).await;
    assert!(matches!(result, Err(TransportError::Connect { .. })));
}
