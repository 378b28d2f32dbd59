use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{
    error::ErrorEvent,
    protocol::{ClientPacket, ServerPacket},
};
use tokio::{net::TcpListener, sync::mpsc};
use translator::Action;

use crate::dispatch::ActionDispatcher;

pub const CHANNEL: i64 = 42;
pub const STREAM_KEY: &str = "robot-key";
pub const USERNAME: &str = "robot";
pub const PASSWORD: &str = "hunter2";

#[derive(Clone)]
pub struct StreamScript {
    pub frames: Vec<String>,
    pub expected_updates: usize,
    pub acknowledge: bool,
}

impl StreamScript {
    pub fn frames(frames: Vec<String>, expected_updates: usize) -> Self {
        Self {
            frames,
            expected_updates,
            acknowledge: true,
        }
    }
}

pub struct StreamServer {
    pub base_url: String,
    pub received: mpsc::UnboundedReceiver<ClientPacket>,
}

impl StreamServer {
    pub fn stream_address(&self) -> String {
        format!("{}/robot", self.base_url)
    }
}

#[derive(Clone)]
struct ServerState {
    script: StreamScript,
    received: mpsc::UnboundedSender<ClientPacket>,
    base_url: String,
}

pub fn encode(packet: &ServerPacket) -> String {
    serde_json::to_string(packet).expect("encode packet")
}

pub async fn spawn_stream_server(script: StreamScript) -> StreamServer {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{addr}");
    let (tx, rx) = mpsc::unbounded_channel();
    let state = ServerState {
        script,
        received: tx,
        base_url: base_url.clone(),
    };
    let app = Router::new()
        .route("/users/login", post(login))
        .route("/tetris/:channel/robot", get(robot_credentials))
        .route("/robot", get(robot_ws))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    StreamServer {
        base_url,
        received: rx,
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Result<Json<Value>, StatusCode> {
    if form.username != USERNAME || form.password != PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "id": 7,
        "username": form.username,
        "channel": { "id": CHANNEL },
    })))
}

async fn robot_credentials(
    State(state): State<ServerState>,
    Path(channel): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    if channel != CHANNEL {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "address": format!("{}/robot", state.base_url),
        "key": STREAM_KEY,
    })))
}

async fn robot_ws(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_robot(socket, state))
}

async fn serve_robot(mut socket: WebSocket, state: ServerState) {
    let Some(Ok(Message::Text(text))) = socket.recv().await else {
        return;
    };
    let Ok(ClientPacket::Handshake(handshake)) = serde_json::from_str::<ClientPacket>(&text) else {
        return;
    };
    let _ = state
        .received
        .send(ClientPacket::Handshake(handshake.clone()));

    if handshake.key != STREAM_KEY {
        let rejected = ServerPacket::Error(ErrorEvent::new("bad stream key"));
        let _ = socket.send(Message::Text(encode(&rejected))).await;
        let _ = socket.send(Message::Close(None)).await;
        return;
    }
    if state.script.acknowledge
        && socket
            .send(Message::Text(encode(&ServerPacket::HandshakeAck)))
            .await
            .is_err()
    {
        return;
    }

    for frame in state.script.frames {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }

    let mut updates = 0;
    while updates < state.script.expected_updates {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                if let Ok(packet) = serde_json::from_str::<ClientPacket>(&text) {
                    updates += 1;
                    let _ = state.received.send(packet);
                }
            }
            Some(Ok(_)) => {}
            _ => return,
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub pressed: Arc<Mutex<Vec<String>>>,
}

impl RecordingDispatcher {
    pub fn pressed(&self) -> Vec<String> {
        self.pressed.lock().expect("pressed lock").clone()
    }
}

#[async_trait]
impl ActionDispatcher for RecordingDispatcher {
    async fn perform_action(&self, action: &Action) -> Result<()> {
        self.pressed
            .lock()
            .expect("pressed lock")
            .push(action.to_string());
        Ok(())
    }
}
