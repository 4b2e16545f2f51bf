use crate::api::AppState;
use crate::notifications::NotificationHub;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;

/// Upgrades to a websocket that streams inventory events as JSON.
pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let sender = state.service.notifications();
    ws.on_upgrade(move |socket| NotificationHub::handle_socket(socket, sender))
}
