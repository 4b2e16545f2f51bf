use crate::models::InventoryEvent;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, Sender};
use tokio_stream::wrappers::BroadcastStream;

pub struct NotificationHub {
    sender: Sender<InventoryEvent>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    pub fn sender(&self) -> Sender<InventoryEvent> {
        self.sender.clone()
    }

    /// Streams every event as a JSON text frame until either side hangs up.
    pub async fn handle_socket(socket: WebSocket, sender: Sender<InventoryEvent>) {
        let (mut sender_ws, mut receiver) = socket.split();
        let mut receiver_stream = BroadcastStream::new(sender.subscribe());

        let mut send_task = tokio::spawn(async move {
            while let Some(next) = receiver_stream.next().await {
                let event = match next {
                    Ok(event) => event,
                    Err(lagged) => {
                        tracing::warn!(error = %lagged, "websocket subscriber fell behind");
                        continue;
                    }
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    if sender_ws.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
            }
        });

        let mut recv_task = tokio::spawn(async move {
            while let Some(Ok(message)) = receiver.next().await {
                if let Message::Close(_) = message {
                    break;
                }
            }
        });

        tokio::select! {
            _ = &mut send_task => recv_task.abort(),
            _ = &mut recv_task => send_task.abort(),
        }
        tracing::debug!("websocket subscriber disconnected");
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
