//! WebSocket Actor
//!
//! Owns every live reload client and broadcasts build-tree changes to them.
//!
//! ```text
//! FsActor(build) --[Reload/Css]--> WsActor --[broadcast]--> Clients
//! ```

mod client_io;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::reload::message::ReloadMessage;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    clients: Clients,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        std::thread::spawn(move || client_io::client_reader_loop(&clients_for_reader));

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Reload { reason } => {
                    crate::log!("reload"; "{}", reason);
                    self.broadcast(&ReloadMessage::reload(reason));
                }
                WsMsg::Css { paths } => {
                    crate::log!("reload"; "css {}", paths.join(", "));
                    self.broadcast(&ReloadMessage::css(paths));
                }
                WsMsg::AddClient(stream) => client_io::add_client(&self.clients, stream),
                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    for mut ws in self.clients.lock().drain(..) {
                        let _ = ws.close(None);
                    }
                    break;
                }
            }
        }
    }

    /// Send `msg` to every client, dropping the ones that went away.
    fn broadcast(&self, msg: &ReloadMessage) {
        let text = Message::Text(msg.to_json().into());
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        clients.retain_mut(|ws| match ws.send(text.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("ws"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", clients.len());
    }
}
