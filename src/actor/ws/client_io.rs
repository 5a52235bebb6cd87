use std::net::TcpStream;
use std::time::Duration;

use tungstenite::protocol::Message;

use super::Clients;
use crate::reload::message::ReloadMessage;

/// Finish the handshake and register the client.
pub(super) fn add_client(clients: &Clients, stream: TcpStream) {
    // Blocking during the handshake, non-blocking for the reader loop.
    match tungstenite::accept(stream) {
        Ok(mut ws) => {
            let _ = ws.get_ref().set_nonblocking(true);

            let hello = Message::Text(ReloadMessage::connected().to_json().into());
            if let Err(e) = ws.send(hello) {
                crate::log!("ws"; "failed to send connected message: {}", e);
                return;
            }

            let mut clients = clients.lock();
            clients.push(ws);
            crate::debug!("ws"; "client connected (total: {})", clients.len());
        }
        Err(e) => crate::log!("ws"; "handshake failed: {}", e),
    }
}

/// Drain incoming frames so pings are answered and closed sockets are
/// noticed between broadcasts.
pub(super) fn client_reader_loop(clients: &Clients) {
    loop {
        std::thread::sleep(Duration::from_millis(100));
        if crate::core::is_shutdown() {
            break;
        }

        clients.lock().retain_mut(|ws| match ws.read() {
            Ok(Message::Close(_)) => false,
            Ok(_) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                true
            }
            Err(_) => false,
        });
    }
}
