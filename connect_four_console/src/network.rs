// Improvement potential: Switch to async-tungstenite if the client ever needs to watch more than
//   one socket.

use std::fmt;
use std::io;
use std::net::TcpStream;

use connect_four_client::event::ClientEvent;
use tungstenite::protocol::frame::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::{Message, WebSocket, protocol};


#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    // Either side closed the connection; no more messages will arrive.
    ConnectionClosed,
    Protocol(String),
}

impl fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunicationError::Socket(err) => write!(f, "Socket error: {err}"),
            CommunicationError::ConnectionClosed => write!(f, "Connection closed"),
            CommunicationError::Protocol(message) => write!(f, "Protocol error: {message}"),
        }
    }
}

impl std::error::Error for CommunicationError {}

impl From<tungstenite::Error> for CommunicationError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                CommunicationError::ConnectionClosed
            }
            err => CommunicationError::Socket(err),
        }
    }
}

pub fn write_event<S>(
    socket: &mut WebSocket<S>, event: &ClientEvent,
) -> Result<(), CommunicationError>
where
    S: io::Read + io::Write,
{
    socket.send(Message::Text(event.to_json().into()))?;
    Ok(())
}

// Returns the next text message. Control frames are handled by tungstenite and skipped here.
// Decoding is left to the caller so that a malformed message is a protocol error, not a
// transport one.
pub fn read_text<S>(socket: &mut WebSocket<S>) -> Result<String, CommunicationError>
where
    S: io::Read + io::Write,
{
    loop {
        match socket.read()? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Close(_) => return Err(CommunicationError::ConnectionClosed),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            msg @ Message::Binary(_) => {
                return Err(CommunicationError::Protocol(format!("Expected text, got {:?}", msg)));
            }
        }
    }
}

pub fn close<S>(socket: &mut WebSocket<S>, code: u16) -> Result<(), CommunicationError>
where
    S: io::Read + io::Write,
{
    let frame = CloseFrame {
        code: CloseCode::from(code),
        reason: String::new().into(),
    };
    match socket.close(Some(frame)) {
        Ok(()) => {}
        Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            return Ok(());
        }
        Err(err) => return Err(CommunicationError::Socket(err)),
    }
    // Push the close frame out; the reply is picked up by the reading side.
    match socket.flush() {
        Ok(()) | Err(tungstenite::Error::ConnectionClosed) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

// Improvement potential: Instead of cloning the socket, consider calling
//   TcpStream.set_nonblocking on the underlying stream and doing read/writes in the same thread.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: protocol::Role,
) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = socket.get_config().clone();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}


#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    // Serves one connection: pushes `greeting`, then echoes back every text message it gets
    // until the client closes the connection.
    fn spawn_echo_server(greeting: &'static str) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut socket = tungstenite::accept(stream).unwrap();
            socket.send(Message::Text(greeting.to_owned().into())).unwrap();
            let mut received = vec![];
            loop {
                match socket.read() {
                    Ok(Message::Text(text)) => {
                        received.push(text.as_str().to_owned());
                        socket.send(Message::Text(text)).unwrap();
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
            received
        });
        (format!("ws://{addr}/"), handle)
    }

    fn connect(url: &str) -> WebSocket<TcpStream> {
        let addr = url.trim_start_matches("ws://").trim_end_matches('/');
        let stream = TcpStream::connect(addr).unwrap();
        tungstenite::client(url, stream).unwrap().0
    }

    #[test]
    fn exchange_events() {
        let (url, server) = spawn_echo_server(r#"{"type":"init","join":"abc123"}"#);
        let mut socket = connect(&url);
        assert_eq!(read_text(&mut socket).unwrap(), r#"{"type":"init","join":"abc123"}"#);

        write_event(&mut socket, &ClientEvent::Play { column: 2 }).unwrap();
        assert_eq!(read_text(&mut socket).unwrap(), r#"{"type":"play","column":2}"#);

        close(&mut socket, 1000).unwrap();
        assert!(matches!(read_text(&mut socket), Err(CommunicationError::ConnectionClosed)));
        assert_eq!(server.join().unwrap(), vec![r#"{"type":"play","column":2}"#]);
    }

    #[test]
    fn cloned_socket_writes_on_the_same_connection() {
        let (url, server) = spawn_echo_server(r#"{"type":"player joined"}"#);
        let mut socket_in = connect(&url);
        let mut socket_out = clone_websocket(&socket_in, protocol::Role::Client).unwrap();
        assert_eq!(read_text(&mut socket_in).unwrap(), r#"{"type":"player joined"}"#);

        write_event(&mut socket_out, &ClientEvent::Init { join: None }).unwrap();
        assert_eq!(read_text(&mut socket_in).unwrap(), r#"{"type":"init"}"#);

        close(&mut socket_out, 1000).unwrap();
        assert_eq!(server.join().unwrap(), vec![r#"{"type":"init"}"#]);
    }
}
