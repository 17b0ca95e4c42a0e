// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::sync::mpsc;

use connect_four_client::client::{ClientState, NotableEvent};
use connect_four_client::config::ClientConfig;
use connect_four_client::error::ProtocolError;
use connect_four_client::event::ClientEvent;
use connect_four_client::session::SessionParams;


// A client with the socket replaced by the two ends of its queues: what would have been sent,
// and what the UI would have been asked to do.
pub struct TestClient {
    pub state: ClientState,
    outgoing_rx: mpsc::Receiver<ClientEvent>,
}

impl TestClient {
    #[allow(dead_code)]
    pub fn new(query: &str) -> Self { Self::with_config(ClientConfig::default(), query) }

    #[allow(dead_code)]
    pub fn with_config(config: ClientConfig, query: &str) -> Self {
        let (outgoing_tx, outgoing_rx) = mpsc::channel();
        let state = ClientState::new(config, SessionParams::from_query(query), outgoing_tx);
        TestClient { state, outgoing_rx }
    }

    // Creates a client and opens the connection, discarding the "init" event.
    #[allow(dead_code)]
    pub fn connected(query: &str) -> Self {
        let mut client = Self::new(query);
        client.state.on_connection_open();
        client.outgoing();
        client
    }

    #[allow(dead_code)]
    pub fn click(&mut self, column_attribute: Option<&str>) {
        self.state.play_column_attribute(column_attribute);
    }

    #[allow(dead_code)]
    pub fn receive(&mut self, message: &str) -> Result<Vec<NotableEvent>, ProtocolError> {
        self.state.process_server_message(message)?;
        Ok(self.notable_events())
    }

    // Outgoing events serialized the way they would go over the wire.
    #[allow(dead_code)]
    pub fn outgoing(&mut self) -> Vec<String> {
        self.outgoing_rx.try_iter().map(|event| event.to_json()).collect()
    }

    #[allow(dead_code)]
    pub fn notable_events(&mut self) -> Vec<NotableEvent> {
        std::iter::from_fn(|| self.state.next_notable_event()).collect()
    }
}
