use std::collections::VecDeque;
use std::sync::mpsc;

use crate::config::{ClientConfig, InitAckPolicy};
use crate::error::ProtocolError;
use crate::event::{ClientEvent, ServerEvent};
use crate::session::{PlayerRole, SessionParams};


// Websocket close code for a normal closure (RFC 6455, section 7.4.1).
pub const NORMAL_CLOSURE: u16 = 1000;

// Things the front-end has to do in response to server events. The client never touches the UI
// itself; front-ends drain these with `next_notable_event` after every incoming message.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    // Put the link into the join-link field.
    ShowJoinLink(String),
    // User-visible, non-blocking message.
    ShowNotice(String),
    PlacePiece { player: String, column: u32, row: u32 },
    // Both players are here: the join link is no longer needed.
    HideJoinLink,
    CloseConnection(u16),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
}

pub struct ClientState {
    config: ClientConfig,
    session: SessionParams,
    events_tx: mpsc::Sender<ClientEvent>,
    notable_event_queue: VecDeque<NotableEvent>,
    connection_status: ConnectionStatus,
    init_sent: bool,
    join_link: Option<String>,
}

impl ClientState {
    pub fn new(
        config: ClientConfig, session: SessionParams, events_tx: mpsc::Sender<ClientEvent>,
    ) -> Self {
        ClientState {
            config,
            session,
            events_tx,
            notable_event_queue: VecDeque::new(),
            connection_status: ConnectionStatus::Connecting,
            init_sent: false,
            join_link: None,
        }
    }

    pub fn config(&self) -> &ClientConfig { &self.config }
    pub fn session(&self) -> &SessionParams { &self.session }
    pub fn role(&self) -> PlayerRole { self.session.role() }
    pub fn connection_status(&self) -> ConnectionStatus { self.connection_status }
    pub fn join_link(&self) -> Option<&str> { self.join_link.as_deref() }

    // Sends the "init" event. Must be called when the connection opens; repeated calls are
    // ignored so that at most one "init" goes out per connection.
    pub fn on_connection_open(&mut self) {
        if self.init_sent {
            log::warn!("Connection reported open twice; not sending another \"init\"");
            return;
        }
        self.connection_status = ConnectionStatus::Open;
        self.init_sent = true;
        let join = self.session.join().map(str::to_owned);
        match &join {
            Some(join_id) => log::info!("Joining game {join_id}"),
            None => log::info!("Creating a new game"),
        }
        self.send(ClientEvent::Init { join });
    }

    // The connection went away for a reason other than a "win" event.
    pub fn on_connection_closed(&mut self) {
        if self.connection_status != ConnectionStatus::Closed {
            log::info!("Connection closed");
        }
        self.connection_status = ConnectionStatus::Closed;
    }

    // Sends a move. Bounds and turn order are the server's business, errors come back as
    // "error" events.
    pub fn play(&mut self, column: u32) {
        if self.connection_status == ConnectionStatus::Closed {
            log::warn!("Dropping move in column {column}: connection closed");
            return;
        }
        self.send(ClientEvent::Play { column });
    }

    // Same as `play`, but takes the raw column attribute of whatever the user clicked on. Clicks
    // outside of a column (no attribute) and garbage values are ignored.
    pub fn play_column_attribute(&mut self, attribute: Option<&str>) {
        let Some(attribute) = attribute else {
            return;
        };
        match attribute.trim().parse::<u32>() {
            Ok(column) => self.play(column),
            Err(_) => log::warn!("Ignoring click on a column with invalid index {attribute:?}"),
        }
    }

    pub fn process_server_message(&mut self, message: &str) -> Result<(), ProtocolError> {
        if self.connection_status == ConnectionStatus::Closed {
            log::debug!("Ignoring message after connection close: {message}");
            return Ok(());
        }
        let event = ServerEvent::from_json(message)?;
        self.process_server_event(event)
    }

    pub fn process_server_event(&mut self, event: ServerEvent) -> Result<(), ProtocolError> {
        if self.connection_status == ConnectionStatus::Closed {
            log::debug!("Ignoring {:?} after connection close", event.kind());
            return Ok(());
        }
        match event {
            ServerEvent::Init { join } => self.process_init(join),
            ServerEvent::Play { player, column, row } => {
                self.notable_event_queue.push_back(NotableEvent::PlacePiece {
                    player,
                    column,
                    row,
                });
                Ok(())
            }
            ServerEvent::Win { player } => {
                log::info!("Game over, player {player} won");
                self.notable_event_queue
                    .push_back(NotableEvent::ShowNotice(format!("Player {player} wins!")));
                // No further messages are expected.
                self.notable_event_queue.push_back(NotableEvent::CloseConnection(NORMAL_CLOSURE));
                self.connection_status = ConnectionStatus::Closed;
                Ok(())
            }
            ServerEvent::Error { message } => {
                log::info!("Server error: {message}");
                self.notable_event_queue.push_back(NotableEvent::ShowNotice(message));
                Ok(())
            }
            ServerEvent::PlayerJoined => {
                self.notable_event_queue.push_back(NotableEvent::HideJoinLink);
                Ok(())
            }
        }
    }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> {
        self.notable_event_queue.pop_front()
    }

    fn process_init(&mut self, join: Option<String>) -> Result<(), ProtocolError> {
        match (self.role(), self.config.init_ack_policy) {
            (PlayerRole::Joiner, InitAckPolicy::Ignore) => {
                log::info!("Joined game {}", self.session.join().unwrap_or_default());
                Ok(())
            }
            (PlayerRole::Joiner, InitAckPolicy::ShowJoinLink) => match join {
                Some(join_id) => {
                    self.show_join_link(&join_id);
                    Ok(())
                }
                None => {
                    log::info!("Joined game {}", self.session.join().unwrap_or_default());
                    Ok(())
                }
            },
            (PlayerRole::Creator, _) => {
                let join_id = join.ok_or(ProtocolError::MissingJoinId)?;
                self.show_join_link(&join_id);
                Ok(())
            }
        }
    }

    fn show_join_link(&mut self, join_id: &str) {
        let link = self.config.join_link(join_id);
        log::info!("Join link: {link}");
        self.join_link = Some(link.clone());
        self.notable_event_queue.push_back(NotableEvent::ShowJoinLink(link.clone()));
        self.notable_event_queue
            .push_back(NotableEvent::ShowNotice(format!("Send this link to Player2: {link}")));
    }

    fn send(&mut self, event: ClientEvent) {
        // The receiver lives in the front-end next to the socket. If it is gone, so is the
        // connection, and there is nobody to tell.
        if self.events_tx.send(event).is_err() {
            log::warn!("Outgoing event channel disconnected");
            self.connection_status = ConnectionStatus::Closed;
        }
    }
}
