use std::fmt;
use std::io;
use std::net::TcpStream;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use connect_four_client::client::{ClientState, ConnectionStatus, NORMAL_CLOSURE, NotableEvent};
use connect_four_client::config::ClientConfig;
use connect_four_client::event::ClientEvent;
use connect_four_client::session::SessionParams;
use crossterm::event::{self as term_event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, style, terminal};
use scopeguard::defer;
use tungstenite::protocol;
use url::Url;

use crate::network::{self, CommunicationError};
use crate::tui::{self, ConsoleView};


enum IncomingEvent {
    Network(Result<String, CommunicationError>),
    Terminal(term_event::Event),
}

enum OutgoingCommand {
    Send(ClientEvent),
    Close(u16),
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1), cursor::Hide)?;
    }
    Ok(())
}

fn render(stdout: &mut io::Stdout, view: &ConsoleView) -> io::Result<()> {
    execute!(stdout, cursor::MoveTo(0, 0), terminal::Clear(terminal::ClearType::All))?;
    writeln_raw(stdout, tui::render_view(view))
}

fn connect(server_url: &str) -> anyhow::Result<tungstenite::WebSocket<TcpStream>> {
    let url = Url::parse(server_url).with_context(|| format!("Invalid server URL {server_url}"))?;
    let host = url.host_str().with_context(|| format!("No host in server URL {server_url}"))?;
    let port = url
        .port_or_known_default()
        .with_context(|| format!("No port in server URL {server_url}"))?;
    log::info!("Connecting to {host}:{port}...");
    let stream = TcpStream::connect((host, port))
        .with_context(|| format!("Cannot connect to {host}:{port}"))?;
    let (socket, _) = tungstenite::client(url.as_str(), stream)
        .map_err(|err| anyhow::anyhow!("Websocket handshake with {url} failed: {err}"))?;
    Ok(socket)
}

// Applies one UI effect to the terminal view.
fn apply_notable_event(
    event: NotableEvent, view: &mut ConsoleView, outgoing_tx: &mpsc::Sender<OutgoingCommand>,
) {
    match event {
        NotableEvent::ShowJoinLink(link) => {
            view.join_link = Some(link);
        }
        NotableEvent::ShowNotice(notice) => {
            // Terminal output does not block anything, so notices are shown right away.
            view.notice = Some(notice);
        }
        NotableEvent::PlacePiece { player, column, row } => {
            if let Err(err) = view.board.place(&player, column, row) {
                log::warn!("Cannot show piece of player {player}: {err}");
            }
        }
        NotableEvent::HideJoinLink => {
            view.join_link = None;
            view.status = "Both players are here.".to_owned();
        }
        NotableEvent::CloseConnection(code) => {
            outgoing_tx.send(OutgoingCommand::Close(code)).ok();
            view.status = "Game over. Press q to quit.".to_owned();
        }
    }
}

fn column_for_key(ch: char) -> Option<u32> {
    let digit = ch.to_digit(10)?;
    (1..=tui::NUM_COLUMNS).contains(&digit).then(|| digit - 1)
}

pub fn run(config: ClientConfig, session: SessionParams) -> anyhow::Result<()> {
    let mut socket_in = connect(&config.server_url)?;
    let mut socket_out = network::clone_websocket(&socket_in, protocol::Role::Client)
        .context("Cannot clone websocket")?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show).ok();
        terminal::disable_raw_mode().ok();
    };

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx;
    thread::spawn(move || {
        loop {
            let message = network::read_text(&mut socket_in);
            let done = message.is_err();
            if tx_net.send(IncomingEvent::Network(message)).is_err() || done {
                break;
            }
        }
    });
    thread::spawn(move || {
        while let Ok(ev) = term_event::read() {
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                break;
            }
        }
    });

    let (outgoing_tx, outgoing_rx) = mpsc::channel();
    let writer = thread::spawn(move || {
        for command in outgoing_rx {
            let result = match command {
                OutgoingCommand::Send(event) => network::write_event(&mut socket_out, &event),
                OutgoingCommand::Close(code) => network::close(&mut socket_out, code),
            };
            if let Err(err) = result {
                log::warn!("Cannot write to server: {err}");
                break;
            }
        }
    });

    let (server_tx, server_rx) = mpsc::channel();
    let mut client_state = ClientState::new(config, session, server_tx);
    let mut view = ConsoleView::new();
    client_state.on_connection_open();
    view.status = match client_state.session().join() {
        Some(join_id) => format!("Joining game {join_id}..."),
        None => "Creating a new game...".to_owned(),
    };

    loop {
        for event in server_rx.try_iter() {
            outgoing_tx.send(OutgoingCommand::Send(event)).ok();
        }
        render(&mut stdout, &view)?;

        let Ok(event) = rx.recv() else {
            break;
        };
        match event {
            IncomingEvent::Network(Ok(message)) => {
                // Protocol errors are fatal: client and server do not speak the same language.
                client_state
                    .process_server_message(&message)
                    .with_context(|| format!("Cannot process server message {message}"))?;
            }
            IncomingEvent::Network(Err(CommunicationError::ConnectionClosed)) => {
                if client_state.connection_status() != ConnectionStatus::Closed {
                    view.status = "Connection closed by server. Press q to quit.".to_owned();
                }
                client_state.on_connection_closed();
            }
            IncomingEvent::Network(Err(err)) => {
                client_state.on_connection_closed();
                view.status = format!("{err}. Press q to quit.");
            }
            IncomingEvent::Terminal(term_event::Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(ch) => {
                        if let Some(column) = column_for_key(ch) {
                            client_state.play(column);
                        }
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(_) => {
                // Resize and such: repaint only.
            }
        }
        while let Some(event) = client_state.next_notable_event() {
            apply_notable_event(event, &mut view, &outgoing_tx);
        }
    }

    if client_state.connection_status() != ConnectionStatus::Closed {
        outgoing_tx.send(OutgoingCommand::Close(NORMAL_CLOSURE)).ok();
    }
    drop(outgoing_tx);
    writer.join().ok();
    Ok(())
}
