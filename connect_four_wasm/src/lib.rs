// Browser front-end. The page loads the wasm module and calls `run_client` once the DOM is ready;
// from then on everything is driven by the websocket and click listeners registered there.
//
// Improvement potential: Reconnect (with the same join ID) when the connection drops mid-game.

#![cfg_attr(feature = "strict", deny(warnings))]

pub mod web_document;
pub mod web_element_ext;
pub mod web_error_handling;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use connect_four_client::client::{ClientState, NotableEvent};
use connect_four_client::config::ClientConfig;
use connect_four_client::event::ClientEvent;
use connect_four_client::session::SessionParams;
use wasm_bindgen::prelude::*;

use crate::web_document::{WebDocument, web_document, web_window};
use crate::web_element_ext::{WebElementExt, WebEventTargetExt, column_attribute};
use crate::web_error_handling::JsResult;


// Board rendering lives in JS and is exposed by the page as globals.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = createBoard)]
    fn create_board(board: &web_sys::Element) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_name = playMove)]
    fn play_move(
        board: &web_sys::Element, player: &str, column: u32, row: u32,
    ) -> Result<(), JsValue>;
}

// DOM handles the client works with. Looked up once at startup.
#[derive(Clone)]
pub struct WebUi {
    pub board: web_sys::Element,
    pub join_link: web_sys::HtmlInputElement,
}

impl WebUi {
    pub fn from_document(document: &WebDocument) -> JsResult<Self> {
        Ok(WebUi {
            board: document.query_selector_existing(".board")?,
            join_link: document.query_selector_existing_input(".join")?,
        })
    }
}

// Defer the alert, so that the board update that came with the same message gets painted first.
fn show_notice(message: String, delay: Duration) -> JsResult<()> {
    let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let callback = Closure::once_into_js(move || {
        if let Ok(window) = web_window() {
            window.alert_with_message(&message).ok();
        }
    });
    web_window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)?;
    Ok(())
}

pub fn copy_join_link(
    join_link: &web_sys::HtmlInputElement, notice_delay: Duration,
) -> JsResult<()> {
    let value = join_link.value();
    // Best effort: the returned promise is dropped, a failed copy goes unnoticed.
    let _ = web_window()?.navigator().clipboard().write_text(&value);
    show_notice(format!("Copied the text: {value}"), notice_delay)
}

pub struct WebClient {
    state: ClientState,
    server_rx: mpsc::Receiver<ClientEvent>,
    socket: web_sys::WebSocket,
    ui: WebUi,
}

impl WebClient {
    pub fn new(
        config: ClientConfig, session: SessionParams, socket: web_sys::WebSocket, ui: WebUi,
    ) -> Self {
        let (server_tx, server_rx) = mpsc::channel();
        WebClient {
            state: ClientState::new(config, session, server_tx),
            server_rx,
            socket,
            ui,
        }
    }

    pub fn state(&self) -> &ClientState { &self.state }

    fn on_open(&mut self) -> JsResult<()> {
        self.state.on_connection_open();
        self.flush_outgoing()
    }

    fn on_close(&mut self) { self.state.on_connection_closed(); }

    fn on_message(&mut self, event: web_sys::MessageEvent) -> JsResult<()> {
        let data = event.data();
        let Some(message) = data.as_string() else {
            return Err(rust_error!("Expected a text message, got {:?}", data));
        };
        self.process_message(&message)
    }

    // Applies one server message to the state and the page.
    pub fn process_message(&mut self, message: &str) -> JsResult<()> {
        self.state.process_server_message(message).map_err(|err| {
            log::error!("Cannot process {message:?}: {err}");
            rust_error!("{}", err)
        })?;
        self.apply_notable_events()
    }

    fn on_board_click(&mut self, event: web_sys::Event) -> JsResult<()> {
        let attribute = column_attribute(event.target());
        self.state.play_column_attribute(attribute.as_deref());
        self.flush_outgoing()
    }

    fn flush_outgoing(&mut self) -> JsResult<()> {
        while let Ok(event) = self.server_rx.try_recv() {
            self.socket.send_with_str(&event.to_json())?;
        }
        Ok(())
    }

    fn apply_notable_events(&mut self) -> JsResult<()> {
        let notice_delay = self.state.config().notice_delay;
        while let Some(event) = self.state.next_notable_event() {
            match event {
                NotableEvent::ShowJoinLink(link) => {
                    self.ui.join_link.set_value(&link);
                }
                NotableEvent::ShowNotice(message) => {
                    show_notice(message, notice_delay)?;
                }
                NotableEvent::PlacePiece { player, column, row } => {
                    play_move(&self.ui.board, &player, column, row)?;
                }
                NotableEvent::HideJoinLink => {
                    WebElementExt::set_hidden(self.ui.join_link.as_ref() as &web_sys::Element, true)?;
                }
                NotableEvent::CloseConnection(code) => {
                    self.socket.close_with_code(code)?;
                }
            }
        }
        Ok(())
    }
}

// Entry point. `config_json` is an optional JSON-serialized `ClientConfig`; missing fields take
// default values.
#[wasm_bindgen]
pub fn run_client(config_json: Option<String>) -> JsResult<()> {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed, e.g. when `run_client` is called again.
    let _ = console_log::init_with_level(log::Level::Info);

    let config: ClientConfig = match config_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|err| rust_error!("Invalid client config: {}", err))?,
        None => ClientConfig::default(),
    };
    let session = SessionParams::from_query(&web_window()?.location().search()?);
    let ui = WebUi::from_document(&web_document()?)?;
    create_board(&ui.board)?;

    let notice_delay = config.notice_delay;
    let socket = web_sys::WebSocket::new(&config.server_url)?;
    let client = Rc::new(RefCell::new(WebClient::new(config, session, socket.clone(), ui.clone())));

    {
        let client = Rc::clone(&client);
        socket.add_event_listener_and_forget("open", move |_: web_sys::Event| {
            client.borrow_mut().on_open()
        })?;
    }
    {
        let client = Rc::clone(&client);
        socket.add_event_listener_and_forget("message", move |event: web_sys::MessageEvent| {
            client.borrow_mut().on_message(event)
        })?;
    }
    {
        let client = Rc::clone(&client);
        socket.add_event_listener_and_forget("close", move |_: web_sys::Event| {
            client.borrow_mut().on_close();
            Ok(())
        })?;
    }
    {
        let client = Rc::clone(&client);
        ui.board.add_event_listener_and_forget("click", move |event: web_sys::Event| {
            client.borrow_mut().on_board_click(event)
        })?;
    }
    {
        let join_link = ui.join_link.clone();
        ui.join_link.add_event_listener_and_forget("click", move |_: web_sys::Event| {
            copy_join_link(&join_link, notice_delay)
        })?;
    }
    Ok(())
}
