use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::console;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

use empirio_core::codec::encode_client_packet;
use empirio_core::protocol::ClientPacket;

/// Path of the websocket endpoint on the page's origin.
pub const SOCKET_PATH: &str = "/socket";

/// What the socket reported, in arrival order.
#[derive(Debug, Clone)]
pub enum SocketEvent {
    Opened,
    Frame(String),
    Error(String),
    Closed,
}

#[allow(dead_code)]
struct WsHandlers {
    onopen: Closure<dyn FnMut(Event)>,
    onmessage: Closure<dyn FnMut(MessageEvent)>,
    onerror: Closure<dyn FnMut(ErrorEvent)>,
    onclose: Closure<dyn FnMut(CloseEvent)>,
}

/// One websocket for the lifetime of the application. Rooms come and go as
/// state overlays; lobby-game-lobby transitions never reopen the socket.
#[derive(Clone)]
pub struct Connection {
    ws: Rc<RefCell<Option<WebSocket>>>,
    handlers: Rc<RefCell<Option<WsHandlers>>>,
    closing: Rc<Cell<bool>>,
}

impl Connection {
    pub fn new() -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            handlers: Rc::new(RefCell::new(None)),
            closing: Rc::new(Cell::new(false)),
        }
    }

    pub fn connect(&mut self, url: &str, on_event: Rc<dyn Fn(SocketEvent)>) {
        self.disconnect();
        let closing = Rc::new(Cell::new(false));
        self.closing = closing.clone();

        let url = url.trim();
        if url.is_empty() {
            return;
        }

        let ws = match WebSocket::new(url) {
            Ok(ws) => ws,
            Err(_) => {
                console::warn!("failed to open websocket", url);
                on_event(SocketEvent::Error("failed to open websocket".to_string()));
                return;
            }
        };
        *self.ws.borrow_mut() = Some(ws.clone());

        let onopen = {
            let on_event = on_event.clone();
            let url = url.to_string();
            Closure::wrap(Box::new(move |_event: Event| {
                console::log!("websocket connected", url.clone());
                on_event(SocketEvent::Opened);
            }) as Box<dyn FnMut(Event)>)
        };
        let onmessage = {
            let on_event = on_event.clone();
            Closure::wrap(Box::new(move |event: MessageEvent| {
                let Some(text) = event.data().as_string() else {
                    return;
                };
                on_event(SocketEvent::Frame(text));
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        let onerror = {
            let on_event = on_event.clone();
            let url = url.to_string();
            Closure::wrap(Box::new(move |_event: ErrorEvent| {
                console::warn!("websocket error", url.clone());
                on_event(SocketEvent::Error("websocket error".to_string()));
            }) as Box<dyn FnMut(ErrorEvent)>)
        };
        let onclose = {
            let ws_ref = self.ws.clone();
            let handlers_ref = self.handlers.clone();
            let url = url.to_string();
            let closing = closing.clone();
            Closure::wrap(Box::new(move |event: CloseEvent| {
                ws_ref.borrow_mut().take();
                handlers_ref.borrow_mut().take();
                if closing.get() {
                    return;
                }
                let reason = event.reason();
                if reason.is_empty() {
                    console::log!("websocket closed", url.clone(), event.code());
                } else {
                    console::log!("websocket closed", url.clone(), event.code(), reason);
                }
                on_event(SocketEvent::Closed);
            }) as Box<dyn FnMut(CloseEvent)>)
        };

        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        *self.handlers.borrow_mut() = Some(WsHandlers {
            onopen,
            onmessage,
            onerror,
            onclose,
        });
    }

    /// Fire-and-forget: there is no request/response correlation in this
    /// protocol, and nothing to retry if the socket is not open.
    pub fn send(&self, packet: &ClientPacket) {
        let ws = {
            let ws_guard = self.ws.borrow();
            let Some(ws) = ws_guard.as_ref() else {
                return;
            };
            ws.clone()
        };
        if ws.ready_state() != WebSocket::OPEN {
            return;
        }
        if let Some(json) = encode_client_packet(packet) {
            let _ = ws.send_with_str(&json);
        }
    }

    pub fn disconnect(&mut self) {
        self.closing.set(true);
        self.handlers.borrow_mut().take();
        if let Some(ws) = self.ws.borrow_mut().take() {
            let _ = ws.close();
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

/// Websocket URL for the page's origin, `ws:` or `wss:` to match the page
/// protocol. A compile-time override wins for local development against a
/// remote backend.
pub fn default_socket_url() -> Option<String> {
    if let Some(raw) = option_env!("EMPIRIO_WS_URL") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    let window = web_sys::window()?;
    let location = window.location();
    let host = location.host().ok()?;
    if host.trim().is_empty() {
        return None;
    }
    let protocol = location.protocol().ok()?.to_ascii_lowercase();
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    Some(format!("{scheme}://{host}{SOCKET_PATH}"))
}
