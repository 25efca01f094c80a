use gloo::console;
use js_sys::Date;

use empirio_core::drag::{DragTracker, Release};
use empirio_core::protocol::{
    dispatch, ClientPacket, ConnectionHandler, ServerAttack, ServerError, ServerPlayerJoin,
    ServerPlayerLost, ServerStart, ServerTileChange,
};
use empirio_core::room::{PlayerProfile, Room};

use crate::connection::{Connection, SocketEvent};
use crate::hooks::UiHooks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lobby,
    Game,
}

fn now_ms() -> f64 {
    Date::now()
}

/// Top-level session state: which screen is up, the one persistent
/// connection, and the current room overlay if a game is running.
pub struct AppShell {
    connection: Connection,
    room: Option<Room>,
    screen: Screen,
    profile: Option<PlayerProfile>,
    drag: DragTracker,
    suppress_click: bool,
    hooks: UiHooks,
}

impl AppShell {
    pub fn new(connection: Connection, hooks: UiHooks) -> Self {
        (hooks.set_play_enabled)(false);
        (hooks.show_screen)(Screen::Lobby);
        Self {
            connection,
            room: None,
            screen: Screen::Lobby,
            profile: None,
            drag: DragTracker::new(),
            suppress_click: false,
            hooks,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// One entry point for everything the socket reports; frames go through
    /// the protocol dispatcher back into this shell.
    pub fn handle_socket_event(&mut self, event: SocketEvent) {
        match event {
            SocketEvent::Opened => self.on_open(),
            SocketEvent::Frame(text) => dispatch(self, &text),
            SocketEvent::Error(reason) => self.on_socket_error(&reason),
            SocketEvent::Closed => self.on_socket_closed(),
        }
    }

    /// The lobby collaborator collected a username, colour, and optional
    /// room number; ask the server for a game.
    pub fn play_clicked(&mut self, username: &str, colour: &str, room: Option<u32>) {
        (self.hooks.set_play_enabled)(false);
        self.profile = Some(PlayerProfile {
            name: username.to_string(),
            colour: colour.to_string(),
        });
        self.connection.send(&ClientPacket::Play {
            username: username.to_string(),
            colour: colour.to_string(),
            room,
        });
    }

    /// Drops the room overlay and returns to the lobby. The socket stays
    /// open and a new `play` can be sent right away.
    pub fn return_to_lobby(&mut self) {
        self.room = None;
        self.screen = Screen::Lobby;
        self.suppress_click = false;
        (self.hooks.show_screen)(Screen::Lobby);
        (self.hooks.set_play_enabled)(true);
    }

    /// Raw pointer-down from the input collaborator. Returns whether the
    /// event was consumed; outside the game screen everything passes
    /// through to the browser.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if self.screen != Screen::Game {
            return false;
        }
        self.suppress_click = false;
        self.drag.on_pointer_down(x, y);
        true
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if self.screen != Screen::Game {
            return false;
        }
        if let Some(delta) = self.drag.on_pointer_move(x, y) {
            if let Some(room) = self.room.as_mut() {
                room.pan(delta.dx, delta.dy);
                let (ox, oy) = room.field().view_offset();
                (self.hooks.view_offset_changed)(ox, oy);
            }
        }
        true
    }

    pub fn pointer_up(&mut self) -> bool {
        if self.screen != Screen::Game {
            return false;
        }
        if self.drag.on_pointer_up() == Release::Drag {
            self.suppress_click = true;
        }
        true
    }

    /// Tile click routed in by the render collaborator. A click ending a
    /// drag is swallowed once; a real click may turn into an outbound
    /// attack packet.
    pub fn tile_clicked(&mut self, x: u32, y: u32) {
        if self.screen != Screen::Game {
            return;
        }
        if self.suppress_click {
            self.suppress_click = false;
            return;
        }
        let Some(room) = self.room.as_mut() else {
            return;
        };
        if let Some(packet) = room.tile_clicked(x, y, now_ms()) {
            self.connection.send(&packet);
        }
    }

    /// Fixed-period tick from the timer collaborator.
    pub fn tick(&mut self) {
        let Some(room) = self.room.as_ref() else {
            return;
        };
        if let Some(power) = room.tick(now_ms()) {
            (self.hooks.set_power)(power);
        }
    }
}

impl ConnectionHandler for AppShell {
    fn on_open(&mut self) {
        (self.hooks.set_play_enabled)(true);
    }

    fn on_socket_closed(&mut self) {
        // Terminal for the session: no automatic reconnect.
        (self.hooks.set_play_enabled)(false);
        (self.hooks.show_error_popup)("Connection lost");
    }

    fn on_socket_error(&mut self, reason: &str) {
        // Covers transport errors and undecodable frames alike; the
        // session continues until the socket actually closes.
        console::warn!("socket error", reason.to_string());
    }

    fn on_error(&mut self, packet: ServerError) {
        let recoverable = packet.recoverable.unwrap_or(true);
        if self.screen == Screen::Game || !recoverable {
            (self.hooks.show_error_popup)(&packet.message);
        } else {
            (self.hooks.show_lobby_error)(&packet.message);
            (self.hooks.set_play_enabled)(true);
        }
    }

    fn on_start(&mut self, packet: ServerStart) {
        let Some(profile) = self.profile.as_ref() else {
            console::warn!("start packet without a pending play request");
            return;
        };
        match Room::new(&packet, profile, now_ms()) {
            Ok(room) => {
                (self.hooks.set_room_label)(room.room_number());
                (self.hooks.field_created)(room.field().width(), room.field().height());
                self.room = Some(room);
                self.screen = Screen::Game;
                self.drag = DragTracker::new();
                self.suppress_click = false;
                (self.hooks.show_screen)(Screen::Game);
                (self.hooks.set_map_loading)(true);
            }
            Err(err) => {
                console::warn!("rejecting start packet", err.to_string());
                (self.hooks.show_lobby_error)(&err.to_string());
                (self.hooks.set_play_enabled)(true);
            }
        }
    }

    fn on_player_joined(&mut self, packet: ServerPlayerJoin) {
        let Some(room) = self.room.as_mut() else {
            console::warn!("player join before start");
            return;
        };
        room.handle_player_join(packet);
    }

    fn on_tile_change(&mut self, packet: ServerTileChange) {
        let Some(room) = self.room.as_mut() else {
            console::warn!("tile change before start");
            return;
        };
        match room.handle_tile_change(packet) {
            Ok(refresh) => (self.hooks.tile_changed)(&refresh),
            Err(err) => console::warn!("dropping tile change", err.to_string()),
        }
    }

    fn on_map_loaded(&mut self) {
        (self.hooks.set_map_loading)(false);
    }

    fn on_player_lost(&mut self, packet: ServerPlayerLost) {
        let Some(room) = self.room.as_mut() else {
            return;
        };
        if room.handle_player_lost(packet) {
            (self.hooks.show_death)();
        }
    }

    fn on_attacked(&mut self, _packet: ServerAttack) {
        // Reserved packet; nothing to do until the protocol grows fields.
    }
}
