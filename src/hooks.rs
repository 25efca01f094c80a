use std::rc::Rc;

use gloo::console;

use empirio_core::room::TileRefresh;

use crate::app::Screen;

/// UI context handed to the shell at construction. The rendering frontend
/// supplies the callbacks; the runtime never touches the DOM tree itself.
#[derive(Clone)]
pub struct UiHooks {
    pub show_screen: Rc<dyn Fn(Screen)>,
    pub set_play_enabled: Rc<dyn Fn(bool)>,
    /// Inline, retryable message on the lobby screen.
    pub show_lobby_error: Rc<dyn Fn(&str)>,
    /// Blocking popup; the session is over or frozen.
    pub show_error_popup: Rc<dyn Fn(&str)>,
    pub set_room_label: Rc<dyn Fn(u32)>,
    /// A room opened; build a grid surface of this width and height and
    /// hand tile clicks back to the shell.
    pub field_created: Rc<dyn Fn(u32, u32)>,
    pub set_power: Rc<dyn Fn(u32)>,
    pub show_death: Rc<dyn Fn()>,
    pub tile_changed: Rc<dyn Fn(&TileRefresh)>,
    pub view_offset_changed: Rc<dyn Fn(f64, f64)>,
    /// Shown while the initial tile burst is still streaming in.
    pub set_map_loading: Rc<dyn Fn(bool)>,
}

impl UiHooks {
    pub fn empty() -> Self {
        Self {
            show_screen: Rc::new(|_| {}),
            set_play_enabled: Rc::new(|_| {}),
            show_lobby_error: Rc::new(|_| {}),
            show_error_popup: Rc::new(|_| {}),
            set_room_label: Rc::new(|_| {}),
            field_created: Rc::new(|_, _| {}),
            set_power: Rc::new(|_| {}),
            show_death: Rc::new(|| {}),
            tile_changed: Rc::new(|_| {}),
            view_offset_changed: Rc::new(|_, _| {}),
            set_map_loading: Rc::new(|_| {}),
        }
    }

    /// Headless frontend: every UI effect becomes a console line. Used by
    /// the development binary; a real frontend swaps in its own callbacks.
    pub fn console() -> Self {
        Self {
            show_screen: Rc::new(|screen| {
                console::log!("screen", format!("{screen:?}"));
            }),
            set_play_enabled: Rc::new(|enabled| {
                console::log!("play enabled", enabled);
            }),
            show_lobby_error: Rc::new(|message| {
                console::warn!("lobby error", message.to_string());
            }),
            show_error_popup: Rc::new(|message| {
                console::error!("error popup", message.to_string());
            }),
            set_room_label: Rc::new(|room| {
                console::log!("room", room);
            }),
            field_created: Rc::new(|width, height| {
                console::log!("field", width, height);
            }),
            set_power: Rc::new(|_power| {}),
            show_death: Rc::new(|| {
                console::log!("you died");
            }),
            tile_changed: Rc::new(|refresh| {
                console::log!(
                    "tile",
                    refresh.x,
                    refresh.y,
                    refresh.strength,
                    refresh.owner_colour.clone().unwrap_or_default()
                );
            }),
            view_offset_changed: Rc::new(|_, _| {}),
            set_map_loading: Rc::new(|loading| {
                console::log!("map loading", loading);
            }),
        }
    }
}
