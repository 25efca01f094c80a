use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::timers::callback::Interval;

use crate::app::AppShell;
use crate::connection::{default_socket_url, Connection};
use crate::hooks::UiHooks;
use crate::input;

/// Period of the power/update tick, in milliseconds.
pub const UPDATE_TICK_MS: u32 = 10;

/// Brings the client runtime up: one shell, one persistent connection, the
/// pointer listeners, and the update tick. The frontend supplies its UI
/// callbacks through `hooks` and keeps the returned shell to route lobby
/// and tile-click events in.
pub fn run(hooks: UiHooks) -> Option<Rc<RefCell<AppShell>>> {
    let mut connection = Connection::new();
    let shell = Rc::new(RefCell::new(AppShell::new(connection.clone(), hooks)));

    input::attach(shell.clone());

    let tick_shell = shell.clone();
    Interval::new(UPDATE_TICK_MS, move || {
        tick_shell.borrow_mut().tick();
    })
    .forget();

    let Some(url) = default_socket_url() else {
        console::error!("cannot resolve the websocket endpoint");
        return None;
    };
    let event_shell = shell.clone();
    connection.connect(
        &url,
        Rc::new(move |event| {
            event_shell.borrow_mut().handle_socket_event(event);
        }),
    );

    Some(shell)
}
