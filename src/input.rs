use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use crate::app::{AppShell, Screen};

fn listen(
    window: &web_sys::Window,
    event_type: &'static str,
    callback: impl FnMut(&web_sys::Event) + 'static,
) {
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(window, event_type, options, callback).forget();
}

/// Attaches the window-level pointer listeners feeding the shell's gesture
/// tracker. The listeners live for the application lifetime.
pub fn attach(shell: Rc<RefCell<AppShell>>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    {
        let shell = shell.clone();
        listen(&window, "mousedown", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let handled = shell
                .borrow_mut()
                .pointer_down(mouse.client_x() as f64, mouse.client_y() as f64);
            if handled {
                event.prevent_default();
            }
        });
    }
    {
        let shell = shell.clone();
        listen(&window, "mousemove", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let handled = shell
                .borrow_mut()
                .pointer_move(mouse.client_x() as f64, mouse.client_y() as f64);
            if handled {
                event.prevent_default();
            }
        });
    }
    {
        let shell = shell.clone();
        listen(&window, "mouseup", move |event| {
            if shell.borrow_mut().pointer_up() {
                event.prevent_default();
            }
        });
    }
    {
        // Text selection fights the pan gesture on the game screen.
        let shell = shell.clone();
        listen(&window, "selectstart", move |event| {
            if shell.borrow().screen() == Screen::Game {
                event.prevent_default();
            }
        });
    }
}
