pub mod app;
pub mod boot;
pub mod connection;
pub mod hooks;
pub mod input;

pub use app::{AppShell, Screen};
pub use boot::run;
pub use connection::{Connection, SocketEvent};
pub use hooks::UiHooks;
