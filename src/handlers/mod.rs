pub mod admin;
pub mod admin_panel;
pub mod broadcast;
pub mod callback;
pub mod command;
pub mod message;
pub mod request;
pub mod ui;

pub use callback::callback_handler;
pub use message::message_handler;
