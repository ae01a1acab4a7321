//! Terminal front end. Renders [`PublicState`](crate::view::PublicState)
//! snapshots and turns key presses into session commands.

pub mod app;
pub mod controller;
pub mod ui;
