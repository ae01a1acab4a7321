mod layout;
mod table;

use crate::tui::app::AppState;
use crate::view::PublicState;
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, app: &AppState, view: &PublicState) {
    table::draw_table(f, app, view);
}
