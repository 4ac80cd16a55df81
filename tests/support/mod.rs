#![allow(dead_code)]

pub mod mock_editor;

use insert_replay::types::{Position, Selection};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn p(line: u32, col: u32) -> Position {
    Position::new(line, col)
}

pub fn cursor(line: u32, col: u32) -> Selection {
    Selection::cursor(Position::new(line, col))
}

pub fn sel(anchor: (u32, u32), active: (u32, u32)) -> Selection {
    Selection::new(
        Position::new(anchor.0, anchor.1),
        Position::new(active.0, active.1),
    )
}
