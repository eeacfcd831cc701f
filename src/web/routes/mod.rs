pub mod apply;
pub mod board;
pub mod event_entry;
pub mod notices;
pub mod pin;
pub mod player;
pub mod rankings;
pub mod register;
pub mod search;
pub mod team_entry;
pub mod tournaments;
