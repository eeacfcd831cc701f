pub mod board_service;
pub mod entry_status_service;
pub mod event_entry_service;
pub mod event_entry_view;
pub mod identity_service;
pub mod member_directory;
pub mod notice_service;
pub mod notifier;
pub mod pin_service;
pub mod player_service;
pub mod ranking_service;
pub mod registration_service;
pub mod roster;
pub mod search_service;
pub mod season;
pub mod selection;
pub mod team_entry_service;
pub mod team_entry_view;
pub mod tournament_service;
