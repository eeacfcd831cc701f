pub mod backend;
pub mod board_repo;
pub mod entries_repo;
pub mod entry_commands_repo;
pub mod events_repo;
pub mod members_repo;
pub mod notices_repo;
pub mod players_repo;
pub mod rankings_repo;
pub mod registration_repo;
pub mod tournaments_repo;
