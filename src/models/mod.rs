pub mod board;
pub mod entries;
pub mod events;
pub mod members;
pub mod notices;
pub mod player;
pub mod rankings;
pub mod rpc;
pub mod tournaments;

pub use board::{BoardCategory, BoardPostRow, MyBoardPostsResponse};
pub use entries::EventEntryRow;
pub use events::{Event, EventDivisionRow, EventRow, EventStatus};
pub use members::{GradeOptionRow, Member, MemberRow, MemberStatus};
pub use notices::NoticeRow;
pub use player::{HistoryMember, HistoryRow, MemberHistoryResponse};
pub use rankings::{RankingRow, SeasonRow};
pub use rpc::{RpcOutcome, VerifyPinResponse};
pub use tournaments::{TournamentResultRow, TournamentRow};
