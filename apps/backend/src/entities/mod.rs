pub mod room_players;
pub mod rooms;
pub mod round_logs;

pub use room_players::Entity as RoomPlayers;
pub use room_players::Model as RoomPlayer;
pub use rooms::Entity as Rooms;
pub use rooms::Model as RoomRow;
pub use round_logs::Entity as RoundLogs;
pub use round_logs::Model as RoundLogRow;
