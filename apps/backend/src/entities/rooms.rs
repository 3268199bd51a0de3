use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RoomStatus {
    #[sea_orm(string_value = "lobby")]
    Lobby,
    #[sea_orm(string_value = "dealing")]
    Dealing,
    #[sea_orm(string_value = "night_wolf")]
    NightWolf,
    #[sea_orm(string_value = "night_seer")]
    NightSeer,
    #[sea_orm(string_value = "night_witch")]
    NightWitch,
    #[sea_orm(string_value = "night_finished")]
    NightFinished,
    #[sea_orm(string_value = "police_election")]
    PoliceElection,
    #[sea_orm(string_value = "day_results_announcement")]
    DayResultsAnnouncement,
    #[sea_orm(string_value = "sheriff_sets_speech_order")]
    SheriffSetsSpeechOrder,
    #[sea_orm(string_value = "day_discussion")]
    DayDiscussion,
    #[sea_orm(string_value = "day_vote")]
    DayVote,
    #[sea_orm(string_value = "finished")]
    Finished,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "host_user_id")]
    pub host_user_id: i64,
    #[sea_orm(column_name = "invite_code", unique)]
    pub invite_code: String,
    #[sea_orm(column_name = "settings_choice")]
    pub settings_choice: String,
    pub status: RoomStatus,
    #[sea_orm(column_name = "round_number", column_type = "SmallInteger")]
    pub round_number: Option<i16>,
    #[sea_orm(column_name = "night_acting_role")]
    pub night_acting_role: Option<String>,
    #[sea_orm(column_name = "police_badge_holder")]
    pub police_badge_holder: Option<i64>,
    /// JSON array of user ids.
    #[sea_orm(column_name = "speaker_order", column_type = "Text")]
    pub speaker_order: String,
    #[sea_orm(column_name = "current_speaker")]
    pub current_speaker: Option<i64>,
    /// JSON object, frozen at game start.
    #[sea_orm(column_name = "start_config", column_type = "Text", nullable)]
    pub start_config: Option<String>,
    /// JSON array of user ids.
    #[sea_orm(column_name = "last_night_deaths", column_type = "Text")]
    pub last_night_deaths: String,
    #[sea_orm(column_name = "rng_seed")]
    pub rng_seed: i64,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    #[sea_orm(column_name = "started_at")]
    pub started_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room_players::Entity")]
    RoomPlayers,
    #[sea_orm(has_many = "super::round_logs::Entity")]
    RoundLogs,
}

impl Related<super::room_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomPlayers.def()
    }
}

impl Related<super::round_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoundLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
