use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PlayerRole {
    #[sea_orm(string_value = "wolf")]
    Wolf,
    #[sea_orm(string_value = "seer")]
    Seer,
    #[sea_orm(string_value = "witch")]
    Witch,
    #[sea_orm(string_value = "hunter")]
    Hunter,
    #[sea_orm(string_value = "villager")]
    Villager,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "room_id")]
    pub room_id: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "user_id")]
    pub user_id: i64,
    #[sea_orm(column_name = "seat_number", column_type = "SmallInteger")]
    pub seat_number: Option<i16>,
    #[sea_orm(column_name = "is_ready")]
    pub is_ready: bool,
    pub role: Option<PlayerRole>,
    #[sea_orm(column_name = "is_alive")]
    pub is_alive: bool,
    #[sea_orm(column_name = "has_used_witch_save")]
    pub has_used_witch_save: bool,
    #[sea_orm(column_name = "has_used_witch_poison")]
    pub has_used_witch_poison: bool,
    #[sea_orm(column_name = "is_candidate_for_sheriff")]
    pub is_candidate_for_sheriff: bool,
    #[sea_orm(column_name = "voted_for_sheriff_candidate")]
    pub voted_for_sheriff_candidate: Option<i64>,
    #[sea_orm(column_name = "joined_at")]
    pub joined_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id",
        on_delete = "Cascade"
    )]
    Room,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
