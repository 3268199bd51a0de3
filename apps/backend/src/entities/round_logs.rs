use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "round_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "room_id")]
    pub room_id: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "round_no", column_type = "SmallInteger")]
    pub round_no: i16,
    #[sea_orm(column_name = "wolf_kill_target")]
    pub wolf_kill_target: Option<i64>,
    /// `save`, `poison` or `skip`.
    #[sea_orm(column_name = "witch_action")]
    pub witch_action: Option<String>,
    #[sea_orm(column_name = "witch_target")]
    pub witch_target: Option<i64>,
    #[sea_orm(column_name = "seer_id")]
    pub seer_id: Option<i64>,
    #[sea_orm(column_name = "seer_target")]
    pub seer_target: Option<i64>,
    /// `wolf` or `good`.
    #[sea_orm(column_name = "seer_result")]
    pub seer_result: Option<String>,
    #[sea_orm(column_name = "seer_target_was_alive")]
    pub seer_target_was_alive: Option<bool>,
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
