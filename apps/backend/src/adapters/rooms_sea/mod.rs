//! SeaORM implementation of [`RoomStore`] for Postgres and SQLite.
//!
//! One aggregate write is one transaction: a versioned `UPDATE rooms ... WHERE
//! lock_version = ?` followed by a rewrite of the room's player and round-log rows.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::action_log::ActionLog;
use crate::domain::state::RoomAggregate;
use crate::entities::{room_players, rooms, round_logs};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::{map_db_err, optimistic_lock_err, ROOM_NOT_FOUND_PREFIX};
use crate::repos::rooms::RoomStore;

pub mod dto;

#[derive(Debug, Clone)]
pub struct SeaRoomStore {
    db: DatabaseConnection,
}

impl SeaRoomStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn load_aggregate<C: ConnectionTrait>(
    conn: &C,
    row: rooms::Model,
) -> Result<RoomAggregate, DomainError> {
    let players = room_players::Entity::find()
        .filter(room_players::Column::RoomId.eq(row.id.as_str()))
        .order_by_asc(room_players::Column::UserId)
        .all(conn)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(dto::player_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let log = round_logs::Entity::find()
        .filter(round_logs::Column::RoomId.eq(row.id.as_str()))
        .order_by_asc(round_logs::Column::RoundNo)
        .all(conn)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(dto::round_log_from_row)
        .collect::<Result<ActionLog, _>>()?;

    let version = row.lock_version;
    Ok(RoomAggregate {
        room: dto::room_from_row(row)?,
        players,
        log,
        version,
    })
}

/// Replace every player and round-log row of `agg`, keeping join times of existing players.
async fn write_children<C: ConnectionTrait>(
    conn: &C,
    agg: &RoomAggregate,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    let room_id = agg.room.id.as_str();

    let joined: HashMap<i64, OffsetDateTime> = room_players::Entity::find()
        .filter(room_players::Column::RoomId.eq(room_id))
        .all(conn)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(|p| (p.user_id, p.joined_at))
        .collect();

    room_players::Entity::delete_many()
        .filter(room_players::Column::RoomId.eq(room_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    round_logs::Entity::delete_many()
        .filter(round_logs::Column::RoomId.eq(room_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    if !agg.players.is_empty() {
        let rows = agg.players.iter().map(|p| {
            let joined_at = joined.get(&p.user_id).copied().unwrap_or(now);
            dto::player_active(room_id, p, joined_at)
        });
        room_players::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(map_db_err)?;
    }

    if !agg.log.is_empty() {
        let rows = agg
            .log
            .rounds()
            .map(|(round, log)| dto::round_log_active(room_id, round, log))
            .collect::<Result<Vec<_>, _>>()?;
        round_logs::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(map_db_err)?;
    }
    Ok(())
}

async fn find_row<C: ConnectionTrait>(
    conn: &C,
    room_id: &str,
) -> Result<Option<rooms::Model>, DomainError> {
    rooms::Entity::find_by_id(room_id.to_string())
        .one(conn)
        .await
        .map_err(map_db_err)
}

#[async_trait]
impl RoomStore for SeaRoomStore {
    async fn insert_room(&self, agg: RoomAggregate) -> Result<RoomAggregate, DomainError> {
        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active = dto::room_active(&agg.room, now)?;
        active.lock_version = Set(1);
        active.insert(&txn).await.map_err(map_db_err)?;
        write_children(&txn, &agg, now).await?;

        let row = find_row(&txn, &agg.room.id).await?.ok_or_else(|| {
            map_db_err(DbErr::Custom(format!("{ROOM_NOT_FOUND_PREFIX}{}", agg.room.id)))
        })?;
        let stored = load_aggregate(&txn, row).await?;
        txn.commit().await.map_err(map_db_err)?;

        debug!(room_id = %stored.room.id, "room inserted");
        Ok(stored)
    }

    async fn find_room(&self, room_id: &str) -> Result<Option<RoomAggregate>, DomainError> {
        match find_row(&self.db, room_id).await? {
            Some(row) => Ok(Some(load_aggregate(&self.db, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<RoomAggregate>, DomainError> {
        let row = rooms::Entity::find()
            .filter(rooms::Column::InviteCode.eq(invite_code))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        match row {
            Some(row) => Ok(Some(load_aggregate(&self.db, row).await?)),
            None => Ok(None),
        }
    }

    async fn compare_and_set(
        &self,
        expected_version: i32,
        next: RoomAggregate,
    ) -> Result<RoomAggregate, DomainError> {
        let now = OffsetDateTime::now_utc();
        let room_id = next.room.id.clone();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active = dto::room_active(&next.room, now)?;
        active.id = NotSet;
        active.created_at = NotSet;

        let result = rooms::Entity::update_many()
            .set(active)
            .col_expr(
                rooms::Column::LockVersion,
                Expr::col(rooms::Column::LockVersion).add(1),
            )
            .filter(rooms::Column::Id.eq(room_id.as_str()))
            .filter(rooms::Column::LockVersion.eq(expected_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            // Either the room is gone or another writer bumped the version.
            let err = match find_row(&txn, &room_id).await? {
                Some(row) => optimistic_lock_err(expected_version, row.lock_version),
                None => DbErr::Custom(format!("{ROOM_NOT_FOUND_PREFIX}{room_id}")),
            };
            return Err(map_db_err(err));
        }

        write_children(&txn, &next, now).await?;

        let row = find_row(&txn, &room_id)
            .await?
            .ok_or_else(|| map_db_err(DbErr::Custom(format!("{ROOM_NOT_FOUND_PREFIX}{room_id}"))))?;
        let stored = load_aggregate(&txn, row).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(stored)
    }
}
