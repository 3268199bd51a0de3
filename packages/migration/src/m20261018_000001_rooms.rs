use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    HostUserId,
    InviteCode,
    SettingsChoice,
    Status,
    RoundNumber,
    NightActingRole,
    PoliceBadgeHolder,
    SpeakerOrder,
    CurrentSpeaker,
    StartConfig,
    LastNightDeaths,
    RngSeed,
    CreatedAt,
    UpdatedAt,
    StartedAt,
    LockVersion,
}

#[derive(Iden)]
enum RoomPlayers {
    Table,
    RoomId,
    UserId,
    SeatNumber,
    IsReady,
    Role,
    IsAlive,
    HasUsedWitchSave,
    HasUsedWitchPoison,
    IsCandidateForSheriff,
    VotedForSheriffCandidate,
    JoinedAt,
}

#[derive(Iden)]
enum RoundLogs {
    Table,
    RoomId,
    RoundNo,
    WolfKillTarget,
    WitchAction,
    WitchTarget,
    SeerId,
    SeerTarget,
    SeerResult,
    SeerTargetWasAlive,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // rooms
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .string_len(26)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::HostUserId).big_integer().not_null())
                    .col(ColumnDef::new(Rooms::InviteCode).string_len(6).not_null())
                    .col(ColumnDef::new(Rooms::SettingsChoice).string_len(1).not_null())
                    .col(ColumnDef::new(Rooms::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Rooms::RoundNumber).small_integer().null())
                    .col(ColumnDef::new(Rooms::NightActingRole).string_len(16).null())
                    .col(ColumnDef::new(Rooms::PoliceBadgeHolder).big_integer().null())
                    .col(ColumnDef::new(Rooms::SpeakerOrder).text().not_null())
                    .col(ColumnDef::new(Rooms::CurrentSpeaker).big_integer().null())
                    .col(ColumnDef::new(Rooms::StartConfig).text().null())
                    .col(ColumnDef::new(Rooms::LastNightDeaths).text().not_null())
                    .col(ColumnDef::new(Rooms::RngSeed).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_rooms_invite_code")
                    .table(Rooms::Table)
                    .col(Rooms::InviteCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // room_players
        manager
            .create_table(
                Table::create()
                    .table(RoomPlayers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoomPlayers::RoomId).string_len(26).not_null())
                    .col(ColumnDef::new(RoomPlayers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(RoomPlayers::SeatNumber).small_integer().null())
                    .col(
                        ColumnDef::new(RoomPlayers::IsReady)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(RoomPlayers::Role).string_len(16).null())
                    .col(
                        ColumnDef::new(RoomPlayers::IsAlive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::HasUsedWitchSave)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::HasUsedWitchPoison)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::IsCandidateForSheriff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::VotedForSheriffCandidate)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RoomPlayers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RoomPlayers::RoomId)
                            .col(RoomPlayers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_players_room_id")
                            .from(RoomPlayers::Table, RoomPlayers::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // round_logs
        manager
            .create_table(
                Table::create()
                    .table(RoundLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoundLogs::RoomId).string_len(26).not_null())
                    .col(ColumnDef::new(RoundLogs::RoundNo).small_integer().not_null())
                    .col(ColumnDef::new(RoundLogs::WolfKillTarget).big_integer().null())
                    .col(ColumnDef::new(RoundLogs::WitchAction).string_len(16).null())
                    .col(ColumnDef::new(RoundLogs::WitchTarget).big_integer().null())
                    .col(ColumnDef::new(RoundLogs::SeerId).big_integer().null())
                    .col(ColumnDef::new(RoundLogs::SeerTarget).big_integer().null())
                    .col(ColumnDef::new(RoundLogs::SeerResult).string_len(16).null())
                    .col(ColumnDef::new(RoundLogs::SeerTargetWasAlive).boolean().null())
                    .primary_key(
                        Index::create()
                            .col(RoundLogs::RoomId)
                            .col(RoundLogs::RoundNo),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_round_logs_room_id")
                            .from(RoundLogs::Table, RoundLogs::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoundLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoomPlayers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
