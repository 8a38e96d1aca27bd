//! Create `score` table keyed by (user, movie).
//!
//! The movie foreign key is RESTRICT: a movie with submitted scores cannot
//! be deleted, which surfaces as an integrity-violation at the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Score::Table)
                    .if_not_exists()
                    .col(big_integer(Score::UserId).not_null())
                    .col(big_integer(Score::MovieId).not_null())
                    .col(double(Score::Value).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_score")
                            .col(Score::UserId)
                            .col(Score::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_score_user")
                            .from(Score::Table, Score::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_score_movie")
                            .from(Score::Table, Score::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Score::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Score { Table, UserId, MovieId, Value }

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "app_user")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Movie { Table, Id }
