use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(string(AppUser::Email).primary_key())
                    .col(string(AppUser::Id))
                    .col(string(AppUser::Name))
                    .col(string(AppUser::Password))
                    .col(string(AppUser::FavoriteGenre))
                    .col(string(AppUser::AgeGroup))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .if_not_exists()
                    .col(pk_auto(Favorite::Id))
                    .col(string(Favorite::UserEmail))
                    .col(string(Favorite::MovieId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_unique")
                    .table(Favorite::Table)
                    .col(Favorite::UserEmail)
                    .col(Favorite::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(string(Movie::Id).primary_key())
                    .col(string(Movie::Name))
                    .col(string(Movie::Genre))
                    .col(string(Movie::Language))
                    .col(string(Movie::Image))
                    .col(double(Movie::Rating).default(0.0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(string(Feedback::Id).primary_key())
                    .col(string(Feedback::UserEmail))
                    .col(string(Feedback::MovieId))
                    .col(integer(Feedback::Rating))
                    .col(text(Feedback::Comment))
                    .col(string(Feedback::Sentiment))
                    .col(string(Feedback::Timestamp))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_movie_id")
                    .table(Feedback::Table)
                    .col(Feedback::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_user_email")
                    .table(Feedback::Table)
                    .col(Feedback::UserEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieAnalytics::Table)
                    .if_not_exists()
                    .col(string(MovieAnalytics::MovieId).primary_key())
                    .col(integer(MovieAnalytics::Score))
                    .col(integer(MovieAnalytics::Positive))
                    .col(integer(MovieAnalytics::Neutral))
                    .col(integer(MovieAnalytics::Negative))
                    .col(string(MovieAnalytics::Trend))
                    .col(string_null(MovieAnalytics::LastUpdated))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieAnalytics::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Feedback::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Favorite::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Email,
    Id,
    Name,
    Password,
    FavoriteGenre,
    AgeGroup,
}

#[derive(DeriveIden)]
enum Favorite {
    Table,
    Id,
    UserEmail,
    MovieId,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Name,
    Genre,
    Language,
    Image,
    Rating,
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    UserEmail,
    MovieId,
    Rating,
    Comment,
    Sentiment,
    Timestamp,
}

#[derive(DeriveIden)]
enum MovieAnalytics {
    Table,
    MovieId,
    Score,
    Positive,
    Neutral,
    Negative,
    Trend,
    LastUpdated,
}
