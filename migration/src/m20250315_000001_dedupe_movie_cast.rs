use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Keep the oldest copy of each repeated row before the unique index goes on.
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM movie_cast WHERE id NOT IN \
                 (SELECT MIN(id) FROM movie_cast GROUP BY movie_id, attributes)",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_cast_unique")
                    .table(MovieCast::Table)
                    .col(MovieCast::MovieId)
                    .col(MovieCast::Attributes)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop().name("idx_movie_cast_unique").table(MovieCast::Table).to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MovieCast {
    Table,
    MovieId,
    Attributes,
}
