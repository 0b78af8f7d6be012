pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_movie_tables;
mod m20250301_000002_add_movie_cast_index;
mod m20250315_000001_dedupe_movie_cast;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_movie_tables::Migration),
            Box::new(m20250301_000002_add_movie_cast_index::Migration),
            Box::new(m20250315_000001_dedupe_movie_cast::Migration),
        ]
    }
}
