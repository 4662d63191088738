use std::collections::HashSet;

use tracing::{info, warn};

use crate::{
    models::Movie,
    processor,
    store::{Store, StoreResult},
};

#[derive(Debug, Default)]
pub struct DedupeReport {
    pub scanned: usize,
    pub duplicates: Vec<Movie>,
    pub deleted: usize,
    pub failed: usize,
    pub remaining: Vec<Movie>,
}

/// Keeps the oldest movie for every exact name and deletes the later ones
/// through the regular cascade. With `dry_run` nothing is deleted.
pub async fn remove_duplicate_movies(store: &dyn Store, dry_run: bool) -> StoreResult<DedupeReport> {
    let movies = store.list_movies().await?;
    let mut report = DedupeReport { scanned: movies.len(), ..Default::default() };

    let mut seen = HashSet::new();
    for movie in movies {
        if seen.insert(movie.name.clone()) {
            info!(name = %movie.name, movie_id = %movie.id, "keeping");
        } else {
            info!(name = %movie.name, movie_id = %movie.id, "duplicate");
            report.duplicates.push(movie);
        }
    }

    if !dry_run {
        for movie in &report.duplicates {
            match processor::on_movie_deleted(store, &movie.id).await {
                Ok(_) => report.deleted += 1,
                Err(err) => {
                    warn!(name = %movie.name, movie_id = %movie.id, error = %err, "delete failed");
                    report.failed += 1;
                },
            }
        }
    }

    report.remaining = store.list_movies().await?;
    Ok(report)
}

impl std::fmt::Display for DedupeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Movies scanned:     {}", self.scanned)?;
        writeln!(f, "Duplicates found:   {}", self.duplicates.len())?;
        writeln!(f, "Duplicates deleted: {}", self.deleted)?;
        writeln!(f, "Failed deletions:   {}", self.failed)?;
        writeln!(f, "Movies remaining:   {}", self.remaining.len())?;
        for movie in &self.remaining {
            writeln!(f, "  - {} (rating {:.1})", movie.name, movie.rating)?;
        }
        Ok(())
    }
}
