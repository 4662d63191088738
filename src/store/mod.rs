//! Record collections behind traits, so the recomputation engine and the
//! catalog service never see which backend they run on.

mod memory;
mod sql;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use sql::SqlStore;

use crate::models::{Analytics, Feedback, Movie, MovieDetails, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create_user(&self, user: User) -> StoreResult<()>;

    async fn set_favorites(&self, email: &str, favorites: &[String]) -> StoreResult<()>;

    async fn remove_favorite_everywhere(&self, movie_id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn get_movie(&self, movie_id: &str) -> StoreResult<Option<Movie>>;

    /// All movies, oldest first.
    async fn list_movies(&self) -> StoreResult<Vec<Movie>>;

    async fn create_movie(&self, movie: Movie) -> StoreResult<()>;

    /// Returns false when the movie does not exist.
    async fn update_movie_details(&self, movie_id: &str, details: &MovieDetails)
    -> StoreResult<bool>;

    /// Writing the rating of a missing movie is a no-op.
    async fn set_rating(&self, movie_id: &str, rating: f64) -> StoreResult<()>;

    async fn delete_movie(&self, movie_id: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn get_feedback(&self, feedback_id: &str) -> StoreResult<Option<Feedback>>;

    async fn list_feedback(&self) -> StoreResult<Vec<Feedback>>;

    async fn list_feedback_by_movie(&self, movie_id: &str) -> StoreResult<Vec<Feedback>>;

    async fn list_feedback_by_user(&self, email: &str) -> StoreResult<Vec<Feedback>>;

    async fn insert_feedback(&self, feedback: Feedback) -> StoreResult<()>;

    async fn delete_feedback(&self, feedback_id: &str) -> StoreResult<bool>;

    /// Returns how many records were removed.
    async fn delete_feedback_by_movie(&self, movie_id: &str) -> StoreResult<u64>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn get_analytics(&self, movie_id: &str) -> StoreResult<Option<Analytics>>;

    async fn list_analytics(&self) -> StoreResult<Vec<Analytics>>;

    /// Full replacement of the movie's record.
    async fn put_analytics(&self, analytics: Analytics) -> StoreResult<()>;

    async fn delete_analytics(&self, movie_id: &str) -> StoreResult<()>;
}

pub trait Store: UserStore + MovieStore + FeedbackStore + AnalyticsStore {}

impl<T: UserStore + MovieStore + FeedbackStore + AnalyticsStore> Store for T {}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    /// Wraps a [`MemoryStore`]; once `break_derived_writes` is called, rating
    /// and analytics writes fail while everything else keeps working.
    #[derive(Default)]
    pub struct FailingStore {
        inner: MemoryStore,
        broken: AtomicBool,
    }

    impl FailingStore {
        pub fn break_derived_writes(&self) {
            self.broken.store(true, Ordering::SeqCst);
        }

        fn check(&self, what: &str) -> StoreResult<()> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StoreError::Corrupt(format!("{what} write rejected")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for FailingStore {
        async fn get_user(&self, email: &str) -> StoreResult<Option<User>> {
            self.inner.get_user(email).await
        }

        async fn create_user(&self, user: User) -> StoreResult<()> {
            self.inner.create_user(user).await
        }

        async fn set_favorites(&self, email: &str, favorites: &[String]) -> StoreResult<()> {
            self.inner.set_favorites(email, favorites).await
        }

        async fn remove_favorite_everywhere(&self, movie_id: &str) -> StoreResult<()> {
            self.inner.remove_favorite_everywhere(movie_id).await
        }
    }

    #[async_trait]
    impl MovieStore for FailingStore {
        async fn get_movie(&self, movie_id: &str) -> StoreResult<Option<Movie>> {
            self.inner.get_movie(movie_id).await
        }

        async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
            self.inner.list_movies().await
        }

        async fn create_movie(&self, movie: Movie) -> StoreResult<()> {
            self.inner.create_movie(movie).await
        }

        async fn update_movie_details(
            &self,
            movie_id: &str,
            details: &MovieDetails,
        ) -> StoreResult<bool> {
            self.inner.update_movie_details(movie_id, details).await
        }

        async fn set_rating(&self, movie_id: &str, rating: f64) -> StoreResult<()> {
            self.check("rating")?;
            self.inner.set_rating(movie_id, rating).await
        }

        async fn delete_movie(&self, movie_id: &str) -> StoreResult<bool> {
            self.inner.delete_movie(movie_id).await
        }
    }

    #[async_trait]
    impl FeedbackStore for FailingStore {
        async fn get_feedback(&self, feedback_id: &str) -> StoreResult<Option<Feedback>> {
            self.inner.get_feedback(feedback_id).await
        }

        async fn list_feedback(&self) -> StoreResult<Vec<Feedback>> {
            self.inner.list_feedback().await
        }

        async fn list_feedback_by_movie(&self, movie_id: &str) -> StoreResult<Vec<Feedback>> {
            self.inner.list_feedback_by_movie(movie_id).await
        }

        async fn list_feedback_by_user(&self, email: &str) -> StoreResult<Vec<Feedback>> {
            self.inner.list_feedback_by_user(email).await
        }

        async fn insert_feedback(&self, feedback: Feedback) -> StoreResult<()> {
            self.inner.insert_feedback(feedback).await
        }

        async fn delete_feedback(&self, feedback_id: &str) -> StoreResult<bool> {
            self.inner.delete_feedback(feedback_id).await
        }

        async fn delete_feedback_by_movie(&self, movie_id: &str) -> StoreResult<u64> {
            self.inner.delete_feedback_by_movie(movie_id).await
        }
    }

    #[async_trait]
    impl AnalyticsStore for FailingStore {
        async fn get_analytics(&self, movie_id: &str) -> StoreResult<Option<Analytics>> {
            self.inner.get_analytics(movie_id).await
        }

        async fn list_analytics(&self) -> StoreResult<Vec<Analytics>> {
            self.inner.list_analytics().await
        }

        async fn put_analytics(&self, analytics: Analytics) -> StoreResult<()> {
            self.check("analytics")?;
            self.inner.put_analytics(analytics).await
        }

        async fn delete_analytics(&self, movie_id: &str) -> StoreResult<()> {
            self.inner.delete_analytics(movie_id).await
        }
    }
}
