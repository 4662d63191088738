use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AnalyticsStore, FeedbackStore, MovieStore, StoreError, StoreResult, UserStore};
use crate::models::{Analytics, Feedback, Movie, MovieDetails, User};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    // insertion sequence keeps listing order stable
    movies: HashMap<String, (u64, Movie)>,
    feedback: Vec<Feedback>,
    analytics: HashMap<String, Analytics>,
    next_seq: u64,
}

/// Single-process store backed by maps behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(email).cloned())
    }

    async fn create_user(&self, user: User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.email) {
            return Err(StoreError::Conflict(format!("user {}", user.email)));
        }
        tables.users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn set_favorites(&self, email: &str, favorites: &[String]) -> StoreResult<()> {
        if let Some(user) = self.tables.write().await.users.get_mut(email) {
            user.favorites = favorites.to_vec();
        }
        Ok(())
    }

    async fn remove_favorite_everywhere(&self, movie_id: &str) -> StoreResult<()> {
        for user in self.tables.write().await.users.values_mut() {
            user.favorites.retain(|id| id != movie_id);
        }
        Ok(())
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn get_movie(&self, movie_id: &str) -> StoreResult<Option<Movie>> {
        Ok(self.tables.read().await.movies.get(movie_id).map(|(_, m)| m.clone()))
    }

    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables.movies.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, m)| m.clone()).collect())
    }

    async fn create_movie(&self, movie: Movie) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.movies.contains_key(&movie.id) {
            return Err(StoreError::Conflict(format!("movie {}", movie.id)));
        }
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.movies.insert(movie.id.clone(), (seq, movie));
        Ok(())
    }

    async fn update_movie_details(
        &self,
        movie_id: &str,
        details: &MovieDetails,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some((_, movie)) = tables.movies.get_mut(movie_id) else {
            return Ok(false);
        };
        movie.name = details.name.clone();
        movie.genre = details.genre.clone();
        movie.language = details.language.clone();
        movie.image = details.image.clone();
        Ok(true)
    }

    async fn set_rating(&self, movie_id: &str, rating: f64) -> StoreResult<()> {
        if let Some((_, movie)) = self.tables.write().await.movies.get_mut(movie_id) {
            movie.rating = rating;
        }
        Ok(())
    }

    async fn delete_movie(&self, movie_id: &str) -> StoreResult<bool> {
        Ok(self.tables.write().await.movies.remove(movie_id).is_some())
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn get_feedback(&self, feedback_id: &str) -> StoreResult<Option<Feedback>> {
        let tables = self.tables.read().await;
        Ok(tables.feedback.iter().find(|f| f.id == feedback_id).cloned())
    }

    async fn list_feedback(&self) -> StoreResult<Vec<Feedback>> {
        Ok(self.tables.read().await.feedback.clone())
    }

    async fn list_feedback_by_movie(&self, movie_id: &str) -> StoreResult<Vec<Feedback>> {
        let tables = self.tables.read().await;
        Ok(tables.feedback.iter().filter(|f| f.movie_id == movie_id).cloned().collect())
    }

    async fn list_feedback_by_user(&self, email: &str) -> StoreResult<Vec<Feedback>> {
        let tables = self.tables.read().await;
        Ok(tables.feedback.iter().filter(|f| f.user_email == email).cloned().collect())
    }

    async fn insert_feedback(&self, feedback: Feedback) -> StoreResult<()> {
        self.tables.write().await.feedback.push(feedback);
        Ok(())
    }

    async fn delete_feedback(&self, feedback_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.feedback.len();
        tables.feedback.retain(|f| f.id != feedback_id);
        Ok(tables.feedback.len() != before)
    }

    async fn delete_feedback_by_movie(&self, movie_id: &str) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.feedback.len();
        tables.feedback.retain(|f| f.movie_id != movie_id);
        Ok((before - tables.feedback.len()) as u64)
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn get_analytics(&self, movie_id: &str) -> StoreResult<Option<Analytics>> {
        Ok(self.tables.read().await.analytics.get(movie_id).cloned())
    }

    async fn list_analytics(&self) -> StoreResult<Vec<Analytics>> {
        Ok(self.tables.read().await.analytics.values().cloned().collect())
    }

    async fn put_analytics(&self, analytics: Analytics) -> StoreResult<()> {
        self.tables.write().await.analytics.insert(analytics.movie_id.clone(), analytics);
        Ok(())
    }

    async fn delete_analytics(&self, movie_id: &str) -> StoreResult<()> {
        self.tables.write().await.analytics.remove(movie_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, name: &str) -> Movie {
        Movie {
            id: id.to_string(),
            name: name.to_string(),
            genre: "Drama".to_string(),
            language: "English".to_string(),
            image: String::new(),
            rating: 0.0,
        }
    }

    #[tokio::test]
    async fn lists_movies_in_insertion_order() {
        let store = MemoryStore::new();
        for (id, name) in [("z", "Zulu"), ("a", "Alpha"), ("m", "Mike")] {
            store.create_movie(movie(id, name)).await.unwrap();
        }
        let ids: Vec<_> =
            store.list_movies().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_user() {
        let store = MemoryStore::new();
        let user = User {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            password: "pw".to_string(),
            favorite_genre: "Drama".to_string(),
            age_group: "18-25".to_string(),
            favorites: vec![],
        };
        store.create_user(user.clone()).await.unwrap();
        let err = store.create_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn set_rating_on_missing_movie_is_noop() {
        let store = MemoryStore::new();
        store.set_rating("ghost", 4.0).await.unwrap();
        assert!(store.get_movie("ghost").await.unwrap().is_none());
    }
}
