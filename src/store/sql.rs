use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use super::{AnalyticsStore, FeedbackStore, MovieStore, StoreError, StoreResult, UserStore};
use crate::{
    entities::{app_user, favorite, feedback, movie, movie_analytics},
    models::{Analytics, Breakdown, Feedback, Movie, MovieDetails, Sentiment, Trend, User},
};

/// Persistent store over a sea-orm connection.
#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn favorites_of(&self, email: &str) -> StoreResult<Vec<String>> {
        let rows = favorite::Entity::find()
            .filter(favorite::Column::UserEmail.eq(email))
            .order_by_asc(favorite::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| r.movie_id).collect())
    }
}

#[async_trait]
impl UserStore for SqlStore {
    async fn get_user(&self, email: &str) -> StoreResult<Option<User>> {
        let Some(row) = app_user::Entity::find_by_id(email.to_string()).one(&self.db).await? else {
            return Ok(None);
        };
        let favorites = self.favorites_of(email).await?;
        Ok(Some(User {
            id: row.id,
            email: row.email,
            name: row.name,
            password: row.password,
            favorite_genre: row.favorite_genre,
            age_group: row.age_group,
            favorites,
        }))
    }

    async fn create_user(&self, user: User) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = app_user::Entity::find_by_id(user.email.clone()).one(&txn).await?;
        if existing.is_some() {
            return Err(StoreError::Conflict(format!("user {}", user.email)));
        }

        let model = app_user::ActiveModel {
            email: Set(user.email.clone()),
            id: Set(user.id),
            name: Set(user.name),
            password: Set(user.password),
            favorite_genre: Set(user.favorite_genre),
            age_group: Set(user.age_group),
        };
        app_user::Entity::insert(model).exec(&txn).await?;

        for movie_id in user.favorites {
            let fav = favorite::ActiveModel {
                id: Default::default(),
                user_email: Set(user.email.clone()),
                movie_id: Set(movie_id),
            };
            favorite::Entity::insert(fav).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn set_favorites(&self, email: &str, favorites: &[String]) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        favorite::Entity::delete_many()
            .filter(favorite::Column::UserEmail.eq(email))
            .exec(&txn)
            .await?;

        for movie_id in favorites {
            let fav = favorite::ActiveModel {
                id: Default::default(),
                user_email: Set(email.to_string()),
                movie_id: Set(movie_id.clone()),
            };
            favorite::Entity::insert(fav).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn remove_favorite_everywhere(&self, movie_id: &str) -> StoreResult<()> {
        favorite::Entity::delete_many()
            .filter(favorite::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MovieStore for SqlStore {
    async fn get_movie(&self, movie_id: &str) -> StoreResult<Option<Movie>> {
        let row = movie::Entity::find_by_id(movie_id.to_string()).one(&self.db).await?;
        Ok(row.map(movie_from_row))
    }

    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        let rows = movie::Entity::find()
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(movie_from_row).collect())
    }

    async fn create_movie(&self, m: Movie) -> StoreResult<()> {
        let model = movie::ActiveModel {
            id: Set(m.id),
            name: Set(m.name),
            genre: Set(m.genre),
            language: Set(m.language),
            image: Set(m.image),
            rating: Set(m.rating),
        };
        movie::Entity::insert(model).exec(&self.db).await?;
        Ok(())
    }

    async fn update_movie_details(
        &self,
        movie_id: &str,
        details: &MovieDetails,
    ) -> StoreResult<bool> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Name, Expr::value(details.name.clone()))
            .col_expr(movie::Column::Genre, Expr::value(details.genre.clone()))
            .col_expr(movie::Column::Language, Expr::value(details.language.clone()))
            .col_expr(movie::Column::Image, Expr::value(details.image.clone()))
            .filter(movie::Column::Id.eq(movie_id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn set_rating(&self, movie_id: &str, rating: f64) -> StoreResult<()> {
        movie::Entity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(rating))
            .filter(movie::Column::Id.eq(movie_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn delete_movie(&self, movie_id: &str) -> StoreResult<bool> {
        let res = movie::Entity::delete_by_id(movie_id.to_string()).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl FeedbackStore for SqlStore {
    async fn get_feedback(&self, feedback_id: &str) -> StoreResult<Option<Feedback>> {
        let row = feedback::Entity::find_by_id(feedback_id.to_string()).one(&self.db).await?;
        row.map(feedback_from_row).transpose()
    }

    async fn list_feedback(&self) -> StoreResult<Vec<Feedback>> {
        let rows = feedback::Entity::find()
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await?;
        rows.into_iter().map(feedback_from_row).collect()
    }

    async fn list_feedback_by_movie(&self, movie_id: &str) -> StoreResult<Vec<Feedback>> {
        let rows = feedback::Entity::find()
            .filter(feedback::Column::MovieId.eq(movie_id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await?;
        rows.into_iter().map(feedback_from_row).collect()
    }

    async fn list_feedback_by_user(&self, email: &str) -> StoreResult<Vec<Feedback>> {
        let rows = feedback::Entity::find()
            .filter(feedback::Column::UserEmail.eq(email))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await?;
        rows.into_iter().map(feedback_from_row).collect()
    }

    async fn insert_feedback(&self, f: Feedback) -> StoreResult<()> {
        let model = feedback::ActiveModel {
            id: Set(f.id),
            user_email: Set(f.user_email),
            movie_id: Set(f.movie_id),
            rating: Set(f.rating),
            comment: Set(f.comment),
            sentiment: Set(f.sentiment.as_str().to_string()),
            timestamp: Set(f.timestamp),
        };
        feedback::Entity::insert(model).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_feedback(&self, feedback_id: &str) -> StoreResult<bool> {
        let res = feedback::Entity::delete_by_id(feedback_id.to_string()).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_feedback_by_movie(&self, movie_id: &str) -> StoreResult<u64> {
        let res = feedback::Entity::delete_many()
            .filter(feedback::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}

#[async_trait]
impl AnalyticsStore for SqlStore {
    async fn get_analytics(&self, movie_id: &str) -> StoreResult<Option<Analytics>> {
        let row =
            movie_analytics::Entity::find_by_id(movie_id.to_string()).one(&self.db).await?;
        row.map(analytics_from_row).transpose()
    }

    async fn list_analytics(&self) -> StoreResult<Vec<Analytics>> {
        let rows = movie_analytics::Entity::find().all(&self.db).await?;
        rows.into_iter().map(analytics_from_row).collect()
    }

    async fn put_analytics(&self, a: Analytics) -> StoreResult<()> {
        let model = movie_analytics::ActiveModel {
            movie_id: Set(a.movie_id),
            score: Set(a.score as i32),
            positive: Set(a.breakdown.positive as i32),
            neutral: Set(a.breakdown.neutral as i32),
            negative: Set(a.breakdown.negative as i32),
            trend: Set(a.trend.as_str().to_string()),
            last_updated: Set(a.last_updated),
        };

        movie_analytics::Entity::insert(model)
            .on_conflict(
                OnConflict::column(movie_analytics::Column::MovieId)
                    .update_columns([
                        movie_analytics::Column::Score,
                        movie_analytics::Column::Positive,
                        movie_analytics::Column::Neutral,
                        movie_analytics::Column::Negative,
                        movie_analytics::Column::Trend,
                        movie_analytics::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn delete_analytics(&self, movie_id: &str) -> StoreResult<()> {
        movie_analytics::Entity::delete_by_id(movie_id.to_string()).exec(&self.db).await?;
        Ok(())
    }
}

fn movie_from_row(row: movie::Model) -> Movie {
    Movie {
        id: row.id,
        name: row.name,
        genre: row.genre,
        language: row.language,
        image: row.image,
        rating: row.rating,
    }
}

fn feedback_from_row(row: feedback::Model) -> StoreResult<Feedback> {
    let sentiment = Sentiment::from_label(&row.sentiment)
        .ok_or_else(|| StoreError::Corrupt(format!("feedback {} sentiment {}", row.id, row.sentiment)))?;
    Ok(Feedback {
        id: row.id,
        user_email: row.user_email,
        movie_id: row.movie_id,
        rating: row.rating,
        comment: row.comment,
        sentiment,
        timestamp: row.timestamp,
    })
}

fn analytics_from_row(row: movie_analytics::Model) -> StoreResult<Analytics> {
    let trend = Trend::from_label(&row.trend)
        .ok_or_else(|| StoreError::Corrupt(format!("analytics {} trend {}", row.movie_id, row.trend)))?;
    Ok(Analytics {
        movie_id: row.movie_id,
        score: row.score.max(0) as u32,
        breakdown: Breakdown {
            positive: row.positive.max(0) as u32,
            neutral: row.neutral.max(0) as u32,
            negative: row.negative.max(0) as u32,
        },
        trend,
        last_updated: row.last_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn store() -> SqlStore {
        SqlStore::new(db::connect_and_migrate("sqlite::memory:").await.unwrap())
    }

    fn sample_movie(id: &str, name: &str) -> Movie {
        Movie {
            id: id.to_string(),
            name: name.to_string(),
            genre: "Action".to_string(),
            language: "Hindi".to_string(),
            image: "https://example.com/poster.jpg".to_string(),
            rating: 0.0,
        }
    }

    fn sample_feedback(id: &str, movie_id: &str, rating: i32) -> Feedback {
        Feedback {
            id: id.to_string(),
            user_email: "viewer@example.com".to_string(),
            movie_id: movie_id.to_string(),
            rating,
            comment: "good".to_string(),
            sentiment: Sentiment::Positive,
            timestamp: "2025-03-01 12:00".to_string(),
        }
    }

    #[tokio::test]
    async fn movies_round_trip_in_insertion_order() {
        let store = store().await;
        store.create_movie(sample_movie("b", "Jawan")).await.unwrap();
        store.create_movie(sample_movie("a", "Oppenheimer")).await.unwrap();

        let names: Vec<_> =
            store.list_movies().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["Jawan", "Oppenheimer"]);

        store.set_rating("a", 4.5).await.unwrap();
        assert_eq!(store.get_movie("a").await.unwrap().unwrap().rating, 4.5);
    }

    #[tokio::test]
    async fn feedback_lists_keep_insertion_order() {
        let store = store().await;
        for id in ["z", "m", "a"] {
            store.insert_feedback(sample_feedback(id, "m1", 4)).await.unwrap();
        }

        let ids = |list: Vec<Feedback>| list.into_iter().map(|f| f.id).collect::<Vec<_>>();
        assert_eq!(ids(store.list_feedback().await.unwrap()), ["z", "m", "a"]);
        assert_eq!(ids(store.list_feedback_by_movie("m1").await.unwrap()), ["z", "m", "a"]);
        assert_eq!(
            ids(store.list_feedback_by_user("viewer@example.com").await.unwrap()),
            ["z", "m", "a"]
        );
    }

    #[tokio::test]
    async fn updates_details_only_for_existing_movie() {
        let store = store().await;
        store.create_movie(sample_movie("m1", "Jawan")).await.unwrap();
        let details = MovieDetails {
            name: "Jawan (2023)".to_string(),
            genre: "Thriller".to_string(),
            language: "Hindi".to_string(),
            image: "https://example.com/new.jpg".to_string(),
        };

        assert!(store.update_movie_details("m1", &details).await.unwrap());
        assert!(!store.update_movie_details("missing", &details).await.unwrap());

        let movie = store.get_movie("m1").await.unwrap().unwrap();
        assert_eq!(movie.name, "Jawan (2023)");
        assert_eq!(movie.genre, "Thriller");
    }

    #[tokio::test]
    async fn feedback_filters_and_cascade_delete() {
        let store = store().await;
        store.insert_feedback(sample_feedback("f1", "m1", 4)).await.unwrap();
        store.insert_feedback(sample_feedback("f2", "m1", 3)).await.unwrap();
        store.insert_feedback(sample_feedback("f3", "m2", 5)).await.unwrap();

        assert_eq!(store.list_feedback_by_movie("m1").await.unwrap().len(), 2);
        assert_eq!(store.list_feedback_by_user("viewer@example.com").await.unwrap().len(), 3);

        assert_eq!(store.delete_feedback_by_movie("m1").await.unwrap(), 2);
        assert!(store.list_feedback_by_movie("m1").await.unwrap().is_empty());
        assert!(store.delete_feedback("f3").await.unwrap());
        assert!(!store.delete_feedback("f3").await.unwrap());
    }

    #[tokio::test]
    async fn put_analytics_replaces_previous_record() {
        let store = store().await;
        let first = Analytics {
            movie_id: "m1".to_string(),
            score: 90,
            breakdown: Breakdown { positive: 90, neutral: 10, negative: 0 },
            trend: Trend::TrendingUp,
            last_updated: Some("2025-03-01 12:00".to_string()),
        };
        store.put_analytics(first).await.unwrap();
        store.put_analytics(Analytics::default_for("m1")).await.unwrap();

        let got = store.get_analytics("m1").await.unwrap().unwrap();
        assert_eq!(got, Analytics::default_for("m1"));
        assert_eq!(store.list_analytics().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn favorites_are_replaced_and_pruned() {
        let store = store().await;
        let user = User {
            id: "u1".to_string(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            password: "secret".to_string(),
            favorite_genre: "Drama".to_string(),
            age_group: "26-35".to_string(),
            favorites: vec![],
        };
        store.create_user(user.clone()).await.unwrap();
        assert!(matches!(store.create_user(user).await, Err(StoreError::Conflict(_))));

        store
            .set_favorites("viewer@example.com", &["m1".to_string(), "m2".to_string()])
            .await
            .unwrap();
        store.remove_favorite_everywhere("m1").await.unwrap();

        let user = store.get_user("viewer@example.com").await.unwrap().unwrap();
        assert_eq!(user.favorites, ["m2"]);
    }
}
