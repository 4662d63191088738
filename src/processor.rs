//! Rating and analytics recomputation.
//!
//! Both derived values are rebuilt from the movie's full feedback set on every
//! call, never patched incrementally, so calling either twice in a row over an
//! unchanged feedback set writes the same result twice. An unknown movie id is
//! an empty feedback set, not an error.

use tracing::debug;

use crate::{
    models::{Analytics, Breakdown, Feedback, Sentiment, Trend},
    store::{Store, StoreResult},
};

/// Current time at minute resolution, the format every record timestamp uses.
pub fn minute_timestamp() -> String {
    jiff::Zoned::now().strftime("%Y-%m-%d %H:%M").to_string()
}

/// Mean of the ratings rounded to one decimal, 0.0 when there are none.
///
/// Rounds the exact binary value of the mean with ties to even, so 3.25
/// becomes 3.2 and 3.75 becomes 3.8. Do not scale by ten and round instead:
/// that rounds the product and gives 2.4 for 2.45.
pub fn mean_rating(feedback: &[Feedback]) -> f64 {
    if feedback.is_empty() {
        return 0.0;
    }
    let sum: i64 = feedback.iter().map(|f| i64::from(f.rating)).sum();
    let mean = sum as f64 / feedback.len() as f64;
    format!("{mean:.1}").parse().unwrap_or(mean)
}

/// Score, trend and breakdown for a non-empty feedback set; the zeroed
/// default for an empty one. All divisions truncate, so the breakdown need
/// not add up to 100.
pub fn compute_analytics(movie_id: &str, feedback: &[Feedback], now: String) -> Analytics {
    if feedback.is_empty() {
        return Analytics::default_for(movie_id);
    }

    let count = |label: Sentiment| feedback.iter().filter(|f| f.sentiment == label).count() as u64;
    let positive = count(Sentiment::Positive);
    let neutral = count(Sentiment::Neutral);
    let negative = count(Sentiment::Negative);
    let total = feedback.len() as u64;

    let score = ((positive * 100 + neutral * 50 + negative * 10) / total) as u32;
    let percent = |n: u64| (n * 100 / total) as u32;

    Analytics {
        movie_id: movie_id.to_string(),
        score,
        breakdown: Breakdown {
            positive: percent(positive),
            neutral: percent(neutral),
            negative: percent(negative),
        },
        trend: Trend::from_score(score),
        last_updated: Some(now),
    }
}

pub async fn recompute_rating(store: &dyn Store, movie_id: &str) -> StoreResult<f64> {
    let feedback = store.list_feedback_by_movie(movie_id).await?;
    let rating = mean_rating(&feedback);
    store.set_rating(movie_id, rating).await?;
    debug!(movie_id = %movie_id, feedback = feedback.len(), rating, "recomputed rating");
    Ok(rating)
}

pub async fn recompute_analytics(store: &dyn Store, movie_id: &str) -> StoreResult<Analytics> {
    let feedback = store.list_feedback_by_movie(movie_id).await?;
    let analytics = compute_analytics(movie_id, &feedback, minute_timestamp());
    store.put_analytics(analytics.clone()).await?;
    debug!(
        movie_id = %movie_id,
        feedback = feedback.len(),
        score = analytics.score,
        trend = %analytics.trend,
        "recomputed analytics"
    );
    Ok(analytics)
}

/// Runs after a feedback record for `movie_id` was inserted.
pub async fn on_feedback_created(store: &dyn Store, movie_id: &str) -> StoreResult<()> {
    recompute_analytics(store, movie_id).await?;
    recompute_rating(store, movie_id).await?;
    Ok(())
}

/// Runs after a feedback record for `movie_id` was removed.
pub async fn on_feedback_deleted(store: &dyn Store, movie_id: &str) -> StoreResult<()> {
    recompute_analytics(store, movie_id).await?;
    recompute_rating(store, movie_id).await?;
    Ok(())
}

/// Pairs a freshly created movie with its zeroed analytics record.
pub async fn on_movie_created(store: &dyn Store, movie_id: &str) -> StoreResult<()> {
    store.put_analytics(Analytics::default_for(movie_id)).await
}

/// Catalog edits never change the feedback set; the rating is recomputed
/// anyway and analytics are left alone.
pub async fn on_movie_edited(store: &dyn Store, movie_id: &str) -> StoreResult<()> {
    recompute_rating(store, movie_id).await?;
    Ok(())
}

/// Removes everything derived from or pointing at the movie, then the movie.
pub async fn on_movie_deleted(store: &dyn Store, movie_id: &str) -> StoreResult<bool> {
    let removed_feedback = store.delete_feedback_by_movie(movie_id).await?;
    store.delete_analytics(movie_id).await?;
    store.remove_favorite_everywhere(movie_id).await?;
    let existed = store.delete_movie(movie_id).await?;
    debug!(movie_id = %movie_id, removed_feedback, existed, "cascaded movie delete");
    Ok(existed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Movie,
        store::{AnalyticsStore, FeedbackStore, MemoryStore, MovieStore},
    };

    fn fb(id: &str, movie_id: &str, rating: i32, sentiment: Sentiment) -> Feedback {
        Feedback {
            id: id.to_string(),
            user_email: "viewer@example.com".to_string(),
            movie_id: movie_id.to_string(),
            rating,
            comment: String::new(),
            sentiment,
            timestamp: "2025-03-01 12:00".to_string(),
        }
    }

    async fn store_with_movie(id: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_movie(Movie {
                id: id.to_string(),
                name: "Jawan".to_string(),
                genre: "Action".to_string(),
                language: "Hindi".to_string(),
                image: String::new(),
                rating: 4.4,
            })
            .await
            .unwrap();
        on_movie_created(&store, id).await.unwrap();
        store
    }

    #[test]
    fn mean_rating_rounds_to_one_decimal() {
        assert_eq!(mean_rating(&[]), 0.0);
        assert_eq!(mean_rating(&[fb("a", "m", 5, Sentiment::Positive)]), 5.0);
        let two = [fb("a", "m", 4, Sentiment::Positive), fb("b", "m", 3, Sentiment::Neutral)];
        assert_eq!(mean_rating(&two), 3.5);
        let three = [
            fb("a", "m", 4, Sentiment::Positive),
            fb("b", "m", 4, Sentiment::Positive),
            fb("c", "m", 5, Sentiment::Positive),
        ];
        assert_eq!(mean_rating(&three), 4.3);
    }

    #[test]
    fn mean_rating_ties_round_to_even() {
        let ratings = |rs: &[i32]| {
            rs.iter()
                .enumerate()
                .map(|(i, r)| fb(&i.to_string(), "m", *r, Sentiment::Neutral))
                .collect::<Vec<_>>()
        };
        // 3.25 and 3.75 are exact in binary
        assert_eq!(mean_rating(&ratings(&[4, 3, 3, 3])), 3.2);
        assert_eq!(mean_rating(&ratings(&[4, 4, 4, 3])), 3.8);
        assert_eq!(mean_rating(&ratings(&[2, 1, 1, 1])), 1.2);
        assert_eq!(mean_rating(&ratings(&[5, 4, 4, 4])), 4.2);
    }

    #[test]
    fn score_truncates_and_seventy_five_is_stable() {
        let set = [fb("a", "m", 4, Sentiment::Positive), fb("b", "m", 3, Sentiment::Neutral)];
        let a = compute_analytics("m", &set, "2025-03-01 12:00".to_string());
        assert_eq!(a.score, 75);
        assert_eq!(a.trend, Trend::Stable);
        assert_eq!(a.breakdown, Breakdown { positive: 50, neutral: 50, negative: 0 });
        assert_eq!(a.last_updated.as_deref(), Some("2025-03-01 12:00"));
    }

    #[test]
    fn breakdown_is_truncated_independently() {
        let set = [
            fb("a", "m", 5, Sentiment::Positive),
            fb("b", "m", 3, Sentiment::Neutral),
            fb("c", "m", 1, Sentiment::Negative),
        ];
        let a = compute_analytics("m", &set, String::new());
        // (100 + 50 + 10) / 3 = 53.33
        assert_eq!(a.score, 53);
        assert_eq!(a.trend, Trend::Stable);
        assert_eq!(a.breakdown, Breakdown { positive: 33, neutral: 33, negative: 33 });
    }

    #[test]
    fn all_negative_trends_down() {
        let set = [fb("a", "m", 1, Sentiment::Negative), fb("b", "m", 2, Sentiment::Negative)];
        let a = compute_analytics("m", &set, String::new());
        assert_eq!(a.score, 10);
        assert_eq!(a.trend, Trend::TrendingDown);
        assert_eq!(a.breakdown.negative, 100);
    }

    #[test]
    fn empty_set_yields_default_payload() {
        assert_eq!(compute_analytics("m", &[], "now".to_string()), Analytics::default_for("m"));
    }

    #[tokio::test]
    async fn movie_without_feedback_gets_zero_rating_and_default_analytics() {
        let store = store_with_movie("m1").await;

        assert_eq!(recompute_rating(&store, "m1").await.unwrap(), 0.0);
        recompute_analytics(&store, "m1").await.unwrap();

        assert_eq!(store.get_movie("m1").await.unwrap().unwrap().rating, 0.0);
        assert_eq!(store.get_analytics("m1").await.unwrap(), Some(Analytics::default_for("m1")));
    }

    #[tokio::test]
    async fn feedback_created_updates_rating_and_analytics() {
        let store = store_with_movie("m1").await;
        store.insert_feedback(fb("f1", "m1", 4, Sentiment::Positive)).await.unwrap();
        store.insert_feedback(fb("f2", "m1", 3, Sentiment::Neutral)).await.unwrap();
        store.insert_feedback(fb("f3", "other", 1, Sentiment::Negative)).await.unwrap();

        on_feedback_created(&store, "m1").await.unwrap();

        assert_eq!(store.get_movie("m1").await.unwrap().unwrap().rating, 3.5);
        let analytics = store.get_analytics("m1").await.unwrap().unwrap();
        assert_eq!(analytics.score, 75);
        assert!(analytics.last_updated.is_some());
    }

    #[tokio::test]
    async fn deleting_last_feedback_resets_to_defaults() {
        let store = store_with_movie("m1").await;
        store.insert_feedback(fb("f1", "m1", 5, Sentiment::Positive)).await.unwrap();
        on_feedback_created(&store, "m1").await.unwrap();

        store.delete_feedback("f1").await.unwrap();
        on_feedback_deleted(&store, "m1").await.unwrap();

        assert_eq!(store.get_movie("m1").await.unwrap().unwrap().rating, 0.0);
        assert_eq!(store.get_analytics("m1").await.unwrap(), Some(Analytics::default_for("m1")));
    }

    #[tokio::test]
    async fn recomputation_is_idempotent() {
        let store = store_with_movie("m1").await;
        store.insert_feedback(fb("f1", "m1", 2, Sentiment::Negative)).await.unwrap();
        store.insert_feedback(fb("f2", "m1", 5, Sentiment::Positive)).await.unwrap();

        let first = recompute_rating(&store, "m1").await.unwrap();
        let second = recompute_rating(&store, "m1").await.unwrap();
        assert_eq!(first, second);

        let a = recompute_analytics(&store, "m1").await.unwrap();
        let b = recompute_analytics(&store, "m1").await.unwrap();
        assert_eq!(a.score, b.score);
        assert_eq!(a.breakdown, b.breakdown);
        assert_eq!(a.trend, b.trend);
    }

    #[tokio::test]
    async fn unknown_movie_is_treated_as_empty() {
        let store = MemoryStore::new();
        assert_eq!(recompute_rating(&store, "ghost").await.unwrap(), 0.0);
        let a = recompute_analytics(&store, "ghost").await.unwrap();
        assert_eq!(a, Analytics::default_for("ghost"));
    }

    #[tokio::test]
    async fn movie_edit_leaves_analytics_alone() {
        let store = store_with_movie("m1").await;
        store.insert_feedback(fb("f1", "m1", 4, Sentiment::Positive)).await.unwrap();

        on_movie_edited(&store, "m1").await.unwrap();

        assert_eq!(store.get_movie("m1").await.unwrap().unwrap().rating, 4.0);
        assert_eq!(store.get_analytics("m1").await.unwrap(), Some(Analytics::default_for("m1")));
    }

    #[tokio::test]
    async fn movie_delete_cascades() {
        let store = store_with_movie("m1").await;
        store.insert_feedback(fb("f1", "m1", 4, Sentiment::Positive)).await.unwrap();
        store.insert_feedback(fb("f2", "m2", 4, Sentiment::Positive)).await.unwrap();

        assert!(on_movie_deleted(&store, "m1").await.unwrap());

        assert!(store.get_movie("m1").await.unwrap().is_none());
        assert!(store.get_analytics("m1").await.unwrap().is_none());
        assert!(store.list_feedback_by_movie("m1").await.unwrap().is_empty());
        assert_eq!(store.list_feedback_by_movie("m2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn created_movie_has_zero_score_analytics() {
        let store = store_with_movie("m1").await;
        let a = store.get_analytics("m1").await.unwrap().unwrap();
        assert_eq!(a.score, 0);
    }
}
