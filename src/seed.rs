use tracing::info;

use crate::{
    models::{Feedback, Movie},
    processor, sentiment,
    store::{Store, StoreResult},
};

const DEMO_MOVIES: &[(&str, &str, &str, &str)] = &[
    ("Jawan", "Action", "Hindi", "https://wallpaperaccess.com/full/9335215.jpg"),
    (
        "Oppenheimer",
        "Drama",
        "English",
        "https://i.pinimg.com/originals/25/74/bc/2574bcaa1d5a9fe6a54e4fd058aefb55.jpg",
    ),
];

const DEMO_FEEDBACK: &[(usize, i32, &str)] = &[
    (0, 4, "Amazing visuals and soundtrack!"),
    (0, 3, "Story was predictable but fun."),
    (1, 5, "Masterpiece storytelling."),
];

const DEMO_REVIEWER: &str = "anonymous@cinemapulse.com";

/// Loads the demo catalog into an empty store; a store that already holds
/// movies is left untouched. Returns whether anything was written.
pub async fn seed_demo(store: &dyn Store) -> StoreResult<bool> {
    if !store.list_movies().await?.is_empty() {
        return Ok(false);
    }

    let mut ids = Vec::with_capacity(DEMO_MOVIES.len());
    for (name, genre, language, image) in DEMO_MOVIES {
        let movie = Movie {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            genre: genre.to_string(),
            language: language.to_string(),
            image: image.to_string(),
            rating: 0.0,
        };
        let id = movie.id.clone();
        store.create_movie(movie).await?;
        processor::on_movie_created(store, &id).await?;
        ids.push(id);
    }

    for (idx, rating, comment) in DEMO_FEEDBACK {
        let feedback = Feedback {
            id: uuid::Uuid::new_v4().to_string(),
            user_email: DEMO_REVIEWER.to_string(),
            movie_id: ids[*idx].clone(),
            rating: *rating,
            comment: comment.to_string(),
            sentiment: sentiment::classify(comment),
            timestamp: processor::minute_timestamp(),
        };
        store.insert_feedback(feedback).await?;
    }

    for id in &ids {
        processor::on_feedback_created(store, id).await?;
    }

    info!(movies = ids.len(), feedback = DEMO_FEEDBACK.len(), "seeded demo catalog");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AnalyticsStore, MemoryStore, MovieStore};

    #[tokio::test]
    async fn seeds_once_with_recomputed_ratings() {
        let store = MemoryStore::new();
        assert!(seed_demo(&store).await.unwrap());
        assert!(!seed_demo(&store).await.unwrap());

        let movies = store.list_movies().await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].name, "Jawan");
        assert_eq!(movies[0].rating, 3.5);
        assert_eq!(movies[1].rating, 5.0);

        // one positive, one negative: (100 + 10) / 2
        let jawan = store.get_analytics(&movies[0].id).await.unwrap().unwrap();
        assert_eq!(jawan.score, 55);
        let opp = store.get_analytics(&movies[1].id).await.unwrap().unwrap();
        assert_eq!(opp.score, 100);
    }
}
