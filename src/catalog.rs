//! Every user and admin action that touches the collections. Each feedback
//! or movie mutation runs its recomputation before returning, and sends its
//! notification last, best-effort.

use std::collections::HashMap;

use axum::http::StatusCode;
use tracing::{debug, info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{
        AdminMovieRow, Analytics, DashboardStats, FavoriteToggle, Feedback, FeedbackHistoryEntry,
        FeedbackRequest, LoginRequest, Movie, MovieCard, MovieDetails, RegisterRequest, User,
        UserDashboard,
    },
    notifier::{Notifier, notify_best_effort},
    processor, sentiment,
    store::{Store, StoreError},
};

pub async fn register(
    store: &dyn Store,
    notifier: &dyn Notifier,
    req: RegisterRequest,
) -> AppResult<User> {
    let email = req.email.trim().to_string();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::rejected(StatusCode::BAD_REQUEST, "email and password are required"));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.clone(),
        name: req.name.trim().to_string(),
        password: req.password,
        favorite_genre: req.favorite_genre,
        age_group: req.age_group,
        favorites: Vec::new(),
    };

    match store.create_user(user.clone()).await {
        Ok(()) => {},
        Err(StoreError::Conflict(_)) => {
            return Err(AppError::rejected(StatusCode::CONFLICT, "User already exists"));
        },
        Err(err) => return Err(err.into()),
    }

    info!(email = %email, "user registered");
    notify_best_effort(
        notifier,
        "New User Registration",
        &format!("User {} ({}) registered on CinemaPulse.", user.name, user.email),
    )
    .await;

    Ok(user)
}

/// Plaintext comparison against the stored password.
pub async fn login(
    store: &dyn Store,
    notifier: &dyn Notifier,
    req: LoginRequest,
) -> AppResult<User> {
    let email = req.email.trim();
    let user = store.get_user(email).await?;
    let Some(user) = user.filter(|u| u.password == req.password) else {
        debug!(email = %email, "rejected login");
        return Err(AppError::rejected(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    };

    notify_best_effort(notifier, "User Login", &format!("User {} logged into CinemaPulse.", email))
        .await;
    Ok(user)
}

pub async fn admin_login(
    notifier: &dyn Notifier,
    admin_email: &str,
    admin_password: &str,
    req: LoginRequest,
) -> AppResult<()> {
    if req.email.trim() != admin_email || req.password != admin_password {
        return Err(AppError::rejected(StatusCode::UNAUTHORIZED, "Invalid admin credentials"));
    }
    notify_best_effort(notifier, "Admin Login", &format!("Admin logged in using {}", admin_email))
        .await;
    Ok(())
}

/// `None` when the user record has gone away.
pub async fn toggle_favorite(
    store: &dyn Store,
    email: &str,
    movie_id: &str,
) -> AppResult<Option<FavoriteToggle>> {
    let Some(user) = store.get_user(email).await? else {
        return Ok(None);
    };

    let mut favorites = user.favorites;
    let is_favorite = match favorites.iter().position(|id| id == movie_id) {
        Some(idx) => {
            favorites.remove(idx);
            false
        },
        None => {
            favorites.push(movie_id.to_string());
            true
        },
    };
    store.set_favorites(email, &favorites).await?;

    Ok(Some(FavoriteToggle { success: true, is_favorite, total_favorites: favorites.len() }))
}

/// Classifies, stores and recomputes. `None` when the movie is unknown.
pub async fn submit_feedback(
    store: &dyn Store,
    notifier: &dyn Notifier,
    user_email: &str,
    req: FeedbackRequest,
) -> AppResult<Option<Feedback>> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::rejected(StatusCode::BAD_REQUEST, "rating must be between 1 and 5"));
    }

    let Some(movie) = store.get_movie(&req.movie_id).await? else {
        warn!(movie_id = %req.movie_id, "feedback for unknown movie ignored");
        return Ok(None);
    };

    let feedback = Feedback {
        id: uuid::Uuid::new_v4().to_string(),
        user_email: user_email.to_string(),
        movie_id: movie.id.clone(),
        rating: req.rating,
        sentiment: sentiment::classify(&req.comment),
        comment: req.comment,
        timestamp: processor::minute_timestamp(),
    };

    store.insert_feedback(feedback.clone()).await?;
    processor::on_feedback_created(store, &movie.id).await?;

    info!(movie_id = %movie.id, sentiment = %feedback.sentiment, "feedback added");
    notify_best_effort(
        notifier,
        "New Feedback Added",
        &format!(
            "User: {}\nMovie: {}\nRating: {}\nSentiment: {}\nComment: {}\n",
            user_email, movie.name, feedback.rating, feedback.sentiment, feedback.comment
        ),
    )
    .await;

    Ok(Some(feedback))
}

/// Returns false when no such feedback exists.
pub async fn delete_feedback(store: &dyn Store, feedback_id: &str) -> AppResult<bool> {
    let Some(feedback) = store.get_feedback(feedback_id).await? else {
        return Ok(false);
    };

    store.delete_feedback(feedback_id).await?;
    processor::on_feedback_deleted(store, &feedback.movie_id).await?;

    info!(feedback_id = %feedback_id, movie_id = %feedback.movie_id, "feedback deleted");
    Ok(true)
}

pub async fn add_movie(
    store: &dyn Store,
    notifier: &dyn Notifier,
    details: MovieDetails,
) -> AppResult<Movie> {
    let details = validate_details(details)?;
    let movie = Movie {
        id: uuid::Uuid::new_v4().to_string(),
        name: details.name,
        genre: details.genre,
        language: details.language,
        image: details.image,
        rating: 0.0,
    };

    store.create_movie(movie.clone()).await?;
    processor::on_movie_created(store, &movie.id).await?;

    info!(movie_id = %movie.id, name = %movie.name, "movie added");
    notify_best_effort(
        notifier,
        "New Movie Added",
        &format!(
            "Admin added a new movie:\n{}\nGenre: {}\nLanguage: {}",
            movie.name, movie.genre, movie.language
        ),
    )
    .await;

    Ok(movie)
}

/// Returns false when the movie does not exist.
pub async fn update_movie(
    store: &dyn Store,
    movie_id: &str,
    details: MovieDetails,
) -> AppResult<bool> {
    let details = validate_details(details)?;
    if !store.update_movie_details(movie_id, &details).await? {
        return Ok(false);
    }
    processor::on_movie_edited(store, movie_id).await?;

    info!(movie_id = %movie_id, name = %details.name, "movie updated");
    Ok(true)
}

/// Cascades to feedback, analytics and favorites. Returns false when the
/// movie does not exist.
pub async fn delete_movie(
    store: &dyn Store,
    notifier: &dyn Notifier,
    movie_id: &str,
) -> AppResult<bool> {
    let Some(movie) = store.get_movie(movie_id).await? else {
        return Ok(false);
    };

    processor::on_movie_deleted(store, movie_id).await?;

    info!(movie_id = %movie_id, name = %movie.name, "movie deleted");
    notify_best_effort(notifier, "Movie Deleted", &format!("Admin deleted movie: {}", movie.name))
        .await;
    Ok(true)
}

/// `None` when the user record has gone away.
pub async fn user_dashboard(store: &dyn Store, email: &str) -> AppResult<Option<UserDashboard>> {
    let Some(user) = store.get_user(email).await? else {
        return Ok(None);
    };

    let (movies, all_feedback, analytics, mut own) = futures::try_join!(
        store.list_movies(),
        store.list_feedback(),
        store.list_analytics(),
        store.list_feedback_by_user(&user.email),
    )?;

    let mut by_movie: HashMap<String, Vec<Feedback>> = HashMap::new();
    for f in &all_feedback {
        by_movie.entry(f.movie_id.clone()).or_default().push(f.clone());
    }
    let mut analytics: HashMap<String, Analytics> =
        analytics.into_iter().map(|a| (a.movie_id.clone(), a)).collect();

    let cards: Vec<MovieCard> = movies
        .into_iter()
        .map(|movie| {
            let mut feedbacks = by_movie.remove(&movie.id).unwrap_or_default();
            feedbacks.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let avg_rating =
                if feedbacks.is_empty() { movie.rating } else { processor::mean_rating(&feedbacks) };
            let analytics =
                analytics.remove(&movie.id).unwrap_or_else(|| Analytics::default_for(&movie.id));
            let is_favorite = user.favorites.contains(&movie.id);
            MovieCard { movie, avg_rating, feedbacks, analytics, is_favorite }
        })
        .collect();

    own.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let feedback_history = own
        .into_iter()
        .map(|feedback| {
            let movie_name = cards
                .iter()
                .find(|c| c.movie.id == feedback.movie_id)
                .map(|c| c.movie.name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            FeedbackHistoryEntry { feedback, movie_name }
        })
        .collect::<Vec<_>>();

    let stats = DashboardStats {
        total_movies: cards.len(),
        total_reviews: feedback_history.len(),
        total_favorites: user.favorites.len(),
    };

    Ok(Some(UserDashboard { user, movies: cards, feedback_history, stats }))
}

pub async fn admin_dashboard(store: &dyn Store) -> AppResult<Vec<AdminMovieRow>> {
    let (movies, all_feedback, analytics) =
        futures::try_join!(store.list_movies(), store.list_feedback(), store.list_analytics())?;

    let mut analytics: HashMap<String, Analytics> =
        analytics.into_iter().map(|a| (a.movie_id.clone(), a)).collect();

    Ok(movies
        .into_iter()
        .map(|movie| {
            let feedbacks =
                all_feedback.iter().filter(|f| f.movie_id == movie.id).cloned().collect();
            let analytics = analytics.remove(&movie.id);
            AdminMovieRow { movie, feedbacks, analytics }
        })
        .collect())
}

fn validate_details(details: MovieDetails) -> AppResult<MovieDetails> {
    let name = details.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::rejected(StatusCode::BAD_REQUEST, "movie name is required"));
    }
    Ok(MovieDetails { name, ..details })
}
