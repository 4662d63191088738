use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Positive" => Some(Sentiment::Positive),
            "Neutral" => Some(Sentiment::Neutral),
            "Negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trend {
    TrendingUp,
    Stable,
    TrendingDown,
}

impl Trend {
    /// Buckets an analytics score: above 75 is up, above 50 is stable, the rest is down.
    pub fn from_score(score: u32) -> Self {
        if score > 75 {
            Trend::TrendingUp
        } else if score > 50 {
            Trend::Stable
        } else {
            Trend::TrendingDown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trend::TrendingUp => "Trending Up",
            Trend::Stable => "Stable",
            Trend::TrendingDown => "Trending Down",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Trending Up" => Some(Trend::TrendingUp),
            "Stable" => Some(Trend::Stable),
            "Trending Down" => Some(Trend::TrendingDown),
            _ => None,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub genre: String,
    pub language: String,
    pub image: String,
    pub rating: f64,
}

/// The admin-editable part of a movie.
#[derive(Clone, Debug, Deserialize)]
pub struct MovieDetails {
    pub name: String,
    pub genre: String,
    pub language: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub id: String,
    pub user_email: String,
    pub movie_id: String,
    pub rating: i32,
    pub comment: String,
    pub sentiment: Sentiment,
    pub timestamp: String,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Breakdown {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Analytics {
    pub movie_id: String,
    pub score: u32,
    pub breakdown: Breakdown,
    pub trend: Trend,
    pub last_updated: Option<String>,
}

impl Analytics {
    /// Zeroed payload for a movie without feedback.
    pub fn default_for(movie_id: &str) -> Self {
        Self {
            movie_id: movie_id.to_string(),
            score: 0,
            breakdown: Breakdown::default(),
            trend: Trend::Stable,
            last_updated: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub favorite_genre: String,
    pub age_group: String,
    pub favorites: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub favorite_genre: String,
    pub age_group: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub movie_id: String,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieUpdateRequest {
    pub movie_id: String,
    #[serde(flatten)]
    pub details: MovieDetails,
}

#[derive(Debug, Deserialize)]
pub struct MovieDeleteRequest {
    pub movie_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackDeleteRequest {
    pub feedback_id: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteToggle {
    pub success: bool,
    pub is_favorite: bool,
    pub total_favorites: usize,
}

/// A movie as shown on the user dashboard.
#[derive(Clone, Debug)]
pub struct MovieCard {
    pub movie: Movie,
    pub avg_rating: f64,
    pub feedbacks: Vec<Feedback>,
    pub analytics: Analytics,
    pub is_favorite: bool,
}

#[derive(Clone, Debug)]
pub struct FeedbackHistoryEntry {
    pub feedback: Feedback,
    pub movie_name: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DashboardStats {
    pub total_movies: usize,
    pub total_reviews: usize,
    pub total_favorites: usize,
}

#[derive(Clone, Debug)]
pub struct UserDashboard {
    pub user: User,
    pub movies: Vec<MovieCard>,
    pub feedback_history: Vec<FeedbackHistoryEntry>,
    pub stats: DashboardStats,
}

impl UserDashboard {
    pub fn favorites(&self) -> impl Iterator<Item = &MovieCard> {
        self.movies.iter().filter(|m| m.is_favorite)
    }
}

/// A movie as shown on the admin dashboard.
#[derive(Clone, Debug)]
pub struct AdminMovieRow {
    pub movie: Movie,
    pub feedbacks: Vec<Feedback>,
    pub analytics: Option<Analytics>,
}
