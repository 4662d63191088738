pub mod app_user;
pub mod favorite;
pub mod feedback;
pub mod movie;
pub mod movie_analytics;
