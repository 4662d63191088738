use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::{AdminMovieRow, Analytics, Feedback, MovieCard, Sentiment, UserDashboard};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const FAVORITE_SCRIPT: &str = r#"
document.querySelectorAll('[data-favorite]').forEach((btn) => {
  btn.addEventListener('click', async () => {
    const res = await fetch(btn.dataset.favorite, { method: 'POST' });
    if (!res.ok) return;
    const body = await res.json();
    btn.textContent = body.is_favorite ? '★ Favorite' : '☆ Favorite';
    const total = document.getElementById('total-favorites');
    if (total) total.textContent = body.total_favorites;
  });
});
"#;

const INPUT: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-rose-500 focus:outline-none focus:ring-1 focus:ring-rose-500";
const BUTTON: &str = "rounded-md bg-rose-600 px-4 py-2 font-semibold text-white hover:bg-rose-700";

pub fn index_page(logged_in: bool) -> String {
    page(
        "CinemaPulse",
        html! {
            (nav(logged_in))
            div class="max-w-4xl mx-auto px-6 py-16 text-center" {
                h1 class="text-4xl font-bold text-gray-900" { "CinemaPulse" }
                p class="mt-4 text-lg text-gray-600" { "Rate movies, share what you thought, and see how everyone else feels." }
                div class="mt-8 flex justify-center gap-4" {
                    @if logged_in {
                        a class=(BUTTON) href="/user/dashboard" { "Go to dashboard" }
                    } @else {
                        a class=(BUTTON) href="/register" { "Join" }
                        a class="rounded-md border border-gray-300 px-4 py-2 font-semibold text-gray-700 hover:bg-gray-100" href="/login" { "Log in" }
                    }
                }
            }
        },
    )
}

pub fn about_page() -> String {
    page(
        "About",
        html! {
            (nav(false))
            (panel(html! {
                h1 class="text-3xl font-bold text-gray-900" { "About CinemaPulse" }
                p class="mt-4 text-gray-700" { "A small community for movie reviews. Every review updates the movie's rating and its audience pulse." }
            }))
        },
    )
}

pub fn contact_page() -> String {
    page(
        "Contact",
        html! {
            (nav(false))
            (panel(html! {
                h1 class="text-3xl font-bold text-gray-900" { "Contact" }
                p class="mt-4 text-gray-700" { "Questions or catalog requests? Reach the admin team at the address below." }
                p class="mt-2 font-medium text-gray-900" { "support@cinemapulse.com" }
            }))
        },
    )
}

pub fn register_page() -> String {
    page(
        "Register",
        html! {
            (nav(false))
            (panel(html! {
                h1 class="text-3xl font-bold text-gray-900" { "Create an account" }
                form class="mt-8 space-y-6" method="post" action="/register" {
                    (field("Name", "name", "text"))
                    (field("Email", "email", "email"))
                    (field("Password", "password", "password"))
                    (field("Favorite genre", "favorite_genre", "text"))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="age_group" { "Age group" }
                        select class=(INPUT) name="age_group" id="age_group" {
                            @for group in ["Under 18", "18-25", "26-35", "36-50", "50+"] {
                                option value=(group) { (group) }
                            }
                        }
                    }
                    button class={ "w-full " (BUTTON) } type="submit" { "Register" }
                }
            }))
        },
    )
}

pub fn login_page() -> String {
    credentials_page("Log in", "/login")
}

pub fn admin_login_page() -> String {
    credentials_page("Admin login", "/admin/login")
}

pub fn user_dashboard(dash: &UserDashboard) -> String {
    page(
        "Dashboard",
        html! {
            (nav(true))
            div class="max-w-5xl mx-auto px-6 py-10" {
                h1 class="text-3xl font-bold text-gray-900" { "Welcome, " (dash.user.name) }
                div class="mt-6 grid grid-cols-3 gap-4" {
                    (stat("Movies", html! { (dash.stats.total_movies) }))
                    (stat("Your reviews", html! { (dash.stats.total_reviews) }))
                    (stat("Favorites", html! { span id="total-favorites" { (dash.stats.total_favorites) } }))
                }

                h2 class="mt-10 text-2xl font-semibold text-gray-900" { "Your favorites" }
                @let favorites = dash.favorites().collect::<Vec<_>>();
                @if favorites.is_empty() {
                    p class="mt-2 text-gray-500" { "No favorites yet." }
                } @else {
                    ul class="mt-2 list-disc pl-6 text-gray-700" {
                        @for card in favorites {
                            li { (card.movie.name) }
                        }
                    }
                }

                h2 class="mt-10 text-2xl font-semibold text-gray-900" { "Movies" }
                div class="mt-4 space-y-6" {
                    @for card in &dash.movies {
                        (movie_card(card))
                    }
                }

                h2 class="mt-10 text-2xl font-semibold text-gray-900" { "Your review history" }
                @if dash.feedback_history.is_empty() {
                    p class="mt-2 text-gray-500" { "You have not reviewed anything yet." }
                } @else {
                    ul class="mt-4 space-y-2" {
                        @for entry in &dash.feedback_history {
                            li class="text-sm text-gray-700" {
                                span class="font-medium" { (entry.movie_name) }
                                " · " (entry.feedback.rating) "/5 · " (entry.feedback.comment)
                                span class="text-gray-500" { " (" (entry.feedback.timestamp) ")" }
                            }
                        }
                    }
                }
            }
            script { (PreEscaped(FAVORITE_SCRIPT)) }
        },
    )
}

pub fn admin_dashboard(rows: &[AdminMovieRow]) -> String {
    page(
        "Admin",
        html! {
            nav class="bg-gray-900 text-white" {
                div class="max-w-5xl mx-auto px-6 py-4 flex justify-between" {
                    span class="font-bold" { "CinemaPulse admin" }
                    a class="text-sm hover:text-gray-300" href="/logout" { "Log out" }
                }
            }
            div class="max-w-5xl mx-auto px-6 py-10" {
                div class="bg-white shadow rounded-lg p-6" {
                    h2 class="text-xl font-semibold text-gray-900" { "Add movie" }
                    form class="mt-4 grid gap-4 md:grid-cols-2" method="post" action="/admin/movie/add" {
                        (field("Name", "name", "text"))
                        (field("Genre", "genre", "text"))
                        (field("Language", "language", "text"))
                        (field("Image URL", "image", "url"))
                        button class=(BUTTON) type="submit" { "Add" }
                    }
                }

                div class="mt-8 space-y-6" {
                    @for row in rows {
                        (admin_movie(row))
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-rose-600 hover:text-rose-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · CinemaPulse" }
                script src=(TAILWIND_CDN) {}
            }
            body class="bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn nav(logged_in: bool) -> Markup {
    html! {
        nav class="bg-white shadow" {
            div class="max-w-5xl mx-auto px-6 py-4 flex items-center justify-between" {
                a class="text-xl font-bold text-rose-600" href="/" { "CinemaPulse" }
                div class="flex gap-6 text-sm text-gray-700" {
                    a href="/about" { "About" }
                    a href="/contact" { "Contact" }
                    @if logged_in {
                        a href="/user/dashboard" { "Dashboard" }
                        a href="/logout" { "Log out" }
                    } @else {
                        a href="/login" { "Log in" }
                        a href="/admin/login" { "Admin" }
                    }
                }
            }
        }
    }
}

fn panel(inner: Markup) -> Markup {
    html! {
        div class="max-w-2xl mx-auto px-6 py-12" {
            div class="bg-white shadow rounded-lg p-8" { (inner) }
        }
    }
}

fn field(label: &str, name: &str, kind: &str) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class=(INPUT) type=(kind) name=(name) id=(name) required;
        }
    }
}

fn credentials_page(title: &str, action: &str) -> String {
    page(
        title,
        html! {
            (nav(false))
            (panel(html! {
                h1 class="text-3xl font-bold text-gray-900" { (title) }
                form class="mt-8 space-y-6" method="post" action=(action) {
                    (field("Email", "email", "email"))
                    (field("Password", "password", "password"))
                    button class={ "w-full " (BUTTON) } type="submit" { (title) }
                }
            }))
        },
    )
}

fn stat(label: &str, value: Markup) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-4 text-center" {
            p class="text-sm text-gray-500" { (label) }
            p class="mt-1 text-2xl font-bold text-gray-900" { (value) }
        }
    }
}

fn toggle_url(movie_id: &str) -> String {
    format!("/movie/favorite/toggle/{}", urlencoding::encode(movie_id))
}

fn movie_card(card: &MovieCard) -> Markup {
    let movie = &card.movie;
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            div class="flex gap-6" {
                @if !movie.image.is_empty() {
                    img class="h-36 w-24 rounded object-cover" src=(movie.image) alt=(movie.name);
                }
                div class="flex-1" {
                    div class="flex items-start justify-between gap-4" {
                        div {
                            h3 class="text-xl font-semibold text-gray-900" { (movie.name) }
                            p class="text-sm text-gray-500" { (movie.genre) " · " (movie.language) }
                            p class="mt-1 text-sm text-gray-700" { "Rating " (format!("{:.1}", card.avg_rating)) "/5" }
                        }
                        button class="text-sm text-rose-600" type="button" data-favorite=(toggle_url(&movie.id)) {
                            @if card.is_favorite { "★ Favorite" } @else { "☆ Favorite" }
                        }
                    }
                    (analytics_summary(&card.analytics))

                    form class="mt-4 flex flex-wrap items-end gap-3" method="post" action="/movie/feedback/add" {
                        input type="hidden" name="movie_id" value=(movie.id);
                        select class="rounded-md border border-gray-300 px-2 py-2" name="rating" {
                            @for r in (1..=5).rev() {
                                option value=(r) { (r) " ★" }
                            }
                        }
                        input class="flex-1 rounded-md border border-gray-300 px-3 py-2" name="comment" placeholder="What did you think?" required;
                        button class=(BUTTON) type="submit" { "Review" }
                    }

                    @if !card.feedbacks.is_empty() {
                        ul class="mt-4 space-y-1" {
                            @for fb in &card.feedbacks {
                                (feedback_line(fb))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn admin_movie(row: &AdminMovieRow) -> Markup {
    let movie = &row.movie;
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            div class="flex items-start justify-between gap-4" {
                div {
                    h3 class="text-xl font-semibold text-gray-900" { (movie.name) }
                    p class="text-sm text-gray-500" { (movie.genre) " · " (movie.language) " · rating " (format!("{:.1}", movie.rating)) }
                }
                form method="post" action="/admin/movie/delete" {
                    input type="hidden" name="movie_id" value=(movie.id);
                    button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                }
            }
            @if let Some(analytics) = &row.analytics {
                (analytics_summary(analytics))
            }

            form class="mt-4 grid gap-2 md:grid-cols-5" method="post" action="/admin/movie/update" {
                input type="hidden" name="movie_id" value=(movie.id);
                input class="rounded-md border border-gray-300 px-2 py-1" name="name" value=(movie.name) required;
                input class="rounded-md border border-gray-300 px-2 py-1" name="genre" value=(movie.genre);
                input class="rounded-md border border-gray-300 px-2 py-1" name="language" value=(movie.language);
                input class="rounded-md border border-gray-300 px-2 py-1" name="image" value=(movie.image);
                button class="rounded-md border border-gray-300 px-2 py-1 text-sm hover:bg-gray-100" type="submit" { "Save" }
            }

            @if !row.feedbacks.is_empty() {
                ul class="mt-4 space-y-1" {
                    @for fb in &row.feedbacks {
                        li class="flex items-center justify-between text-sm text-gray-700" {
                            span { (fb.user_email) ": " (fb.rating) "/5 · " (fb.comment) " · " (fb.sentiment) }
                            form method="post" action="/admin/feedback/delete" {
                                input type="hidden" name="feedback_id" value=(fb.id);
                                button class="text-red-600 hover:text-red-800" type="submit" { "Remove" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn analytics_summary(a: &Analytics) -> Markup {
    html! {
        div class="mt-3 flex flex-wrap gap-4 text-sm" {
            span class="font-medium text-gray-900" { "Pulse " (a.score) " · " (a.trend) }
            span class="text-green-700" { (a.breakdown.positive) "% positive" }
            span class="text-gray-600" { (a.breakdown.neutral) "% neutral" }
            span class="text-red-700" { (a.breakdown.negative) "% negative" }
            @if let Some(at) = &a.last_updated {
                span class="text-gray-400" { "updated " (at) }
            }
        }
    }
}

fn feedback_line(fb: &Feedback) -> Markup {
    let tone = match fb.sentiment {
        Sentiment::Positive => "border-green-500",
        Sentiment::Neutral => "border-gray-300",
        Sentiment::Negative => "border-red-500",
    };
    html! {
        li class=(format!("border-l-4 {} pl-3 text-sm text-gray-700", tone)) {
            span class="font-medium" { (fb.rating) "/5" }
            " " (fb.comment)
            span class="text-gray-400" { " · " (fb.timestamp) }
        }
    }
}
