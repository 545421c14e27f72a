// src/handlers/tracker.rs

use axum::{http::header, response::IntoResponse};

const TRACKER: &str = "\
## Build out UI with `option` tab for user input
- Prompt
- Document
- Video
- Image

## Display generated quiz
- Grid layout
- arrow button to navigate

## Backend
- Implement user authentication
- Create database schema
- Set up API endpoints
";

/// Serves the project checklist as markdown.
pub async fn get_tracker() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], TRACKER)
}
