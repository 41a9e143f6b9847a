use axum::response::Html;

/// Landing page with the upload, generate and analyze forms.
pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../../static/index.html"))
}

/// Embedded Swagger UI pointed at `/spec/raw`.
pub async fn viewer_page() -> Html<&'static str> {
    Html(include_str!("../../../static/viewer.html"))
}
