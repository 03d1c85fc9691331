use axum::response::Html;

static ADMIN_HTML: &str = include_str!("../web/admin.html");

pub async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_HTML)
}
