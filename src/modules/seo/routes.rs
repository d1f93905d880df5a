use crate::config::app_config;
use crate::modules::common::responses::{internal_error_res, SimpleError};
use crate::modules::vehicle::repository::available_vehicle_ids;
use crate::server::controller::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::get,
    Router,
};

/// storefront pages every sitemap links to regardless of inventory
const STOREFRONT_PAGES: &[&str] = &["/", "/inventory", "/financing", "/contact"];

pub fn create_seo_router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
}

fn base_url() -> String {
    app_config().public_url.trim_end_matches('/').to_string()
}

fn build_sitemap(public_url: &str, vehicle_ids: &[i32]) -> String {
    let mut xml = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    ));

    for page in STOREFRONT_PAGES {
        xml.push_str(&format!("  <url><loc>{}{}</loc></url>\n", public_url, page));
    }

    for id in vehicle_ids {
        xml.push_str(&format!(
            "  <url><loc>{}/vehicles/{}</loc></url>\n",
            public_url, id
        ));
    }

    xml.push_str("</urlset>\n");

    xml
}

fn build_robots(public_url: &str) -> String {
    format!(
        "User-agent: *\nDisallow: /admin\nDisallow: /api\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        public_url
    )
}

/// Sitemap covering the storefront pages and every vehicle that is not sold
pub async fn sitemap(
    State(state): State<AppState>,
) -> Result<([(header::HeaderName, &'static str); 1], String), (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let ids = available_vehicle_ids(conn)
        .await
        .or(Err(internal_error_res()))?;

    Ok((
        [(header::CONTENT_TYPE, "application/xml")],
        build_sitemap(&base_url(), &ids),
    ))
}

pub async fn robots() -> ([(header::HeaderName, &'static str); 1], String) {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        build_robots(&base_url()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sitemap_lists_storefront_pages_and_vehicles() {
        let xml = build_sitemap("https://example.com", &[1, 7]);

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/inventory</loc>"));
        assert!(xml.contains("<loc>https://example.com/vehicles/1</loc>"));
        assert!(xml.contains("<loc>https://example.com/vehicles/7</loc>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn robots_points_crawlers_at_the_sitemap() {
        let txt = build_robots("https://example.com");

        assert!(txt.contains("Disallow: /admin"));
        assert!(txt.contains("Sitemap: https://example.com/sitemap.xml"));
    }
}
