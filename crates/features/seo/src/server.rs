//! Serves the rendered documents.

use crate::{Robots, SeoError, Sitemap};
use agency_domain::config::SiteConfig;
use agency_domain::constants::SEO_TAG;
use agency_domain::registry::{FeatureSlice, InitializedSlice};
use agency_kernel::server::ApiState;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::any::Any;
use std::ops::Deref;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// SEO feature state: documents rendered once at startup.
#[derive(Debug)]
pub struct SeoInner {
    pub sitemap_xml: String,
    pub robots_txt: String,
}

#[derive(Debug, Clone)]
pub struct Seo {
    inner: Arc<SeoInner>,
}

impl Seo {
    #[must_use]
    pub fn new(inner: SeoInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for Seo {
    type Target = SeoInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FeatureSlice for Seo {
    fn name(&self) -> &'static str {
        "seo"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Initialize the SEO feature for the configured site origin.
///
/// # Errors
/// Returns an error if the sitemap cannot be rendered.
pub fn init(cfg: &SiteConfig) -> Result<InitializedSlice, SeoError> {
    let sitemap = Sitemap::for_site(&cfg.base_url, Utc::now());
    let slice = Seo::new(SeoInner {
        sitemap_xml: sitemap.to_xml()?,
        robots_txt: Robots::for_site(&cfg.base_url).to_string(),
    });

    tracing::info!(base_url = %cfg.base_url, pages = sitemap.entries.len(), "SEO server slice initialized");
    Ok(InitializedSlice::new(slice))
}

fn document(state: &ApiState, content_type: &'static str, pick: fn(&Seo) -> String) -> Response {
    match state.try_get_slice::<Seo>() {
        Ok(seo) => ([(header::CONTENT_TYPE, content_type)], pick(seo)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "SEO slice not registered");
            StatusCode::NOT_FOUND.into_response()
        },
    }
}

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses((status = OK, description = "sitemaps.org urlset", content_type = "application/xml", body = String)),
    tag = SEO_TAG,
)]
#[allow(clippy::unused_async)]
pub(crate) async fn sitemap_handler(State(state): State<ApiState>) -> Response {
    document(&state, "application/xml", |seo| seo.sitemap_xml.clone())
}

#[utoipa::path(
    get,
    path = "/robots.txt",
    responses((status = OK, description = "Crawler rules", content_type = "text/plain", body = String)),
    tag = SEO_TAG,
)]
#[allow(clippy::unused_async)]
pub(crate) async fn robots_handler(State(state): State<ApiState>) -> Response {
    document(&state, "text/plain; charset=utf-8", |seo| seo.robots_txt.clone())
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(sitemap_handler)).routes(routes!(robots_handler))
}
