use agency::kernel::server::ApiState;
use agency::server::router::{contact_router, seo_router, system_router};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "Agency API", description = "Contact submissions, crawler documents and health."),
    modifiers(&BearerAuth)
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();
    let static_dir = state.config.site.static_dir.clone();
    let security = state.security.clone();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .nest("/api", system_router().merge(contact_router()))
        .merge(seo_router())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api/docs", api_doc);

    // Static assets stay outside the per-IP budget; every response is hardened.
    let mut app = security.rate_limited(Router::new().merge(openapi_routes).merge(scalar_routes));
    if let Some(dir) = static_dir {
        app = app.merge(Router::new().fallback_service(ServeDir::new(dir)));
    }

    security.harden(app).layer(TraceLayer::new_for_http())
}
