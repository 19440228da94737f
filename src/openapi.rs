//! OpenAPI document for the HTTP surface.

use crate::handlers::{example, health};
use crate::settings::Settings;
use utoipa::openapi::server::Server;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(health::liveness, health::readiness, example::do_something),
    components(schemas(health::LivenessResponse, example::DoResponse)),
    tags(
        (name = "default", description = "Health checks"),
        (name = "example", description = "Example endpoints")
    )
)]
pub struct ApiDoc;

/// The generated document with title, version and one server per `doc.schemes` entry.
pub fn document(settings: &Settings) -> utoipa::openapi::OpenApi {
    let doc = &settings.doc;
    let mut api = ApiDoc::openapi();
    api.info.title = doc.title.clone();
    api.info.version = doc.version.clone();

    let app = &settings.app;
    let base = app.base_url.trim_end_matches('/');
    let servers = doc
        .schemes
        .iter()
        .map(|scheme| Server::new(format!("{}://{}:{}{}", scheme, app.host, app.port, base)))
        .collect::<Vec<_>>();
    api.servers = (!servers.is_empty()).then_some(servers);
    api
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn servers_follow_schemes_and_base_url() {
        let settings = Settings::from_vars([("APP__BASE_URL", "/api/"), ("APP__HOST", "example.org")]).unwrap();
        let api = document(&settings);
        let urls: Vec<_> = api.servers.unwrap_or_default().into_iter().map(|s| s.url).collect();
        assert_eq!(urls, ["http://example.org:8001/api", "https://example.org:8001/api"]);
    }

    #[test]
    fn no_schemes_means_no_servers() {
        let settings = Settings::from_vars([("DOC__SCHEMES", "[]")]).unwrap();
        assert!(document(&settings).servers.is_none());
    }
}
