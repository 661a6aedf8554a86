use std::path::{Path, PathBuf};

use dishpoll_shared::{Catalog, Error, ErrorCode, Notification, NotificationSink, Result};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Remote(String),
    File(PathBuf),
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            CatalogSource::Remote(raw.to_string())
        } else {
            CatalogSource::File(PathBuf::from(raw))
        }
    }
}

fn unavailable(details: impl ToString) -> Error {
    Error::with_details(ErrorCode::SourceUnavailable, "Failed to load dishes", details.to_string())
}

async fn fetch_remote(url: &str) -> Result<Catalog> {
    let response = reqwest::get(url).await.map_err(unavailable)?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("HTTP error! status: {}", status.as_u16())));
    }

    response.json::<Catalog>().await.map_err(unavailable)
}

async fn read_file(path: &Path) -> Result<Catalog> {
    let blob = tokio::fs::read_to_string(path).await
        .map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&blob).map_err(unavailable)
}

/// Loads the whole catalog or fails; a partial catalog is never returned.
pub async fn fetch_dishes(source: &CatalogSource, sink: &dyn NotificationSink) -> Result<Catalog> {
    let result = match source {
        CatalogSource::Remote(url) => fetch_remote(url).await,
        CatalogSource::File(path) => read_file(path).await,
    };

    match result {
        Ok(catalog) => {
            debug!("Loaded {} dishes from {:?}", catalog.len(), source);
            Ok(catalog)
        }
        Err(e) => {
            error!("Error fetching dishes: {}", e);
            sink.notify(Notification::error("Failed to load dishes. Please try again later."));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishpoll_shared::notify::Silent;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DISHES: &str = r#"[
        {"id": 1, "dishName": "Jeera Rice", "description": "Cumin rice", "image": "rice.jpg"},
        {"id": 2, "dishName": "Paneer Tikka", "description": "Grilled paneer", "image": "tikka.jpg"}
    ]"#;

    #[test]
    fn source_is_picked_by_scheme() {
        assert_eq!(CatalogSource::parse("https://x/db.json"), CatalogSource::Remote("https://x/db.json".into()));
        assert_eq!(CatalogSource::parse("db.json"), CatalogSource::File("db.json".into()));
    }

    #[tokio::test]
    async fn fetches_remote_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/db.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(DISHES, "application/json"))
            .mount(&server)
            .await;

        let source = CatalogSource::Remote(format!("{}/db.json", server.uri()));
        let catalog = fetch_dishes(&source, &Silent).await.unwrap();
        let names: Vec<_> = catalog.dishes().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Jeera Rice", "Paneer Tikka"]);
    }

    #[tokio::test]
    async fn server_error_is_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = CatalogSource::Remote(format!("{}/db.json", server.uri()));
        let err = fetch_dishes(&source, &Silent).await.unwrap_err();
        assert!(err.is(ErrorCode::SourceUnavailable));
        assert_eq!(err.details.as_deref(), Some("HTTP error! status: 500"));
    }

    #[tokio::test]
    async fn truncated_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(&DISHES[..40], "application/json"))
            .mount(&server)
            .await;

        let source = CatalogSource::Remote(server.uri());
        let err = fetch_dishes(&source, &Silent).await.unwrap_err();
        assert!(err.is(ErrorCode::SourceUnavailable));
    }

    #[tokio::test]
    async fn reads_local_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("dishes.json");
        std::fs::write(&file, DISHES).unwrap();

        let catalog = fetch_dishes(&CatalogSource::File(file), &Silent).await.unwrap();
        assert_eq!(catalog.find(2).map(|d| d.description.as_str()), Some("Grilled paneer"));

        let missing = CatalogSource::File(dir.path().join("nope.json"));
        assert!(fetch_dishes(&missing, &Silent).await.unwrap_err().is(ErrorCode::SourceUnavailable));
    }
}
