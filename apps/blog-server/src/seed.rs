//! Startup seeding of categories and locations.
//!
//! `BLOG_CATALOG` points at a JSON file shaped like `fixtures/catalog.json`;
//! without it the bundled catalog is inserted.

use std::fs;

use blogicum_core::service::{Catalog, SeedReport};
use blogicum_core::{BlogService, DomainError};

const DEFAULT_CATALOG: &str = include_str!("../fixtures/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The catalog at `path`, or the bundled one.
pub fn load_catalog(path: Option<&str>) -> Result<Catalog, SeedError> {
    let raw = match path {
        Some(path) => fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_string(),
            source,
        })?,
        None => DEFAULT_CATALOG.to_string(),
    };

    Ok(serde_json::from_str(&raw)?)
}

pub async fn seed(blog: &BlogService, path: Option<&str>) -> Result<SeedReport, SeedError> {
    let catalog = load_catalog(path)?;
    let report = blog.seed_catalog(catalog).await?;

    tracing::info!(
        categories = report.categories_created,
        locations = report.locations_created,
        "Catalog seeded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use blogicum_infra::InMemoryBlogStore;

    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = load_catalog(None).unwrap();

        assert!(!catalog.categories.is_empty());
        assert!(!catalog.locations.is_empty());
        assert!(catalog.categories.iter().all(|c| c.is_published));

        let slugs: HashSet<&str> = catalog.categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs.len(), catalog.categories.len());
    }

    #[test]
    fn test_missing_catalog_file_is_reported() {
        let err = load_catalog(Some("/nonexistent/catalog.json")).unwrap_err();

        assert!(matches!(err, SeedError::Read { .. }));
    }

    #[actix_web::test]
    async fn test_seed_fills_an_empty_store_once() {
        let blog = BlogService::new(Arc::new(InMemoryBlogStore::new()).repositories());

        let first = seed(&blog, None).await.unwrap();
        let again = seed(&blog, None).await.unwrap();

        assert_eq!(first.categories_created, 3);
        assert_eq!(first.locations_created, 3);
        assert_eq!(again, SeedReport::default());
    }
}
