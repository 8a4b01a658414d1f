//! Categories and locations the blog starts with.

use serde::Deserialize;

use super::BlogService;
use crate::domain::{NewCategory, NewLocation};
use crate::error::DomainError;

/// Catalog entries to make sure exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<NewCategory>,
    #[serde(default)]
    pub locations: Vec<NewLocation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub locations_created: usize,
}

impl BlogService {
    /// Insert the missing catalog entries.
    ///
    /// Categories are matched by slug and locations by name; existing rows are
    /// left as they are, so running this on every start is safe.
    pub async fn seed_catalog(&self, catalog: Catalog) -> Result<SeedReport, DomainError> {
        let mut report = SeedReport::default();

        for new in catalog.categories {
            if self.repos.categories.find_by_slug(&new.slug).await?.is_some() {
                continue;
            }
            let category = self.repos.categories.create(new).await?;
            tracing::info!(category_id = category.id, slug = %category.slug, "Category seeded");
            report.categories_created += 1;
        }

        for new in catalog.locations {
            if self.repos.locations.find_by_name(&new.name).await?.is_some() {
                continue;
            }
            let location = self.repos.locations.create(new).await?;
            tracing::info!(location_id = location.id, name = %location.name, "Location seeded");
            report.locations_created += 1;
        }

        Ok(report)
    }
}
