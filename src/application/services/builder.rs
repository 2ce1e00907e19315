//! Tree builder: expands Earth into continents, countries and subdivisions.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::resolver::ChildResolver;
use crate::application::ApplicationResult;
use crate::domain::{RegionTree, EARTH_ID};

/// Builds the three-level world tree.
///
/// Depth is fixed: subdivisions are always leaves, even where GeoNames would
/// report further children for them.
pub struct TreeBuilder {
    resolver: Arc<dyn ChildResolver>,
}

impl TreeBuilder {
    pub fn new(resolver: Arc<dyn ChildResolver>) -> Self {
        Self { resolver }
    }

    /// Run all three stages. Any resolver error aborts the build; no partial
    /// tree is returned.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self) -> ApplicationResult<RegionTree> {
        let mut tree = RegionTree::new();
        let root = tree.root();

        for continent in self.resolver.children(EARTH_ID)? {
            debug!("continent: {}", continent);
            let continent_id = continent.id;
            let continent_idx = tree.add_child(root, continent)?;

            for country in self.resolver.children(continent_id)? {
                debug!("country: {}", country);
                let country_id = country.id;
                let country_idx = tree.add_child(continent_idx, country)?;

                for subdivision in self.resolver.children(country_id)? {
                    tree.add_child(country_idx, subdivision)?;
                }
            }
        }

        let stats = tree.stats();
        info!(
            continents = stats.continents,
            countries = stats.countries,
            subdivisions = stats.subdivisions,
            "region tree built"
        );
        Ok(tree)
    }
}
