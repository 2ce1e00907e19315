//! Read access to a built tree plus live lookups through the resolver.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::builder::TreeBuilder;
use crate::application::services::resolver::ChildResolver;
use crate::application::ApplicationResult;
use crate::domain::{DomainResult, GeonameId, Region, RegionNode, RegionTree, EARTH_ID};

/// Owns a fully built [`RegionTree`]; the tree is read-only from here on.
pub struct RegionNavigator {
    tree: RegionTree,
    resolver: Arc<dyn ChildResolver>,
}

impl RegionNavigator {
    pub fn new(tree: RegionTree, resolver: Arc<dyn ChildResolver>) -> Self {
        Self { tree, resolver }
    }

    /// Build the tree with `resolver` and keep the resolver for live lookups.
    pub fn build(resolver: Arc<dyn ChildResolver>) -> ApplicationResult<Self> {
        let tree = TreeBuilder::new(Arc::clone(&resolver)).build()?;
        Ok(Self::new(tree, resolver))
    }

    pub fn tree(&self) -> &RegionTree {
        &self.tree
    }

    pub fn find_by_id(&self, id: GeonameId) -> DomainResult<&RegionNode> {
        self.tree.find_by_id(id)
    }

    /// Live re-fetch; may differ from the tree if upstream data changed.
    pub fn get_children(&self, region: &Region) -> ApplicationResult<Vec<Region>> {
        self.resolver.children(region.id)
    }

    /// All countries, read from the built tree.
    pub fn countries(&self) -> Vec<&Region> {
        self.tree.countries().into_iter().map(|n| &n.region).collect()
    }

    /// All countries, fetched fresh: one call for Earth plus one per continent.
    pub fn fetch_countries(&self) -> ApplicationResult<Vec<Region>> {
        let mut countries = Vec::new();
        for continent in self.resolver.children(EARTH_ID)? {
            let found = self.resolver.children(continent.id)?;
            debug!("{}: {} countries", continent, found.len());
            countries.extend(found);
        }
        Ok(countries)
    }
}
