use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{GeonameId, Region};
use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based region hierarchy.
#[derive(Debug)]
pub struct RegionNode {
    /// Own position in the arena
    pub index: Index,
    pub region: Region,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Child indices in insertion order
    pub children: Vec<Index>,
    /// 0 for Earth, 1 continents, 2 countries, 3 subdivisions
    pub depth: usize,
}

/// Position of a node in the fixed three-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Root,
    Continent,
    Country,
    Subdivision,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Root => "planet",
            Level::Continent => "continent",
            Level::Country => "country",
            Level::Subdivision => "subdivision",
        };
        f.write_str(name)
    }
}

impl RegionNode {
    pub fn level(&self) -> Level {
        match self.depth {
            0 => Level::Root,
            1 => Level::Continent,
            2 => Level::Country,
            _ => Level::Subdivision,
        }
    }
}

/// Counts per level below the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub continents: usize,
    pub countries: usize,
    pub subdivisions: usize,
}

/// Arena-backed region hierarchy rooted at Earth.
///
/// Nodes are only ever appended, so every `Index` handed out stays valid for
/// the lifetime of the tree.
#[derive(Debug)]
pub struct RegionTree {
    arena: Arena<RegionNode>,
    root: Index,
}

impl Default for RegionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionTree {
    /// A tree holding only the Earth root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert_with(|index| RegionNode {
            index,
            region: Region::earth(),
            parent: None,
            children: Vec::new(),
            depth: 0,
        });
        Self { arena, root }
    }

    /// Append `region` to the children of `parent`. No validation is done on the region.
    #[instrument(level = "trace", skip(self, region), fields(region = %region))]
    pub(crate) fn add_child(&mut self, parent: Index, region: Region) -> DomainResult<Index> {
        let depth = self
            .arena
            .get(parent)
            .map(|p| p.depth + 1)
            .ok_or(DomainError::UnknownNode)?;
        let idx = self.arena.insert_with(|index| RegionNode {
            index,
            region,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(idx);
        }
        Ok(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &RegionNode {
        &self.arena[self.root]
    }

    pub fn node(&self, idx: Index) -> Option<&RegionNode> {
        self.arena.get(idx)
    }

    /// Direct children of `idx` in insertion order.
    pub fn children(&self, idx: Index) -> impl Iterator<Item = &RegionNode> + '_ {
        self.arena
            .get(idx)
            .into_iter()
            .flat_map(move |node| node.children.iter().filter_map(move |&c| self.arena.get(c)))
    }

    pub fn continents(&self) -> Vec<&RegionNode> {
        self.children(self.root).collect()
    }

    pub fn countries(&self) -> Vec<&RegionNode> {
        self.continents()
            .into_iter()
            .flat_map(|continent| self.children(continent.index))
            .collect()
    }

    pub fn subdivisions(&self) -> Vec<&RegionNode> {
        self.countries()
            .into_iter()
            .flat_map(|country| self.children(country.index))
            .collect()
    }

    /// Level-ordered lookup: root, then continents, countries, subdivisions.
    /// First match wins.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_id(&self, id: GeonameId) -> DomainResult<&RegionNode> {
        let root = self.root_node();
        if root.region.id == id {
            return Ok(root);
        }
        let continents = self.continents();
        if let Some(node) = continents.iter().find(|n| n.region.id == id) {
            return Ok(*node);
        }
        let countries = self.countries();
        if let Some(node) = countries.iter().find(|n| n.region.id == id) {
            return Ok(*node);
        }
        self.subdivisions()
            .into_iter()
            .find(|n| n.region.id == id)
            .ok_or(DomainError::RegionNotFound(id))
    }

    /// Chain of nodes from the root down to `idx`, both inclusive.
    pub fn path_to(&self, idx: Index) -> Vec<&RegionNode> {
        let mut path = Vec::new();
        let mut current = self.arena.get(idx);
        while let Some(node) = current {
            path.push(node);
            current = node.parent.and_then(|p| self.arena.get(p));
        }
        path.reverse();
        path
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels including the root.
    pub fn depth(&self) -> usize {
        self.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    pub fn stats(&self) -> TreeStats {
        self.iter().fold(TreeStats::default(), |mut stats, node| {
            match node.depth {
                1 => stats.continents += 1,
                2 => stats.countries += 1,
                3 => stats.subdivisions += 1,
                _ => {}
            }
            stats
        })
    }
}

/// Pre-order traversal, siblings in insertion order.
pub struct TreeIterator<'a> {
    tree: &'a RegionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a RegionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = &'a RegionNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}
