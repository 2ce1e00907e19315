//! Text and graph exports of a built region tree.
//!
//! All exports walk the tree read-only; none of them touch the resolver.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{Region, RegionNode, RegionTree, SiblingOrder};
use crate::infrastructure::fs::write_atomic;

const INDENT: &str = "  ";

/// Totals written at the end of the text report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub countries: usize,
    pub subdivisions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ExportService {
    order: SiblingOrder,
}

impl ExportService {
    pub fn new(order: SiblingOrder) -> Self {
        Self { order }
    }

    fn ordered<'a>(&self, tree: &'a RegionTree, idx: Index) -> Vec<&'a RegionNode> {
        let children = tree.children(idx);
        match self.order {
            SiblingOrder::Received => children.collect(),
            SiblingOrder::Id => children.sorted_by_key(|n| n.region.id).collect(),
            SiblingOrder::Name => children
                .sorted_by(|a, b| {
                    a.region
                        .name
                        .cmp(&b.region.name)
                        .then(a.region.id.cmp(&b.region.id))
                })
                .collect(),
        }
    }

    /// Indented report: root, continents, countries and subdivisions at one
    /// indent step per level, then a summary line.
    pub fn write_report<W: Write + ?Sized>(
        &self,
        tree: &RegionTree,
        out: &mut W,
    ) -> io::Result<ReportSummary> {
        let mut summary = ReportSummary::default();
        writeln!(out, "{}", tree.root_node().region)?;
        for continent in self.ordered(tree, tree.root()) {
            writeln!(out, "{}{}", INDENT, continent.region)?;
            for country in self.ordered(tree, continent.index) {
                writeln!(out, "{}{}", INDENT.repeat(2), country.region)?;
                summary.countries += 1;
                for subdivision in self.ordered(tree, country.index) {
                    writeln!(out, "{}{}", INDENT.repeat(3), subdivision.region)?;
                    summary.subdivisions += 1;
                }
            }
        }
        writeln!(
            out,
            "Num countries : {}, num states: {}",
            summary.countries, summary.subdivisions
        )?;
        Ok(summary)
    }

    /// Continents and countries as a single digraph.
    pub fn write_dot<W: Write + ?Sized>(&self, tree: &RegionTree, out: &mut W) -> io::Result<()> {
        let root = &tree.root_node().region;
        writeln!(out, "digraph worldtree {{")?;
        for continent in self.ordered(tree, tree.root()) {
            write_edge(out, root, &continent.region)?;
            for country in self.ordered(tree, continent.index) {
                write_edge(out, &continent.region, &country.region)?;
            }
        }
        writeln!(out, "}}")
    }

    /// One continent's subtree down to subdivisions, rooted at Earth.
    pub fn write_continent_dot<W: Write + ?Sized>(
        &self,
        tree: &RegionTree,
        continent: &RegionNode,
        out: &mut W,
    ) -> io::Result<()> {
        let root = &tree.root_node().region;
        writeln!(out, "digraph {} {{", quote(&continent.region))?;
        write_edge(out, root, &continent.region)?;
        for country in self.ordered(tree, continent.index) {
            write_edge(out, &continent.region, &country.region)?;
            for subdivision in self.ordered(tree, country.index) {
                write_edge(out, &country.region, &subdivision.region)?;
            }
        }
        writeln!(out, "}}")
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn report_to_file(
        &self,
        tree: &RegionTree,
        path: &Path,
    ) -> ApplicationResult<ReportSummary> {
        write_atomic(path, |w| self.write_report(tree, w)).with_path_context("write report", path)
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn dot_to_file(&self, tree: &RegionTree, path: &Path) -> ApplicationResult<()> {
        write_atomic(path, |w| self.write_dot(tree, w)).with_path_context("write graph", path)
    }

    /// Write `<continent label>.dot` per continent into `dir`; returns the paths written.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn continent_dots_to_dir(
        &self,
        tree: &RegionTree,
        dir: &Path,
    ) -> ApplicationResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for continent in self.ordered(tree, tree.root()) {
            let path = dir.join(continent_file_name(&continent.region));
            write_atomic(&path, |w| self.write_continent_dot(tree, continent, w))
                .with_path_context("write continent graph", &path)?;
            debug!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Box-drawing rendering for the terminal.
    pub fn to_termtree(&self, tree: &RegionTree) -> Tree<String> {
        self.subtree(tree, tree.root_node())
    }

    fn subtree(&self, tree: &RegionTree, node: &RegionNode) -> Tree<String> {
        let leaves: Vec<_> = self
            .ordered(tree, node.index)
            .into_iter()
            .map(|child| self.subtree(tree, child))
            .collect();
        Tree::new(node.region.to_string()).with_leaves(leaves)
    }
}

fn write_edge<W: Write + ?Sized>(out: &mut W, from: &Region, to: &Region) -> io::Result<()> {
    writeln!(out, "{} -> {};", quote(from), quote(to))
}

/// Double-quoted graph identifier.
fn quote(region: &Region) -> String {
    let label = region.to_string().replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{label}\"")
}

fn continent_file_name(region: &Region) -> String {
    let label: String = region
        .to_string()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    format!("{label}.dot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    fn region(id: i64, name: &str) -> Region {
        Region::new(id, name, name, Coordinate::new(0.0, 0.0))
    }

    #[test]
    fn given_quote_in_name_when_quoting_then_escaped() {
        assert_eq!(quote(&region(1, "Côte \"d'Ivoire\"")), r#""Côte \"d'Ivoire\" (1)""#);
    }

    #[test]
    fn given_slash_in_name_when_naming_file_then_replaced() {
        assert_eq!(continent_file_name(&region(2, "A/B")), "A_B (2).dot");
    }

    #[test]
    fn given_id_order_when_listing_children_then_sorted() {
        let mut tree = RegionTree::new();
        let root = tree.root();
        tree.add_child(root, region(9, "Zeta")).unwrap();
        tree.add_child(root, region(3, "Alpha")).unwrap();

        let by_id: Vec<_> = ExportService::new(SiblingOrder::Id)
            .ordered(&tree, root)
            .iter()
            .map(|n| n.region.id)
            .collect();
        assert_eq!(by_id, [3, 9]);

        let received: Vec<_> = ExportService::default()
            .ordered(&tree, root)
            .iter()
            .map(|n| n.region.id)
            .collect();
        assert_eq!(received, [9, 3]);
    }
}
