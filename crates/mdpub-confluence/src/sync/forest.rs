//! Page hierarchy and deploy order.
//!
//! Pages refer to their parent by title. A page whose parent title matches
//! another page in the run becomes that page's child; every other page is a
//! root. Parents missing from the run are looked up on the wiki at deploy
//! time.

use std::collections::{HashMap, HashSet};

use super::PageModel;

/// Pages of a run with parent/child links.
#[derive(Debug)]
pub struct Forest {
    pages: Vec<PageModel>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

/// One step of the deploy walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Deploy the page below `parent`, a page deployed earlier in the walk.
    Deploy {
        index: usize,
        parent: Option<usize>,
        depth: usize,
    },
    /// Same title as the page at `first`; not deployed.
    Duplicate { index: usize, first: usize },
}

/// Deploy order for a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Pages in deploy order: preorder, siblings in input order.
    pub visits: Vec<Visit>,
    /// Pages whose parent chain loops back on itself.
    pub cycles: Vec<usize>,
}

impl Forest {
    /// Link pages to their parents by title.
    ///
    /// When several pages share a title, children attach to the first one,
    /// which is the one that gets deployed.
    #[must_use]
    pub fn build(pages: Vec<PageModel>) -> Self {
        let mut by_title: HashMap<&str, usize> = HashMap::new();
        for (index, page) in pages.iter().enumerate() {
            by_title.entry(page.title.as_str()).or_insert(index);
        }

        let mut children = vec![Vec::new(); pages.len()];
        let mut roots = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            match page
                .parent_title
                .as_deref()
                .and_then(|parent| by_title.get(parent))
            {
                Some(&parent) => children[parent].push(index),
                None => roots.push(index),
            }
        }

        Self {
            pages,
            children,
            roots,
        }
    }

    #[must_use]
    pub fn page(&self, index: usize) -> &PageModel {
        &self.pages[index]
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> &mut PageModel {
        &mut self.pages[index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Compute the deploy order.
    ///
    /// Depth-first from each root, so a page always comes after its parent.
    /// The first page with a title is deployed; later pages with the same
    /// title are reported as duplicates and their subtrees are not entered.
    #[must_use]
    pub fn walk(&self) -> Walk {
        let mut visits = Vec::with_capacity(self.pages.len());
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut reached: HashSet<usize> = HashSet::new();

        // (index, parent, depth); pushed in reverse so pops follow input order
        let mut stack: Vec<(usize, Option<usize>, usize)> =
            self.roots.iter().rev().map(|&root| (root, None, 0)).collect();

        while let Some((index, parent, depth)) = stack.pop() {
            reached.insert(index);
            let title = self.pages[index].title.as_str();

            if let Some(&first) = seen.get(title) {
                visits.push(Visit::Duplicate { index, first });
                continue;
            }
            seen.insert(title, index);
            visits.push(Visit::Deploy {
                index,
                parent,
                depth,
            });

            for &child in self.children[index].iter().rev() {
                stack.push((child, Some(index), depth + 1));
            }
        }

        let cycles = (0..self.pages.len())
            .filter(|index| !reached.contains(index))
            .collect();

        Walk { visits, cycles }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn page(title: &str, parent: Option<&str>) -> PageModel {
        PageModel {
            title: title.to_owned(),
            parent_title: parent.map(ToOwned::to_owned),
            space: "ENG".to_owned(),
            slug: title.to_lowercase(),
            labels: vec![],
            markup: String::new(),
            attachments: vec![],
            source: PathBuf::from(format!("{}.md", title.to_lowercase())),
            remote_id: None,
        }
    }

    fn deployed(walk: &Walk) -> Vec<(usize, Option<usize>)> {
        walk.visits
            .iter()
            .filter_map(|visit| match *visit {
                Visit::Deploy { index, parent, .. } => Some((index, parent)),
                Visit::Duplicate { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_chain_deploys_parents_first() {
        // Input order deliberately reversed
        let forest = Forest::build(vec![
            page("C", Some("B")),
            page("B", Some("A")),
            page("A", None),
        ]);
        let walk = forest.walk();
        assert_eq!(deployed(&walk), vec![(2, None), (1, Some(2)), (0, Some(1))]);
        assert!(walk.cycles.is_empty());
    }

    #[test]
    fn test_depth() {
        let forest = Forest::build(vec![page("A", None), page("B", Some("A"))]);
        assert_eq!(
            forest.walk().visits,
            vec![
                Visit::Deploy {
                    index: 0,
                    parent: None,
                    depth: 0
                },
                Visit::Deploy {
                    index: 1,
                    parent: Some(0),
                    depth: 1
                },
            ]
        );
    }

    #[test]
    fn test_siblings_in_input_order() {
        let forest = Forest::build(vec![
            page("Root", None),
            page("One", Some("Root")),
            page("Other", None),
            page("Two", Some("Root")),
            page("Deep", Some("One")),
        ]);
        assert_eq!(
            deployed(&forest.walk()),
            vec![
                (0, None),
                (1, Some(0)),
                (4, Some(1)),
                (3, Some(0)),
                (2, None)
            ]
        );
    }

    #[test]
    fn test_unknown_parent_is_root() {
        let forest = Forest::build(vec![page("Child", Some("Remote Parent"))]);
        assert_eq!(deployed(&forest.walk()), vec![(0, None)]);
    }

    #[test]
    fn test_duplicate_title_skipped() {
        let forest = Forest::build(vec![
            page("Setup Guide", None),
            page("Setup Guide", None),
            page("Child", Some("Setup Guide")),
        ]);
        let walk = forest.walk();
        assert_eq!(
            walk.visits,
            vec![
                Visit::Deploy {
                    index: 0,
                    parent: None,
                    depth: 0
                },
                Visit::Deploy {
                    index: 2,
                    parent: Some(0),
                    depth: 1
                },
                Visit::Duplicate { index: 1, first: 0 },
            ]
        );
    }

    #[test]
    fn test_cycles_reported() {
        let forest = Forest::build(vec![
            page("A", Some("B")),
            page("B", Some("A")),
            page("Self", Some("Self")),
            page("Fine", None),
        ]);
        let walk = forest.walk();
        assert_eq!(deployed(&walk), vec![(3, None)]);
        assert_eq!(walk.cycles, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty() {
        let forest = Forest::build(vec![]);
        assert!(forest.is_empty());
        assert_eq!(
            forest.walk(),
            Walk {
                visits: vec![],
                cycles: vec![]
            }
        );
    }
}
