//! The site/hopping model the renderer walks.
//!
//! Two representations exist side by side:
//! - [`Builder`]: mutable, keyed by [`Site`], leads are attached builders
//!   carrying their own [`TranslationalSymmetry`]
//! - [`FiniteSystem`]: compiled, sites numbered and hoppings stored as a
//!   compressed adjacency [`Graph`]

pub mod builder;
pub mod finalized;
pub mod graph;
pub mod symmetry;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use builder::{Builder, BuilderLead, Lead};
pub use finalized::{FinalizedLead, FiniteSystem, InfiniteSystem};
pub use graph::{Graph, GraphBuilder};
pub use symmetry::TranslationalSymmetry;

#[derive(Debug)]
struct GroupData {
    name: String,
    prim_vecs: Vec<Vec<f64>>,
    offset: Vec<f64>,
    /// Bit patterns of `prim_vecs` then `offset`, for exact comparison
    geometry: Vec<Vec<u64>>,
}

/// Bit pattern of a coordinate, with both zeros mapped to one value
fn coordinate_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// A family of sites sharing a geometry, e.g. one sublattice.
///
/// Groups are cheap to clone. Two groups are equal when both their name and
/// their geometry match; they sort by name first. The name is the text shown
/// in advisories.
#[derive(Clone)]
pub struct Group(Arc<GroupData>);

impl Group {
    /// A Bravais lattice: `pos(tag) = offset + Σ tag[i] * prim_vecs[i]`.
    pub fn new(name: impl Into<String>, prim_vecs: Vec<Vec<f64>>, offset: Vec<f64>) -> Self {
        let geometry = prim_vecs
            .iter()
            .chain(std::iter::once(&offset))
            .map(|v| v.iter().copied().map(coordinate_bits).collect())
            .collect();
        Group(Arc::new(GroupData {
            name: name.into(),
            prim_vecs,
            offset,
            geometry,
        }))
    }

    /// Square lattice with lattice constant `a`, anchored at the origin.
    pub fn square(name: impl Into<String>, a: f64) -> Self {
        Self::new(name, vec![vec![a, 0.0], vec![0.0, a]], vec![0.0, 0.0])
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Number of real-space coordinates of the sites in this group
    pub fn dim(&self) -> usize {
        self.0.offset.len()
    }

    /// The site of this group with the given tag
    pub fn site(&self, tag: impl Into<Vec<i64>>) -> Site {
        Site::new(self.clone(), tag)
    }

    /// Real-space position of `tag`
    pub fn pos(&self, tag: &[i64]) -> Vec<f64> {
        let mut pos = self.0.offset.clone();
        for (&n, vec) in tag.iter().zip(&self.0.prim_vecs) {
            for (coord, component) in pos.iter_mut().zip(vec) {
                *coord += n as f64 * component;
            }
        }
        pos
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name == other.0.name && self.0.geometry == other.0.geometry)
    }
}

impl Eq for Group {}

impl Hash for Group {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.geometry.hash(state);
    }
}

impl PartialOrd for Group {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Group {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .name
            .cmp(&other.0.name)
            .then_with(|| self.0.geometry.cmp(&other.0.geometry))
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({:?})", self.0.name)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// A lattice site: a group plus integer coordinates within it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Site {
    group: Group,
    tag: Vec<i64>,
}

impl Site {
    pub fn new(group: Group, tag: impl Into<Vec<i64>>) -> Self {
        Site {
            group,
            tag: tag.into(),
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn tag(&self) -> &[i64] {
        &self.tag
    }

    /// Intrinsic real-space position, used unless a plot overrides it
    pub fn pos(&self) -> Vec<f64> {
        self.group.pos(&self.tag)
    }

    /// The same site family at another tag
    pub(crate) fn with_tag(&self, tag: Vec<i64>) -> Site {
        Site {
            group: self.group.clone(),
            tag,
        }
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.group.name(), self.tag)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_group_positions() {
        let g = Group::square("a", 2.0);
        assert_eq!(g.site([1, 3]).pos(), vec![2.0, 6.0]);
        assert_eq!(g.dim(), 2);
    }

    #[test]
    fn offset_group_positions() {
        let g = Group::new("b", vec![vec![1.0, 0.0], vec![0.5, 1.0]], vec![0.0, 0.25]);
        assert_eq!(g.pos(&[1, 1]), vec![1.5, 1.25]);
    }

    #[test]
    fn groups_compare_by_name_and_geometry() {
        let a = Group::square("a", 1.0);
        let wide_a = Group::square("a", 3.0);
        let b = Group::square("b", 1.0);
        assert_eq!(a, Group::square("a", 1.0));
        assert_ne!(a, wide_a);
        assert_ne!(a.site([1, 1]), wide_a.site([1, 1]));
        assert_ne!(a, b);
        assert!(a < b);
        assert!(wide_a < b);
        assert_ne!(a.cmp(&wide_a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn same_named_groups_with_distinct_geometry_keep_their_sites() {
        let a = Group::square("a", 1.0);
        let wide_a = Group::square("a", 3.0);
        let mut sys = Builder::new();
        sys.add_site(a.site([1, 1])).unwrap();
        sys.add_site(wide_a.site([1, 1])).unwrap();
        assert_eq!(sys.num_sites(), 2);
        let positions: Vec<_> = sys.sites().map(Site::pos).collect();
        assert_eq!(positions, vec![vec![1.0, 1.0], vec![3.0, 3.0]]);
    }

    #[test]
    fn signed_zero_does_not_split_a_group() {
        let a = Group::new("a", vec![vec![1.0, 0.0]], vec![0.0, 0.0]);
        let also_a = Group::new("a", vec![vec![1.0, -0.0]], vec![-0.0, 0.0]);
        assert_eq!(a, also_a);
    }

    #[test]
    fn site_identity_is_group_and_tag() {
        let a = Group::square("a", 1.0);
        assert_eq!(a.site([0, 1]), a.site(vec![0, 1]));
        assert_ne!(a.site([0, 1]), a.site([1, 0]));
        assert_eq!(format!("{}", a.site([0, 1])), "a[0, 1]");
    }

    #[test]
    fn three_dimensional_group() {
        let g = Group::new(
            "cubic",
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
            vec![0.0, 0.0, 0.0],
        );
        assert_eq!(g.site([1, 2, 3]).pos(), vec![1.0, 2.0, 3.0]);
    }
}
