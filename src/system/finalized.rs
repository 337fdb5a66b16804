//! Compiled, index-based systems.

use super::graph::Graph;
use super::{Site, TranslationalSymmetry};

/// A finite system with numbered sites and a hopping graph.
///
/// Every hopping is stored as two directed edges.
#[derive(Debug, Clone)]
pub struct FiniteSystem {
    graph: Graph,
    sites: Vec<Site>,
    leads: Vec<FinalizedLead>,
    lead_interfaces: Vec<Vec<usize>>,
}

impl FiniteSystem {
    pub(crate) fn new(
        graph: Graph,
        sites: Vec<Site>,
        leads: Vec<FinalizedLead>,
        lead_interfaces: Vec<Vec<usize>>,
    ) -> Self {
        FiniteSystem {
            graph,
            sites,
            leads,
            lead_interfaces,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn leads(&self) -> &[FinalizedLead] {
        &self.leads
    }

    /// For each lead, the indices of the system sites it connects to
    pub fn lead_interfaces(&self) -> &[Vec<usize>] {
        &self.lead_interfaces
    }
}

/// A compiled lead.
#[derive(Debug, Clone)]
pub enum FinalizedLead {
    Periodic(InfiniteSystem),
    /// No unit cell is known, so there is nothing to draw
    Opaque,
}

impl FinalizedLead {
    pub fn as_periodic(&self) -> Option<&InfiniteSystem> {
        match self {
            FinalizedLead::Periodic(lead) => Some(lead),
            FinalizedLead::Opaque => None,
        }
    }
}

/// One unit cell of a semi-infinite lead.
///
/// Graph nodes `0..slice_size` are the cell's sites; node `slice_size + k`
/// stands for site `k` translated one period back.
#[derive(Debug, Clone)]
pub struct InfiniteSystem {
    graph: Graph,
    sites: Vec<Site>,
    symmetry: TranslationalSymmetry,
}

impl InfiniteSystem {
    pub(crate) fn new(graph: Graph, sites: Vec<Site>, symmetry: TranslationalSymmetry) -> Self {
        InfiniteSystem {
            graph,
            sites,
            symmetry,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn slice_size(&self) -> usize {
        self.sites.len()
    }

    /// Cell site `index`, for `index < slice_size`
    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn symmetry(&self) -> &TranslationalSymmetry {
        &self.symmetry
    }
}
