//! Mutable system description keyed by sites.

use std::collections::{HashMap, HashSet};

use crate::errors::ModelError;
use crate::log::debug;

use super::finalized::{FinalizedLead, FiniteSystem, InfiniteSystem};
use super::graph::GraphBuilder;
use super::{Site, TranslationalSymmetry};

/// A lead attached to a [`Builder`].
#[derive(Debug, Clone)]
pub enum Lead {
    /// A semi-infinite periodic continuation described by its unit cell
    Periodic(BuilderLead),
    /// A lead without a unit cell; it cannot be drawn
    Opaque { interface: Vec<Site> },
}

impl Lead {
    /// System sites this lead connects to
    pub fn interface(&self) -> &[Site] {
        match self {
            Lead::Periodic(lead) => &lead.interface,
            Lead::Opaque { interface } => interface,
        }
    }

    pub fn as_periodic(&self) -> Option<&BuilderLead> {
        match self {
            Lead::Periodic(lead) => Some(lead),
            Lead::Opaque { .. } => None,
        }
    }
}

/// A periodic lead: the unit-cell builder, its symmetry and the interface.
#[derive(Debug, Clone)]
pub struct BuilderLead {
    builder: Builder,
    symmetry: TranslationalSymmetry,
    interface: Vec<Site>,
}

impl BuilderLead {
    /// The unit cell, with sites in the fundamental domain
    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn symmetry(&self) -> &TranslationalSymmetry {
        &self.symmetry
    }

    pub fn interface(&self) -> &[Site] {
        &self.interface
    }
}

/// Sites and hoppings under construction.
///
/// A builder created [`with_symmetry`](Builder::with_symmetry) describes one
/// unit cell of a lead: sites are folded into the fundamental domain and each
/// stored hopping has its first endpoint there, while the second endpoint may
/// lie in a neighboring period.
///
/// Iteration follows insertion order. Adding an existing site or hopping
/// (in either direction) is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    symmetry: Option<TranslationalSymmetry>,
    sites: Vec<Site>,
    site_set: HashSet<Site>,
    hoppings: Vec<(Site, Site)>,
    hopping_set: HashSet<(Site, Site)>,
    leads: Vec<Lead>,
}

fn fundamental(symmetry: Option<&TranslationalSymmetry>, site: &Site) -> Site {
    match symmetry {
        Some(sym) => sym.to_fundamental(site),
        None => site.clone(),
    }
}

/// Translate a hopping so its first endpoint is in the fundamental domain
fn anchored(symmetry: Option<&TranslationalSymmetry>, a: &Site, b: &Site) -> (Site, Site) {
    match symmetry {
        Some(sym) => {
            let n = -sym.which(a);
            (sym.act(n, a), sym.act(n, b))
        }
        None => (a.clone(), b.clone()),
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder for the unit cell of a lead
    pub fn with_symmetry(symmetry: TranslationalSymmetry) -> Self {
        Builder {
            symmetry: Some(symmetry),
            ..Self::default()
        }
    }

    pub fn symmetry(&self) -> Option<&TranslationalSymmetry> {
        self.symmetry.as_ref()
    }

    fn check(&self, site: &Site) -> Result<(), ModelError> {
        match &self.symmetry {
            Some(sym) => sym.check(site),
            None => Ok(()),
        }
    }

    pub fn add_site(&mut self, site: Site) -> Result<(), ModelError> {
        self.check(&site)?;
        let site = fundamental(self.symmetry.as_ref(), &site);
        if self.site_set.insert(site.clone()) {
            self.sites.push(site);
        }
        Ok(())
    }

    pub fn has_site(&self, site: &Site) -> bool {
        self.check(site).is_ok()
            && self
                .site_set
                .contains(&fundamental(self.symmetry.as_ref(), site))
    }

    /// Remove a site along with every hopping touching it.
    ///
    /// Returns whether the site was present.
    pub fn remove_site(&mut self, site: &Site) -> bool {
        if !self.has_site(site) {
            return false;
        }
        let symmetry = self.symmetry.as_ref();
        let site = fundamental(symmetry, site);
        self.site_set.remove(&site);
        self.sites.retain(|s| *s != site);

        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.hoppings)
            .into_iter()
            .partition(|(a, b)| *a == site || fundamental(symmetry, b) == site);
        for (a, b) in &gone {
            self.hopping_set.remove(&(a.clone(), b.clone()));
            self.hopping_set.remove(&anchored(symmetry, b, a));
        }
        self.hoppings = kept;
        debug!(site = %site, removed_hoppings = gone.len(), "removed site");
        true
    }

    /// Connect two sites, adding either endpoint that is not yet present.
    pub fn add_hopping(&mut self, a: Site, b: Site) -> Result<(), ModelError> {
        if a == b {
            return Err(ModelError::SelfHopping);
        }
        self.check(&a)?;
        self.check(&b)?;

        let forward = anchored(self.symmetry.as_ref(), &a, &b);
        if self.hopping_set.contains(&forward) {
            return Ok(());
        }
        let backward = anchored(self.symmetry.as_ref(), &b, &a);

        self.add_site(a)?;
        self.add_site(b)?;
        self.hopping_set.insert(forward.clone());
        self.hopping_set.insert(backward);
        self.hoppings.push(forward);
        Ok(())
    }

    pub fn has_hopping(&self, a: &Site, b: &Site) -> bool {
        self.check(a).is_ok()
            && self.check(b).is_ok()
            && self
                .hopping_set
                .contains(&anchored(self.symmetry.as_ref(), a, b))
    }

    /// Returns whether the hopping was present.
    pub fn remove_hopping(&mut self, a: &Site, b: &Site) -> bool {
        if !self.has_hopping(a, b) {
            return false;
        }
        let forward = anchored(self.symmetry.as_ref(), a, b);
        let backward = anchored(self.symmetry.as_ref(), b, a);
        self.hopping_set.remove(&forward);
        self.hopping_set.remove(&backward);
        self.hoppings.retain(|h| *h != forward && *h != backward);
        true
    }

    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    /// Each hopping once, in the direction it was first added
    pub fn hoppings(&self) -> impl Iterator<Item = (&Site, &Site)> {
        self.hoppings.iter().map(|(a, b)| (a, b))
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn num_hoppings(&self) -> usize {
        self.hoppings.len()
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Attach a periodic lead that connects to `interface`.
    ///
    /// Every interface site must already be part of this builder. Returns
    /// the lead's index.
    pub fn attach_lead(&mut self, lead: Builder, interface: Vec<Site>) -> Result<usize, ModelError> {
        let symmetry = lead.symmetry.clone().ok_or(ModelError::MissingSymmetry)?;
        if let Some(stray) = interface.iter().find(|s| !self.has_site(s)) {
            return Err(ModelError::UnknownInterfaceSite {
                site: stray.to_string(),
            });
        }
        self.leads.push(Lead::Periodic(BuilderLead {
            builder: lead,
            symmetry,
            interface,
        }));
        Ok(self.leads.len() - 1)
    }

    /// Attach a periodic lead, inferring its interface.
    ///
    /// The interface is the set of system sites whose fundamental-domain image
    /// is a site of the lead cell, restricted to the outermost period in the
    /// lead's direction. It may be empty, in which case the lead is not drawn.
    pub fn attach_lead_auto(&mut self, lead: Builder) -> Result<usize, ModelError> {
        let symmetry = lead.symmetry.as_ref().ok_or(ModelError::MissingSymmetry)?;
        let candidates: Vec<(&Site, i64)> = self
            .sites
            .iter()
            .filter(|s| symmetry.check(s).is_ok())
            .filter(|s| lead.site_set.contains(&symmetry.to_fundamental(s)))
            .map(|s| (s, symmetry.which(s)))
            .collect();
        let interface: Vec<Site> = match candidates.iter().map(|&(_, cell)| cell).max() {
            Some(outermost) => candidates
                .into_iter()
                .filter(|&(_, cell)| cell == outermost)
                .map(|(s, _)| s.clone())
                .collect(),
            None => Vec::new(),
        };
        debug!(interface = interface.len(), "inferred lead interface");
        self.attach_lead(lead, interface)
    }

    /// Attach a lead that has no drawable unit cell
    pub fn attach_opaque_lead(&mut self, interface: Vec<Site>) -> usize {
        self.leads.push(Lead::Opaque { interface });
        self.leads.len() - 1
    }

    /// Compile into a [`FiniteSystem`].
    ///
    /// Sites are numbered in insertion order; every hopping becomes a pair
    /// of directed edges.
    pub fn finalized(&self) -> Result<FiniteSystem, ModelError> {
        if self.symmetry.is_some() {
            return Err(ModelError::UnexpectedSymmetry);
        }
        let index = self.site_index();

        let mut graph = GraphBuilder::with_nodes(self.sites.len());
        for (a, b) in &self.hoppings {
            let (Some(&i), Some(&j)) = (index.get(a), index.get(b)) else {
                continue;
            };
            graph.add_edge(i, j);
            graph.add_edge(j, i);
        }

        let mut leads = Vec::with_capacity(self.leads.len());
        let mut lead_interfaces = Vec::with_capacity(self.leads.len());
        for lead in &self.leads {
            leads.push(match lead {
                Lead::Periodic(lead) => FinalizedLead::Periodic(lead.builder.finalized_lead()?),
                Lead::Opaque { .. } => FinalizedLead::Opaque,
            });
            lead_interfaces.push(
                lead.interface()
                    .iter()
                    .filter_map(|s| index.get(s).copied())
                    .collect(),
            );
        }

        Ok(FiniteSystem::new(
            graph.compressed(),
            self.sites.clone(),
            leads,
            lead_interfaces,
        ))
    }

    /// Compile a lead unit cell into an [`InfiniteSystem`].
    ///
    /// Node `k < slice_size` is cell site `k`; node `slice_size + k` is the
    /// same site one period back. Hoppings into the next period are
    /// translated back by one period so they start in the previous one.
    pub fn finalized_lead(&self) -> Result<InfiniteSystem, ModelError> {
        let symmetry = self.symmetry.clone().ok_or(ModelError::MissingSymmetry)?;
        let index = self.site_index();
        let slice_size = self.sites.len();

        let mut graph = GraphBuilder::with_nodes(2 * slice_size);
        for (a, b) in &self.hoppings {
            let cell = symmetry.which(b);
            let home = symmetry.to_fundamental(b);
            let (Some(&i), Some(&j)) = (index.get(a), index.get(&home)) else {
                continue;
            };
            match cell {
                0 => {
                    graph.add_edge(i, j);
                    graph.add_edge(j, i);
                }
                -1 => {
                    graph.add_edge(i, slice_size + j);
                    graph.add_edge(slice_size + j, i);
                }
                1 => {
                    graph.add_edge(j, slice_size + i);
                    graph.add_edge(slice_size + i, j);
                }
                cells => {
                    return Err(ModelError::HoppingTooLong {
                        from: a.to_string(),
                        to: b.to_string(),
                        cells,
                    });
                }
            }
        }

        Ok(InfiniteSystem::new(
            graph.compressed(),
            self.sites.clone(),
            symmetry,
        ))
    }

    fn site_index(&self) -> HashMap<&Site, usize> {
        self.sites.iter().enumerate().map(|(i, s)| (s, i)).collect()
    }
}
