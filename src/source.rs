//! Uniform streams of sites and hoppings over either system representation.
//!
//! The renderer never looks at a [`Builder`] or a [`FiniteSystem`] directly;
//! it consumes the four streams of [`PlotSource`], which both adapters yield
//! with identical contents (up to ordering and hopping direction).
//!
//! Lead copies are numbered from 0, the copy adjacent to the system. A
//! hopping endpoint with copy `None` lies in the scattering region proper.

use crate::system::{Builder, FiniteSystem, InfiniteSystem, Site, TranslationalSymmetry};

/// A site in one of the drawn lead copies
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadSite {
    pub site: Site,
    pub copy: usize,
}

/// A hopping drawn as part of a lead.
///
/// Endpoints may sit in different copies, or one of them in the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadHopping {
    pub from: Site,
    pub to: Site,
    pub from_copy: Option<usize>,
    pub to_copy: Option<usize>,
}

/// Something the plotter can draw.
pub trait PlotSource {
    fn system_sites(&self) -> Box<dyn Iterator<Item = Site> + '_>;

    /// Each hopping of the scattering region exactly once
    fn system_hoppings(&self) -> Box<dyn Iterator<Item = (Site, Site)> + '_>;

    /// Sites of the first `copies` unit cells of every drawable lead
    fn lead_sites(&self, copies: usize) -> Box<dyn Iterator<Item = LeadSite> + '_>;

    /// Hoppings within and between the first `copies` unit cells, including
    /// the ones linking copy 0 to the system
    fn lead_hoppings(&self, copies: usize) -> Box<dyn Iterator<Item = LeadHopping> + '_>;

    /// System sites followed by lead sites
    fn all_sites(&self, copies: usize) -> Box<dyn Iterator<Item = Site> + '_> {
        Box::new(
            self.system_sites()
                .chain(self.lead_sites(copies).map(|ls| ls.site)),
        )
    }

    /// System hoppings followed by lead hoppings, endpoints only
    fn all_hoppings(&self, copies: usize) -> Box<dyn Iterator<Item = (Site, Site)> + '_> {
        Box::new(
            self.system_hoppings()
                .chain(self.lead_hoppings(copies).map(|h| (h.from, h.to))),
        )
    }
}

/// Negative copy indices denote the system
fn copy_index(copy: i64) -> Option<usize> {
    usize::try_from(copy).ok()
}

/// Period of lead copy 0, one past the interface
fn first_copy(symmetry: &TranslationalSymmetry, interface_site: &Site) -> i64 {
    symmetry.which(interface_site) + 1
}

/// Streams over a [`Builder`]
#[derive(Debug, Clone, Copy)]
pub struct BuilderSource<'a> {
    system: &'a Builder,
}

impl<'a> BuilderSource<'a> {
    pub fn new(system: &'a Builder) -> Self {
        BuilderSource { system }
    }

    /// Drawable leads with the period of their copy 0
    fn leads(&self) -> impl Iterator<Item = (&'a Builder, &'a TranslationalSymmetry, i64)> + 'a {
        let system = self.system;
        system
            .leads()
            .iter()
            .filter_map(|lead| lead.as_periodic())
            .filter_map(move |lead| {
                // Sites removed after attaching no longer anchor the lead
                let first = lead.interface().iter().find(|s| system.has_site(s))?;
                let shift = first_copy(lead.symmetry(), first);
                Some((lead.builder(), lead.symmetry(), shift))
            })
    }
}

impl PlotSource for BuilderSource<'_> {
    fn system_sites(&self) -> Box<dyn Iterator<Item = Site> + '_> {
        Box::new(self.system.sites().cloned())
    }

    fn system_hoppings(&self) -> Box<dyn Iterator<Item = (Site, Site)> + '_> {
        Box::new(self.system.hoppings().map(|(a, b)| (a.clone(), b.clone())))
    }

    fn lead_sites(&self, copies: usize) -> Box<dyn Iterator<Item = LeadSite> + '_> {
        Box::new(self.leads().flat_map(move |(cell, symmetry, shift)| {
            (0..copies).flat_map(move |copy| {
                cell.sites().map(move |site| LeadSite {
                    site: symmetry.act(shift + copy as i64, site),
                    copy,
                })
            })
        }))
    }

    fn lead_hoppings(&self, copies: usize) -> Box<dyn Iterator<Item = LeadHopping> + '_> {
        Box::new(self.leads().flat_map(move |(cell, symmetry, shift)| {
            (0..copies as i64).flat_map(move |i| {
                cell.hoppings().map(move |(a, b)| {
                    let cell_a = symmetry.which(a);
                    let cell_b = symmetry.which(b);
                    // Place the hopping so both endpoints stay within copies
                    // `i - 1 ..= i`, the lower one being the system itself
                    let i = if cell_a >= cell_b { i } else { i - 1 };
                    LeadHopping {
                        from: symmetry.act(shift + i, a),
                        to: symmetry.act(shift + i, b),
                        from_copy: copy_index(i + cell_a),
                        to_copy: copy_index(i + cell_b),
                    }
                })
            })
        }))
    }
}

/// Streams over a [`FiniteSystem`]
#[derive(Debug, Clone, Copy)]
pub struct FinalizedSource<'a> {
    system: &'a FiniteSystem,
}

impl<'a> FinalizedSource<'a> {
    pub fn new(system: &'a FiniteSystem) -> Self {
        FinalizedSource { system }
    }

    fn leads(&self) -> impl Iterator<Item = (&'a InfiniteSystem, i64)> + 'a {
        let system = self.system;
        system
            .leads()
            .iter()
            .zip(system.lead_interfaces())
            .filter_map(move |(lead, interface)| {
                let lead = lead.as_periodic()?;
                let first = system.site(*interface.first()?)?;
                Some((lead, first_copy(lead.symmetry(), first)))
            })
    }
}

impl PlotSource for FinalizedSource<'_> {
    fn system_sites(&self) -> Box<dyn Iterator<Item = Site> + '_> {
        Box::new(self.system.sites().iter().cloned())
    }

    fn system_hoppings(&self) -> Box<dyn Iterator<Item = (Site, Site)> + '_> {
        let system = self.system;
        let graph = system.graph();
        Box::new((0..graph.num_nodes()).flat_map(move |i| {
            graph
                .out_neighbors(i)
                .iter()
                .filter(move |&&j| i < j)
                .filter_map(move |&j| Some((system.site(i)?.clone(), system.site(j)?.clone())))
        }))
    }

    fn lead_sites(&self, copies: usize) -> Box<dyn Iterator<Item = LeadSite> + '_> {
        Box::new(self.leads().flat_map(move |(lead, shift)| {
            (0..copies).flat_map(move |copy| {
                (0..lead.slice_size()).filter_map(move |k| {
                    Some(LeadSite {
                        site: lead.symmetry().act(shift + copy as i64, lead.site(k)?),
                        copy,
                    })
                })
            })
        }))
    }

    fn lead_hoppings(&self, copies: usize) -> Box<dyn Iterator<Item = LeadHopping> + '_> {
        Box::new(self.leads().flat_map(move |(lead, shift)| {
            let slice_size = lead.slice_size();
            let symmetry = lead.symmetry();
            (0..copies as i64).flat_map(move |i| {
                (0..slice_size).flat_map(move |isite| {
                    lead.graph()
                        .out_neighbors(isite)
                        .iter()
                        .filter_map(move |&jsite| {
                            let from = symmetry.act(shift + i, lead.site(isite)?);
                            if jsite < slice_size {
                                // Intra-cell edges are stored both ways
                                if isite >= jsite {
                                    return None;
                                }
                                Some(LeadHopping {
                                    from,
                                    to: symmetry.act(shift + i, lead.site(jsite)?),
                                    from_copy: copy_index(i),
                                    to_copy: copy_index(i),
                                })
                            } else {
                                let back = lead.site(jsite - slice_size)?;
                                Some(LeadHopping {
                                    from,
                                    to: symmetry.act(shift + i - 1, back),
                                    from_copy: copy_index(i),
                                    to_copy: copy_index(i - 1),
                                })
                            }
                        })
                })
            })
        }))
    }
}

/// Either system representation, as accepted by [`plot`](crate::plot).
#[derive(Debug, Clone, Copy)]
pub enum SystemRef<'a> {
    Builder(&'a Builder),
    Finalized(&'a FiniteSystem),
}

impl<'a> SystemRef<'a> {
    pub fn source(self) -> Box<dyn PlotSource + 'a> {
        match self {
            SystemRef::Builder(system) => Box::new(BuilderSource::new(system)),
            SystemRef::Finalized(system) => Box::new(FinalizedSource::new(system)),
        }
    }
}

impl<'a> From<&'a Builder> for SystemRef<'a> {
    fn from(system: &'a Builder) -> Self {
        SystemRef::Builder(system)
    }
}

impl<'a> From<&'a FiniteSystem> for SystemRef<'a> {
    fn from(system: &'a FiniteSystem) -> Self {
        SystemRef::Finalized(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Group;

    fn system_with_lead() -> (Group, Builder) {
        let a = Group::square("a", 1.0);
        let mut system = Builder::new();
        system.add_hopping(a.site([0, 0]), a.site([1, 0])).unwrap();
        let mut lead = Builder::with_symmetry(TranslationalSymmetry::new([-1, 0]).unwrap());
        lead.add_hopping(a.site([0, 0]), a.site([-1, 0])).unwrap();
        system.attach_lead_auto(lead).unwrap();
        (a, system)
    }

    #[test]
    fn lead_copies_march_away_from_the_system() {
        let (a, system) = system_with_lead();
        let sites: Vec<_> = BuilderSource::new(&system).lead_sites(3).collect();
        assert_eq!(
            sites,
            vec![
                LeadSite { site: a.site([-1, 0]), copy: 0 },
                LeadSite { site: a.site([-2, 0]), copy: 1 },
                LeadSite { site: a.site([-3, 0]), copy: 2 },
            ]
        );
    }

    #[test]
    fn builder_lead_hoppings_reach_into_the_system() {
        let (a, system) = system_with_lead();
        let hops: Vec<_> = BuilderSource::new(&system).lead_hoppings(2).collect();
        assert_eq!(
            hops,
            vec![
                LeadHopping {
                    from: a.site([0, 0]),
                    to: a.site([-1, 0]),
                    from_copy: None,
                    to_copy: Some(0),
                },
                LeadHopping {
                    from: a.site([-1, 0]),
                    to: a.site([-2, 0]),
                    from_copy: Some(0),
                    to_copy: Some(1),
                },
            ]
        );
    }

    #[test]
    fn finalized_lead_hoppings_reach_into_the_system() {
        let (a, system) = system_with_lead();
        let fsys = system.finalized().unwrap();
        let hops: Vec<_> = FinalizedSource::new(&fsys).lead_hoppings(2).collect();
        assert_eq!(
            hops,
            vec![
                LeadHopping {
                    from: a.site([-1, 0]),
                    to: a.site([0, 0]),
                    from_copy: Some(0),
                    to_copy: None,
                },
                LeadHopping {
                    from: a.site([-2, 0]),
                    to: a.site([-1, 0]),
                    from_copy: Some(1),
                    to_copy: Some(0),
                },
            ]
        );
    }

    #[test]
    fn finalized_system_hoppings_appear_once() {
        let (_, system) = system_with_lead();
        let fsys = system.finalized().unwrap();
        assert_eq!(FinalizedSource::new(&fsys).system_hoppings().count(), 1);
    }

    #[test]
    fn opaque_and_detached_leads_are_skipped() {
        let a = Group::square("a", 1.0);
        let mut system = Builder::new();
        system.add_site(a.site([0, 0])).unwrap();
        system.attach_opaque_lead(vec![a.site([0, 0])]);
        let mut lead = Builder::with_symmetry(TranslationalSymmetry::new([1, 0]).unwrap());
        lead.add_site(a.site([0, 0])).unwrap();
        system.attach_lead(lead, Vec::new()).unwrap();

        let source = BuilderSource::new(&system);
        assert_eq!(source.lead_sites(2).count(), 0);
        assert_eq!(source.lead_hoppings(2).count(), 0);

        let fsys = system.finalized().unwrap();
        let source = FinalizedSource::new(&fsys);
        assert_eq!(source.lead_sites(2).count(), 0);
        assert_eq!(source.all_sites(2).count(), 1);
    }
}
