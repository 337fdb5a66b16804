//! Style specs normalized into lookups, done once per plot

use std::collections::HashSet;

use crate::log::warn;
use crate::system::Group;

use super::Advisory;
use super::options::{ConnectorRef, LineSpec, SymbolRef, SymbolSpec};

/// Outcome of one style lookup
pub(crate) enum Lookup<T> {
    Style(T),
    /// Explicitly unstyled
    Nothing,
    /// A mapping had no entry
    Missing,
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(style) => Lookup::Style(style),
            None => Lookup::Nothing,
        }
    }
}

type SymbolLookup<'a> = Box<dyn Fn(&Group) -> Lookup<SymbolRef> + 'a>;
type LineLookup<'a> = Box<dyn Fn(&Group, &Group) -> Lookup<ConnectorRef> + 'a>;

fn symbol_lookup(spec: &SymbolSpec) -> SymbolLookup<'_> {
    match spec {
        SymbolSpec::Constant(symbol) => Box::new(move |_: &Group| Lookup::from(symbol.clone())),
        SymbolSpec::Function(f) => Box::new(move |g: &Group| Lookup::from(f(g))),
        SymbolSpec::Mapping(map) => Box::new(move |g: &Group| match map.get(g) {
            Some(symbol) => Lookup::from(symbol.clone()),
            None => Lookup::Missing,
        }),
    }
}

fn line_lookup(spec: &LineSpec) -> LineLookup<'_> {
    match spec {
        LineSpec::Constant(line) => Box::new(move |_: &Group, _: &Group| Lookup::from(line.clone())),
        LineSpec::Function(f) => Box::new(move |a: &Group, b: &Group| Lookup::from(f(a, b))),
        LineSpec::Mapping(map) => Box::new(move |a: &Group, b: &Group| {
            let entry = map
                .get(&(a.clone(), b.clone()))
                .or_else(|| map.get(&(b.clone(), a.clone())));
            match entry {
                Some(line) => Lookup::from(line.clone()),
                None => Lookup::Missing,
            }
        }),
    }
}

/// The four resolvers of a plot, plus bookkeeping for mapping misses.
pub(crate) struct Styles<'a> {
    symbols: SymbolLookup<'a>,
    lines: LineLookup<'a>,
    lead_symbols: SymbolLookup<'a>,
    lead_lines: LineLookup<'a>,
    missing_groups: HashSet<Group>,
    missing_pairs: HashSet<(Group, Group)>,
}

impl<'a> Styles<'a> {
    pub(crate) fn new(
        symbols: &'a SymbolSpec,
        lines: &'a LineSpec,
        lead_symbols: Option<&'a SymbolSpec>,
        lead_lines: Option<&'a LineSpec>,
    ) -> Self {
        Styles {
            symbols: symbol_lookup(symbols),
            lines: line_lookup(lines),
            lead_symbols: symbol_lookup(lead_symbols.unwrap_or(symbols)),
            lead_lines: line_lookup(lead_lines.unwrap_or(lines)),
            missing_groups: HashSet::new(),
            missing_pairs: HashSet::new(),
        }
    }

    pub(crate) fn symbol(
        &mut self,
        group: &Group,
        lead: bool,
        advisories: &mut Vec<Advisory>,
    ) -> Option<SymbolRef> {
        let lookup = if lead { &self.lead_symbols } else { &self.symbols };
        match lookup(group) {
            Lookup::Style(symbol) => Some(symbol),
            Lookup::Nothing => None,
            Lookup::Missing => {
                if self.missing_groups.insert(group.clone()) {
                    warn!(group = %group, "no symbol mapped for group, its sites are not drawn");
                    advisories.push(Advisory::UnstyledGroup {
                        group: group.clone(),
                    });
                }
                None
            }
        }
    }

    pub(crate) fn line(
        &mut self,
        a: &Group,
        b: &Group,
        lead: bool,
        advisories: &mut Vec<Advisory>,
    ) -> Option<ConnectorRef> {
        let lookup = if lead { &self.lead_lines } else { &self.lines };
        match lookup(a, b) {
            Lookup::Style(line) => Some(line),
            Lookup::Nothing => None,
            Lookup::Missing => {
                // Report each unordered pair once
                let key = if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                if self.missing_pairs.insert(key.clone()) {
                    warn!(first = %key.0, second = %key.1, "no line mapped for group pair, its hoppings are not drawn");
                    advisories.push(Advisory::UnstyledPair {
                        first: key.0,
                        second: key.1,
                    });
                }
                None
            }
        }
    }
}
