//! Plot a graphene flake with hexagonal symbols for its two sublattices.
//!
//! Run with: cargo run --example graphene -- [output path]

use std::sync::Arc;

use latplot::{
    Builder, Color, Group, Line, LineSpec, PlotOptions, Polygon, SymbolRef, SymbolSpec, plot,
};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let destination = std::env::args().nth(1).unwrap_or_else(|| "graphene.png".to_string());

    let s3 = 3f64.sqrt();
    let prim_vecs = vec![vec![1.0, 0.0], vec![0.5, s3 / 2.0]];
    let a = Group::new("a", prim_vecs.clone(), vec![0.0, 0.0]);
    let b = Group::new("b", prim_vecs, vec![0.0, 1.0 / s3]);

    let radius = 6.0;
    let inside = |pos: &[f64]| pos[0] * pos[0] + pos[1] * pos[1] < radius * radius;
    let mut sys = Builder::new();
    for i in -10..=10 {
        for j in -10..=10 {
            for group in [&a, &b] {
                let site = group.site([i, j]);
                if inside(&site.pos()) {
                    sys.add_site(site)?;
                }
            }
        }
    }

    // Each b site has three a neighbors
    let neighbors = [[0, 0], [0, 1], [-1, 1]];
    let candidates: Vec<_> = sys.sites().filter(|s| s.group() == &b).cloned().collect();
    for site in candidates {
        for [di, dj] in neighbors {
            let tag = site.tag();
            let other = a.site([tag[0] + di, tag[1] + dj]);
            if sys.has_site(&other) {
                sys.add_hopping(site.clone(), other)?;
            }
        }
    }

    let hexagon = |color: Color| -> miette::Result<SymbolRef> {
        let polygon = Polygon::with_area_of_circle(6, 0.3)?.with_fill(color);
        Ok(Arc::new(polygon))
    };
    let symbols = SymbolSpec::mapping([
        (a.clone(), Some(hexagon("#1f4e9c".parse()?)?)),
        (b.clone(), Some(hexagon("#d8572a".parse()?)?)),
    ]);

    let options = PlotOptions::default()
        .destination(&destination)
        .width(800.0)
        .symbols(symbols)
        .lines(LineSpec::constant(Line::new(0.05)));

    let outcome = plot(&sys, &options)?;
    tracing::info!(
        reference_length = ?outcome.reference_length,
        advisories = outcome.advisories.len(),
        path = %destination,
        "done"
    );
    Ok(())
}
