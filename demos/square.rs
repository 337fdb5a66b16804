//! Plot a square quantum dot with two leads.
//!
//! Run with: cargo run --example square --features tracing -- [output path]

use latplot::{
    Builder, Circle, Color, Group, Line, LineSpec, PlotOptions, SymbolSpec, TranslationalSymmetry,
    plot,
};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let destination = std::env::args().nth(1).unwrap_or_else(|| "square.svg".to_string());

    let a = Group::square("a", 1.0);
    let (w, l) = (6, 10);
    let mut sys = Builder::new();
    for x in 0..l {
        for y in 0..w {
            sys.add_site(a.site([x, y]))?;
            if x > 0 {
                sys.add_hopping(a.site([x - 1, y]), a.site([x, y]))?;
            }
            if y > 0 {
                sys.add_hopping(a.site([x, y - 1]), a.site([x, y]))?;
            }
        }
    }

    for direction in [-1, 1] {
        let mut lead = Builder::with_symmetry(TranslationalSymmetry::new([direction, 0])?);
        for y in 0..w {
            lead.add_hopping(a.site([0, y]), a.site([1, y]))?;
            if y > 0 {
                lead.add_hopping(a.site([0, y - 1]), a.site([0, y]))?;
            }
        }
        sys.attach_lead_auto(lead)?;
    }

    let red: Color = "#c03020".parse()?;
    let options = PlotOptions::default()
        .destination(&destination)
        .symbols(SymbolSpec::constant(Circle::new(0.25).with_fill(red)))
        .lines(LineSpec::constant(Line::new(0.08)))
        .lead_fading(vec![0.4, 0.6, 0.8]);

    let outcome = plot(&sys, &options)?;
    for advisory in &outcome.advisories {
        tracing::info!(%advisory, "advisory");
    }
    tracing::info!(path = %destination, "done");
    Ok(())
}
