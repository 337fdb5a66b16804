//! End-to-end plots: options in, bytes or files out

use std::sync::{Arc, Mutex};

use image::RgbaImage;
use latplot::{
    Advisory, Builder, ConfigError, Group, LineSpec, OutputKind, PlotError, PlotOptions, Rendered,
    SymbolSpec, TranslationalSymmetry, plot, render_to_bytes,
};

fn pair() -> (Group, Builder) {
    let a = Group::square("a", 1.0);
    let mut sys = Builder::new();
    sys.add_hopping(a.site([0, 0]), a.site([1, 0])).unwrap();
    (a, sys)
}

/// A two-site system with a one-site lead cell pointing toward -x
fn pair_with_lead() -> (Group, Builder) {
    let (a, mut sys) = pair();
    let mut lead = Builder::with_symmetry(TranslationalSymmetry::new([-1, 0]).unwrap());
    lead.add_hopping(a.site([0, 0]), a.site([-1, 0])).unwrap();
    sys.attach_lead_auto(lead).unwrap();
    (a, sys)
}

fn svg(sys: &Builder, options: &PlotOptions) -> String {
    let outcome = render_to_bytes(sys, options, OutputKind::Svg).unwrap();
    String::from_utf8(outcome.bytes().unwrap().to_vec()).unwrap()
}

fn strokes(svg: &str) -> Vec<&str> {
    svg.split("stroke=\"").skip(1).filter_map(|rest| rest.split('"').next()).collect()
}

#[test]
fn two_sites_lines_only() {
    let (_, sys) = pair();
    let options = PlotOptions::default().symbols(SymbolSpec::none());
    let outcome = render_to_bytes(&sys, &options, OutputKind::Svg).unwrap();

    assert_eq!(outcome.reference_length, Some(1.0));
    let canvas = outcome.canvas.unwrap();
    assert_eq!((canvas.width, canvas.height), (600.0, 600.0));
    assert_eq!(outcome.advisories, vec![Advisory::DegenerateAxis { axis: "y" }]);

    let svg = std::str::from_utf8(outcome.bytes().unwrap()).unwrap();
    insta::assert_snapshot!(svg, @r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="600" viewBox="0 0 600 600"><path d="M60 300L540 300" fill="none" stroke="rgb(0,0,0)" stroke-width="48" stroke-linecap="butt"/></svg>"#);
}

#[test]
fn default_styles_draw_a_line_and_two_discs() {
    let (_, sys) = pair();
    let svg = svg(&sys, &PlotOptions::default());
    assert_eq!(svg.matches("<path").count(), 3);
    // Hoppings come first, below the sites
    assert!(svg.find("stroke=").unwrap() < svg.find("fill=\"rgb(0,0,0)\"").unwrap());
}

#[test]
fn empty_system_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    let outcome = plot(&Builder::new(), &PlotOptions::default().destination(&path)).unwrap();

    assert!(outcome.output.is_none());
    assert!(outcome.destination.is_none());
    assert_eq!(outcome.advisories, vec![Advisory::EmptySystem]);
    assert!(!path.exists());
}

#[test]
fn lead_hoppings_are_split_and_faded() {
    let (_, sys) = pair_with_lead();
    let options = PlotOptions::default().symbols(SymbolSpec::none());
    let svg = svg(&sys, &options);
    let colors = strokes(&svg);

    // system hopping, then system half and copy-0 half of the link, then
    // copy-0 half and copy-1 half of the hopping between copies
    assert_eq!(
        colors,
        vec![
            "rgb(0,0,0)",
            "rgb(0,0,0)",
            "rgb(153,153,153)",
            "rgb(153,153,153)",
            "rgb(217,217,217)",
        ]
    );
}

#[test]
fn lead_copy_count_follows_fading() {
    let (_, sys) = pair_with_lead();
    let options = PlotOptions::default()
        .lines(LineSpec::none())
        .lead_fading(vec![0.5, 0.5, 0.5, 0.5]);
    // two system sites and four lead copies of one site each
    assert_eq!(svg(&sys, &options).matches("<path").count(), 6);

    let options = options.lead_fading(Vec::new());
    assert_eq!(svg(&sys, &options).matches("<path").count(), 2);
}

#[test]
fn lead_styles_can_hide_leads() {
    let (_, sys) = pair_with_lead();
    let options = PlotOptions::default()
        .lead_symbols(SymbolSpec::none())
        .lead_lines(LineSpec::none());
    let svg = svg(&sys, &options);
    // one hopping, two sites, plus the unfaded system half of the link
    assert_eq!(svg.matches("<path").count(), 4);
    assert!(!svg.contains("rgb(153,153,153)"));
}

#[test]
fn both_sizes_are_honored() {
    let (_, sys) = pair();
    let options = PlotOptions::default().canvas(Some(800.0), Some(200.0));
    let outcome = render_to_bytes(&sys, &options, OutputKind::Svg).unwrap();
    let canvas = outcome.canvas.unwrap();
    assert_eq!((canvas.width, canvas.height), (800.0, 200.0));
}

#[test]
fn height_only_follows_data_aspect() {
    let a = Group::square("a", 1.0);
    let mut sys = Builder::new();
    sys.add_hopping(a.site([0, 0]), a.site([0, 1])).unwrap();
    let options = PlotOptions::default().canvas(None, Some(300.0));
    let outcome = render_to_bytes(&sys, &options, OutputKind::Svg).unwrap();
    let canvas = outcome.canvas.unwrap();
    assert_eq!((canvas.width, canvas.height), (300.0, 300.0));
}

#[test]
fn rendering_is_deterministic() {
    let (_, sys) = pair_with_lead();
    let options = PlotOptions::default();
    for kind in [OutputKind::Svg, OutputKind::Eps, OutputKind::Png] {
        let first = render_to_bytes(&sys, &options, kind).unwrap();
        let second = render_to_bytes(&sys, &options, kind).unwrap();
        assert_eq!(first.bytes(), second.bytes(), "{kind}");
    }
}

#[test]
fn invalid_options_fail_before_writing() {
    let (_, sys) = pair();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.svg");

    let err = plot(&sys, &PlotOptions::default().destination(&path).border(0.7)).unwrap_err();
    assert!(matches!(err, PlotError::Config(ConfigError::InvalidBorder { .. })));

    let err = plot(&sys, &PlotOptions::default().destination(&path).canvas(None, None)).unwrap_err();
    assert!(matches!(err, PlotError::Config(ConfigError::MissingCanvasSize)));

    let err = plot(&sys, &PlotOptions::default().format(OutputKind::Png)).unwrap_err();
    assert!(matches!(
        err,
        PlotError::Config(ConfigError::MissingDestination { format: OutputKind::Png })
    ));

    assert!(!path.exists());
}

#[test]
fn derived_canvas_size_must_be_finite() {
    let a = Group::square("a", 1.0);
    let mut sys = Builder::new();
    sys.add_hopping(a.site([0, 0]), a.site([1, 0])).unwrap();
    sys.add_hopping(a.site([1, 0]), a.site([1, 2])).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.svg");

    let options = PlotOptions::default().destination(&path).width(1e308);
    let err = plot(&sys, &options).unwrap_err();
    assert!(matches!(
        err,
        PlotError::Config(ConfigError::InvalidCanvasSize { axis: "height", .. })
    ));
    assert!(!path.exists());
}

#[test]
fn non_planar_positions_are_rejected() {
    let (_, sys) = pair();
    let options = PlotOptions::default().pos(|s| {
        let mut p = s.pos();
        p.push(0.0);
        p
    });
    let err = render_to_bytes(&sys, &options, OutputKind::Svg).unwrap_err();
    assert!(matches!(
        err,
        PlotError::Config(ConfigError::UnsupportedDimension { found: 3 })
    ));
}

#[test]
fn position_override_moves_sites() {
    let (_, sys) = pair();
    let options = PlotOptions::default()
        .symbols(SymbolSpec::none())
        .pos(|s| {
            let p = s.pos();
            vec![p[1], p[0]]
        });
    let svg = svg(&sys, &options);
    assert!(svg.contains(r#"d="M300 540L300 60""#), "{svg}");
}

#[test]
fn files_are_written_by_extension() {
    let (_, sys) = pair_with_lead();
    let dir = tempfile::tempdir().unwrap();

    let cases: [(&str, &[u8]); 5] = [
        ("plot.svg", b"<svg"),
        ("plot.ps", b"%!PS-Adobe-3.0\n"),
        ("plot.eps", b"%!PS-Adobe-3.0 EPSF-3.0"),
        ("plot.png", b"\x89PNG"),
        ("plot.JPG", b"\xff\xd8"),
    ];
    for (name, magic) in cases {
        let path = dir.path().join(name);
        let outcome = plot(&sys, &PlotOptions::default().destination(&path)).unwrap();
        assert_eq!(outcome.destination.as_deref(), Some(path.as_path()));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(magic), "{name}");
    }
}

#[test]
fn display_hands_pixels_to_the_viewer() {
    let (_, sys) = pair();
    let seen: Arc<Mutex<Option<RgbaImage>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let options = PlotOptions::default()
        .symbols(SymbolSpec::none())
        .viewer(
            move |image: &RgbaImage| -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
                *sink.lock().unwrap() = Some(image.clone());
                Ok(())
            },
        );

    let outcome = plot(&sys, &options).unwrap();
    assert!(matches!(outcome.output, Some(Rendered::Image(_))));
    assert!(outcome.destination.is_none());

    let image = seen.lock().unwrap().take().unwrap();
    assert_eq!(image.dimensions(), (600, 600));
    assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(300, 300).0, [0, 0, 0, 255]);
}

#[test]
fn viewer_failure_is_an_output_error() {
    let (_, sys) = pair();
    let options = PlotOptions::default().format(OutputKind::Display).viewer(
        |_: &RgbaImage| -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("window closed".into())
        },
    );
    let err = plot(&sys, &options).unwrap_err();
    assert!(matches!(err, PlotError::Output(_)));
    assert!(err.to_string().contains("window closed"), "{err}");
}
