//! gofish-layout CLI
//!
//! Usage:
//!   gofish-layout [OPTIONS] [DEMO]
//!
//! Renders one of the built-in demo scenes to SVG.
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML)
//!   -o, --output <FILE>  Write SVG to a file instead of stdout
//!   -v, --verbose        Log more (-v debug, -vv trace)
//!   -h, --help           Print help

use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gofish_layout::coord::CoordinateTransform;
use gofish_layout::layout::{
    data, Alignment, Axis, Connect, Coord, Fill, Interpolation, Layer, LayoutError, Node, NodeId, Rect, Ref,
    SceneGraph, Spread,
};
use gofish_layout::{render_svg_with_config, RenderConfig, RenderError};

#[derive(Parser)]
#[command(name = "gofish-layout")]
#[command(about = "Declarative scene-graph layout, rendered to SVG")]
struct Cli {
    /// Demo scene to render
    #[arg(value_enum, default_value_t = Demo::Bars)]
    demo: Demo,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write SVG to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Demo {
    /// Stacked bar chart
    Bars,
    /// Pie chart under a polar transform
    Polar,
    /// Stacked bars joined by ribbons
    Ribbon,
}

/// (category, [value per series])
const SALES: [(&str, [f64; 3]); 4] = [
    ("mon", [4.0, 3.0, 2.0]),
    ("tue", [6.0, 2.0, 5.0]),
    ("wed", [3.0, 5.0, 1.0]),
    ("thu", [7.0, 1.0, 3.0]),
];
const SERIES: [&str; 3] = ["north", "south", "east"];

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match RenderConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RenderConfig::default(),
    };

    let scene = match cli.demo {
        Demo::Bars => bars(),
        Demo::Polar => polar(),
        Demo::Ribbon => ribbon(),
    };
    let svg = scene
        .map_err(RenderError::from)
        .and_then(|(mut graph, root)| render_svg_with_config(&mut graph, root, &config));

    let svg = match svg {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(demo = ?cli.demo, bytes = svg.len(), "rendered");

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, svg) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => println!("{}", svg),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "gofish_layout=info",
        1 => "gofish_layout=debug",
        _ => "gofish_layout=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One stacked column per category, segments coloured by series
fn column(graph: &mut SceneGraph, category: &str, values: &[f64; 3]) -> Result<NodeId, LayoutError> {
    let mut segments = Vec::with_capacity(values.len());
    for (series, value) in SERIES.iter().zip(values) {
        let rect = Rect::new().height(data(*value));
        let node = Node::new(rect)
            .named(format!("{category}-{series}"))
            .filled(Fill::Data(series.to_string()));
        segments.push(graph.leaf(node)?);
    }
    graph.add(Node::new(Spread::stack(Axis::Y)).keyed(category), segments)
}

fn bars() -> Result<(SceneGraph, NodeId), LayoutError> {
    let mut graph = SceneGraph::new();
    let mut columns = Vec::new();
    for (category, values) in &SALES {
        columns.push(column(&mut graph, category, values)?);
    }
    let chart = Spread::new(Axis::X)
        .spacing(12.0)
        .align(Alignment::Start)
        .shared_scale(true);
    let root = graph.add(Node::new(chart), columns)?;
    Ok((graph, root))
}

fn polar() -> Result<(SceneGraph, NodeId), LayoutError> {
    let mut graph = SceneGraph::new();
    let mut slices = Vec::new();
    for (category, values) in &SALES {
        let total: f64 = values.iter().sum();
        let slice = Node::new(Rect::new().width(data(total)))
            .keyed(*category)
            .filled(Fill::Data(category.to_string()));
        slices.push(graph.leaf(slice)?);
    }
    let pie = graph.add(Node::new(Spread::stack(Axis::X).shared_scale(true)), slices)?;
    let root = graph.add(Node::new(Coord::new(CoordinateTransform::polar())), [pie])?;
    Ok((graph, root))
}

fn ribbon() -> Result<(SceneGraph, NodeId), LayoutError> {
    let mut graph = SceneGraph::new();
    let mut columns = Vec::new();
    for (category, values) in &SALES {
        columns.push(column(&mut graph, category, values)?);
    }
    let chart = Spread::new(Axis::X)
        .spacing(40.0)
        .align(Alignment::Start)
        .shared_scale(true);
    let chart = graph.add(Node::new(chart), columns)?;

    let mut layers = vec![chart];
    for series in SERIES {
        let mut refs = Vec::new();
        for (category, _) in &SALES {
            refs.push(graph.leaf(Node::new(Ref::name(format!("{category}-{series}"))))?);
        }
        let connect = Connect::new(Axis::X)
            .interpolation(Interpolation::Bezier)
            .opacity(0.6);
        layers.push(graph.add(Node::new(connect), refs)?);
    }
    let root = graph.add(Node::new(Layer::new()), layers)?;
    Ok((graph, root))
}
