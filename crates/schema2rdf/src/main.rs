use std::path::PathBuf;
use std::process;

use clap::Parser;

use schema2rdf::config::{CompileConfig, DEFAULT_BASE_REF, DEFAULT_BASE_URI, DEFAULT_VERSION};
use schema2rdf::error::RenderError;
use schema2rdf::model::iri::DEFAULT_VENDOR_PREFIX;
use schema2rdf::pipeline::compile;
use schema2rdf::render::{self, GraphvizRenderer};
use schema2rdf::source::Dialect;

/// Compile a tabular metadata data model to RDF Turtle.
#[derive(Parser)]
#[command(name = "schema2rdf", version, about)]
struct Cli {
    /// Model table (.csv, or .tsv/.tab/.txt for tab-delimited).
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Directory for the Turtle file and renderings.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Organization tag; names the output and picks the default dialect.
    #[arg(long, value_name = "TAG")]
    org: String,

    /// Table dialect: dependency-graph or flat-node-property [default: from --org].
    #[arg(short, long, value_name = "DIALECT")]
    dialect: Option<Dialect>,

    /// Field delimiter, overriding the one implied by the file suffix.
    #[arg(long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Base URI for node and term IRIs.
    #[arg(short, long, value_name = "URI", default_value = DEFAULT_BASE_URI)]
    base_uri: String,

    /// Prefix bound to the base URI.
    #[arg(short = 'r', long, value_name = "PREFIX", default_value = DEFAULT_BASE_REF)]
    base_ref: String,

    /// Model version used in the output file name.
    #[arg(short = 'm', long, value_name = "VERSION", default_value = DEFAULT_VERSION)]
    model_version: String,

    /// Comma-separated node names to keep [default: all].
    #[arg(short, long, value_name = "NODES", value_delimiter = ',')]
    nodes: Vec<String>,

    /// Name of the subset in the output file name.
    #[arg(long, value_name = "NAME")]
    subset_name: Option<String>,

    /// Vendor token stripped from names; pass an empty string to keep names intact.
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_VENDOR_PREFIX)]
    vendor_prefix: String,

    /// Render a PNG next to the Turtle file.
    #[arg(long)]
    png: bool,

    /// Show the graph in an interactive viewer.
    #[arg(long)]
    interactive: bool,

    /// Graphviz executable used for rendering.
    #[arg(long, value_name = "PATH", default_value = "dot")]
    dot_command: String,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Result<CompileConfig, Box<dyn std::error::Error>> {
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => return Err(format!("delimiter must be ASCII, got '{c}'").into()),
            None => None,
        };
        let mut config = CompileConfig::new(self.input, self.org);
        config.output_dir = self.output_dir;
        config.dialect = self.dialect;
        config.delimiter = delimiter;
        config.base_uri = self.base_uri;
        config.base_ref = self.base_ref;
        config.version = self.model_version;
        config.nodes = self
            .nodes
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        config.subset_name = self.subset_name;
        config.vendor_prefix = Some(self.vendor_prefix).filter(|p| !p.is_empty());
        config.render_png = self.png;
        config.interactive = self.interactive;
        config.dot_command = self.dot_command;
        Ok(config)
    }
}

fn run(config: CompileConfig, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = compile(&config)?;

    if !quiet {
        eprintln!(
            "Compiled {} terms across {} nodes ({} triples, {} key relations, {}) to {}",
            report.terms,
            report.nodes,
            report.triples,
            report.key_relations,
            report.dialect,
            report.output.display()
        );
    }

    if !config.render_png && !config.interactive {
        return Ok(());
    }

    // Rendering failures are reported but never fail the run: the Turtle
    // file is already complete.
    let renderer = GraphvizRenderer::new(&config.dot_command);
    let graph = match render::load_graph(&report.output) {
        Ok(graph) => graph,
        Err(e) => {
            log::error!("cannot read back {}: {e}", report.output.display());
            return Ok(());
        }
    };

    // Retries prune their own copy; the interactive view keeps every triple.
    if config.render_png {
        let mut static_graph = graph.clone();
        match render::render_with_retry(
            &renderer,
            &mut static_graph,
            &config.prune_predicate(),
            &config.png_path(),
            &config.error_artifact_path(),
        ) {
            Ok(outcome) => {
                if !quiet {
                    eprintln!(
                        "Rendered {} after {} attempt(s)",
                        outcome.output.display(),
                        outcome.attempts
                    );
                }
            }
            Err(e @ RenderError::RetryExhausted { .. }) => log::warn!("{e}"),
            Err(e) => log::error!("rendering failed: {e}"),
        }
    }

    if config.interactive {
        if let Err(e) = render::show_interactive(&renderer, &graph) {
            log::error!("interactive view failed: {e}");
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let quiet = cli.quiet;
    let result = cli.into_config().and_then(|config| run(config, quiet));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
