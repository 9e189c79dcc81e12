//! Render a compiled model as a graph image.
//!
//! Static rendering runs as a bounded state machine: each failed attempt
//! prunes the enumeration triples (the widest fan-out in a model graph)
//! and tries again. Once the attempts are used up the DOT source is saved
//! next to the output for inspection. Rendering never touches the Turtle
//! file it was read from.

pub mod graph;
pub mod graphviz;

use std::path::{Path, PathBuf};

use crate::error::RenderError;

pub use self::graph::TripleGraph;
pub use self::graphviz::GraphvizRenderer;

/// Attempts made before giving up on a static render.
pub const MAX_RENDER_ATTEMPTS: u32 = 2;

/// Backend that turns DOT source into pixels.
pub trait Renderer {
    /// Render `dot` to an image file at `output`.
    fn render_static(&self, dot: &str, output: &Path) -> Result<(), RenderError>;
    /// Show `dot` in an interactive node-link layout; nothing is persisted.
    fn show_interactive(&self, dot: &str) -> Result<(), RenderError>;
}

/// A successful static render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub output: PathBuf,
    pub attempts: u32,
    /// Triples removed before the successful attempt.
    pub pruned: usize,
}

enum RenderState {
    Attempt(u32),
    Done(Result<u32, RenderError>),
}

/// Read a written Turtle file back into a [`TripleGraph`].
pub fn load_graph(turtle: &Path) -> Result<TripleGraph, RenderError> {
    let content = std::fs::read_to_string(turtle)?;
    let graph = TripleGraph::parse(&content)?;
    log::debug!(
        "loaded {} triples over {} vertices from {}",
        graph.triple_count(),
        graph.vertex_count(),
        turtle.display()
    );
    Ok(graph)
}

/// Render `graph` to `output`, pruning `prune_predicate` triples after each
/// failure. When every attempt fails the last DOT source goes to
/// `error_artifact` and [`RenderError::RetryExhausted`] is returned.
pub fn render_with_retry<R: Renderer + ?Sized>(
    renderer: &R,
    graph: &mut TripleGraph,
    prune_predicate: &str,
    output: &Path,
    error_artifact: &Path,
) -> Result<RenderOutcome, RenderError> {
    let mut pruned = 0;
    let mut state = RenderState::Attempt(1);
    loop {
        state = match state {
            RenderState::Attempt(attempt) => {
                let dot = graph.to_dot();
                match renderer.render_static(&dot, output) {
                    Ok(()) => RenderState::Done(Ok(attempt)),
                    Err(e) if attempt < MAX_RENDER_ATTEMPTS => {
                        let removed = graph.remove_predicate(prune_predicate);
                        log::warn!(
                            "render attempt {attempt} failed ({e}); \
                             pruned {removed} triples, retrying"
                        );
                        pruned += removed;
                        RenderState::Attempt(attempt + 1)
                    }
                    Err(e) => {
                        if let Err(write_error) = std::fs::write(error_artifact, &dot) {
                            log::warn!(
                                "cannot save graph to {}: {write_error}",
                                error_artifact.display()
                            );
                        }
                        RenderState::Done(Err(RenderError::RetryExhausted {
                            attempts: attempt,
                            artifact: error_artifact.to_path_buf(),
                            last: Box::new(e),
                        }))
                    }
                }
            }
            RenderState::Done(result) => {
                return result.map(|attempts| RenderOutcome {
                    output: output.to_path_buf(),
                    attempts,
                    pruned,
                })
            }
        };
    }
}

/// Show `graph` interactively. There is no retry on this path.
pub fn show_interactive<R: Renderer + ?Sized>(
    renderer: &R,
    graph: &TripleGraph,
) -> Result<(), RenderError> {
    renderer.show_interactive(&graph.to_dot())
}
