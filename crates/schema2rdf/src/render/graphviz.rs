//! Graphviz-backed [`Renderer`].

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::RenderError;

use super::Renderer;

/// Renders through the Graphviz `dot` executable: `dot` layout to PNG for
/// static output, the `fdp` force-directed layout in an X11 window for
/// interactive viewing.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    command: String,
}

impl GraphvizRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Pipe `dot` into the executable with `args`.
    fn run(&self, args: &[&str], dot: &str) -> Result<(), RenderError> {
        log::debug!("running {} {}", self.command, args.join(" "));
        let mut child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // A command that exits without reading closes the pipe early; its
        // exit status is the error worth reporting.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(dot.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl Renderer for GraphvizRenderer {
    fn render_static(&self, dot: &str, output: &Path) -> Result<(), RenderError> {
        let output = output.to_string_lossy();
        self.run(&["-Tpng", "-o", &output], dot)
    }

    fn show_interactive(&self, dot: &str) -> Result<(), RenderError> {
        self.run(&["-Kfdp", "-Tx11"], dot)
    }
}
