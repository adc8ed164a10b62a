//! Connect flows: pick interactively or resolve a token

use std::convert::Infallible;

use anyhow::Result;
use vs_core::{match_node, NodeSource, Target};

use super::App;
use crate::picker;

/// Turn a token into a target, falling back to the raw token
///
/// A source that cannot be read is treated like one with no match: the
/// token goes to ssh untouched and ssh has the final word on it.
pub fn resolve_target(source: &dyn NodeSource, token: &str) -> Target {
    let nodes = match source.load() {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::debug!("{} unavailable ({}), using {:?} as-is", source.kind(), e, token);
            return Target::Raw(token.to_string());
        }
    };

    match match_node(&nodes, token) {
        Some(node) => {
            tracing::debug!("{:?} matched {}", token, node);
            Target::Node(node.clone())
        }
        None => {
            tracing::debug!("{:?} matched no node, using it as-is", token);
            Target::Raw(token.to_string())
        }
    }
}

/// `vibessh <token>`: resolve and become an ssh session
///
/// # Arguments
/// * `app` - Loaded paths and settings
/// * `token` - The single command-line argument, matched as given
///
/// # Returns
/// Never returns on success. An error means ssh could not be started.
pub fn connect_command(app: &App, token: &str) -> Result<Infallible> {
    let source = app.node_source(true);
    let target = resolve_target(source.as_ref(), token);
    Ok(app.dispatcher().connect(&target)?)
}

/// `vibessh`: show the picker and connect to the choice
///
/// Returns normally only when the user cancels.
pub fn pick_command(app: &App) -> Result<()> {
    let source = app.node_source(app.settings.nodes.include_offline);
    let nodes = source.load_or_empty()?;

    match picker::run(nodes, source.as_ref())? {
        Some(node) => match app.dispatcher().connect(&Target::Node(node))? {},
        None => {
            tracing::debug!("Picker cancelled");
            Ok(())
        }
    }
}
