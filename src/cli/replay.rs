//! `routelit replay`: drive the demo app with a request scenario.
//!
//! Every response is applied to a client-side copy of the tree; after each
//! step that copy must equal the tree the server persisted.

use super::demo::Demo;
use anyhow::{Context, Result, bail};
use routelit::config::{AppConfig, SessionConfig};
use routelit::core::{Element, SessionKeys};
use routelit::{MemoryStore, Response, SessionStore, SimpleRequest, debug, log, reconcile, session};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

const SESSION: &str = "replay";
const HOST: &str = "localhost";

/// One scripted request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
}

impl Step {
    fn to_request(&self, session: &SessionConfig) -> SimpleRequest {
        let mut request = SimpleRequest::new(&self.method, SESSION, HOST, &self.path)
            .with_fragment_param(session.fragment_param.as_str());
        if let Some(query) = &self.query {
            request = request.with_query(query);
        }
        if let Some(referrer) = &self.referrer {
            request = request.with_referrer(referrer.as_str());
        }
        if let Some(payload) = &self.payload {
            request = request.with_payload(payload.clone());
        }
        request
    }
}

/// Totals of a converged replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub steps: usize,
    pub actions: usize,
    pub reruns: usize,
}

/// Load a scenario file.
pub fn load_scenario(path: &Path) -> Result<Vec<Step>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid scenario {}", path.display()))
}

/// Entry point of the `replay` command.
pub fn run(path: &Path, config: &AppConfig) -> Result<()> {
    let steps = load_scenario(path)?;
    let report = replay(&steps, config)?;
    log!(
        "replay";
        "{} steps converged ({} actions, {} reruns)",
        report.steps, report.actions, report.reruns
    );
    Ok(())
}

/// Run `steps` against a fresh demo app, checking convergence after each.
pub fn replay(steps: &[Step], config: &AppConfig) -> Result<Report> {
    let demo = Demo::new(MemoryStore::new(), config);
    let mut client: Vec<Element> = Vec::new();
    let mut report = Report::default();

    for (index, step) in steps.iter().enumerate() {
        let n = index + 1;
        let view = demo
            .page(&step.path)
            .with_context(|| format!("step {n}: no page at `{}`", step.path))?;

        let mut request = step.to_request(&config.session);
        let handled = demo
            .app()
            .handle(view, &mut request)
            .with_context(|| format!("step {n}: {} {} failed", step.method, step.path))?;
        debug!("replay"; "{} {} -> {}", step.method, step.path, handled.response.to_json());

        match &handled.response {
            Response::Elements(elements) => client = elements.clone(),
            Response::Actions(response) => {
                reconcile::apply(&mut client, &response.actions)
                    .with_context(|| format!("step {n}: actions do not apply to the client tree"))?;
                report.actions += response.actions.len();
            }
        }
        report.reruns += handled.reruns;
        report.steps = n;

        let keys = SessionKeys::new(SESSION, HOST, &step.path);
        if demo.app().store().contains(&keys.tree) {
            let server: Vec<Element> = session::load(demo.app().store(), &keys.tree)?;
            if server != client {
                bail!("step {n}: client tree diverged from the persisted tree");
            }
        }
    }
    Ok(report)
}
