//! GET / POST handling and the rerun loop.
//!
//! | Method | Handler         | Response                          |
//! |--------|-----------------|-----------------------------------|
//! | `GET`  | `first_render`  | Full tree                         |
//! | `POST` | `interaction`   | Actions tagged `app`/`fragment`   |
//!
//! Both run the view inside a loop: an `Interrupt::Rerun` persists the
//! carried state and runs the pass again, an `Interrupt::Halt` ends the
//! request with nothing to send.

use serde_json::Value;

use super::{App, Fragment, Handled, Interrupt, Request, RerunScope, Response, View};
use crate::builder::{BuildContext, BuildOutput, Builder, FragmentMap, buffer_form_event, clear_form_events};
use crate::core::address::{element_at, splice_children};
use crate::core::{ActionsResponse, Address, Element, Props, SessionKeys, Target};
use crate::error::{Error, Result};
use crate::reconcile::{check_unique_keys, reconcile};
use crate::session::{self, SessionStore};
use crate::{debug, debug_do};

/// Everything persisted for one session+route.
#[derive(Debug, Default)]
struct Persisted {
    tree: Vec<Element>,
    state: Props,
    fragments: FragmentMap,
    params: Props,
}

impl<S: SessionStore> App<S> {
    /// Run `view` for `request`.
    pub fn handle(&self, view: &View, request: &mut dyn Request) -> Result<Handled> {
        match request.method() {
            "GET" => self.first_render(view, request),
            "POST" => self.interaction(view, request),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }

    // =========================================================================
    // GET
    // =========================================================================

    fn first_render(&self, view: &View, request: &dyn Request) -> Result<Handled> {
        let keys = request.session_keys(false);
        session::purge(&self.store, &keys);

        let mut state = Props::new();
        let mut reruns = 0;
        loop {
            let mut ui = Builder::new(BuildContext {
                state: std::mem::take(&mut state),
                ..Default::default()
            });
            match view(&mut ui) {
                Ok(()) => {
                    let out = ui.into_output();
                    check_unique_keys(&out.elements, &[])?;
                    let elements = out.elements.clone();
                    self.persist(&keys, out)?;
                    return Ok(Handled {
                        response: Response::Elements(elements),
                        reruns,
                    });
                }
                Err(Interrupt::Halt) => {
                    debug!("rerun"; "first render halted");
                    return Ok(Handled {
                        response: Response::Elements(Vec::new()),
                        reruns,
                    });
                }
                Err(Interrupt::Rerun(rerun)) => {
                    reruns += 1;
                    self.check_rerun_limit(reruns)?;
                    debug!("rerun"; "first render rerun #{}", reruns);
                    session::save(&self.store, &keys.state, &rerun.state)?;
                    state = rerun.state;
                }
            }
        }
    }

    // =========================================================================
    // POST
    // =========================================================================

    fn interaction(&self, view: &View, request: &mut dyn Request) -> Result<Handled> {
        let keys = request.session_keys(false);

        if let Some(event) = request.ui_event()
            && event.deferred_form_id().is_some()
        {
            let mut state: Props = session::load(&self.store, &keys.state)?;
            buffer_form_event(&mut state, event);
            session::save(&self.store, &keys.state, &state)?;
            debug!("form"; "parked `{}` event of `{}`", event.kind, event.component_id);
            return Ok(empty(Target::App, 0));
        }

        if request.query_param(&self.session.clear_param).is_some() {
            session::purge(&self.store, &keys);
            debug!("session"; "cleared {}", keys.tree);
            return Ok(empty(Target::App, 0));
        }

        let navigating = request.ui_event().is_some_and(|e| e.is_navigation());
        let prev_keys = if navigating {
            request.session_keys(true)
        } else {
            keys.clone()
        };
        let submitted_form = request
            .ui_event()
            .filter(|e| e.is_submit())
            .and_then(|e| e.form_id.clone());

        let prev = self.load(&prev_keys)?;
        let mut state = prev.state.clone();
        let mut reruns = 0;

        loop {
            let fragment = self.resolve_fragment(request, &prev.fragments);
            let mut ui = Builder::new(BuildContext {
                event: request.ui_event().cloned(),
                initial_fragment: fragment.as_ref().map(|(f, _)| f.key().to_string()),
                state: std::mem::take(&mut state),
                fragments: prev.fragments.clone(),
                params: prev.params.clone(),
            });
            let result = match &fragment {
                Some((f, _)) => f.render(&mut ui, Value::Null),
                None => view(&mut ui),
            };
            let target = if fragment.is_some() {
                Target::Fragment
            } else {
                Target::App
            };

            match result {
                Ok(()) => {
                    let mut out = ui.into_output();
                    check_unique_keys(&out.elements, &[])?;
                    if let Some(form) = &submitted_form {
                        clear_form_events(&mut out.state, form);
                    }

                    let scoped = fragment.as_ref().map(|(f, address)| (f, address.as_slice()));
                    let Some(actions) = self.commit(&keys, &prev, scoped, out)? else {
                        return Ok(empty(Target::Fragment, reruns));
                    };

                    if navigating && prev_keys != keys {
                        session::purge(&self.store, &prev_keys);
                        debug!("session"; "navigated away from {}", prev_keys.tree);
                    }
                    debug_do! {
                        let kinds: Vec<&str> = actions.iter().map(|a| a.kind()).collect();
                        debug!("app"; "{} actions {:?}", target.as_str(), kinds);
                    }
                    return Ok(Handled {
                        response: Response::Actions(ActionsResponse::new(actions, target)),
                        reruns,
                    });
                }
                Err(Interrupt::Halt) => {
                    debug!("rerun"; "view halted");
                    return Ok(empty(target, reruns));
                }
                Err(Interrupt::Rerun(rerun)) => {
                    reruns += 1;
                    self.check_rerun_limit(reruns)?;

                    let scope = rerun.scope.resolve(fragment.is_some());
                    debug!("rerun"; "#{} scope {:?} clear_event {}", reruns, scope, rerun.clear_event);
                    session::save(&self.store, &keys.state, &rerun.state)?;
                    state = rerun.state;
                    if rerun.clear_event {
                        request.clear_event();
                    }
                    if scope == RerunScope::App {
                        request.clear_fragment_id();
                    }
                }
            }
        }
    }

    /// Registered fragment and its recorded address, when both exist.
    fn resolve_fragment(&self, request: &dyn Request, fragments: &FragmentMap) -> Option<(Fragment, Address)> {
        let id = request.fragment_id()?;
        match (self.registry.get(id), fragments.get(id)) {
            (Some(fragment), Some(address)) => Some((fragment.clone(), address.clone())),
            _ => {
                debug!("app"; "unknown fragment `{}`, rendering the whole page", id);
                None
            }
        }
    }

    /// Diff against the previous tree and persist the merged result.
    ///
    /// Returns `None` when the recorded address no longer holds the fragment.
    fn commit(
        &self,
        keys: &SessionKeys,
        prev: &Persisted,
        scoped: Option<(&Fragment, &[usize])>,
        mut out: BuildOutput,
    ) -> Result<Option<Vec<crate::core::Action>>> {
        let actions = match scoped {
            Some((fragment, address)) => {
                let Some(old) = element_at(&prev.tree, address).filter(|old| holds(old, fragment)) else {
                    debug!("app"; "stale address {:?} for fragment `{}`", address, fragment.key());
                    return Ok(None);
                };
                let actions = reconcile(old.children(), &out.elements, Target::Fragment, address);
                let mut tree = prev.tree.clone();
                splice_children(&mut tree, address, std::mem::take(&mut out.elements));
                out.elements = tree;
                actions
            }
            None => reconcile(&prev.tree, &out.elements, Target::App, &[]),
        };
        self.persist(keys, out)?;
        Ok(Some(actions))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn load(&self, keys: &SessionKeys) -> Result<Persisted> {
        Ok(Persisted {
            tree: session::load(&self.store, &keys.tree)?,
            state: session::load(&self.store, &keys.state)?,
            fragments: session::load(&self.store, &keys.fragments)?,
            params: session::load(&self.store, &keys.params)?,
        })
    }

    fn persist(&self, keys: &SessionKeys, out: BuildOutput) -> Result<()> {
        session::save(&self.store, &keys.tree, &out.elements)?;
        session::save(&self.store, &keys.state, &out.state)?;
        session::save(&self.store, &keys.fragments, &out.fragments)?;
        session::save(&self.store, &keys.params, &out.params)
    }

    fn check_rerun_limit(&self, reruns: usize) -> Result<()> {
        if self.lifecycle.exceeded(reruns) {
            crate::log!("error"; "rerun limit {} exceeded", self.lifecycle.max_reruns);
            return Err(Error::RerunLimit(reruns));
        }
        Ok(())
    }
}

/// Whether `element` is the scope rendered by `fragment`.
fn holds(element: &Element, fragment: &Fragment) -> bool {
    element.name == "fragment" && element.key == fragment.key()
}

fn empty(target: Target, reruns: usize) -> Handled {
    Handled {
        response: Response::Actions(ActionsResponse::empty(target)),
        reruns,
    }
}
