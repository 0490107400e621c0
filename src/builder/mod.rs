//! Scoped element-tree builder.
//!
//! A [`Builder`] executes one view pass and accumulates the element tree it
//! produces. Nested scopes (fragments, dialogs, forms, containers) are frames
//! on an owned stack; opening one returns a [`Scope`] guard that derefs to
//! the builder and closes the frame on drop, so an interrupt propagated with
//! `?` still restores the enclosing scope.
//!
//! # Addressing
//!
//! Every frame knows the address of its scope element in the *full* tree.
//! For a stand-alone fragment render the fragment element is built at the
//! top level but addressed at its registered position, so nested fragments
//! register full-tree addresses.
//!
//! ```text
//! Builder
//! ├── root frame      prefix ""        address []
//! └── stack
//!     ├── form "f"    prefix "f"       address [2]
//!     └── container   prefix "_box_0"  address [2, 1]
//! ```

mod events;
pub mod id;
mod widgets;


use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;
use serde_json::{Value, json};

use crate::app::{Interrupt, Rerun, RerunScope};
use crate::core::element::props;
use crate::core::event::kind;
use crate::core::{Address, Element, Props, UiEvent};

pub use events::{EVENTS_FOR_LATER, FORM_EVENTS, IGNORE_SUBMIT, buffer_form_event, clear_form_events};

/// Fragment key -> address of the fragment element.
pub type FragmentMap = FxHashMap<String, Address>;

/// What a scope frame was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Fragment,
    Dialog,
    Form,
    Container,
}

impl ScopeKind {
    /// Scopes whose address is recorded in the fragment registry.
    #[inline]
    fn is_registered(self) -> bool {
        matches!(self, Self::Fragment | Self::Dialog)
    }
}

#[derive(Debug)]
struct Frame {
    kind: ScopeKind,
    key: String,
    /// Full-tree address of the scope element.
    address: Address,
    /// Index of the scope element in the parent frame.
    slot: usize,
    children: Vec<Element>,
    /// Unkeyed non-widget count per element name.
    counters: FxHashMap<String, usize>,
}

impl Frame {
    fn new(kind: ScopeKind, key: String, address: Address, slot: usize) -> Self {
        Self {
            kind,
            key,
            address,
            slot,
            children: Vec::new(),
            counters: FxHashMap::default(),
        }
    }

    fn root() -> Self {
        Self::new(ScopeKind::Root, String::new(), Vec::new(), 0)
    }
}

/// Inputs seeded into a builder by the controller.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub event: Option<UiEvent>,
    /// Fragment rendered stand-alone; excluded from registration.
    pub initial_fragment: Option<String>,
    pub state: Props,
    pub fragments: FragmentMap,
    /// Recorded fragment arguments, keyed by fragment key.
    pub params: Props,
}

/// Everything a finished view pass produced.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Top-level elements, or the fragment's children for a fragment render.
    pub elements: Vec<Element>,
    pub state: Props,
    pub fragments: FragmentMap,
    pub params: Props,
}

/// Element-tree builder for one view pass.
#[derive(Debug)]
pub struct Builder {
    root: Frame,
    stack: Vec<Frame>,
    event: Option<UiEvent>,
    initial_fragment: Option<String>,
    state: Props,
    fragments: FragmentMap,
    params: Props,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuildContext::default())
    }
}

impl Builder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            root: Frame::root(),
            stack: Vec::new(),
            event: ctx.event,
            initial_fragment: ctx.initial_fragment,
            state: ctx.state,
            fragments: ctx.fragments,
            params: ctx.params,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The last client event, if any.
    #[inline]
    pub fn event(&self) -> Option<&UiEvent> {
        self.event.as_ref()
    }

    #[inline]
    pub fn initial_fragment(&self) -> Option<&str> {
        self.initial_fragment.as_deref()
    }

    /// Is this pass a stand-alone fragment render?
    #[inline]
    pub fn is_fragment_render(&self) -> bool {
        self.initial_fragment.is_some()
    }

    /// Session state visible to the view.
    #[inline]
    pub fn state(&self) -> &Props {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut Props {
        &mut self.state
    }

    #[inline]
    pub fn fragments(&self) -> &FragmentMap {
        &self.fragments
    }

    /// Id prefix of the active scope (`""` at the top level).
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.frame().key
    }

    /// Kind of the active scope.
    #[inline]
    pub fn scope_kind(&self) -> ScopeKind {
        self.frame().kind
    }

    /// Key of the nearest enclosing form.
    pub fn form_key(&self) -> Option<&str> {
        self.stack
            .iter()
            .rev()
            .find(|f| f.kind == ScopeKind::Form)
            .map(|f| f.key.as_str())
    }

    fn frame(&self) -> &Frame {
        self.stack.last().unwrap_or(&self.root)
    }

    fn frame_mut(&mut self) -> &mut Frame {
        match self.stack.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    // =========================================================================
    // Addressing
    // =========================================================================

    /// Address the next appended element will get.
    pub fn next_address(&self) -> Address {
        let frame = self.frame();
        crate::core::address::child(&frame.address, frame.children.len())
    }

    /// Address of the most recently appended element in the active scope.
    pub fn last_address(&self) -> Option<Address> {
        let frame = self.frame();
        let last = frame.children.len().checked_sub(1)?;
        Some(crate::core::address::child(&frame.address, last))
    }

    // =========================================================================
    // Element creation
    // =========================================================================

    /// Append an element to the active scope.
    pub fn create_element(
        &mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        props: Props,
        children: Option<Vec<Element>>,
    ) -> &mut Element {
        let mut element = Element::new(name, key, props);
        element.children = children;
        self.push(element)
    }

    /// Append a non-widget element, deriving `{prefix}_{name}_{counter}` when unkeyed.
    pub fn create_non_widget(&mut self, name: &str, key: Option<&str>, props: Props) -> &mut Element {
        let key = self.non_widget_key(name, key);
        self.push(Element::new(name, key, props))
    }

    /// Key for a widget: explicit, or `{prefix}_{name}_{hash8(label)}`.
    pub fn widget_key(&self, name: &str, label: &str, key: Option<&str>) -> String {
        match key {
            Some(key) => key.to_string(),
            None => id::widget_id(self.prefix(), name, label),
        }
    }

    fn non_widget_key(&mut self, name: &str, key: Option<&str>) -> String {
        let frame = self.frame_mut();
        let counter = frame.counters.entry(name.to_string()).or_insert(0);
        let current = *counter;
        *counter += 1;
        match key {
            Some(key) => key.to_string(),
            None => id::text_id(&frame.key, name, current),
        }
    }

    fn push(&mut self, element: Element) -> &mut Element {
        let children = &mut self.frame_mut().children;
        children.push(element);
        let last = children.len() - 1;
        &mut children[last]
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    fn open_scope(
        &mut self,
        kind: ScopeKind,
        name: &str,
        key: Option<&str>,
        props: impl FnOnce(&str) -> Props,
    ) -> Scope<'_> {
        let key = self.non_widget_key(name, key);
        let mut address = self.next_address();

        let mut element = Element::new(name, key.clone(), props(&key));
        if kind.is_registered() {
            if self.initial_fragment.as_deref() == Some(key.as_str()) {
                if let Some(registered) = self.fragments.get(&key) {
                    address = registered.clone();
                }
            } else {
                self.fragments.insert(key.clone(), address.clone());
            }
            element.address = Some(address.clone());
        }

        let frame = self.frame_mut();
        let slot = frame.children.len();
        frame.children.push(element);
        self.stack.push(Frame::new(kind, key, address, slot));
        Scope { builder: self }
    }

    fn close_scope(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let Some(element) = self.frame_mut().children.get_mut(frame.slot) {
            element.children = Some(frame.children);
        }
    }

    /// Open a fragment scope and record its address.
    pub fn fragment(&mut self, key: Option<&str>) -> Scope<'_> {
        self.open_scope(ScopeKind::Fragment, "fragment", key, |k| props([("id", json!(k))]))
    }

    /// Open a dialog scope, or rerun the app when a close event targets `key`.
    pub fn dialog(&mut self, key: &str, closable: bool) -> Result<Scope<'_>, Interrupt> {
        self.dialog_like("dialog", key, key, props([("closable", json!(closable))]))
    }

    /// Dialog-like scope named `name`.
    ///
    /// A `close` event on `key` removes the state entry `gate` and raises an
    /// app rerun instead of building.
    pub fn dialog_like(&mut self, name: &str, key: &str, gate: &str, extra: Props) -> Result<Scope<'_>, Interrupt> {
        if self.event.as_ref().is_some_and(|e| e.targets(key, kind::CLOSE)) {
            self.state.remove(gate);
            crate::debug!("dialog"; "`{}` closed", key);
            return Err(self.rerun(RerunScope::App, true));
        }
        Ok(self.open_scope(ScopeKind::Dialog, name, Some(key), |k| {
            let mut p = props([("id", json!(k)), ("open", json!(true))]);
            p.extend(extra);
            p
        }))
    }

    /// Open a form scope; events of its fields are buffered until submit.
    pub fn form(&mut self, key: &str) -> Scope<'_> {
        self.open_scope(ScopeKind::Form, "form", Some(key), |k| props([("id", json!(k))]))
    }

    /// Open a generic container scope.
    pub fn container(&mut self, name: &str, key: Option<&str>, props: Props) -> Scope<'_> {
        self.open_scope(ScopeKind::Container, name, key, |_| props)
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Interrupt asking the controller to rerun with the current state.
    pub fn rerun(&self, scope: RerunScope, clear_event: bool) -> Interrupt {
        Interrupt::Rerun(Rerun {
            state: self.state.clone(),
            scope,
            clear_event,
        })
    }

    /// Interrupt that stops the request with no actions.
    pub fn halt(&self) -> Interrupt {
        Interrupt::Halt
    }

    // =========================================================================
    // Fragment arguments
    // =========================================================================

    /// Arguments for fragment `key`.
    ///
    /// A fragment render replays the arguments recorded by the last full
    /// render (falling back to `args`); a full render records `args`.
    pub fn fragment_args(&mut self, key: &str, args: Value) -> Value {
        if self.is_fragment_render() {
            return self.params.get(key).cloned().unwrap_or(args);
        }
        self.params.insert(key.to_string(), args.clone());
        args
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Top-level elements built so far (open scopes not yet attached).
    pub fn elements(&self) -> &[Element] {
        &self.root.children
    }

    /// Finish the pass.
    pub fn into_output(mut self) -> BuildOutput {
        while !self.stack.is_empty() {
            self.close_scope();
        }
        let mut elements = self.root.children;
        if let Some(initial) = &self.initial_fragment {
            elements = match elements.into_iter().find(|e| &e.key == initial) {
                Some(fragment) => fragment.children.unwrap_or_default(),
                None => Vec::new(),
            };
        }
        BuildOutput {
            elements,
            state: self.state,
            fragments: self.fragments,
            params: self.params,
        }
    }
}

// =============================================================================
// Scope guard
// =============================================================================

/// Active nested scope; closes on drop.
#[derive(Debug)]
pub struct Scope<'a> {
    builder: &'a mut Builder,
}

impl Deref for Scope<'_> {
    type Target = Builder;

    fn deref(&self) -> &Builder {
        self.builder
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Builder {
        self.builder
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.builder.close_scope();
    }
}
