// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabset: paired tab headers and panels with at most one active pair.
//!
//! ## Markup
//!
//! A container carrying the `tabset` role is bound as follows:
//!
//! - the first `tablist` descendant is the bar; binding fails without one;
//! - the outermost `tab` descendants of the bar are the headers;
//! - an `addtab` descendant of the bar, if any, appends a pair when activated;
//! - the first `tabpool` descendant hosts the panels, or the container itself
//!   when there is none;
//! - the outermost `tabpanel` descendants of the pool are the panels.
//!
//! Headers and panels pair up by position, and the counts must match even
//! when one side is empty: panels without any header fail the bind. The
//! first header already marked selected becomes the active pair; every other
//! pair is deselected and its panel hidden. When no header is marked
//! selected, nothing is active until a header is activated.
//!
//! ## Options
//!
//! `closable` and `drawer` can be declared on the container as `closable`,
//! `tabset-closable` or `data-tabset-closable`. With `closable`, every header's
//! `closetab` descendant (or the control built by
//! [`TabsetOptions::create_close`]) closes the pair unless
//! [`TabsetOptions::on_close`] vetoes it. With `drawer`, activating the active
//! header again deactivates it.
//!
//! ```
//! use understory_dom::{Document, Element, state};
//! use understory_roles::{Roles, tabset::Tabset};
//!
//! let mut doc = Document::new();
//! let root = doc.insert(None, Element::new("div").with_role("tabset"));
//! let bar = doc.insert(Some(root), Element::new("ul").with_role("tablist"));
//! let first = doc.insert(Some(bar), Element::new("li").with_role("tab"));
//! let second = doc.insert(Some(bar), Element::new("li").with_role("tab"));
//! let panels = [
//!     doc.insert(Some(root), Element::new("section").with_role("tabpanel")),
//!     doc.insert(Some(root), Element::new("section").with_role("tabpanel")),
//! ];
//!
//! let mut roles = Roles::default();
//! let binding = roles.auto(&mut doc, root, false)[0];
//!
//! roles.activate(&mut doc, second);
//! assert!(state::is_selected(&doc, second) && !state::is_selected(&doc, first));
//! assert!(state::is_hidden(&doc, panels[0]) && !state::is_hidden(&doc, panels[1]));
//! assert_eq!(roles.get::<Tabset>(binding).and_then(Tabset::active), Some(1));
//! ```

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use log::{debug, warn};
use smallvec::SmallVec;
use understory_dom::{Document, NodeId, locate, state};
use understory_responder::listeners::ListenerId;
use understory_responder::types::Outcome;

use crate::emitter::Emitter;
use crate::error::BindError;
use crate::options::{Configure, parse_flag};
use crate::registry::{Command, Ctx, Role, RoleSpec};

/// Role token of the container.
pub const TABSET: &str = "tabset";
/// Role token of the bar hosting the headers.
pub const TABLIST: &str = "tablist";
/// Role token of a header.
pub const TAB: &str = "tab";
/// Role token of a panel.
pub const TABPANEL: &str = "tabpanel";
/// Role token of the element hosting the panels.
pub const TABPOOL: &str = "tabpool";
/// Role token of the control that appends a pair.
pub const ADDTAB: &str = "addtab";
/// Role token of a header's close control.
pub const CLOSETAB: &str = "closetab";

/// Called after a pair becomes active, with its header and panel.
pub type SelectHook = Box<dyn FnMut(&mut Document, NodeId, NodeId)>;
/// Called before a pair is closed through its close control; `false` vetoes.
pub type CloseHook = Box<dyn FnMut(&Document, NodeId, NodeId) -> bool>;
/// Builds the pair to add once the tabset is ready, from whatever header,
/// panel and focus target the caller passed. `None` aborts the addition.
pub type CreateHook = Box<
    dyn FnMut(
        &mut Document,
        Option<NodeId>,
        Option<NodeId>,
        Option<NodeId>,
    ) -> Option<(NodeId, NodeId)>,
>;
/// Builds a close control for a header that has none.
pub type CreateCloseHook = Box<dyn FnMut(&mut Document, NodeId) -> Option<NodeId>>;

/// Tabset configuration. [`Default`] is the declared defaults: not closable,
/// not a drawer, no hooks.
#[derive(Default)]
pub struct TabsetOptions {
    /// Wire close controls inside headers.
    pub closable: bool,
    /// Activating the active header deactivates it.
    pub drawer: bool,
    /// See [`SelectHook`].
    pub on_select: Option<SelectHook>,
    /// See [`CloseHook`].
    pub on_close: Option<CloseHook>,
    /// See [`CreateHook`].
    pub create: Option<CreateHook>,
    /// See [`CreateCloseHook`].
    pub create_close: Option<CreateCloseHook>,
}

impl fmt::Debug for TabsetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabsetOptions")
            .field("closable", &self.closable)
            .field("drawer", &self.drawer)
            .field("on_select", &self.on_select.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("create", &self.create.is_some())
            .field("create_close", &self.create_close.is_some())
            .finish()
    }
}

impl TabsetOptions {
    /// Set [`TabsetOptions::closable`].
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// Set [`TabsetOptions::drawer`].
    pub fn drawer(mut self, drawer: bool) -> Self {
        self.drawer = drawer;
        self
    }

    /// Set [`TabsetOptions::on_select`].
    pub fn on_select(mut self, hook: impl FnMut(&mut Document, NodeId, NodeId) + 'static) -> Self {
        self.on_select = Some(Box::new(hook));
        self
    }

    /// Set [`TabsetOptions::on_close`].
    pub fn on_close(mut self, hook: impl FnMut(&Document, NodeId, NodeId) -> bool + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    /// Set [`TabsetOptions::create`].
    pub fn create(
        mut self,
        hook: impl FnMut(
            &mut Document,
            Option<NodeId>,
            Option<NodeId>,
            Option<NodeId>,
        ) -> Option<(NodeId, NodeId)>
        + 'static,
    ) -> Self {
        self.create = Some(Box::new(hook));
        self
    }

    /// Set [`TabsetOptions::create_close`].
    pub fn create_close(
        mut self,
        hook: impl FnMut(&mut Document, NodeId) -> Option<NodeId> + 'static,
    ) -> Self {
        self.create_close = Some(Box::new(hook));
        self
    }
}

impl Configure for TabsetOptions {
    const KEYS: &'static [&'static str] = &["closable", "drawer"];

    fn configure(&mut self, key: &str, value: &str) {
        let Some(flag) = parse_flag(key, value) else {
            debug!("ignoring tabset option {key}={value:?}");
            return;
        };
        match key {
            "closable" => self.closable = flag,
            "drawer" => self.drawer = flag,
            _ => {}
        }
    }
}

/// A pair addressed by position or by its header or panel element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabRef {
    /// Position in the tabset.
    Index(usize),
    /// The header or the panel of a pair.
    Node(NodeId),
}

impl From<usize> for TabRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<NodeId> for TabRef {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Notifications broadcast by a [`Tabset`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabsetEvent {
    /// A pair was registered at `index`.
    Added {
        /// Position of the new pair.
        index: usize,
        /// Its header.
        header: NodeId,
        /// Its panel.
        panel: NodeId,
    },
    /// The pair at `index` became active.
    Selected {
        /// Position of the pair.
        index: usize,
        /// Its header.
        header: NodeId,
        /// Its panel.
        panel: NodeId,
    },
    /// The active pair was deactivated without another taking its place.
    Deselected {
        /// Its header.
        header: NodeId,
        /// Its panel.
        panel: NodeId,
    },
    /// The pair formerly at `index` was removed.
    Closed {
        /// Former position of the pair.
        index: usize,
        /// Its header, now detached.
        header: NodeId,
        /// Its panel, now detached.
        panel: NodeId,
    },
}

/// Where a tabset is in its life.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Registering the pairs found in markup; operations are inert.
    Binding,
    /// Fully operational.
    Ready,
    /// Torn down; operations are inert.
    Unbound,
}

#[derive(Debug)]
struct TabPair {
    header: NodeId,
    panel: NodeId,
    listeners: SmallVec<[ListenerId; 2]>,
}

/// The tabset controller.
///
/// Headers and panels are stored as pairs, so both sequences always have the
/// same length and are added and removed together.
pub struct Tabset {
    container: NodeId,
    bar: NodeId,
    pool: NodeId,
    add_control: Option<NodeId>,
    add_listener: Option<ListenerId>,
    pairs: Vec<TabPair>,
    active: Option<usize>,
    lifecycle: Lifecycle,
    options: TabsetOptions,
    events: Emitter<TabsetEvent>,
}

impl fmt::Debug for Tabset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tabset")
            .field("container", &self.container)
            .field("bar", &self.bar)
            .field("pool", &self.pool)
            .field("add_control", &self.add_control)
            .field("pairs", &self.pairs.len())
            .field("active", &self.active)
            .field("lifecycle", &self.lifecycle)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Tabset {
    /// Element the tabset is bound to.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Element hosting the headers.
    pub fn bar(&self) -> NodeId {
        self.bar
    }

    /// Element hosting the panels.
    pub fn pool(&self) -> NodeId {
        self.pool
    }

    /// The control that appends a pair, if the markup has one.
    pub fn add_control(&self) -> Option<NodeId> {
        self.add_control
    }

    /// Headers, in pair order.
    pub fn tabs(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.pairs.iter().map(|p| p.header)
    }

    /// Panels, in pair order.
    pub fn panels(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.pairs.iter().map(|p| p.panel)
    }

    /// Header and panel at `index`.
    pub fn pair(&self, index: usize) -> Option<(NodeId, NodeId)> {
        self.pairs.get(index).map(|p| (p.header, p.panel))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Position of the active pair.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Header of the active pair.
    pub fn active_tab(&self) -> Option<NodeId> {
        self.active.and_then(|i| self.pair(i)).map(|(h, _)| h)
    }

    /// Panel of the active pair.
    pub fn active_panel(&self) -> Option<NodeId> {
        self.active.and_then(|i| self.pair(i)).map(|(_, p)| p)
    }

    /// Returns true once binding finished and until unbound.
    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Effective options.
    pub fn options(&self) -> &TabsetOptions {
        &self.options
    }

    /// Subscribe to or unsubscribe from [`TabsetEvent`]s.
    pub fn events_mut(&mut self) -> &mut Emitter<TabsetEvent> {
        &mut self.events
    }

    /// Resolve a pair position. Element references match headers first, then
    /// panels. Never mutates.
    pub fn get_tab(&self, tab: impl Into<TabRef>) -> Option<usize> {
        match tab.into() {
            TabRef::Index(index) => (index < self.pairs.len()).then_some(index),
            TabRef::Node(node) => self
                .pairs
                .iter()
                .position(|p| p.header == node)
                .or_else(|| self.pairs.iter().position(|p| p.panel == node)),
        }
    }

    /// Returns true if `node` is one of the headers or panels.
    pub fn has_tab(&self, node: NodeId) -> bool {
        self.get_tab(node).is_some()
    }

    /// Register a header/panel pair and return its position.
    ///
    /// Once ready, a configured [`TabsetOptions::create`] hook decides the
    /// pair from the arguments. Elements without a parent are inserted: the
    /// header into the bar ahead of the add control, the panel at the end of
    /// the pool. Registering an existing pair again only activates it. A pair
    /// that conflicts with an existing one is rejected. When ready, the pair
    /// becomes active, and `focus` receives focus afterwards.
    pub fn add_tab(
        &mut self,
        ctx: &mut Ctx<'_>,
        header: Option<NodeId>,
        panel: Option<NodeId>,
        focus: Option<NodeId>,
    ) -> Option<usize> {
        let ready = match self.lifecycle {
            Lifecycle::Unbound => return None,
            Lifecycle::Binding => false,
            Lifecycle::Ready => true,
        };
        let (header, panel) = match &mut self.options.create {
            Some(create) if ready => create(ctx.doc, header, panel, focus)?,
            _ => (header?, panel?),
        };
        if !ctx.doc.is_alive(header) || !ctx.doc.is_alive(panel) {
            debug!("not adding tab: {header:?} or {panel:?} is gone");
            return None;
        }

        let existing = self.pairs.iter().position(|p| p.header == header);
        let index = match (existing, self.pairs.iter().position(|p| p.panel == panel)) {
            (Some(i), Some(j)) if i == j => {
                if ready && self.active != Some(i) {
                    self.change_to(ctx, i);
                }
                i
            }
            (None, None) => {
                let i = self.insert_pair(ctx, header, panel)?;
                if ready {
                    self.change_to(ctx, i);
                }
                i
            }
            _ => {
                warn!("{header:?} and {panel:?} already belong to different tabs");
                return None;
            }
        };

        if let Some(target) = focus
            && !ctx.doc.focus(target)
        {
            debug!("focus target {target:?} is gone");
        }
        Some(index)
    }

    /// Make the pair active, deactivating the previous one. In drawer mode,
    /// changing to the active pair deactivates it instead.
    ///
    /// Returns false if the tabset is not ready or `tab` does not resolve.
    pub fn change_to(&mut self, ctx: &mut Ctx<'_>, tab: impl Into<TabRef>) -> bool {
        if !self.is_ready() {
            return false;
        }
        let tab = tab.into();
        let Some(index) = self.get_tab(tab) else {
            debug!("change_to: no tab for {tab:?}");
            return false;
        };
        if self.options.drawer && self.active == Some(index) {
            self.deactivate(ctx.doc, index);
            return true;
        }
        if let Some(previous) = self.active.filter(|&a| a != index) {
            self.deactivate(ctx.doc, previous);
        }

        let (header, panel) = (self.pairs[index].header, self.pairs[index].panel);
        state::select(ctx.doc, header);
        state::show(ctx.doc, panel);
        self.active = Some(index);
        if let Some(on_select) = &mut self.options.on_select {
            on_select(ctx.doc, header, panel);
        }
        self.events.broadcast(&TabsetEvent::Selected {
            index,
            header,
            panel,
        });
        true
    }

    /// Deselect the header and hide the panel of a pair, keeping it
    /// registered.
    pub fn hide_tab(&mut self, ctx: &mut Ctx<'_>, tab: impl Into<TabRef>) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(index) = self.get_tab(tab) else {
            return false;
        };
        self.deactivate(ctx.doc, index);
        true
    }

    /// [`Tabset::hide_tab`] for every pair, in order.
    pub fn hide_tabs(&mut self, ctx: &mut Ctx<'_>) {
        for index in 0..self.pairs.len() {
            self.hide_tab(ctx, index);
        }
    }

    /// Remove a pair: detach both elements from the document, drop them from
    /// the tabset and detach their listeners. Later pairs move down by one.
    ///
    /// Returns the removed header and panel.
    pub fn close_tab(&mut self, ctx: &mut Ctx<'_>, tab: impl Into<TabRef>) -> Option<(NodeId, NodeId)> {
        if !self.is_ready() {
            return None;
        }
        let index = self.get_tab(tab)?;
        let pair = self.pairs.remove(index);
        for id in pair.listeners {
            ctx.unlisten(id);
        }
        ctx.doc.detach(pair.header);
        ctx.doc.detach(pair.panel);
        self.active = match self.active {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        self.events.broadcast(&TabsetEvent::Closed {
            index,
            header: pair.header,
            panel: pair.panel,
        });
        Some((pair.header, pair.panel))
    }

    /// Close a pair as its close control does: ask
    /// [`TabsetOptions::on_close`] first and close only if it agrees.
    pub fn request_close(&mut self, ctx: &mut Ctx<'_>, tab: impl Into<TabRef>) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some((header, panel)) = self.get_tab(tab).and_then(|i| self.pair(i)) else {
            return false;
        };
        if let Some(on_close) = &mut self.options.on_close
            && !on_close(ctx.doc, header, panel)
        {
            debug!("closing {header:?} vetoed");
            return false;
        }
        self.close_tab(ctx, header).is_some()
    }

    fn deactivate(&mut self, doc: &mut Document, index: usize) {
        let (header, panel) = (self.pairs[index].header, self.pairs[index].panel);
        state::deselect(doc, header);
        state::hide(doc, panel);
        if self.active == Some(index) {
            self.active = None;
            self.events
                .broadcast(&TabsetEvent::Deselected { header, panel });
        }
    }

    fn insert_pair(&mut self, ctx: &mut Ctx<'_>, header: NodeId, panel: NodeId) -> Option<usize> {
        let mut placed_header = false;
        if ctx.doc.parent_of(header).is_none() {
            let before = self
                .add_control
                .and_then(|add| child_toward(ctx.doc, self.bar, add));
            if let Err(err) = ctx.doc.insert_before(self.bar, header, before) {
                warn!("cannot place tab header: {err}");
                return None;
            }
            placed_header = true;
        }
        if ctx.doc.parent_of(panel).is_none()
            && let Err(err) = ctx.doc.append_child(self.pool, panel)
        {
            warn!("cannot place tab panel: {err}");
            if placed_header {
                ctx.doc.detach(header);
            }
            return None;
        }

        let mut listeners = SmallVec::new();
        listeners.push(ctx.listen(header, Command::SelectTab(header)));
        if self.options.closable {
            match self.close_control(ctx.doc, header) {
                Some(close) => listeners.push(ctx.listen(close, Command::CloseTab(header))),
                None => debug!("tab {header:?} has no close control"),
            }
        }
        let index = self.pairs.len();
        self.pairs.push(TabPair {
            header,
            panel,
            listeners,
        });
        self.events.broadcast(&TabsetEvent::Added {
            index,
            header,
            panel,
        });
        Some(index)
    }

    fn close_control(&mut self, doc: &mut Document, header: NodeId) -> Option<NodeId> {
        if let Some(close) = locate::get_role(doc, header, CLOSETAB) {
            return Some(close);
        }
        let create = self.options.create_close.as_mut()?;
        let close = create(doc, header)?;
        if doc.parent_of(close).is_none()
            && let Err(err) = doc.append_child(header, close)
        {
            warn!("cannot place close control: {err}");
            return None;
        }
        Some(close)
    }
}

/// The child of `ancestor` on the path down to `node`.
fn child_toward(doc: &Document, ancestor: NodeId, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        let parent = doc.parent_of(current)?;
        if parent == ancestor {
            return Some(current);
        }
        current = parent;
    }
}

impl Role for Tabset {
    fn name(&self) -> &'static str {
        TABSET
    }

    fn handle(&mut self, ctx: &mut Ctx<'_>, command: Command) -> Outcome {
        match command {
            Command::SelectTab(header) => {
                self.change_to(ctx, header);
                Outcome::Continue
            }
            Command::AddTab => {
                self.add_tab(ctx, None, None, None);
                Outcome::Continue
            }
            // The close control sits inside its header; stop before the
            // header's own listener would select the pair.
            Command::CloseTab(header) => {
                self.request_close(ctx, header);
                Outcome::Stop
            }
            Command::Custom(..) => Outcome::Continue,
        }
    }

    fn unbind(&mut self, ctx: &mut Ctx<'_>) {
        for pair in self.pairs.drain(..) {
            for id in pair.listeners {
                ctx.unlisten(id);
            }
        }
        if let Some(id) = self.add_listener.take() {
            ctx.unlisten(id);
        }
        self.add_control = None;
        self.active = None;
        self.events.clear();
        self.lifecycle = Lifecycle::Unbound;
    }
}

impl RoleSpec for Tabset {
    const NAME: &'static str = TABSET;
    type Options = TabsetOptions;

    fn bind(ctx: &mut Ctx<'_>, el: NodeId, options: TabsetOptions) -> Result<Self, BindError> {
        let doc = &*ctx.doc;
        let bar = locate::get_role(doc, el, TABLIST).ok_or(BindError::MissingRole { role: TABLIST })?;
        let headers = locate::find_roles(doc, bar, Some(TAB), false);
        let add_control = locate::get_role(doc, bar, ADDTAB);
        let pool = locate::get_role(doc, el, TABPOOL).unwrap_or(el);
        let panels = locate::find_roles(doc, pool, Some(TABPANEL), false);
        if headers.len() != panels.len() {
            return Err(BindError::MismatchedCount {
                tabs: headers.len(),
                panels: panels.len(),
            });
        }
        let initial = headers.iter().position(|&h| state::is_selected(doc, h));

        let mut tabset = Self {
            container: el,
            bar,
            pool,
            add_control,
            add_listener: None,
            pairs: Vec::with_capacity(headers.len()),
            active: None,
            lifecycle: Lifecycle::Binding,
            options,
            events: Emitter::new(),
        };
        for (i, (&header, &panel)) in headers.iter().zip(&panels).enumerate() {
            if Some(i) == initial {
                state::select(ctx.doc, header);
                state::show(ctx.doc, panel);
            } else {
                state::deselect(ctx.doc, header);
                state::hide(ctx.doc, panel);
            }
            tabset.add_tab(ctx, Some(header), Some(panel), None);
        }
        tabset.active = initial.filter(|&i| i < tabset.pairs.len());
        if let Some(add) = add_control {
            tabset.add_listener = Some(ctx.listen(add, Command::AddTab));
        }
        tabset.lifecycle = Lifecycle::Ready;
        debug!(
            "tabset on {el:?}: {} pairs, active {:?}",
            tabset.pairs.len(),
            tabset.active
        );
        Ok(tabset)
    }
}
