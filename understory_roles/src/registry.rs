// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Role traits and the name → factory registry.
//!
//! A role is a behavior attached to an element because its `role` attribute
//! names it. [`RoleSpec`] describes how to bind one; [`RoleRegistry`] maps
//! names to factories so markup can select behaviors by token. The registry
//! is an ordinary value owned by the host, not process-wide state.

use alloc::{boxed::Box, vec::Vec};
use core::any::Any;
use core::fmt;

use hashbrown::HashMap;
use understory_dom::{Document, NodeId};
use understory_responder::listeners::{ListenerId, ListenerTable};
use understory_responder::types::{EventKind, Listen, Outcome};

use crate::error::BindError;
use crate::options::{Configure, options_from_markup};

/// Identifier of a live role binding (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BindingId(pub(crate) u32, pub(crate) u32);

impl BindingId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a listener asks its role to do when it fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Activate the tab pair whose header is this node.
    SelectTab(NodeId),
    /// Append a new tab pair.
    AddTab,
    /// Close the tab pair whose header is this node, subject to veto.
    CloseTab(NodeId),
    /// Role-defined command for roles registered by the host application.
    Custom(u32, NodeId),
}

/// Listener payload: which binding receives which command.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Handler {
    pub(crate) binding: BindingId,
    pub(crate) command: Command,
}

/// Mutable access handed to a role while it binds, handles or unbinds.
pub struct Ctx<'a> {
    /// The document the role is bound into.
    pub doc: &'a mut Document,
    listeners: &'a mut ListenerTable<NodeId, Handler>,
    binding: BindingId,
}

impl fmt::Debug for Ctx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ctx")
            .field("binding", &self.binding)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        listeners: &'a mut ListenerTable<NodeId, Handler>,
        binding: BindingId,
    ) -> Self {
        Self {
            doc,
            listeners,
            binding,
        }
    }

    /// Binding the role runs under.
    pub fn binding(&self) -> BindingId {
        self.binding
    }

    /// Deliver `command` to this binding when `node` is activated (bubble).
    pub fn listen(&mut self, node: NodeId, command: Command) -> ListenerId {
        self.listen_with(node, EventKind::Activate, Listen::Bubble, command)
    }

    /// Deliver `command` to this binding for `kind` events on `node`.
    pub fn listen_with(
        &mut self,
        node: NodeId,
        kind: EventKind,
        listen: Listen,
        command: Command,
    ) -> ListenerId {
        let handler = Handler {
            binding: self.binding,
            command,
        };
        self.listeners.add(node, kind, listen, handler)
    }

    /// Detach a listener registered by this binding.
    ///
    /// Listeners belonging to other bindings are left alone.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let ours = self
            .listeners
            .get(id)
            .is_some_and(|l| l.payload.binding == self.binding);
        ours && self.listeners.remove(id).is_some()
    }
}

/// A behavior bound to an element.
pub trait Role: Any + fmt::Debug {
    /// Role token this behavior was bound for.
    fn name(&self) -> &'static str;

    /// React to a command delivered by one of this binding's listeners.
    ///
    /// Returning [`Outcome::Stop`] ends propagation after the current node.
    fn handle(&mut self, ctx: &mut Ctx<'_>, command: Command) -> Outcome;

    /// Release element references and listeners. Called once, before the
    /// binding is dropped.
    fn unbind(&mut self, ctx: &mut Ctx<'_>);
}

/// A role that can be bound from markup.
pub trait RoleSpec: Role + Sized {
    /// Token in the `role` attribute that selects this behavior.
    const NAME: &'static str;

    /// Options, with [`Default`] as the declared defaults.
    type Options: Configure;

    /// Bind to `el`. On error nothing may remain attached.
    fn bind(ctx: &mut Ctx<'_>, el: NodeId, options: Self::Options) -> Result<Self, BindError>;
}

/// Factory stored in a [`RoleRegistry`].
pub type Factory = Box<dyn Fn(&mut Ctx<'_>, NodeId) -> Result<Box<dyn Role>, BindError>>;

fn bind_from_markup<R: RoleSpec>(ctx: &mut Ctx<'_>, el: NodeId) -> Result<Box<dyn Role>, BindError> {
    let options = options_from_markup::<R::Options>(ctx.doc, el, R::NAME);
    let role = R::bind(ctx, el, options)?;
    Ok(Box::new(role))
}

/// Name → factory table.
#[derive(Default)]
pub struct RoleRegistry {
    factories: HashMap<Box<str>, Factory>,
}

impl fmt::Debug for RoleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("RoleRegistry")
            .field("names", &names)
            .finish()
    }
}

impl RoleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in roles (`tabset`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<crate::tabset::Tabset>();
        registry
    }

    /// Register `R` under [`RoleSpec::NAME`], replacing any previous factory.
    pub fn register<R: RoleSpec>(&mut self) -> &mut Self {
        self.register_fn(R::NAME, bind_from_markup::<R>)
    }

    /// Register an arbitrary factory under `name`.
    pub fn register_fn(
        &mut self,
        name: &str,
        factory: impl Fn(&mut Ctx<'_>, NodeId) -> Result<Box<dyn Role>, BindError> + 'static,
    ) -> &mut Self {
        if self.factories.insert(name.into(), Box::new(factory)).is_some() {
            log::debug!("role `{name}` re-registered");
        }
        self
    }

    /// Returns true if a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(|k| &**k)
    }

    pub(crate) fn factory(&self, name: &str) -> Option<&Factory> {
        self.factories.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_and_custom_factories() {
        let mut registry = RoleRegistry::with_builtins();
        assert!(registry.contains("tabset"));
        assert!(!registry.contains("accordion"));

        registry.register_fn("accordion", |_, el| Err(BindError::Stale(el)));
        let mut names: Vec<&str> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["accordion", "tabset"]);
    }

    #[test]
    fn unlisten_ignores_foreign_listeners() {
        let mut doc = Document::new();
        let node = doc.insert(None, understory_dom::Element::new("div"));
        let mut table = ListenerTable::new();

        let mut theirs = Ctx::new(&mut doc, &mut table, BindingId(0, 1));
        let foreign = theirs.listen(node, Command::AddTab);

        let mut ours = Ctx::new(&mut doc, &mut table, BindingId(1, 1));
        let own = ours.listen(node, Command::AddTab);
        assert!(!ours.unlisten(foreign));
        assert!(ours.unlisten(own));
        assert!(!ours.unlisten(own));
        assert_eq!(table.len(), 1);
    }
}
