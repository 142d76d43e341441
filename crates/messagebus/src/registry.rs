//! Typed handler registry.
//!
//! Handlers are plain async functions over concrete command and event
//! types. Registration erases them behind boxed closures keyed by
//! [`TypeId`], so the bus can dispatch `Box<dyn Message>` values without
//! knowing the concrete types.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::future::Future;

use common::{Command, Event, Message};
use futures_core::future::BoxFuture;
use storage::UnitOfWork;

use crate::context::Context;
use crate::error::{BusError, HandlerError};
use crate::notifications::Notifier;

/// A command handler's output, erased for transport through the bus.
pub type CommandOutput = Box<dyn Any + Send>;

pub(crate) type CommandHandlerFn<U, N> = Box<
    dyn Fn(Context<U, N>, Box<dyn Message>) -> BoxFuture<'static, Result<CommandOutput, BusError>>
        + Send
        + Sync,
>;

pub(crate) type EventHandlerFn<U, N> = Box<
    dyn Fn(Context<U, N>, &dyn Message) -> BoxFuture<'static, Result<(), BusError>> + Send + Sync,
>;

/// Routes each command type to its single handler and each event type to
/// an ordered list of handlers.
pub struct HandlerRegistry<U, N> {
    commands: HashMap<TypeId, CommandHandlerFn<U, N>>,
    events: HashMap<TypeId, Vec<EventHandlerFn<U, N>>>,
}

impl<U, N> Default for HandlerRegistry<U, N> {
    fn default() -> Self {
        Self {
            commands: HashMap::new(),
            events: HashMap::new(),
        }
    }
}

impl<U, N> HandlerRegistry<U, N>
where
    U: UnitOfWork,
    N: Notifier,
{
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for a command type.
    ///
    /// # Panics
    ///
    /// Panics if a handler is already registered for `C`. Wiring a command
    /// twice is a configuration bug, caught at startup.
    pub fn command<C, F, Fut>(&mut self, handler: F) -> &mut Self
    where
        C: Command,
        F: Fn(Context<U, N>, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C::Output, HandlerError>> + Send + 'static,
    {
        let erased: CommandHandlerFn<U, N> = Box::new(move |context, message| {
            let name = message.name();
            match message.into_any().downcast::<C>() {
                Ok(command) => {
                    let fut = handler(context, *command);
                    Box::pin(async move {
                        fut.await
                            .map(|output| Box::new(output) as CommandOutput)
                            .map_err(BusError::Handler)
                    })
                }
                Err(_) => Box::pin(async move { Err(BusError::TypeMismatch(name)) }),
            }
        });
        if self.commands.insert(TypeId::of::<C>(), erased).is_some() {
            panic!("handler already registered for command {}", type_name::<C>());
        }
        self
    }

    /// Appends a handler to the list for an event type.
    ///
    /// Handlers run in registration order when the event is dispatched.
    pub fn event<E, F, Fut>(&mut self, handler: F) -> &mut Self
    where
        E: Event + Clone,
        F: Fn(Context<U, N>, E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let erased: EventHandlerFn<U, N> = Box::new(move |context, message| {
            let name = message.name();
            match message.as_any().downcast_ref::<E>() {
                Some(event) => {
                    let fut = handler(context, event.clone());
                    Box::pin(async move { fut.await.map_err(BusError::Handler) })
                }
                None => Box::pin(async move { Err(BusError::TypeMismatch(name)) }),
            }
        });
        self.events.entry(TypeId::of::<E>()).or_default().push(erased);
        self
    }

    /// Registers an event type with no handlers.
    ///
    /// Messages of this type dispatch to nobody instead of failing with
    /// [`BusError::UnhandledMessageType`].
    pub fn event_type<E: Event>(&mut self) -> &mut Self {
        self.events.entry(TypeId::of::<E>()).or_default();
        self
    }

    pub(crate) fn command_handler(&self, type_id: TypeId) -> Option<&CommandHandlerFn<U, N>> {
        self.commands.get(&type_id)
    }

    pub(crate) fn event_handlers(&self, type_id: TypeId) -> Option<&[EventHandlerFn<U, N>]> {
        self.events.get(&type_id).map(Vec::as_slice)
    }
}
