//! The message bus.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use common::{Command, Event, Message, MessageKind};
use storage::UnitOfWork;

use crate::context::{Context, EventCollector};
use crate::error::BusError;
use crate::notifications::Notifier;
use crate::registry::{CommandOutput, HandlerRegistry};

/// Dispatches messages to their registered handlers.
///
/// A command goes to exactly one handler, whose output is returned to the
/// caller. Events harvested from committed scopes join a FIFO worklist and
/// are dispatched after the message that produced them; an event handler
/// failure is logged and does not abort the drain.
pub struct MessageBus<U, N> {
    registry: HandlerRegistry<U, N>,
    uow: Arc<U>,
    notifications: Arc<N>,
}

impl<U, N> MessageBus<U, N>
where
    U: UnitOfWork,
    N: Notifier,
{
    /// Creates a bus over the given registry, unit of work and notifier.
    pub fn new(registry: HandlerRegistry<U, N>, uow: Arc<U>, notifications: Arc<N>) -> Self {
        Self {
            registry,
            uow,
            notifications,
        }
    }

    /// Handles one message and everything it triggers.
    ///
    /// Returns the command handler's output when the message is a command,
    /// `None` when it is an event. The type-safe [`execute`](Self::execute)
    /// is usually what callers want.
    #[tracing::instrument(skip(self, message), fields(message = message.name()))]
    pub async fn handle(
        &self,
        message: Box<dyn Message>,
    ) -> Result<Option<CommandOutput>, BusError> {
        let mut queue = VecDeque::new();
        queue.push_back(message);

        let mut output = None;
        let mut first = true;
        while let Some(message) = queue.pop_front() {
            match message.kind() {
                MessageKind::Command => {
                    let result = self.handle_command(message, &mut queue).await?;
                    if first {
                        output = Some(result);
                    }
                }
                MessageKind::Event => self.handle_event(message.as_ref(), &mut queue).await?,
            }
            first = false;
        }

        Ok(output)
    }

    /// Dispatches a command and returns its typed output.
    pub async fn execute<C: Command>(&self, command: C) -> Result<C::Output, BusError> {
        let name = command.name();
        let output = self.handle(Box::new(command)).await?;
        output
            .and_then(|output| output.downcast::<C::Output>().ok())
            .map(|output| *output)
            .ok_or(BusError::TypeMismatch(name))
    }

    async fn handle_command(
        &self,
        message: Box<dyn Message>,
        queue: &mut VecDeque<Box<dyn Message>>,
    ) -> Result<CommandOutput, BusError> {
        let name = message.name();
        let Some(handler) = self.registry.command_handler(message.as_any().type_id()) else {
            return Err(BusError::HandlerNotFound(name));
        };

        tracing::debug!(command = name, "handling command");
        let started = Instant::now();
        let (context, collector) = self.invocation_context();
        let result = handler(context, message).await;
        metrics::histogram!("command_duration_seconds").record(started.elapsed().as_secs_f64());

        match result {
            Ok(output) => {
                metrics::counter!("messages_handled_total").increment(1);
                queue.extend(collector.drain().into_iter().map(upcast));
                Ok(output)
            }
            Err(error) => {
                tracing::error!(command = name, error = %error, "command handler failed");
                Err(error)
            }
        }
    }

    async fn handle_event(
        &self,
        message: &dyn Message,
        queue: &mut VecDeque<Box<dyn Message>>,
    ) -> Result<(), BusError> {
        let name = message.name();
        let Some(handlers) = self.registry.event_handlers(message.as_any().type_id()) else {
            return Err(BusError::UnhandledMessageType(name));
        };

        for handler in handlers {
            tracing::debug!(event = name, "handling event");
            let (context, collector) = self.invocation_context();
            match handler(context, message).await {
                Ok(()) => {
                    metrics::counter!("messages_handled_total").increment(1);
                    queue.extend(collector.drain().into_iter().map(upcast));
                }
                Err(error) => {
                    metrics::counter!("event_handler_failures_total").increment(1);
                    tracing::warn!(event = name, error = %error, "event handler failed");
                }
            }
        }

        Ok(())
    }

    fn invocation_context(&self) -> (Context<U, N>, EventCollector) {
        let collector = EventCollector::new();
        let context = Context::new(
            Arc::clone(&self.uow),
            Arc::clone(&self.notifications),
            collector.clone(),
        );
        (context, collector)
    }
}

fn upcast(event: Box<dyn Event>) -> Box<dyn Message> {
    event
}
