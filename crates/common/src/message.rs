//! Message vocabulary for the dispatch engine.

use std::any::Any;

/// The two message families the bus routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// An instruction; exactly one handler, may return a value.
    Command,
    /// A fact; zero or more handlers, fire and forget.
    Event,
}

/// Anything the message bus can route.
///
/// Concrete commands and events implement this through the [`Command`] and
/// [`Event`] subtraits. The bus only ever holds `Box<dyn Message>` and
/// recovers the concrete type by `TypeId` at the handler table.
pub trait Message: Any + Send + Sync + std::fmt::Debug {
    /// Stable name of the concrete message type, used in errors and logs.
    fn name(&self) -> &'static str;

    /// Which handler table this message is routed through.
    fn kind(&self) -> MessageKind;

    /// Borrows the message for downcasting to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Consumes the box for downcasting to its concrete type.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// An instruction to change or query the system.
///
/// Dispatched to exactly one handler, which consumes the command and returns
/// `Output` to the caller.
pub trait Command: Message {
    /// Value produced by the command's handler.
    type Output: Send + 'static;
}

/// A fact about something that happened.
///
/// Aggregates queue events while mutating; the transaction scope harvests
/// them at commit and the bus feeds them back through the event handler
/// table. The trait stays object safe; each handler receives its own clone
/// of the concrete struct.
pub trait Event: Message {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pinged {
        count: u32,
    }

    impl Message for Pinged {
        fn name(&self) -> &'static str {
            "Pinged"
        }

        fn kind(&self) -> MessageKind {
            MessageKind::Event
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
            self
        }
    }

    impl Event for Pinged {}

    #[test]
    fn concrete_type_recoverable_through_the_trait_object() {
        let boxed: Box<dyn Message> = Box::new(Pinged { count: 3 });
        assert_eq!(boxed.name(), "Pinged");
        assert_eq!(boxed.kind(), MessageKind::Event);

        let back = boxed.as_any().downcast_ref::<Pinged>();
        assert_eq!(back, Some(&Pinged { count: 3 }));
    }

    #[test]
    fn into_any_consumes_the_box() {
        let boxed: Box<dyn Message> = Box::new(Pinged { count: 7 });
        let owned = boxed.into_any().downcast::<Pinged>().map(|p| p.count);
        assert_eq!(owned.ok(), Some(7));
    }

    #[test]
    fn event_upcasts_to_message() {
        let event: Box<dyn Event> = Box::new(Pinged { count: 1 });
        let message: Box<dyn Message> = event;
        assert_eq!(message.kind(), MessageKind::Event);
    }
}
