//! Delivery of decoder events to the caller.
//!
//! Both decoders hand every event to an [`EventSink`] synchronously, in
//! production order, before the `trace` call that produced it returns.
//!
//! ```
//! use streamtrace::{FnSink, JsonEvent, JsonParser, JsonParserOptions};
//!
//! let mut parser = JsonParser::new(JsonParserOptions::default());
//! let mut deltas = 0;
//! parser
//!     .trace(r#"{"a":"hi"}"#, &mut FnSink(|event: JsonEvent| {
//!         if matches!(event, JsonEvent::Data { .. }) {
//!             deltas += 1;
//!         }
//!     }))
//!     .unwrap();
//! assert_eq!(deltas, 2);
//! ```
use alloc::{collections::VecDeque, vec::Vec};

/// Receives events as a decoder produces them.
pub trait EventSink<E> {
    fn emit(&mut self, event: E);
}

impl<E> EventSink<E> for Vec<E> {
    fn emit(&mut self, event: E) {
        self.push(event);
    }
}

impl<E> EventSink<E> for VecDeque<E> {
    fn emit(&mut self, event: E) {
        self.push_back(event);
    }
}

/// Discards everything.
impl<E> EventSink<E> for () {
    fn emit(&mut self, _event: E) {}
}

impl<E, S: EventSink<E> + ?Sized> EventSink<E> for &mut S {
    fn emit(&mut self, event: E) {
        (**self).emit(event);
    }
}

/// Adapts a closure into an [`EventSink`].
#[derive(Debug, Clone, Copy)]
pub struct FnSink<F>(pub F);

impl<E, F: FnMut(E)> EventSink<E> for FnSink<F> {
    fn emit(&mut self, event: E) {
        (self.0)(event);
    }
}
