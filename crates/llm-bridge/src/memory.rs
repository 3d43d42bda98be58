//! Conversation store read interface.
//!
//! A [`Memory`] holds an ordered conversation history that outlives any
//! single request. The core only ever reads it — tool-loop turns accumulate
//! in a request-local list and persistence stays the caller's
//! responsibility.
//!
//! The trait is object-safe (boxed futures) so stores can be held as
//! `Arc<dyn Memory>` inside [`GenerateOptions`](crate::GenerateOptions).

use std::future::Future;
use std::pin::Pin;

use crate::chat::Message;

/// Error returned by a memory store. The store's own failure type is erased;
/// the history builder logs it and degrades to an empty history rather than
/// failing the call.
pub type MemoryError = Box<dyn std::error::Error + Send + Sync>;

/// An ordered conversation history store.
pub trait Memory: Send + Sync {
    /// Returns the stored messages in chronological order.
    fn get_messages<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Message>, MemoryError>> + Send + 'a>>;
}
