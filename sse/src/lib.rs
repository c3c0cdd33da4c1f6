//! Server-Sent Events (SSE) infrastructure for real-time catalog updates.
//!
//! This crate provides the fan-out channel that pushes product changes from the
//! backend to every connected client.
//!
//! # Architecture
//!
//! - **One registry, one index**: every open SSE stream is registered in a
//!   DashMap keyed by a server-generated `ConnectionId`.
//! - **Connection and Broadcast scopes**: messages either go to a single
//!   connection (the `connected` greeting) or to everyone (product events).
//! - **Ephemeral messages**: all events are at-most-once. A client that is not
//!   connected when an event fires never sees it and must reload the list.
//! - **Fire-and-forget**: each connection owns an unbounded channel, so a slow
//!   client never holds up a broadcast. Closed connections are dropped when a
//!   send to them fails.
//!
//! # Message Flow
//!
//! 1. Client opens the SSE stream at `/product_hub`
//! 2. Connection registered in ConnectionRegistry and greeted with `connected`
//! 3. A product is created, updated or deleted through the REST API
//! 4. The domain layer publishes a `DomainEvent`
//! 5. `SseDomainEventHandler` turns it into an SSE event and the Manager
//!    broadcasts it to every registered connection
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and type-safe ConnectionId
//! - `manager`: High-level message routing (delegates to ConnectionRegistry)
//! - `message`: Type-safe event and scope definitions
//! - `domain_event_handler`: Bridge from `events::DomainEvent` to SSE messages

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use domain_event_handler::SseDomainEventHandler;
pub use manager::Manager;
