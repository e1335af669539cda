//! Task dispatch for link resolution
//!
//! This module contains the concurrency layer between message handling and
//! the resolvers, including:
//! - One spawned task per candidate, tracked for shutdown
//! - Cooperative cancellation shared through child tokens
//! - The supervision boundary that logs and discards failed tasks

mod dispatcher;
mod supervisor;

pub use dispatcher::ResolverDispatcher;
