//! Background Tasks Module
//!
//! Tasks that run alongside callers for the lifetime of a cache.
//!
//! # Tasks
//! - Purge scheduler: removes expired entries when the armed deadline fires

mod purge;

pub(crate) use purge::spawn_purge_task;
