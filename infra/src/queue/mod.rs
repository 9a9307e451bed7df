//! Task queue implementations
//!
//! The Redis queue is a list per queue name: producers `LPUSH`, the worker
//! `BRPOP`s, so delivery order is FIFO and a popped payload has left the list.

#[cfg(feature = "redis-queue")]
pub mod redis_queue;

#[cfg(feature = "redis-queue")]
pub use redis_queue::RedisTaskQueue;
