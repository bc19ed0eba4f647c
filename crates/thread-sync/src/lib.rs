//! Blocking synchronization primitives for OS threads
//!
//! This crate provides synchronization primitives that block the calling
//! thread, built on the standard library's mutex and condition variable.
//! They are meant for preemptively scheduled threads; nothing here is
//! async-aware.
//!
//! # Primitives
//!
//! - [`BinarySemaphore`] - A semaphore holding at most one permit, for
//!   mutual exclusion and single-token handoff between threads
//!
//! # Example
//!
//! ```rust
//! use std::thread;
//! use thread_sync::BinarySemaphore;
//!
//! let gate = BinarySemaphore::new(0);
//!
//! let waiter = gate.clone();
//! let worker = thread::spawn(move || {
//!     // Parks until the main thread signals.
//!     waiter.acquire();
//! });
//!
//! gate.release();
//! worker.join().unwrap();
//! ```

#![deny(missing_docs)]

mod semaphore;

pub use semaphore::BinarySemaphore;
