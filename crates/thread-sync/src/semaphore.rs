//! Binary semaphore for OS threads
//!
//! Provides a semaphore whose permit count never exceeds one, for mutual
//! exclusion and single-token signaling between preemptively scheduled
//! threads. Blocking and wakeup are delegated to the standard library's
//! condition variable; this module only does the permit accounting.
//!
//! # Example
//!
//! ```rust
//! use thread_sync::BinarySemaphore;
//!
//! let sem = BinarySemaphore::new(1);
//!
//! sem.acquire();
//! // Guarded work happens here.
//! sem.release();
//! ```

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// A semaphore capped at one permit, shared between threads
///
/// Like a counting semaphore, but the permit count can never rise above
/// one: construction clamps larger initial values, and [`release`] is a
/// no-op while a permit is already available. Releasing twice by mistake
/// therefore never lets two callers through [`acquire`] at once, which is
/// what makes the type safe to use as a lock or a one-shot gate.
///
/// Cloning the handle is cheap and every clone operates on the same
/// underlying semaphore, so a clone can be moved into each thread that
/// participates in the coordination.
///
/// # Design
///
/// - **Permit cap**: the count is clamped to one at construction and on
///   release; no operation can push it higher
/// - **Blocking `acquire`**: waits on a condition variable until a permit
///   is available, restarting the wait after spurious wakeups; it returns
///   only with a permit consumed and has no cancellation path
/// - **No ownership**: any thread may call [`release`], whether or not it
///   ever acquired; pairing acquire with release is a caller convention,
///   not something the semaphore enforces
/// - **Optional fairness**: [`new_fair`] grants permits to blocked threads
///   in strict arrival order; [`new`] leaves the grant order unspecified
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use thread_sync::BinarySemaphore;
///
/// // One permit: behaves as a lock around the guarded section.
/// let sem = BinarySemaphore::new(1);
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let sem = sem.clone();
///         thread::spawn(move || {
///             sem.acquire();
///             // At most one thread is ever here.
///             sem.release();
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(sem.available_permits(), 1);
/// ```
///
/// [`acquire`]: BinarySemaphore::acquire
/// [`release`]: BinarySemaphore::release
/// [`new`]: BinarySemaphore::new
/// [`new_fair`]: BinarySemaphore::new_fair
#[derive(Clone)]
pub struct BinarySemaphore {
    /// Shared state between all clones of this semaphore
    inner: Arc<Inner>,
}

/// State shared by every clone of a [`BinarySemaphore`]
///
/// The mutex guards all permit accounting; the condition variable holds
/// the queue of threads blocked in `acquire`. The semaphore itself never
/// tracks individual waiters.
struct Inner {
    /// Permit accounting, guarded by the mutex
    state: Mutex<SemaphoreState>,
    /// Threads blocked in `acquire` park here until a release
    available: Condvar,
    /// Granting discipline, fixed at construction
    fair: bool,
}

/// Permit accounting behind the state mutex
struct SemaphoreState {
    /// Raw permit balance, never above 1. A negative balance records how
    /// many releases are still owed from construction before the first
    /// permit appears; the public view clamps it to zero.
    balance: i32,
    /// Number of threads currently blocked in `acquire`
    waiting: usize,
    /// Next admission ticket handed to an arriving acquirer (fair mode)
    next_ticket: u64,
    /// Ticket currently first in line for a permit (fair mode)
    serving: u64,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, SemaphoreState> {
        // The critical sections below are pure field arithmetic and cannot
        // panic, so this mutex cannot be poisoned by the semaphore itself.
        self.state.lock().expect("semaphore state lock poisoned")
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, SemaphoreState>) -> MutexGuard<'a, SemaphoreState> {
        self.available
            .wait(guard)
            .expect("semaphore state lock poisoned")
    }
}

impl BinarySemaphore {
    /// Create a semaphore with the given number of permits and unspecified
    /// grant order under contention
    ///
    /// `initial_permits` above one is silently clamped to one. Negative
    /// values are accepted and mean that many additional calls to
    /// [`release`](Self::release) must happen before the first permit
    /// becomes available.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// // Requests five permits, holds one: the cap is part of the contract.
    /// let sem = BinarySemaphore::new(5);
    /// assert_eq!(sem.available_permits(), 1);
    ///
    /// // A negative count owes releases before the permit appears.
    /// let owed = BinarySemaphore::new(-1);
    /// owed.release();
    /// assert_eq!(owed.available_permits(), 0);
    /// owed.release();
    /// assert_eq!(owed.available_permits(), 1);
    /// ```
    #[must_use]
    pub fn new(initial_permits: i32) -> Self {
        Self::with_fairness(initial_permits, false)
    }

    /// Create a semaphore that grants permits in first-come-first-served
    /// order under contention
    ///
    /// Applies the same clamping rules as [`new`](Self::new). Fair grant
    /// order costs some throughput because every release has to consult
    /// the arrival order, but no waiter can be starved by later arrivals.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new_fair(1);
    /// assert!(sem.is_fair());
    /// ```
    #[must_use]
    pub fn new_fair(initial_permits: i32) -> Self {
        Self::with_fairness(initial_permits, true)
    }

    fn with_fairness(initial_permits: i32, fair: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SemaphoreState {
                    balance: initial_permits.min(1),
                    waiting: 0,
                    next_ticket: 0,
                    serving: 0,
                }),
                available: Condvar::new(),
                fair,
            }),
        }
    }

    /// Acquire the permit, blocking the calling thread until one is
    /// available
    ///
    /// Decrements the permit count from one to zero and returns. If no
    /// permit is available the thread parks until another thread calls
    /// [`release`](Self::release); the wait is restarted after spurious
    /// wakeups and there is no timeout or cancellation, so this call
    /// returns only once a permit has actually been consumed.
    ///
    /// On a fair semaphore, blocked callers are granted the permit in the
    /// order their `acquire` calls started waiting. On an unfair one a new
    /// arrival may slip ahead of threads that have been waiting longer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new(1);
    /// sem.acquire();
    /// assert_eq!(sem.available_permits(), 0);
    /// sem.release();
    /// ```
    pub fn acquire(&self) {
        let mut state = self.inner.lock_state();

        if self.inner.fair {
            // Draw an admission ticket under the lock. The condition
            // variable decides who wakes; the ticket decides who is
            // admitted, which is what makes the order strict.
            let ticket = state.next_ticket;
            state.next_ticket += 1;

            if state.balance < 1 || state.serving != ticket {
                state.waiting += 1;
                while state.balance < 1 || state.serving != ticket {
                    state = self.inner.wait(state);
                }
                state.waiting -= 1;
            }
            state.serving += 1;
        } else if state.balance < 1 {
            state.waiting += 1;
            while state.balance < 1 {
                state = self.inner.wait(state);
            }
            state.waiting -= 1;
        }

        state.balance -= 1;
    }

    /// Make the permit available, waking one blocked acquirer if the
    /// semaphore was empty
    ///
    /// If a permit is already available this does nothing: consecutive
    /// releases collapse into one, so the count never rises above one.
    /// There is no ownership check either; a thread that never acquired
    /// may release, which is what enables handoff patterns where one
    /// thread prepares a resource and signals a consumer. Keeping acquire
    /// and release balanced is the caller's convention to maintain.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new(1);
    /// sem.release();
    /// sem.release();
    /// // Still exactly one permit.
    /// assert_eq!(sem.available_permits(), 1);
    /// ```
    pub fn release(&self) {
        let mut state = self.inner.lock_state();

        if state.balance >= 1 {
            // Already at the cap; an extra release is a no-op.
            return;
        }

        state.balance += 1;
        if state.balance == 1 && state.waiting > 0 {
            if self.inner.fair {
                // A condition variable cannot wake a chosen thread, so wake
                // everyone; only the serving ticket is admitted and the
                // rest go back to sleep.
                self.inner.available.notify_all();
            } else {
                self.inner.available.notify_one();
            }
        }
    }

    /// Number of permits currently available, zero or one
    ///
    /// Useful for monitoring and for polling before a blocking `acquire`,
    /// but the value may be stale by the time the caller looks at it:
    /// another thread can acquire or release in between.
    ///
    /// While a semaphore constructed with a negative count is still owed
    /// releases, this reports zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new(1);
    /// assert_eq!(sem.available_permits(), 1);
    /// sem.acquire();
    /// assert_eq!(sem.available_permits(), 0);
    /// ```
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.inner.lock_state().balance.max(0) as usize
    }

    /// Take every permit that is immediately available, without blocking
    ///
    /// Returns how many permits were taken: one if the semaphore held its
    /// permit, zero otherwise. Afterwards the count is zero either way.
    /// Draining also cancels any releases still owed by a negative
    /// construction count.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new(1);
    /// assert_eq!(sem.drain_permits(), 1);
    /// assert_eq!(sem.drain_permits(), 0);
    /// assert_eq!(sem.available_permits(), 0);
    /// ```
    #[must_use]
    pub fn drain_permits(&self) -> usize {
        let mut state = self.inner.lock_state();
        let drained = state.balance.max(0) as usize;
        state.balance = 0;
        drained
    }

    /// Whether this semaphore grants permits in first-come-first-served
    /// order
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// assert!(!BinarySemaphore::new(1).is_fair());
    /// assert!(BinarySemaphore::new_fair(1).is_fair());
    /// ```
    #[must_use]
    pub fn is_fair(&self) -> bool {
        self.inner.fair
    }

    /// Whether any threads appear to be blocked in
    /// [`acquire`](Self::acquire)
    ///
    /// Intended for monitoring. A `true` result is already stale when it
    /// is returned (the waiter may have been granted the permit in the
    /// meantime), so this must not be used to make synchronization
    /// decisions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new(1);
    /// assert!(!sem.has_queued_threads());
    /// ```
    #[must_use]
    pub fn has_queued_threads(&self) -> bool {
        self.inner.lock_state().waiting > 0
    }

    /// Estimate of the number of threads blocked in
    /// [`acquire`](Self::acquire)
    ///
    /// An estimate because waiters come and go while the caller consumes
    /// the value; like [`has_queued_threads`](Self::has_queued_threads)
    /// it is for observability, not for control flow.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thread_sync::BinarySemaphore;
    ///
    /// let sem = BinarySemaphore::new(1);
    /// assert_eq!(sem.queue_length(), 0);
    /// ```
    #[must_use]
    pub fn queue_length(&self) -> usize {
        self.inner.lock_state().waiting
    }
}

impl Default for BinarySemaphore {
    /// A semaphore holding one permit with unspecified grant order
    fn default() -> Self {
        Self::new(1)
    }
}

impl fmt::Debug for BinarySemaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("BinarySemaphore")
            .field("permits", &state.balance.max(0))
            .field("fair", &self.inner.fair)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_holds_at_most_one_permit() {
        let sem = BinarySemaphore::new(5);
        assert_eq!(sem.available_permits(), 1);

        let fair = BinarySemaphore::new_fair(9);
        assert_eq!(fair.available_permits(), 1);
    }

    #[test]
    fn test_new_zero_and_negative_report_zero() {
        assert_eq!(BinarySemaphore::new(0).available_permits(), 0);
        assert_eq!(BinarySemaphore::new(-3).available_permits(), 0);
    }

    #[test]
    fn test_default_is_one_unfair_permit() {
        let sem = BinarySemaphore::default();
        assert_eq!(sem.available_permits(), 1);
        assert!(!sem.is_fair());
    }

    #[test]
    fn test_acquire_consumes_the_permit() {
        let sem = BinarySemaphore::new(1);
        sem.acquire();
        assert_eq!(sem.available_permits(), 0);

        sem.release();
        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn test_release_is_idempotent() {
        let sem = BinarySemaphore::new(1);
        for _ in 0..5 {
            sem.release();
        }
        assert_eq!(sem.available_permits(), 1);

        // Same from the empty state: many releases still leave one permit.
        let sem = BinarySemaphore::new(0);
        sem.release();
        sem.release();
        sem.release();
        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn test_negative_count_owes_releases() {
        let sem = BinarySemaphore::new(-2);
        sem.release();
        assert_eq!(sem.available_permits(), 0);
        sem.release();
        assert_eq!(sem.available_permits(), 0);
        sem.release();
        assert_eq!(sem.available_permits(), 1);

        // Capped from here on.
        sem.release();
        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn test_drain_takes_the_available_permit() {
        let sem = BinarySemaphore::new(1);
        assert_eq!(sem.drain_permits(), 1);
        assert_eq!(sem.available_permits(), 0);
        assert_eq!(sem.drain_permits(), 0);
    }

    #[test]
    fn test_drain_cancels_owed_releases() {
        let sem = BinarySemaphore::new(-3);
        assert_eq!(sem.drain_permits(), 0);

        // The debt is gone: a single release now produces the permit.
        sem.release();
        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn test_fairness_flag() {
        assert!(!BinarySemaphore::new(1).is_fair());
        assert!(BinarySemaphore::new_fair(0).is_fair());
    }

    #[test]
    fn test_no_waiters_reported_when_uncontended() {
        let sem = BinarySemaphore::new(1);
        assert!(!sem.has_queued_threads());
        assert_eq!(sem.queue_length(), 0);

        sem.acquire();
        assert!(!sem.has_queued_threads());
        sem.release();
    }

    #[test]
    fn test_clone_shares_state() {
        let sem = BinarySemaphore::new(1);
        let other = sem.clone();

        sem.acquire();
        assert_eq!(other.available_permits(), 0);

        other.release();
        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn test_debug_reports_permits_and_fairness() {
        let sem = BinarySemaphore::new(1);
        let rendered = format!("{sem:?}");
        assert!(rendered.contains("permits: 1"));
        assert!(rendered.contains("fair: false"));

        let held = BinarySemaphore::new_fair(0);
        let rendered = format!("{held:?}");
        assert!(rendered.contains("permits: 0"));
        assert!(rendered.contains("fair: true"));
    }
}
