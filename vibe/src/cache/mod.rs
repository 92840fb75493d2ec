//! Single-flight memoization for expensive async computations.
//!
//! [`MemoCell`] holds at most one value per process lifetime. The first caller runs the
//! compute function; callers that arrive while it is in flight attach to the same shared
//! future instead of starting another one. Failures are never cached.
//!
//! **Interaction**: Owned by [`AnchorIndex`](crate::anchors::AnchorIndex), which is built
//! once at startup and shared by every request handler.

mod memo_cell;

pub use memo_cell::MemoCell;

use serde::Serialize;

/// Observable state of a [`MemoCell`].
///
/// `Empty -> Pending` on the first [`MemoCell::get_or_compute`], `Pending -> Populated`
/// on success, `Pending -> Empty` on failure, and any state `-> Empty` on
/// [`MemoCell::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// No value held and nothing running.
    Empty,
    /// A computation is in flight.
    Pending,
    /// A value is held.
    Populated,
}

impl std::fmt::Display for CacheState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CacheState::Empty => "empty",
            CacheState::Pending => "pending",
            CacheState::Populated => "populated",
        };
        f.write_str(s)
    }
}
