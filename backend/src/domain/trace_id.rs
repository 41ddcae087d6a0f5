//! Request-scoped correlation identifier.
//!
//! The HTTP `Trace` middleware opens a scope per request; anything running
//! inside that task (lifecycle service, repository adapters, error
//! constructors) can read it through [`TraceId::current`]. Task-locals do not
//! follow `tokio::spawn` or `spawn_blocking`, so wrap such work in
//! [`TraceId::scope`] explicitly.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use shipments::domain::TraceId;
///
/// async fn handler() -> Option<String> {
///     TraceId::current().map(|id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Identifier of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Borrow the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` installed as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use shipments::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id = TraceId::generate();
    /// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
