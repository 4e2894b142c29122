//! Completion callback.

use std::fmt;
use std::sync::Arc;

use super::ResultInfo;

type CallbackFn = dyn Fn(ResultInfo) -> anyhow::Result<()> + Send + Sync;

/// Invoked once per request, synchronously, from inside `execute`.
/// An `Err` stops the batch and is returned from `execute`.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(ResultInfo) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Callback(Arc::new(f))
    }

    pub(crate) fn call(&self, result: ResultInfo) -> anyhow::Result<()> {
        (self.0)(result)
    }
}

impl<F> From<F> for Callback
where
    F: Fn(ResultInfo) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Callback::new(f)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}
