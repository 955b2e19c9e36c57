// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Runtime used to drive the tick loop.

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct Runtime {
    handle: Handle,
}

impl Runtime {
    pub(crate) fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Captures the runtime of the calling context.
    pub(crate) fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| Error::caused_by(format!("a Tokio runtime is required to drive the clock: {e}")))
    }

    pub(crate) fn spawn<T>(&self, work: T) -> TickTask
    where
        T: Future<Output = ()> + Send + 'static,
    {
        TickTask(self.handle.spawn(work))
    }
}

/// The single in-flight tick loop. Aborting stops it at its next suspension point.
#[derive(Debug)]
pub(crate) struct TickTask(JoinHandle<()>);

impl TickTask {
    pub(crate) fn abort(self) {
        self.0.abort();
    }
}
