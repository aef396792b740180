use std::future::Future;
use tokio::{runtime::Handle, task::JoinHandle};

/// A task that will be cancelled (aborted) when dropped
#[derive(Debug)]
pub struct AbortableTask<T>(JoinHandle<T>);

impl<T> AbortableTask<T>
where
    T: Send + 'static,
{
    pub fn spawn_on<F>(handle: &Handle, fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self(handle.spawn(fut))
    }
}

impl<T> Drop for AbortableTask<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
