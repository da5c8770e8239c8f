use std::{pin::Pin, task::Context, task::Poll};

use futures::{future::BoxFuture, Future, FutureExt};

/// Future polled cooperatively from the UI thread, once per frame.
///
/// egui repaints continuously while interaction happens, so a noop waker is
/// enough: completion is picked up on a later frame. Results either stay
/// readable across frames ([`UiFuture::poll`]) or are consumed once
/// ([`UiFuture::take`]).
pub struct UiFuture<T>(State<T>);

enum State<T> {
    Pending(BoxFuture<'static, T>),
    Ready(T),
    Gone,
}

impl<T> UiFuture<T> {
    pub fn new(future: BoxFuture<'static, T>) -> Self {
        Self(State::Pending(future))
    }

    /// Already-completed future, readable immediately.
    pub fn ready(value: T) -> Self {
        Self(State::Ready(value))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.0, State::Pending(_))
    }

    /// Polls once; returns the result while it is available.
    pub fn poll(&mut self) -> Option<&mut T> {
        if let State::Pending(future) = &mut self.0 {
            let waker = std::task::Waker::noop();
            let mut cx = Context::from_waker(&waker);
            match Pin::new(future).poll(&mut cx) {
                Poll::Ready(value) => self.0 = State::Ready(value),
                Poll::Pending => return None,
            }
        }
        match &mut self.0 {
            State::Ready(value) => Some(value),
            State::Pending(_) | State::Gone => None,
        }
    }

    /// Polls once; consumes the result when completed. Later calls return
    /// `None`.
    pub fn take(&mut self) -> Option<T> {
        self.poll()?;
        match std::mem::replace(&mut self.0, State::Gone) {
            State::Ready(value) => Some(value),
            State::Pending(_) | State::Gone => None,
        }
    }
}

impl<T: Send + 'static> UiFuture<T> {
    /// Runs `f` on a worker thread, handing the result back over a oneshot
    /// channel that the UI thread polls between frames.
    pub fn spawn_blocking(f: impl FnOnce() -> T + Send + 'static) -> Self {
        let (tx, rx) = futures::channel::oneshot::channel();
        std::thread::spawn(move || {
            let _ = tx.send(f());
        });
        Self::new(
            async move { rx.await.expect("worker thread dropped its result") }.boxed(),
        )
    }
}
