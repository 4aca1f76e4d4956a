use crate::core::DnsConnError;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// `Timeout` bounds any fallible socket future with a deadline, turning expiry
/// into a `DnsConnError` of kind `ErrorKind::Timeout`.
pub trait Timeout: Sized {
    fn timeout<S>(self, t: Duration, operation: S) -> Timed<Self>
    where
        S: Into<String>;
}

impl<F, V, E> Timeout for F
where
    F: Future<Output = Result<V, E>>,
    E: Into<DnsConnError>,
{
    fn timeout<S>(self, t: Duration, operation: S) -> Timed<F>
    where
        S: Into<String>,
    {
        Timed {
            operation: operation.into(),
            time: t,
            inner: tokio::time::timeout(t, self),
        }
    }
}

pin_project! {
    #[derive(Debug)]
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct Timed<T> {
        operation: String,
        time: Duration,
        #[pin]
        inner: tokio::time::Timeout<T>,
    }
}

impl<F, V, E> Future for Timed<F>
where
    F: Future<Output = Result<V, E>>,
    E: Into<DnsConnError>,
{
    type Output = Result<V, DnsConnError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        // Poll the inner Timeout future and flatten the extra layer of Result it
        // adds, converting an elapsed deadline into a timeout DnsConnError
        this.inner.poll(cx).map(|res| match res {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(e.into()),
            Err(_e) => Err(DnsConnError::timeout(*this.time, this.operation)),
        })
    }
}
