//! Transport layer that logs every RPC call going through a provider
//! together with its outcome and duration.
use {
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
};

/// Layer that tags the logs of each request with a label identifying the
/// component that created the provider.
pub(crate) struct LoggingLayer {
    pub label: String,
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggedProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggedProvider {
            inner,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoggedProvider<S> {
    inner: S,
    label: String,
}

impl<S> Service<RequestPacket> for LoggedProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let methods: Vec<String> = req
            .requests_mut()
            .iter()
            .map(|r| r.method().to_owned())
            .collect();
        let label = self.label.clone();
        tracing::trace!(%label, ?methods, "executing request");

        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            let elapsed = start.elapsed();
            match &res {
                Ok(_) => tracing::debug!(%label, ?methods, ?elapsed, "request succeeded"),
                Err(err) => tracing::debug!(%label, ?methods, ?elapsed, ?err, "request failed"),
            }
            res
        })
    }
}
