//! Hyper server setup and request handling.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response, Result as HyperResult};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

use crate::router::Router;

/// Pause after a failed accept before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Source of incoming connections for [`Server`].
pub trait Accept: Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Waits for the next connection.
    fn accept(&self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;

    /// Address connections arrive on.
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl Accept for TcpListener {
    type Stream = TcpStream;

    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        TcpListener::local_addr(self)
    }
}

/// HTTP server for the skills API.
pub struct Server<L = TcpListener> {
    listener: L,
    router: Arc<Router>,
}

impl Server<TcpListener> {
    /// Binds the listening socket.
    ///
    /// Port `0` picks a free port; read it back with [`Server::local_addr`].
    pub async fn bind(addr: SocketAddr, router: Router) -> Result<Self, io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener, router))
    }
}

impl<L: Accept> Server<L> {
    /// Serves on an already bound listener.
    pub fn from_listener(listener: L, router: Router) -> Self {
        Self {
            listener,
            router: Arc::new(router),
        }
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, io::Error> {
        self.listener.local_addr()
    }

    /// Serves connections until the process exits.
    pub async fn serve(self) -> Result<(), io::Error> {
        self.serve_until(std::future::pending()).await
    }

    /// Serves connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks. A failed
    /// accept is logged and retried after a short pause.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), io::Error>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        tracing::info!("Server listening on http://{}", addr);

        let mut shutdown = std::pin::pin!(shutdown);
        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                _ = &mut shutdown => {
                    tracing::info!("Server on {} shutting down", addr);
                    return Ok(());
                }
            };

            let (stream, peer) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!("Accept error: {}", e);
                    tokio::select! {
                        _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => continue,
                        _ = &mut shutdown => {
                            tracing::info!("Server on {} shutting down", addr);
                            return Ok(());
                        }
                    }
                }
            };

            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            tokio::task::spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                if let Err(err) = builder
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router.clone())),
                    )
                    .await
                {
                    tracing::warn!(%peer, "Error serving connection: {}", err);
                }
            });
        }
    }
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> HyperResult<Response<Full<Bytes>>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match router.route(req).await {
        Ok(response) => response,
        Err(err) => Response::from(err),
    };

    tracing::info!(%method, %path, status = response.status().as_u16(), "request handled");
    Ok(response.map(Full::new))
}
