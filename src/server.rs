use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::connection::handle_connection;
use crate::error::ServerError;
use crate::fs::Root;
use crate::request::DEFAULT_MAX_REQUEST_LINE;
use crate::resolver::Resolver;

pub struct Server {
    listener: TcpListener,
    resolver: Arc<Resolver>,
    max_request_line: usize,
}

impl Server {
    /// Binds `addr` and serves files below `root`.
    pub async fn bind<A: ToSocketAddrs>(addr: A, root: impl AsRef<Path>) -> Result<Server, ServerError> {
        let root = Root::new(root).await?;
        let listener = TcpListener::bind(addr).await?;
        info!(
            "listening on {} serving {}",
            listener.local_addr()?,
            root.path().display()
        );
        Ok(Self {
            listener,
            resolver: Arc::new(Resolver::new(root)),
            max_request_line: DEFAULT_MAX_REQUEST_LINE,
        })
    }

    pub fn with_max_request_line(mut self, max_request_line: usize) -> Self {
        self.max_request_line = max_request_line;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until accepting fails, one task per connection.
    pub async fn start(&self) -> Result<(), ServerError> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    error!("accept: {}", err);
                    return Err(err.into());
                }
            };

            let resolver = Arc::clone(&self.resolver);
            let max_request_line = self.max_request_line;
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, &resolver, max_request_line).await {
                    warn!("{}: {}", peer, err);
                }
            });
        }
    }

    /// Stops listening. Connections already accepted run to completion.
    pub fn close(self) {
        info!("closing listener");
        drop(self.listener);
    }
}
