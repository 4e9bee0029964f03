use log::debug;

use crate::error::OpenError;
use crate::fs::Root;
use crate::response::Response;

pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Maps request paths onto the filesystem root.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: Root,
}

impl Resolver {
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    /// Picks the response for `path`. Directory-like paths serve their
    /// default document when it exists, and a listing otherwise.
    pub async fn resolve(&self, path: &str) -> Response {
        let relative = path.strip_prefix('/').unwrap_or(path);

        if relative.is_empty() || relative.ends_with('/') {
            let index = format!("{}{}", relative, DEFAULT_DOCUMENT);
            if let Ok(entry) = self.root.open(&index).await {
                debug!("{} resolved to default document", path);
                return Response::file(entry.into_file());
            }
        }

        let entry = match self.root.open(relative).await {
            Ok(entry) => entry,
            Err(OpenError::NotFound | OpenError::Escape) => return Response::not_found(path),
            Err(OpenError::IO(err)) => return Response::error(path, err),
        };

        match entry.is_dir().await {
            Ok(true) => match entry.into_dir().await {
                Ok(entries) => Response::directory(entries, path),
                Err(err) => Response::error(path, err),
            },
            Ok(false) => Response::file(entry.into_file()),
            Err(err) => Response::error(path, err),
        }
    }
}
