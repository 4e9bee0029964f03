//! The three ways a request can be answered.
//!
//! Every [`Response`] is written once with [`Response::write_to`] and then
//! released with [`Response::close`], which consumes it.

use std::{fmt, io};

use itertools::Itertools;
use log::{debug, warn};
use tokio::fs::{File, ReadDir};
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug)]
pub enum Response {
    File(FileResponse),
    Directory(DirectoryResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn file(file: File) -> Self {
        Self::File(FileResponse { file })
    }

    pub fn directory(entries: ReadDir, path: &str) -> Self {
        Self::Directory(DirectoryResponse {
            entries,
            path: path.to_string(),
        })
    }

    pub fn not_found(path: &str) -> Self {
        Self::Error(ErrorResponse::new(path, None))
    }

    pub fn error(path: &str, cause: io::Error) -> Self {
        Self::Error(ErrorResponse::new(path, Some(cause)))
    }

    /// Writes the response body and returns the number of bytes written.
    pub async fn write_to<W>(&mut self, out: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        match self {
            Self::File(response) => response.write_to(out).await,
            Self::Directory(response) => response.write_to(out).await,
            Self::Error(response) => response.write_to(out).await,
        }
    }

    pub async fn close(self) -> io::Result<()> {
        match self {
            Self::File(response) => response.close().await,
            Self::Directory(response) => response.close(),
            Self::Error(_) => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct FileResponse {
    file: File,
}

impl FileResponse {
    async fn write_to<W>(&mut self, out: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        tokio::io::copy(&mut self.file, out).await.map_err(|err| {
            warn!("file write: {}", err);
            err
        })
    }

    async fn close(self) -> io::Result<()> {
        // Waits for in-flight reads so the descriptor is closed on return.
        let file = self.file.into_std().await;
        drop(file);
        debug!("closed file");
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

pub struct DirectoryResponse {
    entries: ReadDir,
    path: String,
}

impl fmt::Debug for DirectoryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryResponse")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DirectoryResponse {
    async fn write_to<W>(&mut self, out: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!("listing {}: {}", self.path, err);
                return ErrorResponse::new(&self.path, Some(err)).write_to(out).await;
            }
        };

        let page = render_listing(&self.path, &entries);
        out.write_all(page.as_bytes()).await?;
        Ok(page.len() as u64)
    }

    async fn read_entries(&mut self) -> io::Result<Vec<ListingEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.entries.next_entry().await? {
            entries.push(ListingEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().await?.is_dir(),
            });
        }
        Ok(entries)
    }

    fn close(self) -> io::Result<()> {
        drop(self.entries);
        debug!("closed directory {}", self.path);
        Ok(())
    }
}

pub fn render_listing(path: &str, entries: &[ListingEntry]) -> String {
    let items = entries
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .map(|entry| {
            let name = escape_html(&entry.name);
            let suffix = if entry.is_dir { "/" } else { "" };
            format!("<LI><A HREF=\"{name}\">{name}{suffix}</A></LI>")
        })
        .join("");

    format!(
        "<HTML>\n<TITLE>Index of {}</TITLE>\n<UL>\n{}\n</UL>\n</HTML>",
        escape_html(path),
        items
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug)]
pub struct ErrorResponse {
    path: String,
    cause: Option<io::Error>,
}

impl ErrorResponse {
    fn new(path: &str, cause: Option<io::Error>) -> Self {
        Self {
            path: path.to_string(),
            cause,
        }
    }

    pub fn message(&self) -> String {
        match &self.cause {
            None => format!("Not found: {}", self.path),
            Some(cause) => format!("Error: {}", cause),
        }
    }

    async fn write_to<W>(&mut self, out: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let message = self.message();
        out.write_all(message.as_bytes()).await?;
        Ok(message.len() as u64)
    }
}
