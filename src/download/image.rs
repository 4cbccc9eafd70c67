//! Direct HTTP image fetching for carousel posts.
//!
//! Carousel slides never go through the extraction engine; the first
//! thumbnail is the content and is fetched straight off the CDN.

use std::path::{Path, PathBuf};

use futures::{pin_mut, Stream, StreamExt};
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::extractor::random_user_agent;

/// Build the HTTP client used for image fetches.
///
/// Certificate verification is off: TikTok's image CDN serves certificates
/// that fail hostname checks.
pub fn image_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(random_user_agent())
        .danger_accept_invalid_certs(true)
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;
    Ok(client)
}

/// Stream an image from a URL to a destination path.
pub async fn fetch_image(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let response = client.get(url).send().await?.error_for_status()?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let stream = response.bytes_stream();
    pin_mut!(stream);
    store_stream(stream, dest).await
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Write a byte stream to `dest` via a `.part` sibling.
///
/// The destination only appears once the stream has drained completely, so
/// an interrupted fetch never leaves a file the skip-existing check would
/// mistake for a finished download.
async fn store_stream<S, B, E>(stream: S, dest: &Path) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let partial = partial_path(dest);

    match write_chunks(stream, &partial).await {
        Ok(()) => {
            tokio::fs::rename(&partial, dest).await?;
            Ok(())
        }
        Err(e) => {
            if let Err(rm_err) = tokio::fs::remove_file(&partial).await {
                tracing::debug!("Could not remove partial file: {}", rm_err);
            }
            Err(e)
        }
    }
}

async fn write_chunks<S, B, E>(mut stream: S, path: &Path) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut file = File::create(path).await?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(chunk.as_ref()).await?;
    }

    file.flush().await?;
    Ok(())
}
