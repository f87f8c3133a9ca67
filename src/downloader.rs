use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;

// Anything that can hand the refresh cycle a fresh set of image bytes
pub trait ImageSource {
    fn fetch(&mut self) -> Result<Vec<u8>>;
}

// Downloads the radar image over HTTP.
// A single blocking client is reused for every refresh. No timeout and no retry, a failed
// request is handled by the caller showing the fallback image.
pub struct Downloader {
    client: Client,
    url: String,
}

impl Downloader {
    pub fn new(url: &str) -> Result<Self> {
        // The blocking client defaults to a 30 second timeout, switch it off
        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Downloader {
            client,
            url: url.to_owned(),
        })
    }
}

impl ImageSource for Downloader {
    // Perform the GET and return the body as is.
    // The status code is not checked, an error page simply fails to decode later on
    fn fetch(&mut self) -> Result<Vec<u8>> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        let bytes = response.bytes()?;

        log::debug!("GET {} -> {} ({} bytes)", self.url, status, bytes.len());

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::TcpListener;

    #[test]
    fn unreachable_host_is_an_error_not_a_panic() {
        // Grab a free port and release it again so nothing is listening there
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let url = format!("http://127.0.0.1:{}/radar.gif", port);
        let mut downloader = Downloader::new(&url).unwrap();
        let err = downloader.fetch().unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn invalid_url_is_reported_on_fetch() {
        let mut downloader = Downloader::new("not a url").unwrap();
        assert!(downloader.fetch().is_err());
    }
}
