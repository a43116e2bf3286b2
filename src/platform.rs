use std::sync::OnceLock;

use log::info;

use crate::error::Error;

fn http_client() -> Option<&'static reqwest::Client> {
    static CLIENT: OnceLock<Option<reqwest::Client>> = OnceLock::new();
    CLIENT
        .get_or_init(|| {
            reqwest::Client::builder()
                .user_agent(concat!("mirador/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|error| info!("Failed to initialize HTTP client: {error}"))
                .ok()
        })
        .as_ref()
}

pub(crate) async fn load_text(url: &str) -> Result<String, Error> {
    let Some(client) = http_client() else {
        return Err(Error::Network);
    };

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        info!("Failed to load {url}: {}", response.status());
        return Err(Error::Network);
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_initializes() {
        assert!(http_client().is_some());
    }
}
