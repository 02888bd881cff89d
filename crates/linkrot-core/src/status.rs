//! Single-URL status checks.

use std::time::Duration;

use crate::classify::CheckOutcome;

/// Fetch `url` and return the HTTP status of whatever response comes back.
///
/// Error statuses (403, 500, ...) are completed responses and resolve `Ok`;
/// only transport-level failure (connection error, timeout) is `Err`. No
/// retry: the first outcome is terminal for this URL.
pub async fn fetch_status(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<u16, reqwest::Error> {
    let response = client.get(url).timeout(timeout).send().await?;
    Ok(response.status().as_u16())
}

/// [`fetch_status`] with transport failure folded into a [`CheckOutcome`].
pub async fn check_url(client: &reqwest::Client, url: &str, timeout: Duration) -> CheckOutcome {
    match fetch_status(client, url, timeout).await {
        Ok(code) => CheckOutcome::Status(code),
        Err(err) => {
            log::warn!("{url}: transport failure: {err}");
            CheckOutcome::TransportFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unparseable_url_is_transport_failure() {
        let client = reqwest::Client::new();
        let outcome = check_url(&client, "http://[not-a-host", Duration::from_secs(1)).await;
        assert_eq!(outcome, CheckOutcome::TransportFailure);
    }
}
