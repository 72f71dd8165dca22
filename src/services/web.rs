use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PUBLIC_IP_URL: &str = "https://www.whatismyip.org/my-ip-address";

/// Location details published alongside the public IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpData {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub country_code: String,
    pub isp: String,
    pub latitude: String,
    pub longitude: String,
}

const FIELD_COUNT: usize = 8;

/// Fetch and parse the public IP page.
///
/// `Ok(None)` means the page was fetched but its table did not have the
/// expected shape.
pub async fn fetch_public_ip_data() -> Result<Option<IpData>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;

    let body = client
        .get(PUBLIC_IP_URL)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", PUBLIC_IP_URL))?
        .error_for_status()
        .context("Public IP page returned an error status")?
        .text()
        .await
        .context("Failed to read public IP page body")?;

    debug!("Fetched {} bytes from {}", body.len(), PUBLIC_IP_URL);
    Ok(parse_ip_table(&body))
}

/// Extract [`IpData`] from a two-column label/value HTML table.
///
/// The table must hold exactly eight label/value pairs in the published
/// order, otherwise the data cannot be trusted and `None` is returned.
pub fn parse_ip_table(html: &str) -> Option<IpData> {
    let cell = match Regex::new(r"(?is)<td[^>]*>(.*?)</td>") {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid table cell pattern: {}", e);
            return None;
        }
    };
    let tag = Regex::new(r"(?s)<[^>]*>").ok()?;

    let cells: Vec<String> = cell
        .captures_iter(html)
        .map(|c| tag.replace_all(&c[1], "").trim().to_string())
        .collect();

    if cells.len() % 2 != 0 {
        debug!("Odd number of table cells ({}), ignoring page", cells.len());
        return None;
    }

    let values: Vec<String> = cells.into_iter().skip(1).step_by(2).collect();
    if values.len() != FIELD_COUNT {
        debug!("Expected {} values, found {}", FIELD_COUNT, values.len());
        return None;
    }

    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();
    Some(IpData {
        ip: next(),
        city: next(),
        region: next(),
        country: next(),
        country_code: next(),
        isp: next(),
        latitude: next(),
        longitude: next(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(k, v)| format!("<tr><td class=\"k\">{}</td><td><b>{}</b></td></tr>\n", k, v))
            .collect();
        format!("<html><table>{}</table></html>", body)
    }

    #[test]
    fn test_parse_complete_table() {
        let html = table(&[
            ("Your IP", "203.0.113.7"),
            ("City", "Portland"),
            ("Region", "Oregon"),
            ("Country", "United States"),
            ("Country Code", "US"),
            ("ISP", "Example Net"),
            ("Latitude", "45.5"),
            ("Longitude", "-122.6"),
        ]);

        let data = parse_ip_table(&html).unwrap();
        assert_eq!(data.ip, "203.0.113.7");
        assert_eq!(data.country_code, "US");
        assert_eq!(data.longitude, "-122.6");
    }

    #[test]
    fn test_parse_rejects_short_table() {
        let html = table(&[("Your IP", "203.0.113.7"), ("City", "Portland")]);
        assert_eq!(parse_ip_table(&html), None);
    }

    #[test]
    fn test_parse_rejects_odd_cell_count() {
        assert_eq!(parse_ip_table("<td>Your IP</td>"), None);
    }
}
