use crate::config::InfluxDBConfig;
use crate::exporters::Point;
use reqwest::Client;

/// Formats points into InfluxDB line protocol format.
///
/// Consecutive points sharing measurement and tags are merged into one line.
pub fn format_points(points: &[Point], hostname: &str) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut last_measurement = String::new();
    let mut last_tags = String::new();

    for point in points {
        let measurement = escape_measurement(&point.measurement);
        let field = escape_tag(&point.field);

        let mut tags = point.tags.clone();
        tags.push(("host".to_string(), hostname.to_string()));
        tags.sort_by(|a, b| a.0.cmp(&b.0));
        let tags_str = tags
            .iter()
            .map(|(k, v)| format!(",{}={}", escape_tag(k), escape_tag(v)))
            .collect::<String>();

        if measurement == last_measurement && tags_str == last_tags {
            // Same group, append field
            current_line.push_str(&format!(",{}={}", field, point.value));
        } else {
            // New group, finalize previous line (if any) and start a new one
            if !current_line.is_empty() {
                lines.push(current_line);
            }
            current_line = format!("{measurement}{tags_str} {}={}", field, point.value);
            last_measurement = measurement;
            last_tags = tags_str;
        }
    }

    // Push the last line
    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines.join("\n")
}

// Line protocol has no newline escape, so line breaks become spaces
fn escape_measurement(value: &str) -> String {
    value
        .replace(['\n', '\r'], " ")
        .replace(',', "\\,")
        .replace(' ', "\\ ")
}

fn escape_tag(value: &str) -> String {
    value
        .replace(['\n', '\r'], " ")
        .replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

/// Exports line protocol to InfluxDB, using the v1 API when `db` is configured.
pub async fn export_points(
    client: &Client,
    config: &InfluxDBConfig,
    lines: &str,
) -> Result<(), reqwest::Error> {
    if lines.is_empty() {
        return Ok(());
    }

    let mut request_builder = match &config.db {
        Some(db) => {
            let url = format!("{}/write", config.url);
            let mut query = vec![("db", db.clone()), ("precision", "s".to_string())];
            if let Some(username) = &config.username {
                query.push(("u", username.clone()));
            }
            if let Some(password) = &config.password {
                query.push(("p", password.clone()));
            }
            client.post(&url).query(&query)
        }
        None => {
            let url = format!("{}/api/v2/write", config.url);
            let mut query = vec![("precision", "s".to_string())];
            if let Some(org) = &config.org {
                query.push(("org", org.clone()));
            }
            if let Some(bucket) = &config.bucket {
                query.push(("bucket", bucket.clone()));
            }
            client.post(&url).query(&query)
        }
    };

    request_builder = request_builder
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(lines.to_string());

    if let Some(token) = &config.token {
        if !token.is_empty() {
            request_builder = request_builder.header("Authorization", format!("Token {}", token));
        }
    }

    request_builder.send().await?.error_for_status()?;

    Ok(())
}
