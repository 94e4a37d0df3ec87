use async_trait::async_trait;
use chrono::NaiveTime;
use reqwest::{header, Client, StatusCode};
use std::io::Read;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::{domain::TIME_OF_DAY_FORMAT, Venue};

/// Errors that can occur while fetching or parsing the venue source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,

    #[error("Invalid {field} {value:?} in row {row}")]
    Parse {
        row: u64,
        field: &'static str,
        value: String,
    },
}

/// Result of a successful fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source changed; here is the complete new venue list
    Updated(Vec<Venue>),
    /// The source is unchanged since the last successful fetch
    NotModified,
}

/// Anything that can produce a complete venue list on demand
#[async_trait]
pub trait VenueSource: Send {
    async fn fetch(&mut self) -> Result<FetchOutcome, SourceError>;
}

/// Remote CSV file fetched over HTTP with ETag revalidation
pub struct CsvSource {
    url: String,
    client: Client,
    etag: Option<String>,
}

impl CsvSource {
    /// Create a new CSV source for `url`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: url.into(),
            client,
            etag: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// ETag of the last successfully parsed response, if the server sent one
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
}

#[async_trait]
impl VenueSource for CsvSource {
    async fn fetch(&mut self) -> Result<FetchOutcome, SourceError> {
        let mut request = self.client.get(&self.url);
        if let Some(etag) = &self.etag {
            request = request.header(header::IF_NONE_MATCH, etag);
        }

        tracing::debug!("Fetching venues from: {}", self.url);

        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_MODIFIED => Ok(FetchOutcome::NotModified),
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(header::ETAG)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);

                let body = response.bytes().await?;
                let venues = parse_venues(body.as_ref())?;

                // Only remember the tag once the body proved usable
                self.etag = etag;

                Ok(FetchOutcome::Updated(venues))
            }
            status => Err(SourceError::UnexpectedStatus(status)),
        }
    }
}

/// Parse the venue CSV
///
/// The first row is a header and must be present; a header-only file is an
/// empty catalog. Columns are positional:
/// `id, latitude, longitude, availability_radius, open_hour, close_hour, rating`.
/// Rows without a latitude or longitude are skipped; any other malformed
/// value rejects the whole file.
pub fn parse_venues<R: Read>(reader: R) -> Result<Vec<Venue>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    if reader.headers()?.is_empty() {
        return Err(SourceError::MissingHeader);
    }

    let mut venues = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |index: usize| record.get(index).unwrap_or("");

        if cell(1).is_empty() || cell(2).is_empty() {
            continue;
        }

        venues.push(Venue {
            id: parse_number(row, "id", cell(0))?,
            latitude: parse_number(row, "latitude", cell(1))?,
            longitude: parse_number(row, "longitude", cell(2))?,
            availability_radius: parse_number(row, "availability_radius", cell(3))?,
            open_hour: parse_time(row, "open_hour", cell(4))?,
            close_hour: parse_time(row, "close_hour", cell(5))?,
            rating: parse_number(row, "rating", cell(6))?,
        });
    }

    Ok(venues)
}

fn parse_number<T: FromStr>(row: u64, field: &'static str, value: &str) -> Result<T, SourceError> {
    value.parse().map_err(|_| SourceError::Parse {
        row,
        field,
        value: value.to_string(),
    })
}

fn parse_time(row: u64, field: &'static str, value: &str) -> Result<NaiveTime, SourceError> {
    NaiveTime::parse_from_str(value, TIME_OF_DAY_FORMAT).map_err(|_| SourceError::Parse {
        row,
        field,
        value: value.to_string(),
    })
}
