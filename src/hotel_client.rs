// Hotel data client: LiteAPI search by geographic circle and stay parameters

use crate::booking::BookingOptions;
use crate::client::{fetch_json, ApiError, ClientConfig, ClientError};
use crate::geo::Coordinates;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const LITEAPI_BASE_URL: &str = "https://api.liteapi.travel/v3.0";

const DEFAULT_CHECKIN: &str = "2024-12-30";
const DEFAULT_CHECKOUT: &str = "2024-12-31";
const DEFAULT_ADULTS: u32 = 2;
const DEFAULT_CHILDREN: u32 = 0;
const CURRENCY: &str = "USD";
const GUEST_NATIONALITY: &str = "US";
const RESULT_LIMIT: u32 = 10;

/// One hotel as returned by the search. Never modified after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelRecord {
    pub name: String,
    pub address: String,
    pub photo_url: String,
    pub coordinates: Coordinates,
    pub rating: Option<f64>,
}

// Search circle plus the booking snapshot in effect for this request
#[derive(Debug, Clone)]
pub struct HotelQuery {
    pub center: Coordinates,
    pub radius_m: f64,
    pub booking: Option<Arc<BookingOptions>>,
}

#[async_trait]
pub trait HotelDataClient: Send + Sync + 'static {
    async fn fetch_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelRecord>, ApiError>;
}

// Wire format of the LiteAPI hotel listing
#[derive(Debug, Deserialize, Serialize)]
pub struct LiteHotelsResponse {
    pub data: Vec<LiteHotel>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LiteHotel {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub main_photo: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl LiteHotelsResponse {
    /// Records with unusable coordinates are dropped rather than failing the whole page.
    pub fn into_records(self) -> Vec<HotelRecord> {
        self.data
            .into_iter()
            .filter_map(|hotel| match Coordinates::new(hotel.latitude, hotel.longitude) {
                Ok(coordinates) => Some(HotelRecord {
                    name: hotel.name,
                    address: hotel.address,
                    photo_url: hotel.main_photo,
                    coordinates,
                    rating: hotel.rating,
                }),
                Err(err) => {
                    tracing::warn!(
                        hotel = %hotel.name,
                        error = %err,
                        "Skipping hotel with invalid coordinates"
                    );
                    None
                }
            })
            .collect()
    }
}

pub struct LiteApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl LiteApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = config.build_http_client()?;
        Ok(Self { config, http })
    }

    /// Query string for a search; falls back to fixed stay defaults when no booking is stored.
    pub fn query_params(query: &HotelQuery) -> Vec<(&'static str, String)> {
        let (checkin, checkout, adults, children) = match query.booking.as_deref() {
            Some(booking) => (
                format_date(booking.checkin()),
                format_date(booking.checkout()),
                booking.adults(),
                booking.children(),
            ),
            None => (
                DEFAULT_CHECKIN.to_string(),
                DEFAULT_CHECKOUT.to_string(),
                DEFAULT_ADULTS,
                DEFAULT_CHILDREN,
            ),
        };

        vec![
            ("latitude", query.center.lat.to_string()),
            ("longitude", query.center.lng.to_string()),
            ("radius", format!("{}", query.radius_m.round() as u64)),
            ("checkin", checkin),
            ("checkout", checkout),
            ("adults", adults.to_string()),
            ("children", children.to_string()),
            ("currency", CURRENCY.to_string()),
            ("guestNationality", GUEST_NATIONALITY.to_string()),
            ("limit", RESULT_LIMIT.to_string()),
        ]
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl HotelDataClient for LiteApiClient {
    async fn fetch_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelRecord>, ApiError> {
        let request = self
            .http
            .get(self.config.endpoint("data/hotels"))
            .header("X-API-Key", &self.config.api_key)
            .header("Accept", "application/json")
            .query(&Self::query_params(query));

        let response: LiteHotelsResponse = fetch_json(request).await?;
        let records = response.into_records();
        tracing::debug!(count = records.len(), "Fetched hotels");
        Ok(records)
    }
}
