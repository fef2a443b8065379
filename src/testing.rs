// Scripted stand-ins for the external clients

use crate::client::ApiError;
use crate::geo::Coordinates;
use crate::hotel_client::{HotelDataClient, HotelQuery, HotelRecord};
use crate::weather::{WeatherClient, WeatherCondition, WeatherSnapshot};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub fn hotel(name: &str, lat: f64, lng: f64) -> HotelRecord {
    HotelRecord {
        name: name.to_string(),
        address: format!("{} street", name),
        photo_url: format!("https://photos.example/{}.jpg", name),
        coordinates: Coordinates { lat, lng },
        rating: Some(4.0),
    }
}

struct Scripted<T> {
    delay: Option<Duration>,
    result: Result<T, ApiError>,
}

// Answers are handed out in push order; an empty script answers with no hotels
pub struct StubHotelClient {
    script: Mutex<VecDeque<Scripted<Vec<HotelRecord>>>>,
    queries: Mutex<Vec<HotelQuery>>,
}

impl StubHotelClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, hotels: Vec<HotelRecord>) {
        self.push(None, Ok(hotels));
    }

    pub fn push_err(&self, error: ApiError) {
        self.push(None, Err(error));
    }

    pub fn push_delayed(&self, delay: Duration, result: Result<Vec<HotelRecord>, ApiError>) {
        self.push(Some(delay), result);
    }

    fn push(&self, delay: Option<Duration>, result: Result<Vec<HotelRecord>, ApiError>) {
        self.script.lock().push_back(Scripted { delay, result });
    }

    pub fn last_query(&self) -> Option<HotelQuery> {
        self.queries.lock().last().cloned()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl HotelDataClient for StubHotelClient {
    async fn fetch_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelRecord>, ApiError> {
        self.queries.lock().push(query.clone());
        let next = self.script.lock().pop_front();
        let Some(Scripted { delay, result }) = next else {
            return Ok(Vec::new());
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

pub struct StubWeatherClient {
    script: Mutex<VecDeque<Result<WeatherSnapshot, ApiError>>>,
    calls: AtomicUsize,
}

impl StubWeatherClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, result: Result<WeatherSnapshot, ApiError>) {
        self.script.lock().push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherClient for StubWeatherClient {
    async fn current_weather(&self, _at: Coordinates) -> Result<WeatherSnapshot, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Other("no scripted weather".to_string())))
    }
}

pub fn snapshot(condition: WeatherCondition, city: &str, temp_celsius: f64) -> WeatherSnapshot {
    let summary = match &condition {
        WeatherCondition::Clear => "Clear".to_string(),
        WeatherCondition::Rain => "Rain".to_string(),
        WeatherCondition::Snow => "Snow".to_string(),
        WeatherCondition::Other(label) => label.clone(),
    };
    WeatherSnapshot {
        condition,
        summary,
        city: city.to_string(),
        temp_celsius,
        icon_id: "01d".to_string(),
    }
}

/// Answers a single HTTP request on a local port with a canned response.
/// Returns the base URL to point a client at and a handle yielding the raw request head.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        concat!(
            "HTTP/1.1 {}\r\n",
            "Content-Type: application/json\r\n",
            "Content-Length: {}\r\n",
            "Connection: close\r\n\r\n{}"
        ),
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&head).into_owned()
    });
    (base_url, handle)
}
