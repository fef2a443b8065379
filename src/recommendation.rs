// Recommendation mapper: weather condition to activity suggestions

use crate::popup::escape_html;
use crate::weather::{WeatherCondition, WeatherSnapshot};

const CLEAR: &[&str] = &["Great day for hiking!", "Visit the nearest park!"];
const RAIN: &[&str] = &["How about visiting a museum?", "Check out local cafes!"];
const SNOW: &[&str] = &["Perfect for skiing!", "Try snowboarding nearby!"];
const FALLBACK: &[&str] = &["Explore local attractions!"];

/// Ordered suggestions for a condition. Total over every condition, including unknown ones.
pub fn recommend(condition: &WeatherCondition) -> &'static [&'static str] {
    match condition {
        WeatherCondition::Clear => CLEAR,
        WeatherCondition::Rain => RAIN,
        WeatherCondition::Snow => SNOW,
        WeatherCondition::Other(_) => FALLBACK,
    }
}

pub fn icon_url(icon_id: &str) -> String {
    format!("http://openweathermap.org/img/w/{}.png", icon_id)
}

/// On-screen panel presenting the suggestions. Stays open until closed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationPanel {
    pub id: u64,
    pub city: String,
    pub summary: String,
    pub temp_celsius: f64,
    pub icon_url: String,
    pub recommendations: Vec<String>,
    open: bool,
}

impl RecommendationPanel {
    pub fn from_snapshot(id: u64, snapshot: &WeatherSnapshot) -> Self {
        Self {
            id,
            city: snapshot.city.clone(),
            summary: snapshot.summary.clone(),
            temp_celsius: snapshot.temp_celsius,
            icon_url: icon_url(&snapshot.icon_id),
            recommendations: recommend(&snapshot.condition)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            open: true,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Today at {} is {}, {}.",
            self.city,
            self.summary,
            self.recommendations.join(" or ")
        )
    }

    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<dialog class=\"recommendation-container\"{open}>",
                "<div class=\"recommendation-item\">",
                "<p>{message}</p>",
                "<img src=\"{icon}\" alt=\"Weather Icon\" />",
                "<span>Temp: {temp}°C</span>",
                "</div>",
                "<button>Close</button>",
                "</dialog>"
            ),
            open = if self.open { " open" } else { "" },
            message = escape_html(&self.message()),
            icon = escape_html(&self.icon_url),
            temp = self.temp_celsius,
        )
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
