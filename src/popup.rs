// Popup markup for hotel markers

use crate::hotel_client::HotelRecord;
use quick_xml::escape::escape;

/// Escapes `& < > " '` so provider text can't break out of the popup markup.
pub fn escape_html(input: &str) -> String {
    escape(input).into_owned()
}

/// Marker label for a hotel: name, photo, address and rating.
pub fn hotel_popup(hotel: &HotelRecord) -> String {
    let name = escape_html(&hotel.name);
    let rating = hotel
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "Not rated".to_string());

    format!(
        concat!(
            "<div class=\"hotel-info-popup\">",
            "<h3>{name}</h3>",
            "<img src=\"{photo}\" alt=\"{name}\" />",
            "<p>{address}</p>",
            "<p>{rating}</p>",
            "</div>"
        ),
        name = name,
        photo = escape_html(&hotel.photo_url),
        address = escape_html(&hotel.address),
        rating = rating,
    )
}
