/// Weather icon code to bundled asset path.
///
/// `03n` deliberately shares the `03d` artwork.
pub const WEATHER_ICON_PATHS: &[(&str, &str)] = &[
    ("01d", "./weathericon/01d.png"),
    ("01n", "./weathericon/01n.png"),
    ("02d", "./weathericon/02d.png"),
    ("02n", "./weathericon/02n.png"),
    ("03d", "./weathericon/03d.png"),
    ("03n", "./weathericon/03d.png"),
    ("04d", "./weathericon/04d.png"),
    ("04n", "./weathericon/04n.png"),
    ("09d", "./weathericon/09d.png"),
    ("09n", "./weathericon/09n.png"),
    ("10d", "./weathericon/10d.png"),
    ("10n", "./weathericon/10n.png"),
    ("11d", "./weathericon/11d.png"),
    ("11n", "./weathericon/11n.png"),
    ("13d", "./weathericon/13d.png"),
    ("13n", "./weathericon/13n.png"),
    ("50d", "./weathericon/50d.png"),
    ("50n", "./weathericon/50n.png"),
];

/// Look up the asset path for a weather icon code.
pub fn weather_icon_path(code: &str) -> Option<&'static str> {
    WEATHER_ICON_PATHS
        .iter()
        .find(|(c, _)| *c == code.trim())
        .map(|(_, p)| *p)
}

#[cfg(test)]
#[path = "../../tests/unit/theme/icons.rs"]
mod tests;
