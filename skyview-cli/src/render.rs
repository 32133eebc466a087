use skyview_core::{CityCandidate, FavoriteCity, Pollutant, PollutantReading, WeatherEntry};

const PLACEHOLDER: &str = "--";
const DEG: &str = "°C";

fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

/// Joins lines, each terminated by a newline.
fn block(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn today(location: &str, entry: &WeatherEntry) -> String {
    let mut lines = vec![
        location.to_string(),
        format!(
            "  Now {}{DEG}  (H {}{DEG} / L {}{DEG})  {}",
            or_placeholder(entry.current_temp),
            entry.high_temp,
            or_placeholder(entry.low_temp),
            entry.short_description.as_deref().unwrap_or(PLACEHOLDER),
        ),
    ];
    if let Some(long) = &entry.long_description {
        lines.push(format!("  {long}"));
    }
    lines.push(format!(
        "  Wind {} gusts {} km/h",
        entry.wind_direction.unwrap_or(PLACEHOLDER),
        or_placeholder(entry.wind_gust_kph),
    ));
    lines.push(format!(
        "  Humidity {}%  Precipitation {} mm  Visibility {} km  Pressure {} hPa",
        or_placeholder(entry.humidity),
        or_placeholder(entry.precipitation_mm),
        or_placeholder(entry.visibility_km),
        or_placeholder(entry.pressure_hpa),
    ));

    block(lines)
}

pub fn daily(entries: &[WeatherEntry]) -> String {
    let rows = entries.iter().map(|entry| {
        format!(
            "  {:<4} {:<20} {:>4}{DEG} / {:>4}{DEG}  {}",
            entry.time_label,
            entry.icon,
            or_placeholder(entry.low_temp),
            entry.high_temp,
            entry.short_description.as_deref().unwrap_or(PLACEHOLDER),
        )
    });

    block(std::iter::once("Daily".to_string()).chain(rows))
}

pub fn hourly(entries: &[WeatherEntry]) -> String {
    let rows = entries.iter().map(|entry| {
        format!(
            "  {:<6} {:<20} {:>4}{DEG}  {}",
            entry.time_label,
            entry.icon,
            entry.high_temp,
            entry.short_description.as_deref().unwrap_or(PLACEHOLDER),
        )
    });

    block(std::iter::once("Next hours".to_string()).chain(rows))
}

pub fn air_quality(reading: Option<&PollutantReading>) -> String {
    let Some(reading) = reading else {
        return "Air quality: no data\n".to_string();
    };

    let header = format!("Air quality: {} ({})", reading.index, reading.index_label());
    let rows = Pollutant::all().iter().map(|pollutant| {
        format!(
            "  {:<4} {} µg/m³",
            pollutant.as_str(),
            or_placeholder(reading.concentration(*pollutant)),
        )
    });

    block(std::iter::once(header).chain(rows))
}

pub fn candidates(candidates: &[CityCandidate]) -> String {
    if candidates.is_empty() {
        return "No city found.\n".to_string();
    }

    block(
        candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| format!("{:>2}. {candidate}", i + 1)),
    )
}

pub fn favorites(cities: &[FavoriteCity]) -> String {
    if cities.is_empty() {
        return "No favorite cities added yet.\n".to_string();
    }

    block(cities.iter().enumerate().map(|(i, city)| {
        format!(
            "{:>2}. {} (Lat: {}, Lon: {})",
            i, city.name, city.latitude, city.longitude
        )
    }))
}
