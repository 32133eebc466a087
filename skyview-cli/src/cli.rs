use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select, Text};
use skyview_core::{
    CityCandidate, Config, Favorites, FavoriteCity, JsonFileStore, OpenWeatherClient,
    transform_air_quality, transform_geocoding, transform_weather,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Weather, air quality and favorite cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and default location.
    Configure,

    /// Show current conditions, outlooks and air quality for a location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Print normalized entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search cities by name.
    Search {
        /// City or country name.
        query: String,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// City name; the best search match is used.
    #[arg(long, conflicts_with_all = ["lat", "favorite"])]
    pub city: Option<String>,

    /// Position in the favorites list.
    #[arg(long, conflicts_with_all = ["lat", "city"])]
    pub favorite: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List saved cities.
    List,

    /// Search a city and save the chosen match.
    Add {
        query: String,
    },

    /// Save a city by coordinates; the name comes from reverse geocoding.
    AddCoords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Remove the city at a list position.
    Remove {
        index: usize,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config).await,
            Command::Show { location, json } => show(&config, location, json).await,
            Command::Search { query } => {
                let client = OpenWeatherClient::from_config(&config)?;
                let candidates = search(&client, &config, &query).await?;
                print!("{}", render::candidates(&candidates));
                Ok(())
            }
            Command::Favorites { action } => favorites(&config, action).await,
        }
    }
}

async fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city (leave empty to skip):")
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        let client = OpenWeatherClient::from_config(&config)?;
        let chosen = choose_candidate(search(&client, &config, city.trim()).await?)?;
        config.default_location = Some(FavoriteCity::from(chosen));
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, args: LocationArgs, json: bool) -> anyhow::Result<()> {
    let client = OpenWeatherClient::from_config(config)?;
    let place = resolve_location(config, &client, args).await?;

    let fetched = client.fetch_forecast(place.latitude, place.longitude).await;

    let weather = fetched
        .weather
        .with_context(|| format!("Failed to fetch weather data for {}", place.name))?;
    let outlook = transform_weather(&weather, &weather.local_offset())?;

    let air_quality = match fetched.air_quality {
        Ok(response) => transform_air_quality(&response),
        Err(err) => {
            tracing::warn!("air quality unavailable: {err}");
            None
        }
    };

    if json {
        let doc = forecast_json(&place, &outlook, air_quality.as_ref())?;
        println!("{doc}");
        return Ok(());
    }

    match outlook.today() {
        Some(today) => print!("{}", render::today(&place.name, today)),
        None => println!("{}\n  No current conditions available", place.name),
    }
    println!();
    print!("{}", render::hourly(&outlook.hourly));
    println!();
    print!("{}", render::daily(&outlook.daily));
    println!();
    print!("{}", render::air_quality(air_quality.as_ref()));

    Ok(())
}

fn forecast_json(
    place: &FavoriteCity,
    outlook: &skyview_core::Outlook,
    air_quality: Option<&skyview_core::PollutantReading>,
) -> anyhow::Result<String> {
    #[derive(serde::Serialize)]
    struct Doc<'a> {
        location: &'a FavoriteCity,
        #[serde(flatten)]
        outlook: &'a skyview_core::Outlook,
        air_quality: Option<&'a skyview_core::PollutantReading>,
    }

    serde_json::to_string_pretty(&Doc { location: place, outlook, air_quality })
        .context("Failed to serialize forecast")
}

async fn resolve_location(
    config: &Config,
    client: &OpenWeatherClient,
    args: LocationArgs,
) -> anyhow::Result<FavoriteCity> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        let name = skyview_core::geocode::resolve_place_name(client, lat, lon).await;
        return Ok(FavoriteCity::new(name, lat, lon));
    }

    if let Some(city) = args.city {
        let best = search(client, config, &city)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No city found for '{city}'. Please try again."))?;
        return Ok(best.into());
    }

    if let Some(index) = args.favorite {
        let favorites = open_favorites(config)?;
        return Ok(favorites.get(index)?.clone());
    }

    Ok(config.default_location()?.clone())
}

async fn search(
    client: &OpenWeatherClient,
    config: &Config,
    query: &str,
) -> anyhow::Result<Vec<CityCandidate>> {
    let results = client
        .search_cities(query, config.search_limit)
        .await
        .with_context(|| format!("Failed to search cities for '{query}'"))?;
    Ok(transform_geocoding(&results, config.search_limit))
}

fn choose_candidate(mut candidates: Vec<CityCandidate>) -> anyhow::Result<CityCandidate> {
    if candidates.len() > 1 {
        return Select::new("Choose a city:", candidates)
            .prompt()
            .context("Failed to read city choice");
    }

    candidates.pop().ok_or_else(|| anyhow!("No city found. Please try again."))
}

fn open_favorites(config: &Config) -> anyhow::Result<Favorites<JsonFileStore>> {
    let store = JsonFileStore::new(config.favorites_file_path()?);
    Favorites::load(store).context("Failed to load favorite cities")
}

async fn favorites(config: &Config, action: FavoritesAction) -> anyhow::Result<()> {
    let mut favorites = open_favorites(config)?;

    match action {
        FavoritesAction::List => {
            print!("{}", render::favorites(favorites.cities()));
        }
        FavoritesAction::Add { query } => {
            let client = OpenWeatherClient::from_config(config)?;
            let chosen = choose_candidate(search(&client, config, &query).await?)?;
            let added = favorites
                .add_by_coordinates(&client, chosen.latitude, chosen.longitude)
                .await?;
            println!("{} has been added to your favorites.", added.name);
        }
        FavoritesAction::AddCoords { lat, lon } => {
            let client = OpenWeatherClient::from_config(config)?;
            let added = favorites.add_by_coordinates(&client, lat, lon).await?;
            println!("{} has been added to your favorites.", added.name);
        }
        FavoritesAction::Remove { index } => {
            let removed = favorites.remove(index)?;
            println!("{} has been removed from your favorites.", removed.name);
        }
    }

    Ok(())
}
