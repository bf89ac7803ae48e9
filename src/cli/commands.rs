use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::media::{image_url, poster_size};
use crate::api::{source_from_config, MediaItem, MediaType, MetadataSource, Page, SearchScope, SortBy};
use crate::catalog::browse::{current_year, year_options};
use crate::catalog::{page_window, BrowseKind, BrowseView, FavoritesTab, FavoritesView, HomeRow, HomeView, SearchView};
use crate::config::{config_path, load_config, load_or_default, save_config, Config};
use crate::details::driver::{run_details, DetailsDriver};
use crate::details::episodes::batch_label;
use crate::details::{DetailsPhase, DetailsView, EpisodesPhase, Route, WatchNow};
use crate::error::Result;
use crate::fetch::FetchState;
use crate::i18n::{season_label, Language};
use crate::player::Player;
use crate::storage::{db_path, MemoryStorage, SqliteStorage, Storage};
use crate::store::{AppContext, AppStore};

/// Everything a command needs: config, the provided store and a metadata source
pub struct Session {
    pub config: Config,
    pub ctx: AppContext,
    pub source: Arc<dyn MetadataSource>,
}

impl Session {
    pub fn open(ephemeral: bool) -> Result<Self> {
        let config = load_or_default()?;

        let storage: Box<dyn Storage> = if ephemeral {
            Box::new(MemoryStorage::new())
        } else {
            let path = config.storage.path.clone().unwrap_or_else(db_path);
            match SqliteStorage::open(&path) {
                Ok(storage) => Box::new(storage),
                Err(e) => {
                    tracing::warn!("Cannot open {}: {}, nothing will be saved", path.display(), e);
                    Box::new(MemoryStorage::new())
                }
            }
        };

        let store = AppStore::hydrate(storage, config.ui.default_language);
        let source = source_from_config(&config);
        tracing::debug!("Using metadata source '{}'", source.name());

        Ok(Self {
            config,
            ctx: AppContext::provide(store),
            source,
        })
    }

    pub fn store(&self) -> Result<&AppStore> {
        Ok(self.ctx.store()?)
    }

    pub fn store_mut(&mut self) -> Result<&mut AppStore> {
        Ok(self.ctx.store_mut()?)
    }

    pub fn shutdown(self) {
        self.ctx.shutdown();
    }
}

/// Run the first-time setup
pub async fn init() -> Result<()> {
    if config_path().exists() {
        let answer = prompt("Configuration already exists. Overwrite? [y/N]: ")?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    println!("A TMDB API key gives access to the full catalog (https://www.themoviedb.org/settings/api).");
    let api_key = prompt("TMDB API key (leave empty for the offline demo catalog): ")?;
    let language = prompt("Interface language [ar/en] (default ar): ")?;

    let mut config = Config::new(api_key);
    if !language.is_empty() {
        config.ui.default_language = language
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }

    save_config(&config)?;
    println!("\nConfiguration saved to {}", config_path().display());
    println!("Run 'sinema' to start browsing.");
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    Ok(input.trim().to_string())
}

const CONFIG_KEYS: &str = "tmdb_api_key, default_language, player_command, storage_path";

/// Handle the config command
pub async fn config(show: bool, set: Option<String>, reset: bool) -> Result<()> {
    if reset {
        if config_path().exists() {
            std::fs::remove_file(config_path())?;
            println!("Configuration reset. Run 'sinema init' to set up again.");
        } else {
            println!("No configuration file found.");
        }
        return Ok(());
    }

    if let Some(key_value) = set {
        let Some((key, value)) = key_value.split_once('=') else {
            println!("Invalid format. Use: --set key=value");
            println!("Available keys: {}", CONFIG_KEYS);
            return Ok(());
        };

        let mut config = load_or_default()?;
        match key {
            "tmdb_api_key" => config.tmdb.api_key = value.to_string(),
            "default_language" => match Language::from_code(value) {
                Some(language) => config.ui.default_language = language,
                None => {
                    println!("Unknown language: {} (expected ar or en)", value);
                    return Ok(());
                }
            },
            "player_command" => config.player.command = value.to_string(),
            "storage_path" => config.storage.path = Some(value.into()),
            _ => {
                println!("Unknown key: {}", key);
                println!("Available keys: {}", CONFIG_KEYS);
                return Ok(());
            }
        }

        save_config(&config)?;
        println!("Configuration updated.");
        return Ok(());
    }

    if show {
        match load_config() {
            Ok(config) => print_config(&config),
            Err(e) => println!("Error: {}", e),
        }
        return Ok(());
    }

    println!("Usage: sinema config [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --show         Show current configuration");
    println!("  --set KEY=VAL  Set a configuration value");
    println!("  --reset        Reset configuration to defaults");
    println!();
    println!("Available keys for --set:");
    println!("  tmdb_api_key      TMDB API key");
    println!("  default_language  ar or en, used until a language is chosen");
    println!("  player_command    Command that opens player URLs");
    println!("  storage_path      Location of the favorites database");

    Ok(())
}

fn print_config(config: &Config) {
    println!("Configuration file: {}\n", config_path().display());
    println!("[tmdb]");
    if !config.has_api_key() {
        println!("api_key = (not configured, demo catalog)");
    } else {
        let shown: String = config.tmdb.api_key.chars().take(8).collect();
        println!("api_key = \"{}...\"", shown);
    }
    println!("base_url = \"{}\"", config.tmdb.base_url);
    println!("\n[ui]");
    println!("default_language = \"{}\"", config.ui.default_language);
    println!("\n[player]");
    println!("command = \"{}\"", config.player.command);
    println!("args = {:?}", config.player.args);
    println!("\n[storage]");
    let path = config.storage.path.clone().unwrap_or_else(db_path);
    println!("path = \"{}\"", path.display());
    for provider in config.embed_providers() {
        println!("\n[[providers]]");
        println!("id = \"{}\"", provider.id);
        println!("name = \"{}\"", provider.name);
        println!("base_url = \"{}\"", provider.base_url);
    }
}

fn heading(store: &AppStore, key: &str) {
    println!("\n== {} ==", store.translate(key));
}

fn item_line(item: &MediaItem, media_type: MediaType) -> String {
    let year = item.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    format!(
        "  {:<5} {:>8}  {}{}  ★ {}",
        media_type.as_str(),
        item.id,
        item.display_title(),
        year,
        item.rating_display()
    )
}

fn print_listing(
    store: &AppStore,
    state: &FetchState<Page<MediaItem>>,
    items: &[MediaItem],
    media_type: Option<MediaType>,
) {
    if state.loading {
        println!("  {}", store.translate("loading"));
    } else if let Some(error) = &state.error {
        println!("  {}: {}", store.translate("error"), error);
    } else if items.is_empty() {
        println!("  {}", store.translate("noResults"));
    } else {
        for item in items {
            let media_type = media_type.unwrap_or_else(|| item.inferred_media_type());
            println!("{}", item_line(item, media_type));
        }
    }
}

fn print_pages(store: &AppStore, current: u32, total: u32) {
    if let Some(window) = page_window(current, total) {
        println!("\n  {} {}", store.translate("page"), window.render());
    }
}

/// Landing page shelves
pub async fn home(session: &Session) -> Result<()> {
    let store = session.store()?;
    let mut view = HomeView::new();
    view.load(session.source.as_ref(), store.api_locale()).await;

    heading(store, "home");
    for item in view.featured() {
        println!("{}", item_line(item, item.inferred_media_type()));
    }

    for row in HomeRow::ALL.into_iter().skip(1) {
        heading(store, row.title_key());
        print_listing(store, view.state(row), view.items(row), row.media_type());
    }
    Ok(())
}

/// Filtered movie, TV or anime listing
pub async fn browse(
    session: &Session,
    kind: BrowseKind,
    genre: Option<u32>,
    year: Option<i32>,
    sort: SortBy,
    page: u32,
) -> Result<()> {
    let store = session.store()?;
    let mut view = BrowseView::new(kind);
    view.set_genre(genre);
    view.set_year(year);
    view.set_sort(sort);
    view.set_page(page);
    if let Some(year) = year {
        if !year_options(current_year()).contains(&year) {
            tracing::warn!("Year {} is outside the offered range", year);
        }
    }

    view.load(session.source.as_ref(), store.api_locale()).await;
    if view.items().is_empty() && view.state().error.is_none() && view.has_active_filters() {
        println!("  {} · {}", store.translate("noResults"), store.translate("clearFilters"));
        view.clear_filters();
        view.load(session.source.as_ref(), store.api_locale()).await;
    }

    heading(store, kind.title_key());
    if kind == BrowseKind::Anime {
        println!("  {}", store.translate("animeHint"));
    } else {
        let genre_name = view
            .filters()
            .genre
            .and_then(|id| view.genres().iter().find(|g| g.id == id))
            .map_or(store.translate("allGenres"), |g| g.name.as_str());
        let year = view
            .filters()
            .year
            .map_or_else(|| store.translate("allYears").to_string(), |y| y.to_string());
        println!(
            "  {}: {} | {}: {} | {}: {}",
            store.translate("genre"),
            genre_name,
            store.translate("year"),
            year,
            store.translate("sortBy"),
            store.translate(view.filters().sort_by.label_key())
        );
        if view.has_active_filters() {
            println!("  ({}: sinema browse {})", store.translate("clearFilters"), kind.media_type());
        }
    }
    println!();

    print_listing(store, view.state(), view.items(), Some(kind.media_type()));
    print_pages(store, view.page(), view.total_pages());

    if kind.has_filters() && !view.genres().is_empty() {
        let genres: Vec<String> = view
            .genres()
            .iter()
            .map(|g| format!("{}={}", g.id, g.name))
            .collect();
        println!("\n  {}: {}", store.translate("genre"), genres.join(", "));
    }
    Ok(())
}

/// Search results for `query`
pub async fn search(
    session: &Session,
    query: Option<String>,
    scope: SearchScope,
    page: u32,
) -> Result<()> {
    let store = session.store()?;
    heading(store, "searchTitle");

    let mut view = SearchView::new(query.as_deref().unwrap_or_default());
    if view.query().is_empty() {
        println!("  {}", store.translate("startSearching"));
        return Ok(());
    }
    view.set_scope(scope);
    view.set_page(page);
    view.load(session.source.as_ref(), store.api_locale()).await;

    let media_type = match scope {
        SearchScope::Multi => None,
        SearchScope::Movie => Some(MediaType::Movie),
        SearchScope::Tv => Some(MediaType::Tv),
    };
    if !view.results().is_empty() {
        println!("  {} \"{}\"\n", store.translate("resultsFor"), view.query());
    }
    print_listing(store, view.state(), view.results(), media_type);
    print_pages(store, view.page(), view.total_pages());
    Ok(())
}

async fn open_details(session: &Session, route: Route) -> Result<(DetailsView, DetailsDriver)> {
    let locale = session.store()?.api_locale();
    let mut view = DetailsView::new(session.config.embed_providers());
    let driver = run_details(Arc::clone(&session.source), &mut view, route, locale).await;
    Ok((view, driver))
}

fn print_details(session: &Session, view: &DetailsView) -> Result<()> {
    let store = session.store()?;
    let details = match view.details_phase() {
        DetailsPhase::Idle | DetailsPhase::Loading => {
            println!("{}", store.translate("loading"));
            return Ok(());
        }
        DetailsPhase::Failed(error) => {
            println!("{}: {}", store.translate("error"), error);
            return Ok(());
        }
        DetailsPhase::Ready(details) => details,
    };
    let item = &details.item;
    let favorite = if view.is_favorite(store) { " ♥" } else { "" };

    println!("\n{}{}", item.display_title(), favorite);
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("\"{}\"", tagline);
    }

    let mut facts = vec![format!("★ {}", item.rating_display())];
    if let Some(year) = item.year() {
        facts.push(year.to_string());
    }
    if let Some(runtime) = details.runtime_minutes() {
        facts.push(format!("{} {}", runtime, store.translate("minutes")));
    }
    if let (Some(seasons), Some(episodes)) = (details.number_of_seasons, details.number_of_episodes) {
        facts.push(format!(
            "{} {} • {} {}",
            seasons,
            store.translate("seasons"),
            episodes,
            store.translate("episodes")
        ));
    }
    println!("{}", facts.join(" · "));

    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        println!("{}: {}", store.translate("genre"), genres.join(", "));
    }
    if let Some(poster) = image_url(
        &session.config.tmdb.image_base_url,
        item.poster_path.as_deref(),
        poster_size::LARGE,
    ) {
        println!("{}", poster);
    }

    heading(store, "overview");
    let overview = item
        .overview
        .as_deref()
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| store.translate("noOverview"));
    println!("{}", overview);

    let cast = details.top_cast(12);
    if !cast.is_empty() {
        heading(store, "cast");
        for member in cast {
            match member.character.as_deref().filter(|c| !c.is_empty()) {
                Some(character) => println!("  {} ({})", member.name, character),
                None => println!("  {}", member.name),
            }
        }
    }

    let related = details.related(8);
    if !related.is_empty() {
        heading(store, "similar");
        let media_type = view.route().map_or(MediaType::Movie, |r| r.media_type);
        for (index, item) in related.into_iter().enumerate() {
            println!("{:>2}.{}", index + 1, item_line(item, media_type));
        }
    }

    if view.trailer().is_some() {
        println!("\n▶ {}", store.translate("trailer"));
    }
    Ok(())
}

fn print_episodes(store: &AppStore, view: &DetailsView) {
    let language = store.language();
    match view.episodes_phase() {
        EpisodesPhase::Idle => {}
        EpisodesPhase::Loading { season } => {
            println!("\n{}: {}", season_label(language, season), store.translate("loading"));
        }
        EpisodesPhase::Empty { season } => {
            println!("\n{}: {}", season_label(language, season), store.translate("noResults"));
        }
        EpisodesPhase::Ready { season, episodes } => {
            if let Some(details) = view.details() {
                let seasons: Vec<String> = details
                    .sorted_seasons()
                    .iter()
                    .map(|s| {
                        let label = season_label(language, s.season_number);
                        if s.season_number == season {
                            format!("[{}]", label)
                        } else {
                            label
                        }
                    })
                    .collect();
                println!("\n{}: {}", store.translate("seasons"), seasons.join("  "));
            }

            if view.batch_count() > 1 {
                let batches: Vec<String> = (0..view.batch_count())
                    .map(|i| {
                        let label = batch_label(i, episodes.len());
                        if i == view.batch() {
                            format!("[{}]", label)
                        } else {
                            label
                        }
                    })
                    .collect();
                println!("{} {}", store.translate("batch"), batches.join("  "));
            }

            for episode in view.visible_episodes() {
                let date = episode.air_date.as_deref().unwrap_or_default();
                println!("  E{:02}  {}  {}", episode.episode_number, episode.display_name(), date);
            }
        }
    }
}

/// Details page, optionally explored interactively
pub async fn details(
    session: &mut Session,
    route: Route,
    season: Option<u32>,
    batch: Option<usize>,
    interactive: bool,
) -> Result<()> {
    let (mut view, mut driver) = open_details(session, route).await?;

    if let Some(season) = season {
        match view.select_season(season) {
            Ok(effects) => {
                driver.dispatch(effects);
                driver.settle(&mut view).await;
            }
            Err(e) => println!("{}", e),
        }
    }
    if let Some(batch) = batch {
        if let Err(e) = view.select_batch(batch.saturating_sub(1)) {
            println!("{}", e);
        }
    }

    print_details(session, &view)?;
    print_episodes(session.store()?, &view);

    if interactive {
        explore(session, &mut view, &mut driver).await?;
    }
    view.unmount();
    Ok(())
}

const EXPLORE_HELP: &str = "\
Commands:
  season N     switch season          next / prev   episode batches
  batch N      jump to batch N        play [N]      watch (episode N)
  server ID    switch embed server    servers       list servers
  trailer      open the trailer       fav           toggle favorite
  lang         switch language        close         close player and episodes
  episodes     show the episode list  open N        open the Nth similar title
  retry        reload after an error  help          this help
  quit         leave";

async fn explore(session: &mut Session, view: &mut DetailsView, driver: &mut DetailsDriver) -> Result<()> {
    let player = Player::new(session.config.player.clone());
    let mut language_rx = session.store()?.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("\n{}", EXPLORE_HELP);
    loop {
        print!("\n> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next();
        let number = argument.and_then(|w| w.parse::<u32>().ok());

        let outcome = match command {
            "" => Ok(()),
            "quit" | "q" | "exit" => break,
            "help" | "?" => {
                println!("{}", EXPLORE_HELP);
                Ok(())
            }
            "season" => match number {
                Some(season) => view.select_season(season).map(|effects| driver.dispatch(effects)),
                None => {
                    println!("Usage: season N");
                    Ok(())
                }
            },
            "next" => {
                view.next_batch();
                Ok(())
            }
            "prev" => {
                view.previous_batch();
                Ok(())
            }
            "batch" => view.select_batch(number.unwrap_or(1).saturating_sub(1) as usize),
            "play" | "watch" => match number {
                Some(episode) => view.play_episode(episode),
                None => view.watch_now().map(|_| ()),
            },
            "server" => match argument {
                Some(id) => view.select_provider(id),
                None => {
                    println!("Usage: server ID");
                    Ok(())
                }
            },
            "servers" => {
                let active = &view.active_provider().id;
                for provider in view.providers() {
                    let marker = if &provider.id == active { "*" } else { " " };
                    println!(" {} {:<12} {}", marker, provider.id, provider.name);
                }
                Ok(())
            }
            "trailer" => view.open_trailer(),
            "episodes" => view.open_episodes(),
            "open" => {
                let target = view.route().zip(view.details()).and_then(|(route, details)| {
                    let index = number?.checked_sub(1)? as usize;
                    let item = details.related(index + 1).get(index).copied()?;
                    Some(Route::new(route.media_type, item.id))
                });
                match target {
                    Some(route) => {
                        driver.dispatch(view.navigate(route));
                        Ok(())
                    }
                    None => {
                        println!("Usage: open N (see the similar titles list)");
                        Ok(())
                    }
                }
            }
            "retry" => {
                driver.dispatch(view.retry());
                Ok(())
            }
            "fav" => match view.toggle_favorite(session.store_mut()?) {
                Ok(added) => {
                    let key = if added { "addedToFavorites" } else { "removedFromFavorites" };
                    println!("{}", session.store()?.translate(key));
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "lang" => {
                session.store_mut()?.toggle_language();
                Ok(())
            }
            "close" => {
                view.close_player();
                view.close_trailer();
                view.close_episodes();
                Ok(())
            }
            other => {
                println!("Unknown command: {} (try 'help')", other);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{}", e);
            continue;
        }

        if language_rx.has_changed().unwrap_or(false) {
            let language = *language_rx.borrow_and_update();
            driver.dispatch(view.set_locale(language.locale()));
        }
        driver.settle(view).await;

        match command {
            "play" | "watch" | "server" => {
                if let Some(url) = view.player_url() {
                    if let Some(playing) = view.playing_episode() {
                        println!("S{:02}E{:02}", playing.season, playing.episode);
                    }
                    launch(&player, &url);
                } else if view.is_episodes_open() {
                    print_episodes(session.store()?, view);
                }
            }
            "trailer" if view.is_trailer_open() => {
                if let Some(url) = view.trailer_url() {
                    launch(&player, &url);
                }
            }
            "lang" | "open" | "retry" => {
                print_details(session, view)?;
                print_episodes(session.store()?, view);
            }
            "season" | "next" | "prev" | "batch" | "episodes" => print_episodes(session.store()?, view),
            _ => {}
        }
    }
    Ok(())
}

fn launch(player: &Player, url: &str) {
    println!("{}", url);
    if let Err(e) = player.open(url) {
        println!("{}", e);
    }
}

/// Open a movie, an episode or a trailer
pub async fn watch(
    session: &Session,
    route: Route,
    season: Option<u32>,
    episode: Option<u32>,
    server: Option<String>,
    trailer: bool,
    print_only: bool,
) -> Result<()> {
    let (mut view, mut driver) = open_details(session, route).await?;
    let store = session.store()?;

    if let DetailsPhase::Failed(error) = view.details_phase() {
        println!("{}: {}", store.translate("error"), error);
        return Ok(());
    }
    if let Some(server) = server {
        view.select_provider(&server)?;
    }

    if trailer {
        view.open_trailer()?;
    } else {
        match route.media_type {
            MediaType::Movie => view.play_movie()?,
            MediaType::Tv => {
                if let Some(season) = season {
                    driver.dispatch(view.select_season(season)?);
                    driver.settle(&mut view).await;
                }
                let outcome = match episode {
                    Some(episode) => {
                        view.play_episode(episode)?;
                        WatchNow::Playing
                    }
                    None => view.watch_now()?,
                };
                if outcome == WatchNow::BrowsingEpisodes {
                    print_episodes(store, &view);
                    return Ok(());
                }
            }
        }
    }

    let url = if trailer { view.trailer_url() } else { view.player_url() };
    if let Some(url) = url {
        if view.is_player_open() {
            println!("{} · {}", store.translate("server"), view.active_provider().name);
        }
        if print_only {
            println!("{}", url);
        } else {
            launch(&Player::new(session.config.player.clone()), &url);
        }
    }
    view.unmount();
    Ok(())
}

/// List favorites of one tab
pub async fn favorites(session: &Session, tab: FavoritesTab) -> Result<()> {
    let store = session.store()?;
    let view = FavoritesView::new(tab);

    heading(store, "favorites");
    let tabs: Vec<String> = FavoritesTab::ALL
        .iter()
        .map(|&t| {
            let label = view.tab_label(store, t);
            if t == view.tab() {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    println!("  {}\n", tabs.join("  "));

    let entries = view.entries(store);
    if entries.is_empty() {
        println!("  {}", store.translate("noFavorites"));
        println!("  {}", store.translate("favoritesHint"));
        return Ok(());
    }
    for entry in entries {
        println!("{}", item_line(&entry.item, entry.media_type));
    }
    Ok(())
}

/// Toggle a title in favorites, snapshotting its current details
pub async fn favorite(session: &mut Session, route: Route) -> Result<()> {
    let (mut view, _driver) = open_details(session, route).await?;

    if let DetailsPhase::Failed(error) = view.details_phase() {
        let store = session.store()?;
        println!("{}: {}", store.translate("error"), error);
        return Ok(());
    }

    let added = view.toggle_favorite(session.store_mut()?)?;
    let store = session.store()?;
    let title = view.details().map(|d| d.item.display_title()).unwrap_or_default();
    let key = if added { "addedToFavorites" } else { "removedFromFavorites" };
    println!("{}: {}", store.translate(key), title);

    view.unmount();
    Ok(())
}

/// Toggle or set the interface language
pub async fn lang(session: &mut Session, language: Option<Language>) -> Result<()> {
    let store = session.store_mut()?;
    match language {
        Some(language) => store.set_language(language),
        None => {
            store.toggle_language();
        }
    }

    println!(
        "{}: {} ({}, {})",
        store.translate("language"),
        store.html_lang(),
        store.direction().as_str(),
        store.api_locale()
    );
    Ok(())
}
