mod api;
mod catalog;
mod cli;
mod config;
mod details;
mod error;
mod fetch;
mod i18n;
mod player;
mod storage;
mod store;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::commands::{self, Session};
use crate::cli::{Cli, Commands};
use crate::details::Route;
use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // These never touch the catalog or the stored state
    match cli.command {
        Some(Commands::Init) => return commands::init().await,
        Some(Commands::Config { show, set, reset }) => {
            return commands::config(show, set, reset).await;
        }
        _ => {}
    }

    let mut session = Session::open(cli.ephemeral)?;
    if let Some(language) = cli.lang {
        session.store_mut()?.set_language(language);
    }

    match cli.command {
        Some(Commands::Init) | Some(Commands::Config { .. }) => {}
        Some(Commands::Home) | None => {
            commands::home(&session).await?;
        }
        Some(Commands::Browse {
            target,
            genre,
            year,
            sort,
            page,
        }) => {
            commands::browse(&session, target.into(), genre, year, sort, page).await?;
        }
        Some(Commands::Anime { page }) => {
            commands::browse(
                &session,
                catalog::BrowseKind::Anime,
                None,
                None,
                api::SortBy::default(),
                page,
            )
            .await?;
        }
        Some(Commands::Search { query, scope, page }) => {
            commands::search(&session, query, scope, page).await?;
        }
        Some(Commands::Details {
            media_type,
            id,
            season,
            batch,
            interactive,
        }) => {
            let route = Route::new(media_type, id);
            commands::details(&mut session, route, season, batch, interactive).await?;
        }
        Some(Commands::Watch {
            media_type,
            id,
            season,
            episode,
            server,
            trailer,
            print,
        }) => {
            let route = Route::new(media_type, id);
            commands::watch(&session, route, season, episode, server, trailer, print).await?;
        }
        Some(Commands::Favorites { tab }) => {
            commands::favorites(&session, tab).await?;
        }
        Some(Commands::Favorite { media_type, id }) => {
            commands::favorite(&mut session, Route::new(media_type, id)).await?;
        }
        Some(Commands::Lang { language }) => {
            commands::lang(&mut session, language).await?;
        }
    }

    session.shutdown();
    Ok(())
}
