//! Command-line front end
//!
//! Browses the catalogs, manages local preferences and, when account
//! features are configured, the signed-in user's watchlist.

use crate::modules::account::AccountService;
use crate::modules::collection::{WatchStatus, WatchlistEntry, WatchlistService};
use crate::modules::provider::domain::{
    AnimeStatus, CatalogCategory, CatalogEntry, CatalogPage, GenreRef, MediaFormat, Recommendation,
    SearchFilters, SearchOrder, Season,
};
use crate::modules::provider::AnimeProvider;
use crate::modules::settings::Theme;
use crate::AppContext;
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

pub const EMAIL_ENV: &str = "ANITRACK_EMAIL";
pub const PASSWORD_ENV: &str = "ANITRACK_PASSWORD";

/// anitrack - browse anime catalogs and keep a watchlist
#[derive(Parser, Debug)]
#[command(
    name = "anitrack",
    about = "Browse anime catalogs and keep a watchlist",
    version,
    after_help = "Account commands read credentials from ANITRACK_EMAIL and ANITRACK_PASSWORD."
)]
pub struct Cli {
    /// Catalog provider (jikan or anilist)
    #[arg(short, long, global = true)]
    pub provider: Option<AnimeProvider>,

    /// Settings file (defaults to SETTINGS_PATH or the user config dir)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Highest rated titles
    Top {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Most popular titles
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Titles currently airing
    Airing {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Announced titles
    Upcoming {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// A season's lineup; the current season when no year is given
    Season {
        #[arg(long, requires = "season")]
        year: Option<i32>,
        #[arg(long)]
        season: Option<Season>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Best rated titles in a genre
    Genre {
        /// MyAnimeList genre id
        id: i32,
        /// Genre name (used by AniList)
        name: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search by title
    Search {
        query: String,
        #[arg(long)]
        format: Option<MediaFormat>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        min_score: Option<f32>,
        #[arg(long, value_parser = parse_order)]
        order: Option<SearchOrder>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Details for one title
    Show { id: i64 },
    /// Titles recommended alongside one title
    Recommend { id: i64 },
    /// Recent searches
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Show or change the theme
    Theme { theme: Option<Theme> },
    /// Hide the promo banner for a while
    DismissPromo,
    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Watchlist management (signs in with ANITRACK_EMAIL / ANITRACK_PASSWORD)
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    List,
    Clear,
    Remove { query: String },
    Enable,
    Disable,
}

#[derive(Subcommand, Debug)]
pub enum AccountAction {
    /// Create an account with ANITRACK_EMAIL / ANITRACK_PASSWORD
    Signup { display_name: String },
    /// Check the stored credentials
    Whoami,
    /// Send a password reset email
    ResetPassword { email: String },
    /// Change the display name
    Rename { display_name: String },
    /// Delete the account and its watchlist
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    List {
        #[arg(long)]
        status: Option<WatchStatus>,
    },
    /// Add a title by its id in the selected provider
    Add {
        anime_id: i64,
        #[arg(long, default_value = "planning")]
        status: WatchStatus,
    },
    Status { entry_id: String, status: WatchStatus },
    Progress { entry_id: String, episodes: u32 },
    /// Set or clear (no value) the score
    Score { entry_id: String, score: Option<f32> },
    Remove { entry_id: String },
}

fn parse_order(value: &str) -> Result<SearchOrder, String> {
    match value.to_lowercase().as_str() {
        "relevance" => Ok(SearchOrder::Relevance),
        "score" => Ok(SearchOrder::Score),
        "popularity" => Ok(SearchOrder::Popularity),
        "title" => Ok(SearchOrder::Title),
        "start_date" | "date" => Ok(SearchOrder::StartDate),
        _ => Err(format!(
            "Unknown order: {}. Use relevance, score, popularity, title or start_date",
            value
        )),
    }
}

pub async fn run(cli: Cli, ctx: AppContext) -> Result<()> {
    let provider = cli.provider;

    match cli.command {
        Command::Top { page } => browse(&ctx, provider, CatalogCategory::TopScored, page).await?,
        Command::Popular { page } => {
            browse(&ctx, provider, CatalogCategory::MostPopular, page).await?
        }
        Command::Airing { page } => browse(&ctx, provider, CatalogCategory::Airing, page).await?,
        Command::Upcoming { page } => {
            browse(&ctx, provider, CatalogCategory::Upcoming, page).await?
        }
        Command::Season { year, season, page } => {
            let category = match (year, season) {
                (Some(year), Some(season)) => CatalogCategory::Seasonal { year, season },
                _ => CatalogCategory::CurrentSeason,
            };
            browse(&ctx, provider, category, page).await?
        }
        Command::Genre { id, name, page } => {
            let category = CatalogCategory::ByGenre {
                genre: GenreRef::new(id, name),
            };
            browse(&ctx, provider, category, page).await?
        }
        Command::Search {
            query,
            format,
            status,
            min_score,
            order,
            page,
        } => {
            let mut filters = SearchFilters::new(query);
            if let Some(format) = format {
                filters = filters.with_format(format);
            }
            if let Some(status) = status {
                filters = filters.with_status(AnimeStatus::from(status.as_str()));
            }
            if let Some(min_score) = min_score {
                filters = filters.with_min_score(min_score);
            }
            if let Some(order) = order {
                filters = filters.with_order(order);
            }
            let result = ctx.catalog.search(provider, &filters, page).await?;
            print_page(&result);
        }
        Command::Show { id } => match ctx.catalog.get_anime_details(provider, id).await? {
            Some(entry) => print_details(&entry),
            None => bail!("No anime with id {}", id),
        },
        Command::Recommend { id } => {
            let recommendations = ctx.catalog.recommendations(provider, id).await?;
            print_recommendations(&recommendations);
        }
        Command::History { action } => history(&ctx, action).await?,
        Command::Theme { theme } => match theme {
            Some(theme) => {
                ctx.settings.set_theme(theme).await?;
                println!("Theme set to {}", theme);
            }
            None => println!("{}", ctx.settings.theme().await),
        },
        Command::DismissPromo => {
            ctx.settings.dismiss_promo(Utc::now()).await?;
            println!("Promo hidden");
        }
        Command::Account { action } => account(&ctx, action).await?,
        Command::Watchlist { action } => watchlist(&ctx, provider, action).await?,
    }

    Ok(())
}

async fn browse(
    ctx: &AppContext,
    provider: Option<AnimeProvider>,
    category: CatalogCategory,
    page: u32,
) -> Result<()> {
    let result = ctx.catalog.browse(provider, &category, page).await?;
    println!("{}", category);
    print_page(&result);

    let now = Utc::now();
    if ctx.settings.should_show_promo(now).await {
        println!();
        println!("Tip: sign in to keep a watchlist in sync across devices.");
        ctx.settings.mark_promo_shown(now).await?;
    }
    Ok(())
}

async fn history(ctx: &AppContext, action: Option<HistoryAction>) -> Result<()> {
    match action.unwrap_or(HistoryAction::List) {
        HistoryAction::List => {
            if !ctx.settings.search_history_enabled().await {
                println!("Search history is disabled");
            }
            for query in ctx.settings.recent_searches().await {
                println!("{}", query);
            }
        }
        HistoryAction::Clear => ctx.settings.clear_search_history().await?,
        HistoryAction::Remove { query } => {
            if !ctx.settings.remove_search(&query).await? {
                println!("'{}' was not in the history", query);
            }
        }
        HistoryAction::Enable => ctx.settings.set_search_history_enabled(true).await?,
        HistoryAction::Disable => ctx.settings.set_search_history_enabled(false).await?,
    }
    Ok(())
}

fn require_account(ctx: &AppContext) -> Result<&AccountService> {
    ctx.account
        .as_ref()
        .ok_or_else(|| anyhow!("Account features need IDENTITY_API_KEY and BACKEND_URL"))
}

fn credentials() -> Result<(String, String)> {
    let email = env::var(EMAIL_ENV).with_context(|| format!("{} is not set", EMAIL_ENV))?;
    let password = env::var(PASSWORD_ENV).with_context(|| format!("{} is not set", PASSWORD_ENV))?;
    Ok((email, password))
}

async fn sign_in(account: &AccountService) -> Result<()> {
    let (email, password) = credentials()?;
    account
        .login(&email, &password)
        .await
        .context("Sign in failed")?;
    Ok(())
}

async fn account(ctx: &AppContext, action: AccountAction) -> Result<()> {
    let account = require_account(ctx)?;

    match action {
        AccountAction::Signup { display_name } => {
            let (email, password) = credentials()?;
            let profile = account.signup(&email, &password, &display_name).await?;
            println!("Created account for {} ({})", profile.name(), profile.email);
        }
        AccountAction::Whoami => {
            sign_in(account).await?;
            if let Some(profile) = account.current_user().await {
                println!("{} <{}> uid={}", profile.name(), profile.email, profile.uid);
            }
        }
        AccountAction::ResetPassword { email } => {
            account.reset_password(&email).await?;
            println!("Password reset email sent to {}", email);
        }
        AccountAction::Rename { display_name } => {
            sign_in(account).await?;
            let profile = account.update_profile(&display_name, None).await?;
            println!("Display name is now {}", profile.name());
        }
        AccountAction::Delete { yes } => {
            if !yes {
                bail!("Refusing to delete the account without --yes");
            }
            sign_in(account).await?;
            account.delete_account().await?;
            println!("Account deleted");
        }
    }

    account.logout().await?;
    Ok(())
}

fn require_watchlist(ctx: &AppContext) -> Result<&Arc<WatchlistService>> {
    ctx.watchlist
        .as_ref()
        .ok_or_else(|| anyhow!("Watchlist needs IDENTITY_API_KEY and BACKEND_URL"))
}

async fn watchlist(
    ctx: &AppContext,
    provider: Option<AnimeProvider>,
    action: WatchlistAction,
) -> Result<()> {
    let account = require_account(ctx)?;
    let watchlist = require_watchlist(ctx)?;
    sign_in(account).await?;

    match action {
        WatchlistAction::List { status } => {
            let entries = watchlist.list(status).await?;
            if entries.is_empty() {
                println!("Watchlist is empty");
            }
            for entry in &entries {
                print_watch_entry(entry);
            }
        }
        WatchlistAction::Add { anime_id, status } => {
            let provider = provider.unwrap_or(ctx.catalog.default_provider());
            let details = ctx
                .catalog
                .get_anime_details(Some(provider), anime_id)
                .await?
                .ok_or_else(|| anyhow!("No anime with id {}", anime_id))?;
            let entry = watchlist
                .add(WatchlistEntry::from_catalog(&details, status))
                .await?;
            print_watch_entry(&entry);
        }
        WatchlistAction::Status { entry_id, status } => {
            print_watch_entry(&watchlist.update_status(&entry_id, status).await?)
        }
        WatchlistAction::Progress { entry_id, episodes } => {
            print_watch_entry(&watchlist.update_progress(&entry_id, episodes).await?)
        }
        WatchlistAction::Score { entry_id, score } => {
            print_watch_entry(&watchlist.set_score(&entry_id, score).await?)
        }
        WatchlistAction::Remove { entry_id } => {
            watchlist.remove(&entry_id).await?;
            println!("Removed {}", entry_id);
        }
    }

    account.logout().await?;
    Ok(())
}

fn print_page(page: &CatalogPage) {
    if page.is_empty() {
        println!("Nothing to show");
        return;
    }
    for entry in &page.items {
        println!(
            "{:>7}  {:<5} {:>4}  {}",
            entry.id,
            entry.format.to_string(),
            entry
                .score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "-".to_string()),
            entry.display_title()
        );
    }
    if let Some(next) = page.page_info.next_page() {
        println!("(more: --page {})", next);
    }
}

fn print_details(entry: &CatalogEntry) {
    println!("{} [{}]", entry.display_title(), entry.provider.display_name());
    if entry.display_title() != entry.title {
        println!("  {}", entry.title);
    }
    println!(
        "  {} | {} | {} episodes",
        entry.format,
        entry.status,
        entry
            .episodes
            .map(|e| e.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
    if let (Some(season), Some(year)) = (entry.season, entry.year) {
        println!("  {} {}", season, year);
    }
    if let Some(score) = entry.score {
        println!("  Score {:.2}", score);
    }
    if !entry.genres.is_empty() {
        println!("  {}", entry.genres.join(", "));
    }
    if let Some(synopsis) = &entry.synopsis {
        println!();
        println!("{}", synopsis);
    }
    if let Some(url) = &entry.url {
        println!();
        println!("{}", url);
    }
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("No recommendations");
    }
    for rec in recommendations {
        println!(
            "{:>7}  {:>4} votes  {}",
            rec.entry.id,
            rec.votes,
            rec.entry.display_title()
        );
    }
}

fn print_watch_entry(entry: &WatchlistEntry) {
    let progress = match entry.total_episodes {
        Some(total) => format!("{}/{}", entry.episodes_watched, total),
        None => entry.episodes_watched.to_string(),
    };
    println!(
        "{}  {:<14} {:>7}  {:>4}  {}",
        entry.id.as_deref().unwrap_or("-"),
        entry.status.display_name(),
        progress,
        entry
            .score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string()),
        entry.title
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_search_with_filters() {
        let cli = Cli::try_parse_from([
            "anitrack",
            "--provider",
            "anilist",
            "search",
            "mob psycho",
            "--format",
            "tv",
            "--order",
            "score",
        ])
        .unwrap();

        assert_eq!(cli.provider, Some(AnimeProvider::AniList));
        match cli.command {
            Command::Search {
                query,
                format,
                order,
                ..
            } => {
                assert_eq!(query, "mob psycho");
                assert_eq!(format, Some(MediaFormat::TV));
                assert_eq!(order, Some(SearchOrder::Score));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_watchlist_status_parses() {
        let cli = Cli::try_parse_from([
            "anitrack",
            "watchlist",
            "status",
            "doc-1",
            "on-hold",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Watchlist {
                action: WatchlistAction::Status {
                    status: WatchStatus::OnHold,
                    ..
                }
            }
        ));
    }
}
