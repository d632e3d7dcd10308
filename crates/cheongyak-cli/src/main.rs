//! cheongyak - command-line viewer for housing subscription (청약) listings.
//!
//! Prints the detail page of a listing (header, tabs, schedule) and manages
//! the member's interest regions and liked listings through the portal API.

mod commands;
mod render;

use std::io;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use cheongyak_core::auth::{Session, SessionData};
use cheongyak_core::cache::CacheManager;
use cheongyak_core::config::TOKEN_ENV;
use cheongyak_core::region::{can_add, interest_regions};
use cheongyak_core::{
    ApiClient, ApiError, Config, DetailPage, DetailTab, InterestRegion, LikeAction, RegionForm,
    SubscriptionDetailView,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Cli, Command, RegionAction};

const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "cheongyak.log";

/// Initialize the tracing subscriber: stderr plus a daily log file.
///
/// The returned guard must be held until exit so buffered lines are flushed.
fn init_tracing(cache_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = cache_dir.join(LOG_DIR);
    let (file_layer, guard) = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Everything a command needs: config, session store, cache and a client.
struct AppContext {
    config: Config,
    session: Session,
    cache: CacheManager,
    client: ApiClient,
}

impl AppContext {
    fn load(config: Config, cache_dir: &Path) -> Result<Self> {
        let session = Session::new(cache_dir);
        let saved = session.load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable session file");
            None
        });

        let cache = CacheManager::new(cache_dir.to_path_buf())?;
        let mut client = ApiClient::new(config.api_base_url())?;

        let env_token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        if let Some(token) = env_token.or(saved.map(|data| data.token)) {
            client.set_token(token);
        }

        Ok(Self {
            config,
            session,
            cache,
            client,
        })
    }

    fn require_login(&self) -> Result<()> {
        if self.client.has_token() {
            Ok(())
        } else {
            bail!("로그인이 필요합니다. `cheongyak login <token>`으로 로그인하세요.")
        }
    }
}

/// Whether the failure was the API rejecting our token.
fn needs_login(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ApiError>()
        .is_some_and(ApiError::needs_login)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = Config::load()?;
    let cache_dir = config.cache_dir()?;
    let _guard = init_tracing(&cache_dir);
    info!(command = ?cli.command, "cheongyak starting");

    let mut ctx = AppContext::load(config, &cache_dir)?;
    run(&mut ctx, cli.command).await
}

async fn run(ctx: &mut AppContext, command: Command) -> Result<()> {
    match command {
        Command::Show { id, tab, offline } => show(ctx, &id, tab, offline).await,
        Command::Like { id } => toggle_like(ctx, &id).await,
        Command::Regions { action: None } => list_regions(ctx).await,
        Command::Regions {
            action: Some(action),
        } => match action {
            RegionAction::Add { city, district } => add_region(ctx, city, district).await,
            RegionAction::Remove { city, district } => remove_region(ctx, city, district).await,
            RegionAction::Cities => list_cities(ctx).await,
            RegionAction::Districts { city } => {
                let city = district_city(city, ctx.config.last_region.as_deref())?;
                list_districts(ctx, &city).await
            }
        },
        Command::Login { token } => login(ctx, token).await,
        Command::Logout => {
            ctx.session.clear()?;
            println!("로그아웃되었습니다.");
            Ok(())
        }
    }
}

/// The 시/도 to list districts for: the argument, else the last one used.
fn district_city(arg: Option<String>, last_region: Option<&str>) -> Result<String> {
    arg.filter(|c| !c.trim().is_empty())
        .or_else(|| last_region.map(str::to_string))
        .map(|c| c.trim().to_string())
        .ok_or_else(|| anyhow!("시/도를 입력해주세요. 예: cheongyak regions districts 서울특별시"))
}

fn remember_city(ctx: &mut AppContext, city: &str) {
    if ctx.config.last_region.as_deref() == Some(city) {
        return;
    }
    ctx.config.last_region = Some(city.to_string());
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }
}

async fn show(ctx: &mut AppContext, id: &str, tab: DetailTab, offline: bool) -> Result<()> {
    let page = if offline {
        load_cached_page(ctx, id)?
    } else {
        match ctx.client.fetch_detail_page(id).await {
            Ok(page) => {
                if let Err(e) = ctx.cache.save_detail_page(id, &page) {
                    warn!(id, error = %e, "Failed to cache detail page");
                }
                page
            }
            Err(e) if needs_login(&e) => return Err(e),
            Err(e) => {
                warn!(id, error = %e, "Fetch failed, falling back to cache");
                load_cached_page(ctx, id).map_err(|_| e)?
            }
        }
    };

    let now = chrono::Local::now().naive_local();
    let view = SubscriptionDetailView::build(
        &page.subscription,
        page.infra.as_ref(),
        &page.price_summaries,
        page.is_liked,
        now,
    );
    print!("{}", render::render_detail(&view, tab));
    Ok(())
}

fn load_cached_page(ctx: &AppContext, id: &str) -> Result<DetailPage> {
    let cached = ctx
        .cache
        .load_or_none("detail", |cache| cache.load_detail_page(id))
        .ok_or_else(|| anyhow!("No cached data for subscription {}", id))?;
    eprintln!("(cached {})", cached.age_display());
    Ok(cached.data)
}

async fn toggle_like(ctx: &mut AppContext, id: &str) -> Result<()> {
    ctx.require_login()?;
    let is_liked = ctx
        .client
        .fetch_is_liked(id)
        .await
        .context("Failed to fetch like status")?;

    match LikeAction::for_state(is_liked) {
        LikeAction::Like => {
            ctx.client.like_subscription(id).await?;
            println!("관심 청약에 등록했습니다.");
        }
        LikeAction::Unlike => {
            ctx.client.unlike_subscription(id).await?;
            println!("관심 청약에서 해제했습니다.");
        }
    }
    Ok(())
}

async fn current_regions(ctx: &mut AppContext) -> Result<Vec<InterestRegion>> {
    ctx.require_login()?;
    match ctx.client.fetch_mypage().await {
        Ok(mypage) => {
            if let Err(e) = ctx.cache.save_mypage(&mypage) {
                warn!(error = %e, "Failed to cache mypage");
            }
            Ok(interest_regions(Some(&mypage)))
        }
        Err(e) if needs_login(&e) => Err(e),
        Err(e) => {
            warn!(error = %e, "Fetch failed, falling back to cache");
            let cached = ctx
                .cache
                .load_or_none("mypage", |cache| cache.load_mypage())
                .ok_or(e)?;
            Ok(interest_regions(Some(&cached.data)))
        }
    }
}

async fn list_regions(ctx: &mut AppContext) -> Result<()> {
    let regions = current_regions(ctx).await?;
    print!("{}", render::render_regions(&regions, can_add(regions.len())));
    Ok(())
}

async fn add_region(ctx: &mut AppContext, city: String, district: String) -> Result<()> {
    let regions = current_regions(ctx).await?;
    if !can_add(regions.len()) {
        bail!("최대 5개까지 등록할 수 있습니다.");
    }

    let mut form = RegionForm::new();
    form.toggle();
    form.select_city(city);
    form.select_district(district);
    let region = form
        .submit(regions.len())
        .ok_or_else(|| anyhow!("시/도와 군/구를 모두 선택해주세요."))?;

    if regions.contains(&region) {
        bail!("이미 등록된 관심 지역입니다: {}", region);
    }

    let districts = fetch_districts(ctx, &region.city).await?;
    if !districts.is_empty() && !districts.iter().any(|d| d == &region.district) {
        bail!("{}에 {}이(가) 없습니다.", region.city, region.district);
    }

    ctx.client.add_interest_region(&region).await?;

    remember_city(ctx, &region.city);
    println!("관심 지역을 등록했습니다: {}", region);
    Ok(())
}

async fn remove_region(ctx: &mut AppContext, city: String, district: String) -> Result<()> {
    ctx.require_login()?;
    let region = InterestRegion::new(city, district);
    ctx.client.delete_interest_region(&region).await?;
    println!("관심 지역을 삭제했습니다: {}", region);
    Ok(())
}

async fn list_cities(ctx: &mut AppContext) -> Result<()> {
    let cities = match ctx.client.fetch_regions().await {
        Ok(cities) => {
            if let Err(e) = ctx.cache.save_regions(&cities) {
                warn!(error = %e, "Failed to cache regions");
            }
            cities
        }
        Err(e) => {
            warn!(error = %e, "Fetch failed, falling back to cache");
            ctx.cache
                .load_or_none("regions", |cache| cache.load_regions())
                .ok_or(e)?
                .data
        }
    };
    print!("{}", render::render_names(&cities));
    Ok(())
}

async fn fetch_districts(ctx: &mut AppContext, city: &str) -> Result<Vec<String>> {
    match ctx.client.fetch_districts(city).await {
        Ok(districts) => {
            if let Err(e) = ctx.cache.save_districts(city, &districts) {
                warn!(city, error = %e, "Failed to cache districts");
            }
            Ok(districts)
        }
        Err(e) => {
            warn!(city, error = %e, "Fetch failed, falling back to cache");
            Ok(ctx
                .cache
                .load_or_none("districts", |cache| cache.load_districts(city))
                .ok_or(e)?
                .data)
        }
    }
}

async fn list_districts(ctx: &mut AppContext, city: &str) -> Result<()> {
    let districts = fetch_districts(ctx, city).await?;
    remember_city(ctx, city);
    print!("{}", render::render_names(&districts));
    Ok(())
}

async fn login(ctx: &mut AppContext, token: String) -> Result<()> {
    let token = token.trim().to_string();
    if token.is_empty() {
        bail!("Token must not be empty");
    }

    let client = ctx.client.with_token(token.clone());
    let mut data = SessionData::new(token);
    match client.fetch_mypage().await {
        Ok(mypage) => data.nickname = mypage.nickname,
        Err(e) if needs_login(&e) => return Err(e).context("Token was rejected"),
        Err(e) => warn!(error = %e, "Could not verify token, saving anyway"),
    }

    ctx.session.save(&data).context("Failed to save session")?;
    match data.nickname {
        Some(ref nickname) => println!("{}님, 로그인되었습니다.", nickname),
        None => println!("로그인되었습니다."),
    }
    println!("세션 만료까지 {}분 남았습니다.", data.minutes_until_expiry());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_district_city_prefers_argument() {
        assert_eq!(
            district_city(Some(" 부산광역시 ".to_string()), Some("서울특별시")).unwrap(),
            "부산광역시"
        );
    }

    #[test]
    fn test_district_city_falls_back_to_last_region() {
        assert_eq!(district_city(None, Some("서울특별시")).unwrap(), "서울특별시");
        assert_eq!(
            district_city(Some("  ".to_string()), Some("대구광역시")).unwrap(),
            "대구광역시"
        );
        assert!(district_city(None, None).is_err());
    }
}
