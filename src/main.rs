use anyhow::anyhow;
use serde::Serialize;
use stanceline::application_impl::*;
use stanceline::application_port::*;
use stanceline::domain_model::*;
use stanceline::domain_port::*;
use stanceline::infra::*;
use stanceline::logger::*;
use stanceline::settings::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let transport = Arc::new(ReqwestTransport::new(
        &project_settings.api.base_url,
        Duration::from_secs(project_settings.api.timeout_secs),
    )?);
    let storage: Arc<dyn TokenStorage> = match project_settings.storage.backend.as_str() {
        "file" => Arc::new(FileTokenStorage::new(
            &project_settings.storage.dir,
            &transport.origin(),
        )),
        "memory" => Arc::new(MemoryTokenStorage::new()),
        other => return Err(anyhow!("Unknown storage backend: {}", other)),
    };
    let tokens = Arc::new(TokenStore::open(storage));

    let mut token_events = tokens.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = token_events.recv().await {
            if event == TokenEvent::Cleared {
                warn!("session ended, log in again");
            }
        }
    });

    let session = AuthenticatedSession::new(transport.clone(), tokens.clone());
    let auth_service: Arc<dyn AuthService> =
        Arc::new(RealAuthService::new(transport, tokens.clone()));
    let page_size = project_settings.feed.page_size;

    match cli.command {
        Command::Login { username, password } => {
            auth_service.login(LoginInput { username, password }).await?;
            println!("logged in");
        }
        Command::Signup {
            username,
            email,
            password,
            full_name,
        } => {
            let user_id = auth_service
                .signup(SignupInput {
                    username,
                    email,
                    password,
                    full_name,
                })
                .await?;
            println!("signed up as user {}", user_id);
        }
        Command::Logout => match auth_service.logout().await {
            Ok(()) => println!("logged out"),
            Err(AuthError::NotLoggedIn) => println!("not logged in"),
            Err(e) => return Err(e.into()),
        },
        Command::Me => {
            if !tokens.is_authenticated() {
                return Err(anyhow!("not logged in"));
            }
            let me: UserSummary = session.request_json(&ApiRequest::get("/users/me")).await?;
            print_json(&me)?;
        }
        Command::Feed { kind, pages } => match kind {
            FeedKind::Entities => print_feed(EntityFeed::new(session, page_size), pages).await?,
            FeedKind::Stances { entities } => {
                let feed = StanceFeed::new(session, page_size).with_entities(entities);
                print_feed(feed, pages).await?
            }
            FeedKind::Following => {
                print_feed(FollowingStanceFeed::new(session, page_size), pages).await?
            }
            FeedKind::EntityStances { entity_id } => {
                let feed = EntityStancesFeed::new(session, entity_id, page_size);
                print_feed(feed, pages).await?
            }
            FeedKind::UserStances { user_id } => {
                print_feed(UserStancesFeed::new(session, user_id, page_size), pages).await?
            }
            FeedKind::Followers { user_id } => {
                let feed =
                    FollowersFeed::new(session, user_id, FollowDirection::Followers, page_size);
                print_feed(feed, pages).await?
            }
            FeedKind::Followees { user_id } => {
                let feed =
                    FollowersFeed::new(session, user_id, FollowDirection::Following, page_size);
                print_feed(feed, pages).await?
            }
        },
    }

    Ok(())
}

async fn print_feed<S>(source: S, pages: u32) -> anyhow::Result<()>
where
    S: PageSource,
    S::Item: Serialize,
{
    let paginator = Paginator::new(source);
    let mut outcome = paginator.initial_load().await?;
    let mut printed = 0;
    let mut fetched = 1;

    loop {
        let items = paginator.items();
        for item in &items[printed..] {
            print_json(item)?;
        }
        printed = items.len();

        if matches!(outcome, LoadOutcome::Exhausted(_)) || fetched >= pages {
            break;
        }
        outcome = paginator.load_more().await?;
        fetched += 1;
    }

    if paginator.has_more() {
        info!(cursor = ?paginator.cursor(), "more pages available");
    } else {
        info!("no more content");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
