mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tcgdex_client::{
    AppEvent, CatalogApi, CatalogClient, DetailController, EventBus, ListController,
    ListControllerConfig, LoadingState, SortField, SortOrder,
};

#[derive(Parser, Debug)]
#[command(name = "tcgdex-browse", about = "Browse the TCGdex card catalog")]
struct Args {
    /// Catalog language code
    #[arg(long, default_value = "en")]
    language: String,

    /// Cards fetched per page
    #[arg(long, default_value_t = 40)]
    page_size: u32,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for the on-disk response cache
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Search debounce in milliseconds
    #[arg(long, default_value_t = 200)]
    debounce_ms: u64,
}

const HELP: &str = "\
commands:
  s <text>        search by name (debounced)
  m               load the next page
  r               retry the last search
  sort name|id    change sort field
  order asc|desc  change sort order
  open <n>        show details for card number n
  l               list loaded cards
  q               quit";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut builder = CatalogClient::builder().language(&args.language);
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    // The blocking client owns its own runtime, so it is built and finally
    // dropped outside of ours.
    let api: Arc<dyn CatalogApi> = Arc::new(builder.build()?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = {
        let _guard = runtime.enter();
        browse(Arc::clone(&api), &args)
    };
    runtime.shutdown_timeout(Duration::from_secs(2));
    drop(api);
    result
}

fn browse(api: Arc<dyn CatalogApi>, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let bus = EventBus::default();
    let config = ListControllerConfig {
        page_size: args.page_size,
        debounce: Duration::from_millis(args.debounce_ms),
    };
    let list = Arc::new(ListController::new(Arc::clone(&api), bus.clone(), config)?);

    list.subscribe(|state| match &state.loading {
        LoadingState::Loaded => render::print_list(state),
        LoadingState::Error(_) => {
            if let Some(message) = &state.error_message {
                println!("! {}", message);
            }
        }
        LoadingState::Loading if state.show_full_screen_loading() => println!("loading..."),
        _ => {}
    });

    tokio::spawn(route_events(bus.clone(), Arc::clone(&list), api));

    bus.publish(AppEvent::ShowList);
    list.load_initial();
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let (command, rest) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "q" | "quit" => break,
            "s" => list.search_input(rest),
            "m" => {
                if list.load_more().is_none() {
                    println!("nothing more to load");
                }
            }
            "r" => {
                list.retry();
            }
            "sort" => match rest.parse::<SortField>() {
                Ok(field) => {
                    list.set_sort_field(field);
                }
                Err(e) => println!("! {}", e),
            },
            "order" => match rest.parse::<SortOrder>() {
                Ok(order) => {
                    list.set_sort_order(order);
                }
                Err(e) => println!("! {}", e),
            },
            "open" => {
                let state = list.state();
                match rest.parse::<usize>().ok().and_then(|n| state.cards.get(n.wrapping_sub(1))) {
                    Some(card) => list.select(card),
                    None => println!("! no card numbered {:?}", rest),
                }
            }
            "l" => render::print_list(&list.state()),
            _ => println!("{}", HELP),
        }
    }
    Ok(())
}

/// Turns card selections into detail views.
async fn route_events(bus: EventBus, list: Arc<ListController>, api: Arc<dyn CatalogApi>) {
    let mut events = bus.stream();
    while let Some(event) = events.next().await {
        log::debug!("Event: {:?}", event);
        match event {
            AppEvent::CardSelected(id) => {
                bus.publish(AppEvent::ShowDetails(id));
            }
            AppEvent::ShowDetails(id) => {
                let Some(card) = list.state().cards.into_iter().find(|c| c.id == id) else {
                    log::warn!("Selected card {} is no longer listed", id);
                    continue;
                };
                let detail = match DetailController::new(Arc::clone(&api), card) {
                    Ok(detail) => detail,
                    Err(e) => {
                        log::error!("Cannot open details: {}", e);
                        continue;
                    }
                };
                if let Some(load) = detail.load() {
                    let _ = load.await;
                }
                render::print_detail(&detail);
                bus.publish(AppEvent::NavigateBack);
            }
            AppEvent::NavigateBack | AppEvent::ShowList => {}
        }
    }
}
