//! Storefront command line client.
//!
//! ```bash
//! storefront search --category remeras --color 2 --sort price-asc --pages 2
//! storefront product buzo-frisa
//! storefront facets colors
//! storefront cart add --id 12 --name "Buzo" --slug buzo --price 15000 --max 5
//! storefront guard /checkout --signed-in
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use storefront::catalog::facets::{fetch_categories, resolve_category};
use storefront::catalog::filters::{
    Facet, FilterCoordinator, FilterIntent, RecordingNavigator, ShopRoute, SortMode,
};
use storefront::catalog::slug::product_path;
use storefront::catalog::{FacetKind, FacetLoader, FacetOptionsState, ProductCatalog};
use storefront::checkout::CartCookie;
use storefront::config::Config;
use storefront::graphql::GraphqlClient;
use storefront::session::{guard, GuardDecision};
use storefront::state::cart::{CartIntent, CartItem, CartReducer};
use storefront::state::mvi::Reducer;
use storefront::state::{LineKey, LocalStore};
use storefront::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version)]
#[command(about = "Browse the catalog and manage the local cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.config/storefront/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Newest,
    PriceAsc,
    PriceDesc,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortMode::Newest,
            SortArg::PriceAsc => SortMode::PriceAsc,
            SortArg::PriceDesc => SortMode::PriceDesc,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search products with facet filters
    Search {
        /// Category slug to scope the listing to
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "query", short = 'q')]
        query: Option<String>,
        #[arg(long = "color")]
        colors: Vec<String>,
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long = "size")]
        sizes: Vec<String>,
        #[arg(long = "age")]
        ages: Vec<String>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show a product by slug
    Product { slug: String },

    /// List facet options: colors, genres, sizes, ages, categories
    Facets { kind: String },

    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Evaluate route protection for a URL
    Guard {
        url: String,
        #[arg(long)]
        signed_in: bool,
        /// Raw `cart` cookie value
        #[arg(long)]
        cart_cookie: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    Show,
    Add {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        price: f64,
        /// Units in stock
        #[arg(long)]
        max: u32,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        color: Option<i64>,
        #[arg(long)]
        size: Option<i64>,
    },
    Remove {
        id: i64,
        #[arg(long)]
        color: Option<i64>,
        #[arg(long)]
        size: Option<i64>,
    },
    Inc {
        id: i64,
        #[arg(long)]
        color: Option<i64>,
        #[arg(long)]
        size: Option<i64>,
    },
    Dec {
        id: i64,
        #[arg(long)]
        color: Option<i64>,
        #[arg(long)]
        size: Option<i64>,
    },
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&path).context("loading config")?;

    match cli.command {
        Commands::Search {
            category,
            query,
            colors,
            genres,
            sizes,
            ages,
            max_price,
            sort,
            pages,
        } => {
            let client = GraphqlClient::new(&config.backend)?;
            let route = match &category {
                Some(slug) => ShopRoute::category(slug.clone()),
                None => ShopRoute::shop(),
            };
            let route_category = match &category {
                Some(slug) => {
                    let categories = fetch_categories(&client).await?;
                    match resolve_category(&categories, slug) {
                        Some(found) => Some(found),
                        None => bail!("unknown category '{}'", slug),
                    }
                }
                None => None,
            };

            let catalog = ProductCatalog::new(client, &config.catalog);
            let mut coordinator =
                FilterCoordinator::new(catalog, RecordingNavigator::new(), route, route_category);

            let mut intents = Vec::new();
            for (facet, ids) in [
                (Facet::Color, colors),
                (Facet::Genre, genres),
                (Facet::Size, sizes),
                (Facet::Age, ages),
            ] {
                intents.extend(ids.into_iter().map(|id| FilterIntent::ToggleFacet { facet, id }));
            }
            if let Some(term) = query {
                intents.push(FilterIntent::SetSearchTerm(term));
            }
            if let Some(price) = max_price {
                intents.push(FilterIntent::SetPriceCeiling(price));
            }
            intents.push(FilterIntent::SetSortMode(sort.into()));

            // A category route alone changes nothing, so fall back to a plain refetch.
            let pending = coordinator
                .dispatch_all(intents)
                .or_else(|| coordinator.begin_refetch());
            let Some(pending) = pending else {
                bail!("nothing to search for: pass a category, a facet or --query");
            };
            coordinator.execute(pending).await;
            for _ in 1..pages {
                if coordinator.load_more().await.is_none() {
                    break;
                }
            }
            if let Some(failure) = coordinator.error() {
                bail!("{} ({})", failure.message, failure.error_type);
            }

            for product in coordinator.accumulator().products() {
                println!(
                    "{:>6}  {:>10.2}  {}  {}",
                    product.id,
                    product.price,
                    product.name,
                    product_path(&product.slug, &product.name)
                );
            }
            println!(
                "{} products, more available: {}",
                coordinator.accumulator().len(),
                coordinator.accumulator().has_more()
            );
        }

        Commands::Product { slug } => {
            let client = GraphqlClient::new(&config.backend)?;
            let catalog = ProductCatalog::new(client, &config.catalog);
            let Some(product) = catalog.product_by_slug(&slug).await? else {
                bail!("product '{}' not found", slug);
            };
            println!("{}", serde_json::to_string_pretty(&product)?);

            let related = catalog.related_products(product.id).await;
            for item in related {
                println!("related: {} {}", item.id, item.name);
            }
        }

        Commands::Facets { kind } => {
            let Some(kind) = FacetKind::parse(&kind) else {
                bail!("unknown facet kind '{}'", kind);
            };
            let client = GraphqlClient::new(&config.backend)?;
            let loader = FacetLoader::from_config(&config.catalog);
            match loader.load_kind(&client, kind).await {
                FacetOptionsState::Ready(options) => {
                    for option in options {
                        println!("{:>6}  {}", option.id, option.label);
                    }
                }
                FacetOptionsState::TimedOut => bail!(
                    "timed out after {} ms",
                    loader.timeout().as_millis()
                ),
                FacetOptionsState::Failed(message) => bail!(message),
                FacetOptionsState::Loading => {}
            }
        }

        Commands::Cart { action } => {
            let store = LocalStore::open(config.storage.store_path());
            let slices = store.rehydrate();
            let intent = match action {
                CartAction::Show => None,
                CartAction::Add {
                    id,
                    name,
                    slug,
                    price,
                    max,
                    quantity,
                    color,
                    size,
                } => Some(CartIntent::Add(CartItem {
                    id,
                    name,
                    slug,
                    price,
                    description: None,
                    quantity,
                    selected_color: color,
                    selected_size: size,
                    max_quantity: max,
                    image: None,
                    selected_color_name: None,
                    selected_size_name: None,
                })),
                CartAction::Remove { id, color, size } => {
                    Some(CartIntent::Remove(LineKey::new(id, color, size)))
                }
                CartAction::Inc { id, color, size } => {
                    Some(CartIntent::Increment(LineKey::new(id, color, size)))
                }
                CartAction::Dec { id, color, size } => {
                    Some(CartIntent::Decrement(LineKey::new(id, color, size)))
                }
                CartAction::Clear => Some(CartIntent::Clear),
            };

            let cart = match intent {
                Some(intent) => {
                    let cart = CartReducer::reduce(slices.cart, intent);
                    store.persist(&cart, &slices.wishlist)?;
                    cart
                }
                None => slices.cart,
            };

            for item in &cart.items {
                println!(
                    "{:>6}  x{:<3} {:>10.2}  {}",
                    item.id,
                    item.quantity,
                    item.subtotal(),
                    item.name
                );
            }
            println!("{} items, total {:.2}", cart.total_items, cart.total_price);
            println!("cookie: {}", CartCookie::from(&cart).to_cookie_value()?);
        }

        Commands::Guard {
            url,
            signed_in,
            cart_cookie,
        } => match guard(&url, signed_in, cart_cookie.as_deref()) {
            GuardDecision::Allow => println!("allow"),
            GuardDecision::Redirect(target) => println!("redirect {}", target),
        },
    }

    Ok(())
}
