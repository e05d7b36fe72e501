use std::{fs::read_to_string, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use orders::{
    CartItem, CartView, Config, FetchStatus, Identity, OrderHistory, OrdersClient, OutletFilter,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

mod cart;

use cart::{Action, LocalCart};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the order history of a phone number.
    Orders {
        /// Phone number as the identity provider stores it, e.g. +919876543210.
        #[arg(long)]
        phone: Option<String>,

        #[arg(long, default_value = "all")]
        outlet: OutletFilter,

        /// Seed for the expected time estimate.
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 0)]
        retries: u32,
    },

    /// Show a cart stored as JSON and apply actions to it, in order.
    Cart {
        path: PathBuf,

        /// `inc:ID`, `dec:ID`, `rm:ID`, `checkout` or `close`.
        actions: Vec<Action>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match Args::parse().command {
        Command::Orders {
            phone,
            outlet,
            seed,
            retries,
        } => show_orders(phone, outlet, seed, retries).await,
        Command::Cart { path, actions } => show_cart(path, actions),
    }
}

async fn show_orders(
    phone: Option<String>,
    outlet: OutletFilter,
    seed: Option<u64>,
    retries: u32,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = OrdersClient::new(&config)?;

    let identity = match phone {
        Some(phone) => Identity::with_phone(&phone),
        None => {
            warn!("No phone given, showing a signed out history");
            Identity::signed_out()
        }
    };

    let mut history = OrderHistory::new(client);
    history.select(outlet);
    history.sync(&identity);
    history.settle().await;

    for attempt in 1..=retries {
        match history.fetcher().state().status {
            FetchStatus::Failed { retryable: true, .. } => {
                let backoff = Duration::from_millis(250 * u64::from(attempt));
                info!("Retry {attempt}/{retries} in {backoff:?}");

                tokio::time::sleep(backoff).await;
                history.retry();
                history.settle().await;
            }
            _ => break,
        }
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    print!("{}", history.render(&identity, &mut rng));

    Ok(())
}

fn show_cart(path: PathBuf, actions: Vec<Action>) -> anyhow::Result<()> {
    let json_string =
        read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let items: Vec<CartItem> = serde_json::from_str(&json_string)
        .with_context(|| format!("{} is not a cart", path.display()))?;

    let mut cart = LocalCart::new(items);

    for action in actions {
        let snapshot = cart.items().to_vec();
        CartView::new(&snapshot).dispatch(action.into(), &mut cart);
    }

    if cart.is_open() {
        print!("{}", CartView::new(cart.items()).render());
    } else {
        println!("Cart closed with {} items", cart.items().len());
    }

    Ok(())
}
