//! Memoize an async lookup and cancel a slow one.
//!
//! Run with: `RUST_LOG=memokit=debug cargo run --example async_cached`

use std::sync::Arc;
use std::time::Duration;

use memokit::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Profile {
    id: i64,
    name: String,
}

async fn load_profile(args: Args) -> Result<Profile, String> {
    let id = args
        .get(0)
        .and_then(ArgValue::as_int)
        .ok_or_else(|| "missing id".to_string())?;
    let delay = args.keyword("delay_ms").and_then(ArgValue::as_int).unwrap_or(20);
    tokio::time::sleep(Duration::from_millis(delay.unsigned_abs())).await;
    Ok(Profile {
        id,
        name: format!("user-{id}"),
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let profiles = Arc::new(
        cached(Arc::new(FifoCache::new(64)))
            .name("load_profile")
            .wrap_async(load_profile),
    );

    for id in [1, 2, 1] {
        match profiles.call(args!(id)).await {
            Ok(p) => println!("{} -> {}", p.id, p.name),
            Err(err) => println!("error: {err}"),
        }
    }

    let slow = tokio::time::timeout(
        Duration::from_millis(5),
        profiles.call(args!(99; "delay_ms" => 1000)),
    )
    .await;
    println!("slow call timed out: {}", slow.is_err());

    if let Err(err) = profiles.call(args!()).await {
        println!("error: {err}");
    }

    println!("{}", profiles.cache_info());
}
