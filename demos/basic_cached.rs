//! Memoize a slow function and watch the statistics.
//!
//! Run with: `RUST_LOG=memokit=trace cargo run --example basic_cached`

use std::convert::Infallible;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use memokit::prelude::*;
use tracing_subscriber::EnvFilter;

fn slow_square(args: &Args) -> Result<i64, Infallible> {
    thread::sleep(Duration::from_millis(50));
    let n = args.get(0).and_then(ArgValue::as_int).unwrap_or(0);
    Ok(n * n)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let square = cached(Arc::new(FifoCache::new(3)))
        .name("slow_square")
        .wrap(slow_square);

    for n in [2, 3, 2, 4, 5, 2] {
        let value = square.call(&args!(n)).unwrap_or_default();
        println!("{square}({n}) = {value}");
    }
    println!("{}", square.cache_info());

    square.cache_clear();
    println!("after clear: {}", square.cache_info());
}
