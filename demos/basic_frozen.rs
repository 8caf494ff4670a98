//! Hand out read-only access to a cache that a memoized function fills.
//!
//! Run with: `cargo run --example basic_frozen`

use std::convert::Infallible;
use std::sync::Arc;

use memokit::prelude::*;

fn main() -> Result<(), CacheError> {
    let cache = Arc::new(FifoCache::<CacheKey, String>::new(16));
    let greet = cached(Arc::clone(&cache)).wrap(|args: &Args| {
        let who = args.get(0).and_then(ArgValue::as_str).unwrap_or("world");
        Ok::<_, Infallible>(format!("hello, {who}"))
    });

    let view = Frozen::new(Arc::clone(&cache))?;

    for who in ["ada", "grace", "ada"] {
        let _ = greet.call(&args!(who));
    }

    println!("{view}");
    for (key, value) in view.items() {
        println!("  {key} => {value}");
    }

    let key = greet.key_for(&args!("ada"));
    println!("lookup ada: {:?}", view.lookup(&key));

    match view.set(key, "overwritten".to_string()) {
        Err(err) => println!("write refused: {err}"),
        Ok(()) => unreachable!("frozen views never accept writes"),
    }

    if let Err(err) = Frozen::new(Arc::new(view.clone())) {
        println!("nesting refused: {err}");
    }

    Ok(())
}
