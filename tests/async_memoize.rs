// ==============================================
// ASYNC MEMOIZE TESTS (integration)
// ==============================================
//
// The async wrapper shares key derivation and accounting with the sync one.
// These tests cover what only it can do: suspend inside the target and be
// cancelled there.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use memokit::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Fetched(String);

#[tokio::test]
async fn repeat_call_is_served_from_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fetch = cached(Arc::new(FifoCache::new(32))).wrap_async(move |args: Args| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            let path = args.get(0).and_then(ArgValue::as_str).unwrap_or("/").to_string();
            Ok::<_, std::io::Error>(Fetched(path))
        }
    });

    let a = fetch.call(args!("/a")).await.unwrap();
    let b = fetch.call(args!("/a")).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let info = fetch.cache_info();
    assert_eq!((info.hits, info.misses, info.length), (1, 1, 1));
}

#[tokio::test]
async fn cancellation_leaves_handle_untouched() {
    let cache = Arc::new(FifoCache::<CacheKey, i64>::new(8));
    cache.insert(CacheKey::Bare(ArgValue::from("seed")), 0);

    let slow = cached(Arc::clone(&cache)).wrap_async(|_: Args| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok::<i64, std::io::Error>(1)
    });

    let before = cache.items();
    let timed_out = tokio::time::timeout(Duration::from_millis(5), slow.call(args!("k"))).await;
    assert!(timed_out.is_err());

    assert_eq!(cache.items(), before);
    let info = slow.cache_info();
    assert_eq!(info.hits, 0);
    assert_eq!(info.misses, 1);
}

#[tokio::test]
async fn failure_is_not_stored() {
    let f = cached_default::<i64>().wrap_async(|args: Args| async move {
        match args.keyword("fail").and_then(ArgValue::as_bool) {
            Some(true) => Err("refused"),
            _ => Ok(7),
        }
    });

    assert_eq!(f.call(args!(1; "fail" => true)).await, Err("refused"));
    assert_eq!(f.cache_info().length, 0);
    assert_eq!(f.call(args!(1; "fail" => false)).await, Ok(7));
    assert_eq!(f.cache_info().length, 1);
    assert_eq!(f.cache_info().misses, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_share_the_wrapper() {
    let f = Arc::new(cachedmethod(Arc::new(FifoCache::new(0))).wrap_async(|args: Args| async move {
        tokio::task::yield_now().await;
        Ok::<_, String>(args.after_receiver().len())
    }));

    let tasks: Vec<_> = (0..16_i64)
        .map(|i| {
            let f = Arc::clone(&f);
            tokio::spawn(async move { f.call(args!(i, i % 4)).await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), Ok(1));
    }

    let info = f.cache_info();
    assert_eq!(info.calls(), 16);
    assert_eq!(info.length, 4);
}
