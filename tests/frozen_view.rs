// ==============================================
// FROZEN VIEW TESTS (integration)
// ==============================================
//
// A frozen view shares a handle with live wrappers: it must see their
// writes, never make its own, and refuse to wrap another view.

use std::convert::Infallible;
use std::sync::Arc;

use memokit::prelude::*;

fn populated() -> Arc<FifoCache<String, String>> {
    let cache = Arc::new(FifoCache::new(8));
    cache.insert("k".to_string(), "v".to_string());
    cache
}

#[test]
fn lookup_and_len_delegate() {
    let view = Frozen::new(populated()).unwrap();

    assert_eq!(view.lookup(&"k".to_string()), Ok("v".to_string()));
    assert_eq!(view.lookup(&"x".to_string()), Err(CacheError::KeyNotFound));
    assert_eq!(view.len(), 1);
    assert_eq!(view.get_or(&"x".to_string(), "d".to_string()), "d");
    assert!(view.is_frozen());
}

#[test]
fn writes_fail_whatever_the_arguments() {
    let cache = populated();
    let view = Frozen::new(Arc::clone(&cache)).unwrap();
    let present = "k".to_string();
    let absent = "absent".to_string();

    for key in [&present, &absent] {
        assert_eq!(view.set(key.clone(), "new".to_string()), Err(CacheError::Immutable));
        assert_eq!(view.delete(key), Err(CacheError::Immutable));
        assert_eq!(view.insert(key.clone(), "new".to_string()), Err(CacheError::Immutable));
        assert_eq!(view.pop(key, "d".to_string()), Err(CacheError::Immutable));
        assert_eq!(view.setdefault(key.clone(), "d".to_string()), Err(CacheError::Immutable));
    }
    assert_eq!(view.popitem(), Err(CacheError::Immutable));
    assert_eq!(view.drain(usize::MAX), Err(CacheError::Immutable));
    assert_eq!(view.clear(false), Err(CacheError::Immutable));
    assert_eq!(view.shrink_to_fit(), Err(CacheError::Immutable));
    assert_eq!(
        view.update([("a".to_string(), "b".to_string())]),
        Err(CacheError::Immutable)
    );

    assert_eq!(cache.items(), vec![("k".to_string(), "v".to_string())]);
    assert_eq!(CacheError::Immutable.to_string(), "cache is immutable");
}

#[test]
fn nested_view_is_rejected() {
    let view = Arc::new(Frozen::new(populated()).unwrap());
    match Frozen::new(view) {
        Err(CacheError::InvalidHandle(msg)) => assert!(msg.contains("frozen")),
        other => panic!("expected InvalidHandle, got {other:?}"),
    }
}

#[test]
fn observes_entries_stored_by_a_wrapper() {
    let cache = Arc::new(FifoCache::<CacheKey, i64>::new(16));
    let square = cached(Arc::clone(&cache)).wrap(|args: &Args| {
        let n = args.get(0).and_then(ArgValue::as_int).unwrap_or(0);
        Ok::<_, Infallible>(n * n)
    });
    let view = Frozen::new(Arc::clone(&cache)).unwrap();

    assert!(view.is_empty());
    square.call(&args!(9)).unwrap();

    let key = square.key_for(&args!(9));
    assert_eq!(view.lookup(&key), Ok(81));
    assert_eq!(view.keys(), vec![key]);
    assert_eq!(view.maxsize(), 16);

    square.cache_clear();
    assert!(view.is_empty());
}

#[test]
fn generic_read_only_code_accepts_views() {
    fn total<C: CacheView<String, String>>(cache: &C) -> usize {
        cache.values().iter().map(String::len).sum()
    }

    let cache = populated();
    cache.insert("long".into(), "value".into());
    let view = Frozen::new(Arc::clone(&cache)).unwrap();
    assert_eq!(total(&view), total(&*cache));
}

#[test]
fn comparison_and_display() {
    let a = populated();
    let b = populated();
    let fa = Frozen::new(Arc::clone(&a)).unwrap();
    let fb = Frozen::new(Arc::clone(&b)).unwrap();

    assert_eq!(fa, fb);
    assert!(fa == b);
    assert_eq!(fa.to_string(), format!("<Frozen: {a}>"));
}
