//! Deprecated entry points kept for older callers.
//!
//! Each shim forwards to its replacement and logs a `warn!` the first time it
//! is used. Nothing else in the crate calls into this module.

use std::sync::Once;

use crate::traits::CacheView;

static ITEMS_IN_ORDER_NOTICE: Once = Once::new();

/// Entries of `cache` in its iteration order.
///
/// Same as [`CacheView::items`], which already yields entries in the
/// backend's order.
#[deprecated(note = "use CacheView::items")]
pub fn items_in_order<C, K, V>(cache: &C) -> Vec<(K, V)>
where
    C: CacheView<K, V> + ?Sized,
{
    ITEMS_IN_ORDER_NOTICE.call_once(|| {
        tracing::warn!("compat::items_in_order is deprecated; use CacheView::items");
    });
    cache.items()
}
