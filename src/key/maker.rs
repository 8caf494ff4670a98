//! Key derivation strategies.
//!
//! A [`KeyMaker`] turns the arguments of one call into the [`CacheKey`] the
//! memoizing wrappers look up and store under.
//!
//! ## Strategies
//!
//! ```text
//!   positional: (a, b)      keywords: {x: 1, y: 2}
//!
//!   PlainKey  ──►  Composite[ a, b, KwMark, "x", 1, "y", 2 ]
//!                  (one fast-type positional and no keywords ──► Bare(a))
//!
//!   HashedKey ──►  Hashed( fxhash(PlainKey) )
//!
//!   TypedKey  ──►  Composite[ a, b, KwMark, "x", 1, "y", 2,
//!                             type(a), type(b), type(1), type(2) ]
//! ```
//!
//! | Strategy    | Fast path | Separates `1` / `1.0` | Key width  |
//! |-------------|-----------|------------------------|------------|
//! | `PlainKey`  | yes       | no                     | variable   |
//! | `HashedKey` | no        | no                     | fixed `u64`|
//! | `TypedKey`  | no        | yes                    | variable   |
//!
//! ## Fast Path
//!
//! Most memoized functions take a single integer or string. For those calls
//! [`PlainKey`] returns the argument itself as [`CacheKey::Bare`], which
//! skips allocating a part vector and hashing a composite. The set of types
//! that qualify is configurable through [`PlainKey::with_fast_types`].
//!
//! ## Hash Collisions
//!
//! [`HashedKey`] stores only a 64-bit hash. Two different argument lists that
//! collide share one cache slot and the second caller receives the first
//! caller's result. That is the price of a fixed-width key.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::args;
//! use memokit::key::{ArgValue, CacheKey, KeyMaker, PlainKey, TypedKey};
//!
//! let plain = PlainKey::new();
//! let a = args!("x");
//! assert_eq!(
//!     plain.make_key(a.positional(), a.keywords()),
//!     CacheKey::Bare(ArgValue::from("x"))
//! );
//!
//! let typed = TypedKey;
//! let one = args!(1);
//! let one_f = args!(1.0);
//! assert_ne!(
//!     typed.make_key(one.positional(), one.keywords()),
//!     typed.make_key(one_f.positional(), one_f.keywords()),
//! );
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::key::value::{ArgType, ArgValue};

// ---------------------------------------------------------------------------
// CacheKey
// ---------------------------------------------------------------------------

/// One element of a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Value(ArgValue),
    /// Separates positional values from the flattened keyword pairs.
    KwMark,
    Name(String),
    Type(ArgType),
}

/// A derived lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A single fast-type argument used as-is.
    Bare(ArgValue),
    Composite(Vec<KeyPart>),
    Hashed(u64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Bare(value) => write!(f, "{value}"),
            CacheKey::Hashed(h) => write!(f, "#{h:016x}"),
            CacheKey::Composite(parts) => {
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match part {
                        KeyPart::Value(v) => write!(f, "{v}")?,
                        KeyPart::KwMark => f.write_str("<kw>")?,
                        KeyPart::Name(n) => write!(f, "{n}=")?,
                        KeyPart::Type(t) => write!(f, "<{t}>")?,
                    }
                }
                f.write_str(")")
            },
        }
    }
}

impl From<ArgValue> for CacheKey {
    fn from(value: ArgValue) -> Self {
        CacheKey::Bare(value)
    }
}

// ---------------------------------------------------------------------------
// KeyMaker
// ---------------------------------------------------------------------------

/// Derives a cache key from call arguments.
///
/// Implementations must be deterministic: identical arguments give equal
/// keys. Closures with the matching signature are key makers too:
///
/// ```
/// use memokit::args;
/// use memokit::key::{ArgValue, CacheKey, KeyMaker};
///
/// // Key only on the first argument.
/// let by_first = |pos: &[ArgValue], _kw: &[(String, ArgValue)]| {
///     CacheKey::Bare(pos.first().cloned().unwrap_or(ArgValue::None))
/// };
/// let a = args!("/index", 1);
/// let b = args!("/index", 2);
/// assert_eq!(
///     by_first.make_key(a.positional(), a.keywords()),
///     by_first.make_key(b.positional(), b.keywords()),
/// );
/// ```
pub trait KeyMaker {
    /// Builds the key for one call from its positional and keyword arguments.
    fn make_key(&self, positional: &[ArgValue], keywords: &[(String, ArgValue)]) -> CacheKey;
}

impl<F> KeyMaker for F
where
    F: Fn(&[ArgValue], &[(String, ArgValue)]) -> CacheKey,
{
    fn make_key(&self, positional: &[ArgValue], keywords: &[(String, ArgValue)]) -> CacheKey {
        self(positional, keywords)
    }
}

/// Positional values, then the sentinel and the keyword pairs if any.
fn plain_parts(positional: &[ArgValue], keywords: &[(String, ArgValue)], extra: usize) -> Vec<KeyPart> {
    let kw_len = if keywords.is_empty() {
        0
    } else {
        1 + 2 * keywords.len()
    };
    let mut parts = Vec::with_capacity(positional.len() + kw_len + extra);
    parts.extend(positional.iter().cloned().map(KeyPart::Value));
    if !keywords.is_empty() {
        parts.push(KeyPart::KwMark);
        for (name, value) in keywords {
            parts.push(KeyPart::Name(name.clone()));
            parts.push(KeyPart::Value(value.clone()));
        }
    }
    parts
}

// ---------------------------------------------------------------------------
// PlainKey
// ---------------------------------------------------------------------------

const DEFAULT_FAST_MASK: u8 = match (ArgType::Int.primitive_bit(), ArgType::Str.primitive_bit()) {
    (Some(i), Some(s)) => i | s,
    _ => 0,
};

/// The default strategy: argument values in order, with a fast path for a
/// single primitive argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainKey {
    fast_mask: u8,
}

impl PlainKey {
    /// Plain keys with `int` and `str` as fast types.
    pub const fn new() -> Self {
        Self {
            fast_mask: DEFAULT_FAST_MASK,
        }
    }

    /// Plain keys with a custom fast-type set. An empty slice disables the
    /// fast path. Object types are ignored; objects never take it.
    pub fn with_fast_types(types: &[ArgType]) -> Self {
        let fast_mask = types
            .iter()
            .filter_map(ArgType::primitive_bit)
            .fold(0, |mask, bit| mask | bit);
        Self { fast_mask }
    }

    /// Returns `true` if a lone argument of this type is used as a bare key.
    pub fn is_fast(&self, ty: &ArgType) -> bool {
        ty.primitive_bit()
            .is_some_and(|bit| self.fast_mask & bit != 0)
    }
}

impl Default for PlainKey {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMaker for PlainKey {
    fn make_key(&self, positional: &[ArgValue], keywords: &[(String, ArgValue)]) -> CacheKey {
        if let ([only], true) = (positional, keywords.is_empty()) {
            if self.is_fast(&only.type_of()) {
                return CacheKey::Bare(only.clone());
            }
        }
        CacheKey::Composite(plain_parts(positional, keywords, 0))
    }
}

// ---------------------------------------------------------------------------
// HashedKey
// ---------------------------------------------------------------------------

/// Fixed-width keys: the `FxHasher` hash of the [`PlainKey`] key.
///
/// Distinct calls whose plain keys collide share a cache slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashedKey {
    plain: PlainKey,
}

impl HashedKey {
    /// Hashes keys from the default [`PlainKey`].
    pub const fn new() -> Self {
        Self {
            plain: PlainKey::new(),
        }
    }

    /// Hashes keys produced by a custom plain strategy.
    pub const fn with_plain(plain: PlainKey) -> Self {
        Self { plain }
    }
}

impl KeyMaker for HashedKey {
    fn make_key(&self, positional: &[ArgValue], keywords: &[(String, ArgValue)]) -> CacheKey {
        let mut hasher = FxHasher::default();
        self.plain.make_key(positional, keywords).hash(&mut hasher);
        CacheKey::Hashed(hasher.finish())
    }
}

// ---------------------------------------------------------------------------
// TypedKey
// ---------------------------------------------------------------------------

/// Type-sensitive keys: the plain parts followed by the runtime type of every
/// positional value and then every keyword value. Never fast-paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypedKey;

impl KeyMaker for TypedKey {
    fn make_key(&self, positional: &[ArgValue], keywords: &[(String, ArgValue)]) -> CacheKey {
        let mut parts = plain_parts(positional, keywords, positional.len() + keywords.len());
        parts.extend(positional.iter().map(|v| KeyPart::Type(v.type_of())));
        parts.extend(keywords.iter().map(|(_, v)| KeyPart::Type(v.type_of())));
        CacheKey::Composite(parts)
    }
}
