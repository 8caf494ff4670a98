//! Dynamic call arguments.
//!
//! Memoized targets receive their arguments as an [`Args`] bundle: ordered
//! positional [`ArgValue`]s plus keyword pairs kept in insertion order. Key
//! makers read the same bundle to derive a [`CacheKey`](super::CacheKey).
//!
//! ## Equality
//!
//! Values compare the way a caller would expect from the numbers they
//! represent:
//!
//! | Pair                      | Equal? | Notes                                |
//! |---------------------------|--------|--------------------------------------|
//! | `Int(1)` / `Float(1.0)`   | yes    | same hash too; use `TypedKey` to split |
//! | `Float(NaN)` / `Float(NaN)` | yes  | keeps keys `Eq`                      |
//! | `Float(0.0)` / `Float(-0.0)` | yes |                                      |
//! | `Bool(true)` / `Int(1)`   | no     | bool is its own type                 |
//! | `Object(a)` / `Object(b)` | iff same allocation | identity semantics     |
//!
//! ## Example Usage
//!
//! ```
//! use memokit::args;
//! use memokit::key::{ArgType, ArgValue};
//!
//! let args = args!(1, "x"; "flag" => true);
//! assert_eq!(args.positional().len(), 2);
//! assert_eq!(args.keyword("flag"), Some(&ArgValue::Bool(true)));
//! assert_eq!(args.positional()[1].type_of(), ArgType::Str);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// ArgType
// ---------------------------------------------------------------------------

/// Runtime type tag of an [`ArgValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Tuple,
    /// An opaque object; carries the concrete Rust type.
    Object { id: TypeId, name: &'static str },
}

impl ArgType {
    /// Bit used by fast-type masks. Objects never take the fast path.
    pub(crate) const fn primitive_bit(&self) -> Option<u8> {
        match self {
            ArgType::None => Some(1 << 0),
            ArgType::Bool => Some(1 << 1),
            ArgType::Int => Some(1 << 2),
            ArgType::Float => Some(1 << 3),
            ArgType::Str => Some(1 << 4),
            ArgType::Bytes => Some(1 << 5),
            ArgType::Tuple => Some(1 << 6),
            ArgType::Object { .. } => None,
        }
    }

    /// Short type name.
    pub fn name(&self) -> &'static str {
        match self {
            ArgType::None => "none",
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Str => "str",
            ArgType::Bytes => "bytes",
            ArgType::Tuple => "tuple",
            ArgType::Object { name, .. } => *name,
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ObjectRef
// ---------------------------------------------------------------------------

/// Shared reference to an arbitrary value, compared by identity.
///
/// This is how receivers and other non-primitive arguments travel through
/// [`Args`]. Two `ObjectRef`s are equal only if they point at the same
/// allocation.
#[derive(Clone)]
pub struct ObjectRef {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ObjectRef {
    /// Moves `value` into a new shared allocation.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing `Arc`, keeping its identity.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrows the value as `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns a typed `Arc` sharing the same allocation.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Runtime type of the referenced value.
    pub fn type_of(&self) -> ArgType {
        ArgType::Object {
            id: self.type_id,
            name: self.type_name,
        }
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.value) as *const () as usize
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} at {:#x}>", self.type_name, self.addr())
    }
}

// ---------------------------------------------------------------------------
// ArgValue
// ---------------------------------------------------------------------------

/// A single call argument.
#[derive(Debug, Clone)]
pub enum ArgValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    Tuple(Arc<[ArgValue]>),
    Object(ObjectRef),
}

// 2^63 as f64; the first float past the i64 range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Returns the integer a float is exactly equal to, if any.
fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl ArgValue {
    /// Wraps any shareable value as an identity-compared object argument.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        ArgValue::Object(ObjectRef::new(value))
    }

    /// Runtime type tag.
    pub fn type_of(&self) -> ArgType {
        match self {
            ArgValue::None => ArgType::None,
            ArgValue::Bool(_) => ArgType::Bool,
            ArgValue::Int(_) => ArgType::Int,
            ArgValue::Float(_) => ArgType::Float,
            ArgValue::Str(_) => ArgType::Str,
            ArgValue::Bytes(_) => ArgType::Bytes,
            ArgValue::Tuple(_) => ArgType::Tuple,
            ArgValue::Object(obj) => obj.type_of(),
        }
    }

    /// The integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// `Some` only for `Bool`; integers are not coerced.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrowed string contents.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(&**s),
            _ => None,
        }
    }

    /// Borrowed byte contents.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ArgValue::Bytes(b) => Some(&**b),
            _ => None,
        }
    }

    /// Tuple elements in order.
    pub fn as_tuple(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::Tuple(t) => Some(&**t),
            _ => None,
        }
    }

    /// The opaque object handle.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            ArgValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Downcasts an object argument to `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(|obj| obj.downcast_ref::<T>())
    }
}

impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        use ArgValue::*;
        match (self, other) {
            (None, None) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Int(i), Float(f)) | (Float(f), Int(i)) => integral(*f) == Some(*i),
            (Str(a), Str(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ArgValue {}

impl Hash for ArgValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Integral floats hash as the matching Int so equal values agree.
        match self {
            ArgValue::None => state.write_u8(0),
            ArgValue::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            },
            ArgValue::Int(i) => {
                state.write_u8(2);
                i.hash(state);
            },
            ArgValue::Float(f) => match integral(*f) {
                Some(i) => {
                    state.write_u8(2);
                    i.hash(state);
                },
                Option::None => {
                    state.write_u8(3);
                    let bits = if f.is_nan() { f64::NAN.to_bits() } else { f.to_bits() };
                    bits.hash(state);
                },
            },
            ArgValue::Str(s) => {
                state.write_u8(4);
                s.hash(state);
            },
            ArgValue::Bytes(b) => {
                state.write_u8(5);
                b.hash(state);
            },
            ArgValue::Tuple(t) => {
                state.write_u8(6);
                t.hash(state);
            },
            ArgValue::Object(obj) => {
                state.write_u8(7);
                obj.hash(state);
            },
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::None => f.write_str("none"),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(x) => write!(f, "{x:?}"),
            ArgValue::Str(s) => write!(f, "{s:?}"),
            ArgValue::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            ArgValue::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            },
            ArgValue::Object(obj) => write!(f, "{obj:?}"),
        }
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for ArgValue {
            fn from(v: $t) -> Self {
                ArgValue::Int(i64::from(v))
            }
        })*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        ArgValue::Float(f64::from(v))
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<()> for ArgValue {
    fn from(_: ()) -> Self {
        ArgValue::None
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Str(Arc::from(v))
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Str(Arc::from(v))
    }
}

impl From<Arc<str>> for ArgValue {
    fn from(v: Arc<str>) -> Self {
        ArgValue::Str(v)
    }
}

impl From<&[u8]> for ArgValue {
    fn from(v: &[u8]) -> Self {
        ArgValue::Bytes(Arc::from(v))
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(v: Vec<u8>) -> Self {
        ArgValue::Bytes(Arc::from(v))
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(v: Vec<ArgValue>) -> Self {
        ArgValue::Tuple(Arc::from(v))
    }
}

impl From<ObjectRef> for ArgValue {
    fn from(v: ObjectRef) -> Self {
        ArgValue::Object(v)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ArgValue::None, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// Positional and keyword arguments of one call.
///
/// Keyword pairs keep their first-insertion order; setting an existing name
/// again replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    positional: Vec<ArgValue>,
    keywords: Vec<(String, ArgValue)>,
}

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds positional-only arguments.
    pub fn from_positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArgValue>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keywords: Vec::new(),
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.push(value);
        self
    }

    /// Sets a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.set_keyword(name, value);
        self
    }

    /// Appends a positional argument in place.
    pub fn push(&mut self, value: impl Into<ArgValue>) {
        self.positional.push(value.into());
    }

    /// Sets a keyword argument in place.
    pub fn set_keyword(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        let name = name.into();
        let value = value.into();
        match self.keywords.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.keywords.push((name, value)),
        }
    }

    /// Positional arguments in call order.
    pub fn positional(&self) -> &[ArgValue] {
        &self.positional
    }

    /// Keyword arguments in call order.
    pub fn keywords(&self) -> &[(String, ArgValue)] {
        &self.keywords
    }

    /// Positional argument at `index`.
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.positional.get(index)
    }

    /// Keyword argument by name.
    pub fn keyword(&self, name: &str) -> Option<&ArgValue> {
        self.keywords
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The first positional argument, i.e. the receiver of a method call.
    pub fn receiver(&self) -> Option<&ArgValue> {
        self.positional.first()
    }

    /// Positional arguments after the receiver.
    pub fn after_receiver(&self) -> &[ArgValue] {
        self.positional.get(1..).unwrap_or(&[])
    }

    /// Total number of arguments.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    /// True for a call with no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }
}

/// Builds an [`Args`] bundle.
///
/// Positional values come first; keyword pairs follow a `;`.
///
/// ```
/// use memokit::args;
///
/// let a = args!(1, 2.5);
/// let b = args!("path"; "retries" => 3, "strict" => true);
/// let c = args!(; "only" => "keywords");
/// assert_eq!(a.len(), 2);
/// assert_eq!(b.keywords().len(), 2);
/// assert!(c.positional().is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::key::Args::new()
    };
    ($($pos:expr),* $(,)? $(; $($name:expr => $val:expr),* $(,)?)?) => {
        $crate::key::Args::new()
            $(.arg($pos))*
            $($(.kwarg($name, $val))*)?
    };
}
