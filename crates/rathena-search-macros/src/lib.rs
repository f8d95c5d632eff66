//! Proc macros for `rathena-search`.
//!
//! - [`Seekable`] - Generate the path accessor and field path constants of an
//!   entity struct.

mod seeker;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Seekable` trait for searchable entity structs.
///
/// Generated code refers to `::rathena_search`, so the deriving crate must
/// depend on `rathena-search`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text field (`AsRef<str>`) |
/// | `Number` | Numeric field (`Copy` into `Number`) |
/// | `Timestamp` | Requires a `SeekerTimestamp` impl |
/// | `Enum` | Requires a `SeekerEnum` impl |
/// | `Bool` | Boolean field |
/// | `nested` | Field is itself `Seekable`; its paths appear as `field.path` |
/// | `optional` | Field is `Option<_>`; `None` resolves to `Value::None` |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom path segment |
/// | `ty = "..."` | Spell the type as a string (`ty = "enum"`) |
///
/// Fields without a `#[seek(...)]` attribute are not exposed.
///
/// # Generated Code
///
/// 1. Path constants (`Monster::NAME`, `Monster::STATS`).
/// 2. `Seekable::seeker_field_value`, resolving dotted paths through nested
///    fields.
/// 3. `Seekable::field_paths`, listing every resolvable path.
///
/// # Example
///
/// ```ignore
/// use rathena_search::Seekable;
/// use rathena_search_macros::Seekable;
///
/// #[derive(Seekable)]
/// struct Stats {
///     #[seek(Number)]
///     level: u16,
///     #[seek(Number)]
///     hp: u32,
/// }
///
/// #[derive(Seekable)]
/// struct Monster {
///     #[seek(String)]
///     name: String,
///     #[seek(nested)]
///     stats: Stats,
///     #[seek(Number, optional, rename = "mvpExp")]
///     mvp_exp: Option<u32>,
/// }
///
/// assert_eq!(Monster::MVP_EXP, "mvpExp");
/// assert_eq!(
///     Monster::field_paths(),
///     vec!["name", "stats.level", "stats.hp", "mvpExp"]
/// );
/// ```
#[proc_macro_derive(Seekable, attributes(seek))]
pub fn seekable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    seeker::seekable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
