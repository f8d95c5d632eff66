//! Reference comparators for rendered grid cells.
//!
//! A sorted page is checked by comparing the text of adjacent cells, so
//! every comparator here works on `&str`. Each one must agree with how the
//! engine orders the underlying values once they are rendered.

use std::cmp::Ordering;
use std::sync::Arc;

use rathena_search::collate;

/// A shareable comparator over cell text.
pub type CompareFn = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Wraps a closure as a [`CompareFn`].
pub fn compare_fn<C>(cmp: C) -> CompareFn
where
    C: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
{
    Arc::new(cmp)
}

/// Reverses a comparator by swapping its arguments.
///
/// `invert_compare_fn(cmp)(a, b) == cmp(b, a)`. Swapping keeps ties equal,
/// so a stable order stays valid in both directions.
///
/// ```
/// use std::cmp::Ordering;
/// use rathena_search_test::{compare_numeric, invert_compare_fn};
///
/// let desc = invert_compare_fn(compare_numeric());
/// assert_eq!(desc("1", "2"), Ordering::Greater);
/// assert_eq!(desc("2", "2"), Ordering::Equal);
/// ```
pub fn invert_compare_fn(cmp: CompareFn) -> CompareFn {
    compare_fn(move |a, b| cmp(b, a))
}

/// Locale-aware text order, the same collation the engine sorts with.
pub fn compare_strings() -> CompareFn {
    compare_fn(collate)
}

/// Numeric order of cell text. Cells that are not numbers sort first.
pub fn compare_numeric() -> CompareFn {
    compare_fn(|a, b| numeric(a, b))
}

/// Numeric order of cells rendered with `,` thousands separators.
pub fn compare_thousands() -> CompareFn {
    compare_fn(|a, b| numeric(&a.replace(',', ""), &b.replace(',', "")))
}

/// Applies `cmp` to the lowercased text.
pub fn ignore_case(cmp: CompareFn) -> CompareFn {
    compare_fn(move |a, b| cmp(&a.to_lowercase(), &b.to_lowercase()))
}

/// Applies `cmp` to a key extracted from each cell.
///
/// ```
/// use rathena_search_test::{by_key, compare_strings, trim_slots};
///
/// let by_name = by_key(|cell| trim_slots(cell).to_string(), compare_strings());
/// assert!(by_name("Knife [3]", "Main Gauche [4]").is_lt());
/// ```
pub fn by_key<K>(key: K, cmp: CompareFn) -> CompareFn
where
    K: Fn(&str) -> String + Send + Sync + 'static,
{
    compare_fn(move |a, b| cmp(&key(a), &key(b)))
}

/// Strips a slot count suffix: `"Knife [3]"` becomes `"Knife"`.
///
/// Everything from the first `[n]` on is dropped, along with the whitespace
/// before it. Text without one is returned unchanged.
pub fn trim_slots(cell: &str) -> &str {
    let mut from = 0;
    while let Some(found) = cell[from..].find('[') {
        let open = from + found;
        let rest = &cell[open + 1..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && rest.as_bytes().get(digits) == Some(&b']') {
            return cell[..open].trim_end();
        }
        from = open + 1;
    }
    cell
}

fn numeric(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}
