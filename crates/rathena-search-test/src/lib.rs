//! # rathena-search-test - the search page contract
//!
//! Every list page of the admin tool supports the same things: paging,
//! filtering through form inputs and sorting by column. This crate turns
//! that into generated tests so each page only declares what is specific
//! to it.
//!
//! A page is anything implementing [`SearchPageDriver`]. A suite is built
//! with [`SearchPageTests`] and run through `libtest-mimic`, one trial per
//! check:
//!
//! ```ignore
//! use rathena_search_test::*;
//!
//! fn main() {
//!     let tests = SearchPageTests::new(open_map_page)
//!         .search("id", |p| p.fill("Id", "prontera"), |p| find_row_by_id(p, "prontera"))
//!         .sort("Name", compare_strings());
//!
//!     let args = libtest_mimic::Arguments::from_args();
//!     libtest_mimic::run(&args, tests.trials("map search")).exit();
//! }
//! ```
//!
//! ## Comparators
//!
//! Sorted columns are checked cell by cell with a [`CompareFn`]. Descending
//! checks use [`invert_compare_fn`], which swaps the arguments of the
//! ascending comparator rather than negating its result.
//!
//! | Comparator | Cells |
//! |------------|-------|
//! | [`compare_strings`] | text, collated like the engine |
//! | [`compare_numeric`] | plain numbers |
//! | [`compare_thousands`] | numbers with `,` separators |
//! | [`ignore_case`], [`by_key`] | adapters over another comparator |

mod assert;
mod compare;
mod driver;
mod error;
mod suite;

pub use assert::{
    column_contains, expect_column, find_row_by_id, icontains, numeric_between,
    should_be_sorted_by,
};
pub use compare::{
    by_key, compare_fn, compare_numeric, compare_strings, compare_thousands, ignore_case,
    invert_compare_fn, trim_slots, CompareFn,
};
pub use driver::SearchPageDriver;
pub use error::ContractFailure;
pub use suite::{check_pagination, check_search, check_sort, SearchCase, SearchPageTests};

pub use libtest_mimic;
pub use rathena_search::Dir;
