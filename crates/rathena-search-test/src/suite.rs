//! Generates the standard search page tests for one list page.
//!
//! Every list page gets the same three kinds of tests:
//!
//! - `can paginate`: the next page only shows rows the first page did not.
//! - `can search by/<name>`: typing into a filter input yields rows that
//!   satisfy the search's own check.
//! - `can sort by/<column>/asc|desc`: after sorting, the column is ordered by
//!   the column's comparator, or by its inversion for `desc`.
//!
//! Each test opens a fresh page, so tests are independent and can run in
//! parallel.

use std::sync::Arc;

use libtest_mimic::{Failed, Trial};
use rathena_search::Dir;

use crate::assert::should_be_sorted_by;
use crate::compare::{invert_compare_fn, CompareFn};
use crate::driver::SearchPageDriver;
use crate::error::ContractFailure;

type PageFactory<D> = Arc<dyn Fn() -> Result<D, ContractFailure> + Send + Sync>;
type Step<D> = Arc<dyn Fn(&mut D) -> Result<(), ContractFailure> + Send + Sync>;
type Check = Box<dyn FnOnce() -> Result<(), ContractFailure> + Send>;

/// One named search: how to fill the filter form and how to judge the rows.
pub struct SearchCase<D> {
    input: Step<D>,
    verify: Step<D>,
}

impl<D> Clone for SearchCase<D> {
    fn clone(&self) -> Self {
        SearchCase {
            input: Arc::clone(&self.input),
            verify: Arc::clone(&self.verify),
        }
    }
}

/// Builder for the tests of one search page.
///
/// ```ignore
/// let tests = SearchPageTests::new(|| open_item_page())
///     .search("name", |page| page.type_into("Name", "potion"), |page| {
///         expect_column(page, "Name", icontains("potion"))
///     })
///     .sort("Weight", compare_numeric());
///
/// let args = libtest_mimic::Arguments::from_args();
/// libtest_mimic::run(&args, tests.trials("item search")).exit();
/// ```
pub struct SearchPageTests<D> {
    goto_page: PageFactory<D>,
    searches: Vec<(String, SearchCase<D>)>,
    sorts: Vec<(String, CompareFn)>,
}

impl<D> SearchPageTests<D>
where
    D: SearchPageDriver + 'static,
{
    /// Starts a suite whose tests each open a page with `goto_page`.
    pub fn new<G>(goto_page: G) -> Self
    where
        G: Fn() -> Result<D, ContractFailure> + Send + Sync + 'static,
    {
        SearchPageTests {
            goto_page: Arc::new(goto_page),
            searches: Vec::new(),
            sorts: Vec::new(),
        }
    }

    /// Adds a search test.
    pub fn search<I, V>(mut self, name: impl Into<String>, input: I, verify: V) -> Self
    where
        I: Fn(&mut D) -> Result<(), ContractFailure> + Send + Sync + 'static,
        V: Fn(&mut D) -> Result<(), ContractFailure> + Send + Sync + 'static,
    {
        let case = SearchCase {
            input: Arc::new(input),
            verify: Arc::new(verify),
        };
        self.searches.push((name.into(), case));
        self
    }

    /// Adds ascending and descending sort tests for `column`.
    pub fn sort(mut self, column: impl Into<String>, cmp: CompareFn) -> Self {
        self.sorts.push((column.into(), cmp));
        self
    }

    /// Names of the tests this suite generates, in order.
    pub fn test_names(&self, prefix: &str) -> Vec<String> {
        self.checks(prefix).into_iter().map(|(name, _)| name).collect()
    }

    /// The suite as libtest-mimic trials.
    pub fn trials(&self, prefix: &str) -> Vec<Trial> {
        self.checks(prefix)
            .into_iter()
            .map(|(name, check)| Trial::test(name, move || check().map_err(Failed::from)))
            .collect()
    }

    /// Runs every test in this thread and returns each outcome by name.
    pub fn run_all(&self, prefix: &str) -> Vec<(String, Result<(), ContractFailure>)> {
        self.checks(prefix)
            .into_iter()
            .map(|(name, check)| (name, check()))
            .collect()
    }

    fn checks(&self, prefix: &str) -> Vec<(String, Check)> {
        let mut checks: Vec<(String, Check)> = Vec::new();

        let goto = Arc::clone(&self.goto_page);
        checks.push((
            test_name(prefix, "can paginate"),
            Box::new(move || check_pagination(&mut open(&goto)?)),
        ));

        for (name, case) in &self.searches {
            let goto = Arc::clone(&self.goto_page);
            let case = case.clone();
            checks.push((
                test_name(prefix, &format!("can search by/{name}")),
                Box::new(move || check_search(&mut open(&goto)?, &case)),
            ));
        }

        for (column, cmp) in &self.sorts {
            for dir in [Dir::Asc, Dir::Desc] {
                let goto = Arc::clone(&self.goto_page);
                let column = column.clone();
                let cmp = Arc::clone(cmp);
                checks.push((
                    test_name(prefix, &format!("can sort by/{column}/{dir}")),
                    Box::new(move || check_sort(&mut open(&goto)?, &column, dir, &cmp)),
                ));
            }
        }

        checks
    }
}

fn test_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

fn open<D: SearchPageDriver>(goto: &PageFactory<D>) -> Result<D, ContractFailure> {
    let mut page = goto()?;
    page.wait_for_page_ready().map_err(ContractFailure::driver)?;
    Ok(page)
}

/// The next page only shows rows that were not on the current page.
pub fn check_pagination<D: SearchPageDriver>(page: &mut D) -> Result<(), ContractFailure> {
    let before = page.row_ids().map_err(ContractFailure::driver)?;
    page.next_page().map_err(ContractFailure::driver)?;
    page.wait_for_page_ready().map_err(ContractFailure::driver)?;
    let after = page.row_ids().map_err(ContractFailure::driver)?;

    let repeated: Vec<String> = after
        .into_iter()
        .filter(|id| before.contains(id))
        .collect();
    if repeated.is_empty() {
        Ok(())
    } else {
        Err(ContractFailure::PageOverlap { repeated })
    }
}

/// Fills the filter form, waits, then verifies the rows.
pub fn check_search<D: SearchPageDriver>(
    page: &mut D,
    case: &SearchCase<D>,
) -> Result<(), ContractFailure> {
    (case.input)(page)?;
    page.wait_for_page_ready().map_err(ContractFailure::driver)?;
    (case.verify)(page)
}

/// Sorts by `column` and checks the column against `cmp` (inverted for
/// `desc`).
pub fn check_sort<D: SearchPageDriver>(
    page: &mut D,
    column: &str,
    dir: Dir,
    cmp: &CompareFn,
) -> Result<(), ContractFailure> {
    page.sort_grid_by(column, dir).map_err(ContractFailure::driver)?;
    page.wait_for_page_ready().map_err(ContractFailure::driver)?;
    let cells = page.column_cells(column).map_err(ContractFailure::driver)?;

    match dir {
        Dir::Asc => should_be_sorted_by(column, &cells, cmp),
        Dir::Desc => should_be_sorted_by(column, &cells, &invert_compare_fn(Arc::clone(cmp))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{column_contains, expect_column, find_row_by_id, icontains};
    use crate::compare::{compare_numeric, compare_strings};
    use std::io;

    const PAGE_SIZE: usize = 3;

    #[derive(Clone)]
    struct Row {
        id: u32,
        name: &'static str,
        weight: u32,
    }

    const ROWS: &[Row] = &[
        Row { id: 501, name: "Red Potion", weight: 7 },
        Row { id: 502, name: "Orange Potion", weight: 10 },
        Row { id: 1101, name: "Sword", weight: 500 },
        Row { id: 1201, name: "Knife", weight: 400 },
        Row { id: 503, name: "Yellow Potion", weight: 13 },
        Row { id: 1250, name: "Jur", weight: 1200 },
        Row { id: 909, name: "Jellopy", weight: 1 },
    ];

    #[derive(Default, Clone, Copy)]
    struct Bugs {
        pager_stuck: bool,
        ignores_desc: bool,
    }

    struct FakeGrid {
        name_filter: String,
        sort: Option<(String, Dir)>,
        page: usize,
        bugs: Bugs,
    }

    impl FakeGrid {
        fn new(bugs: Bugs) -> Self {
            FakeGrid {
                name_filter: String::new(),
                sort: None,
                page: 0,
                bugs,
            }
        }

        fn visible(&self) -> Vec<Row> {
            let mut rows: Vec<Row> = ROWS
                .iter()
                .filter(|r| r.name.to_lowercase().contains(&self.name_filter.to_lowercase()))
                .cloned()
                .collect();
            if let Some((column, dir)) = &self.sort {
                rows.sort_by(|a, b| {
                    let ordering = match column.as_str() {
                        "Weight" => a.weight.cmp(&b.weight),
                        _ => rathena_search::collate(a.name, b.name),
                    };
                    if self.bugs.ignores_desc {
                        ordering
                    } else {
                        dir.apply(ordering)
                    }
                });
            }
            rows.into_iter().skip(self.page * PAGE_SIZE).take(PAGE_SIZE).collect()
        }
    }

    impl SearchPageDriver for FakeGrid {
        type Error = io::Error;

        fn wait_for_page_ready(&mut self) -> Result<(), io::Error> {
            Ok(())
        }

        fn row_ids(&mut self) -> Result<Vec<String>, io::Error> {
            Ok(self.visible().iter().map(|r| r.id.to_string()).collect())
        }

        fn next_page(&mut self) -> Result<(), io::Error> {
            if !self.bugs.pager_stuck {
                self.page += 1;
            }
            Ok(())
        }

        fn sort_grid_by(&mut self, column: &str, dir: Dir) -> Result<(), io::Error> {
            self.sort = Some((column.to_string(), dir));
            self.page = 0;
            Ok(())
        }

        fn column_cells(&mut self, column: &str) -> Result<Vec<String>, io::Error> {
            let rows = self.visible();
            match column {
                "Name" => Ok(rows.iter().map(|r| r.name.to_string()).collect()),
                "Weight" => Ok(rows.iter().map(|r| r.weight.to_string()).collect()),
                other => Err(io::Error::new(io::ErrorKind::NotFound, format!("no column {other}"))),
            }
        }
    }

    fn suite(bugs: Bugs) -> SearchPageTests<FakeGrid> {
        SearchPageTests::new(move || Ok(FakeGrid::new(bugs)))
            .search(
                "name",
                |page: &mut FakeGrid| {
                    page.name_filter = "potion".into();
                    Ok(())
                },
                |page: &mut FakeGrid| expect_column(page, "Name", icontains("potion")),
            )
            .search(
                "id",
                |page: &mut FakeGrid| {
                    page.name_filter = "jur".into();
                    Ok(())
                },
                |page: &mut FakeGrid| find_row_by_id(page, "1250"),
            )
            .sort("Name", compare_strings())
            .sort("Weight", compare_numeric())
    }

    fn failures(results: Vec<(String, Result<(), ContractFailure>)>) -> Vec<String> {
        results
            .into_iter()
            .filter_map(|(name, result)| result.err().map(|_| name))
            .collect()
    }

    #[test]
    fn names_follow_the_suite_layout() {
        assert_eq!(
            suite(Bugs::default()).test_names("item search"),
            vec![
                "item search/can paginate",
                "item search/can search by/name",
                "item search/can search by/id",
                "item search/can sort by/Name/asc",
                "item search/can sort by/Name/desc",
                "item search/can sort by/Weight/asc",
                "item search/can sort by/Weight/desc",
            ]
        );
        assert_eq!(suite(Bugs::default()).test_names("")[0], "can paginate");
        assert_eq!(suite(Bugs::default()).trials("x").len(), 7);
    }

    #[test]
    fn a_correct_page_passes_everything() {
        assert!(failures(suite(Bugs::default()).run_all("")).is_empty());
    }

    #[test]
    fn a_stuck_pager_fails_pagination_only() {
        let bugs = Bugs { pager_stuck: true, ..Bugs::default() };
        assert_eq!(failures(suite(bugs).run_all("")), vec!["can paginate"]);
    }

    #[test]
    fn ignoring_desc_fails_desc_sorts() {
        let bugs = Bugs { ignores_desc: true, ..Bugs::default() };
        assert_eq!(
            failures(suite(bugs).run_all("")),
            vec!["can sort by/Name/desc", "can sort by/Weight/desc"]
        );
    }

    #[test]
    fn driver_errors_surface_as_failures() {
        let tests = SearchPageTests::new(|| Ok(FakeGrid::new(Bugs::default())))
            .sort("Atk", compare_numeric());
        let results = tests.run_all("");

        let (_, outcome) = &results[1];
        assert!(matches!(outcome, Err(ContractFailure::Driver(_))));
    }

    #[test]
    fn search_verification_failures_are_reported() {
        let tests = SearchPageTests::new(|| Ok(FakeGrid::new(Bugs::default()))).search(
            "wrong expectation",
            |_: &mut FakeGrid| Ok(()),
            |page: &mut FakeGrid| column_contains(page, "Name", "Mjolnir"),
        );

        let results = tests.run_all("");
        assert!(matches!(
            results[1].1,
            Err(ContractFailure::CellNotFound { .. })
        ));
    }
}
