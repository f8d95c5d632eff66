//! Search page suite for the monster list, sorting on nested stat paths.

mod common;

use common::{fill, open};
use rathena_admin::EntityKind;
use rathena_search_test::libtest_mimic::{self, Arguments};
use rathena_search_test::{
    compare_numeric, compare_strings, compare_thousands, expect_column, find_row_by_id, icontains,
    numeric_between, SearchPageTests,
};

fn main() {
    let tests = SearchPageTests::new(|| open(EntityKind::Monster, 3))
        .search(
            "id",
            |page| fill(page, "ID", "1039"),
            |page| find_row_by_id(page, "1039"),
        )
        .search(
            "name",
            |page| fill(page, "Name", "PORING"),
            |page| expect_column(page, "Name", icontains("poring")),
        )
        .search(
            "race",
            |page| fill(page, "Race", "Demon"),
            |page| expect_column(page, "Race", icontains("demon")),
        )
        .search(
            "level",
            |page| {
                fill(page, "Level (min)", "60")?;
                fill(page, "Level (max)", "90")
            },
            |page| expect_column(page, "Level", numeric_between(60.0, 90.0)),
        )
        .sort("Name", compare_strings())
        .sort("Level", compare_numeric())
        .sort("HP", compare_thousands())
        .sort("Base Exp", compare_thousands());

    let args = Arguments::from_args();
    libtest_mimic::run(&args, tests.trials("monster search")).exit();
}
