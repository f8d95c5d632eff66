//! Assertions over what a page shows.

use std::cmp::Ordering;

use crate::compare::CompareFn;
use crate::driver::SearchPageDriver;
use crate::error::ContractFailure;

/// Checks that `cells` never decrease under `cmp`.
///
/// Equal neighbours are fine; the first pair that compares `Greater` is
/// reported.
pub fn should_be_sorted_by(
    column: &str,
    cells: &[String],
    cmp: &CompareFn,
) -> Result<(), ContractFailure> {
    match cells
        .windows(2)
        .position(|pair| cmp(&pair[0], &pair[1]) == Ordering::Greater)
    {
        Some(row) => Err(ContractFailure::NotSorted {
            column: column.to_string(),
            row: row + 1,
            previous: cells[row].clone(),
            next: cells[row + 1].clone(),
        }),
        None => Ok(()),
    }
}

/// Checks that the column has rows and every cell satisfies `predicate`.
pub fn expect_column<D, P>(page: &mut D, column: &str, predicate: P) -> Result<(), ContractFailure>
where
    D: SearchPageDriver,
    P: Fn(&str) -> bool,
{
    let cells = page.column_cells(column).map_err(ContractFailure::driver)?;
    if cells.is_empty() {
        return Err(ContractFailure::EmptyColumn {
            column: column.to_string(),
        });
    }
    match cells.iter().position(|cell| !predicate(cell)) {
        Some(row) => Err(ContractFailure::UnexpectedCell {
            column: column.to_string(),
            row,
            value: cells[row].clone(),
        }),
        None => Ok(()),
    }
}

/// Checks that some cell of the column contains `needle`, ignoring case.
pub fn column_contains<D>(page: &mut D, column: &str, needle: &str) -> Result<(), ContractFailure>
where
    D: SearchPageDriver,
{
    let cells = page.column_cells(column).map_err(ContractFailure::driver)?;
    let lowered = needle.to_lowercase();
    if cells.iter().any(|cell| cell.to_lowercase().contains(&lowered)) {
        Ok(())
    } else {
        Err(ContractFailure::CellNotFound {
            column: column.to_string(),
            needle: needle.to_string(),
        })
    }
}

/// Checks that a row with `id` is shown.
pub fn find_row_by_id<D>(page: &mut D, id: &str) -> Result<(), ContractFailure>
where
    D: SearchPageDriver,
{
    let ids = page.row_ids().map_err(ContractFailure::driver)?;
    if ids.iter().any(|row| row == id) {
        Ok(())
    } else {
        Err(ContractFailure::RowNotFound { id: id.to_string() })
    }
}

/// Predicate matching cells that contain `needle`, ignoring case.
pub fn icontains(needle: &str) -> impl Fn(&str) -> bool {
    let needle = needle.to_lowercase();
    move |cell: &str| cell.to_lowercase().contains(&needle)
}

/// Predicate matching numeric cells within `min..=max`.
///
/// `,` thousands separators are ignored.
pub fn numeric_between(min: f64, max: f64) -> impl Fn(&str) -> bool {
    move |cell: &str| {
        cell.replace(',', "")
            .trim()
            .parse::<f64>()
            .map_or(false, |n| n >= min && n <= max)
    }
}
