//! The page abstraction generated tests drive.

use rathena_search::Dir;

/// A list page the search contract can be run against.
///
/// A driver stands for one loaded page: a grid of rows with an id each,
/// a pager, sortable columns and whatever filter inputs the page has.
/// Implementations may render a real UI or wrap an in-memory model.
pub trait SearchPageDriver {
    /// Error raised when the page cannot perform an action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Blocks until the grid shows the result of the last action.
    fn wait_for_page_ready(&mut self) -> Result<(), Self::Error>;

    /// Ids of the rows currently shown, top to bottom.
    fn row_ids(&mut self) -> Result<Vec<String>, Self::Error>;

    /// Moves to the next page.
    fn next_page(&mut self) -> Result<(), Self::Error>;

    /// Makes `column` the single active sort.
    fn sort_grid_by(&mut self, column: &str, dir: Dir) -> Result<(), Self::Error>;

    /// Rendered text of every cell in `column`, top to bottom.
    fn column_cells(&mut self, column: &str) -> Result<Vec<String>, Self::Error>;
}
