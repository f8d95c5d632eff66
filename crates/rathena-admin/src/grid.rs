//! The list page model.
//!
//! A [`GridPage`] is what a list page of the admin tool holds: a filter form,
//! one active sort, a pager and the rows of the current page rendered as
//! text. Every change marks the page stale; the next read reloads it through
//! [`SearchService::search_json`], exactly as the browser would.

use std::borrow::Cow;
use std::sync::Arc;

use rathena_search::{json_field_value, Dir, Value};
use rathena_search_test::SearchPageDriver;
use serde_json::{json, Map, Value as Json};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::debug;

use crate::entity::{
    Item, ItemDrop, MapInfo, Monster, MonsterSpawn, Mvp, Skill, VendorItem, Warp,
};
use crate::service::{EntityKind, SearchService, ServiceError};

/// Path of the row id in every entity.
const ROW_ID: &str = "id";

#[derive(Debug, Error)]
pub enum GridError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{kind} grid has no column '{column}'")]
    UnknownColumn { kind: EntityKind, column: String },

    #[error("{kind} search form has no input '{label}'")]
    UnknownInput { kind: EntityKind, label: String },

    #[error("input '{label}' does not accept {value:?}")]
    InvalidInput { label: String, value: String },

    #[error("malformed search result: {0}")]
    MalformedResult(String),
}

/// How a column renders its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// Strings as is, numbers the way JSON writes them.
    Text,
    /// Numbers with `,` thousands separators.
    Thousands,
    /// A name followed by ` [n]` when the slot count at the given path is
    /// positive.
    NameWithSlots(&'static str),
}

/// A grid column bound to an entity path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub path: &'static str,
    pub format: CellFormat,
}

impl Column {
    const fn new(title: &'static str, path: &'static str, format: CellFormat) -> Self {
        Column {
            title,
            path,
            format,
        }
    }

    /// Renders this column's cell of `row`.
    pub fn render(&self, row: &Json) -> String {
        let value = json_field_value(row, self.path);
        match self.format {
            CellFormat::Text => display(&value),
            CellFormat::Thousands => value
                .as_number()
                .map(|n| format_thousands(&n.to_string()))
                .unwrap_or_default(),
            CellFormat::NameWithSlots(slots) => {
                let name = display(&value);
                match json_field_value(row, slots).as_f64() {
                    Some(count) if count > 0.0 => format!("{name} [{count}]"),
                    _ => name,
                }
            }
        }
    }
}

/// What a form input writes into the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A number.
    Number,
    /// A case-insensitive `{"contains": text}` match.
    Match,
    /// A case-insensitive `{"equals": text}` match.
    Exact,
    /// Plain text the field must contain.
    Contains,
    /// Adds an option to a multi-select.
    Select,
    /// Lower bound of a `{min, max}` range.
    Min,
    /// Upper bound of a `{min, max}` range.
    Max,
}

/// A labelled input of a search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormInput {
    pub label: &'static str,
    pub key: &'static str,
    pub kind: InputKind,
}

impl FormInput {
    const fn new(label: &'static str, key: &'static str, kind: InputKind) -> Self {
        FormInput { label, key, kind }
    }
}

/// Columns and form inputs of one list page.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub columns: &'static [Column],
    pub inputs: &'static [FormInput],
}

impl GridLayout {
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Item => GridLayout { columns: ITEM_COLUMNS, inputs: ITEM_INPUTS },
            EntityKind::Monster => GridLayout { columns: MONSTER_COLUMNS, inputs: MONSTER_INPUTS },
            EntityKind::Map => GridLayout { columns: MAP_COLUMNS, inputs: MAP_INPUTS },
            EntityKind::Drop => GridLayout { columns: DROP_COLUMNS, inputs: DROP_INPUTS },
            EntityKind::Spawn => GridLayout { columns: SPAWN_COLUMNS, inputs: SPAWN_INPUTS },
            EntityKind::Mvp => GridLayout { columns: MVP_COLUMNS, inputs: MVP_INPUTS },
            EntityKind::Warp => GridLayout { columns: WARP_COLUMNS, inputs: WARP_INPUTS },
            EntityKind::Vendor => GridLayout { columns: VENDOR_COLUMNS, inputs: VENDOR_INPUTS },
            EntityKind::Skill => GridLayout { columns: SKILL_COLUMNS, inputs: SKILL_INPUTS },
        }
    }

    pub fn column(&self, title: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.title == title)
    }

    pub fn input(&self, label: &str) -> Option<&'static FormInput> {
        self.inputs.iter().find(|i| i.label == label)
    }
}

use CellFormat::{NameWithSlots, Text, Thousands};
use InputKind::{Contains, Exact, Match, Max, Min, Select};

const ITEM_COLUMNS: &[Column] = &[
    Column::new("Name", Item::NAME, NameWithSlots(Item::SLOTS)),
    Column::new("Sell Value", Item::SELL, Thousands),
    Column::new("Weight", Item::WEIGHT, Text),
    Column::new("Atk", Item::ATTACK, Text),
    Column::new("MAtk", Item::MAGIC_ATTACK, Text),
    Column::new("Def", Item::DEFENSE, Text),
    Column::new("Min Level", Item::EQUIP_LEVEL_MIN, Text),
    Column::new("Max Level", Item::EQUIP_LEVEL_MAX, Text),
    Column::new("Slots", Item::SLOTS, Text),
];

const ITEM_INPUTS: &[FormInput] = &[
    FormInput::new("ID", "id", InputKind::Number),
    FormInput::new("Name", "name", Match),
    FormInput::new("Type", "types", Select),
    FormInput::new("Sub Type", "subTypes", Select),
    FormInput::new("Class", "classes", Select),
    FormInput::new("Job", "jobs", Select),
    FormInput::new("Element", "elements", Select),
    FormInput::new("Status", "statuses", Select),
    FormInput::new("Race", "races", Select),
    FormInput::new("Description contains", "description", Contains),
    FormInput::new("Script contains", "script", Contains),
    FormInput::new("Slots (min)", "slots", Min),
    FormInput::new("Slots (max)", "slots", Max),
    FormInput::new("Sell Value (min)", "sell", Min),
    FormInput::new("Sell Value (max)", "sell", Max),
];

const MONSTER_COLUMNS: &[Column] = &[
    Column::new("Name", Monster::NAME, Text),
    Column::new("Level", "stats.level", Text),
    Column::new("Race", Monster::RACE, Text),
    Column::new("Element", Monster::ELEMENT, Text),
    Column::new("Size", Monster::SIZE, Text),
    Column::new("HP", "stats.hp", Thousands),
    Column::new("Base Exp", "stats.baseExp", Thousands),
    Column::new("Job Exp", "stats.jobExp", Thousands),
];

const MONSTER_INPUTS: &[FormInput] = &[
    FormInput::new("ID", "id", InputKind::Number),
    FormInput::new("Name", "name", Match),
    FormInput::new("Race", "races", Select),
    FormInput::new("Element", "elements", Select),
    FormInput::new("Size", "sizes", Select),
    FormInput::new("Level (min)", "level", Min),
    FormInput::new("Level (max)", "level", Max),
];

const MAP_COLUMNS: &[Column] = &[
    Column::new("Name", MapInfo::NAME, Text),
    Column::new("id", MapInfo::ID, Text),
];

const MAP_INPUTS: &[FormInput] = &[
    FormInput::new("ID", "id", Match),
    FormInput::new("Name", "name", Match),
];

const DROP_COLUMNS: &[Column] = &[
    Column::new("Item", ItemDrop::ITEM_NAME, NameWithSlots(ItemDrop::SLOTS)),
    Column::new("Monster", ItemDrop::MONSTER_NAME, Text),
    Column::new("Rate", ItemDrop::RATE, Text),
];

const DROP_INPUTS: &[FormInput] = &[
    FormInput::new("Item ID", "itemId", InputKind::Number),
    FormInput::new("Monster ID", "monsterId", InputKind::Number),
    FormInput::new("Item", "itemName", Match),
    FormInput::new("Monster", "monsterName", Match),
];

const SPAWN_COLUMNS: &[Column] = &[
    Column::new("Name", MonsterSpawn::NAME, Text),
    Column::new("Map", MonsterSpawn::MAP, Text),
    Column::new("Amount", MonsterSpawn::AMOUNT, Text),
    Column::new("Spawn Delay", MonsterSpawn::SPAWN_DELAY, Thousands),
    Column::new("Spawn Window", MonsterSpawn::SPAWN_WINDOW, Thousands),
];

const SPAWN_INPUTS: &[FormInput] = &[
    FormInput::new("Map", "map", Exact),
    FormInput::new("Monster ID", "monsterId", InputKind::Number),
    FormInput::new("Name", "name", Match),
];

const MVP_COLUMNS: &[Column] = &[
    Column::new("Name", Mvp::NAME, Text),
    Column::new("Map", Mvp::MAP_NAME, Text),
    Column::new("Spawn Delay", Mvp::SPAWN_DELAY, Thousands),
    Column::new("Spawn Window", Mvp::SPAWN_WINDOW, Thousands),
];

const MVP_INPUTS: &[FormInput] = &[
    FormInput::new("Monster ID", "monsterId", InputKind::Number),
    FormInput::new("Name", "name", Match),
    FormInput::new("Map", "mapId", Match),
];

const WARP_COLUMNS: &[Column] = &[
    Column::new("Source", Warp::FROM_MAP, Text),
    Column::new("Destination", Warp::TO_MAP, Text),
    Column::new("X", Warp::TO_X, Text),
    Column::new("Y", Warp::TO_Y, Text),
];

const WARP_INPUTS: &[FormInput] = &[
    FormInput::new("Map", "fromMap", Exact),
    FormInput::new("Destination", "toMap", Match),
];

const VENDOR_COLUMNS: &[Column] = &[
    Column::new("Shop", VendorItem::VENDOR, Text),
    Column::new("Map", VendorItem::MAP, Text),
    Column::new("Item", VendorItem::NAME, Text),
    Column::new("Price", VendorItem::PRICE, Thousands),
    Column::new("Amount", VendorItem::AMOUNT, Text),
];

const VENDOR_INPUTS: &[FormInput] = &[
    FormInput::new("Item ID", "itemId", InputKind::Number),
    FormInput::new("Shop", "vendor", Match),
    FormInput::new("Map", "map", Match),
    FormInput::new("Item", "name", Match),
    FormInput::new("Price (min)", "price", Min),
    FormInput::new("Price (max)", "price", Max),
];

const SKILL_COLUMNS: &[Column] = &[
    Column::new("Name", Skill::NAME, Text),
    Column::new("Aegis Name", Skill::AEGIS_NAME, Text),
    Column::new("Max Level", Skill::MAX_LEVEL, Text),
];

const SKILL_INPUTS: &[FormInput] = &[
    FormInput::new("ID", "id", InputKind::Number),
    FormInput::new("Name", "name", Match),
];

/// One open list page.
pub struct GridPage {
    service: Arc<SearchService>,
    runtime: Handle,
    kind: EntityKind,
    layout: GridLayout,
    page_size: usize,
    page_index: usize,
    filter: Map<String, Json>,
    sort: Option<(&'static str, Dir)>,
    rows: Vec<Json>,
    total: usize,
    stale: bool,
}

impl GridPage {
    /// Opens the first page of `kind` and loads it.
    ///
    /// `runtime` drives the searches; it must not be the runtime of the
    /// calling thread.
    pub fn open(
        service: Arc<SearchService>,
        runtime: Handle,
        kind: EntityKind,
        page_size: usize,
    ) -> Result<Self, GridError> {
        let mut page = GridPage {
            service,
            runtime,
            kind,
            layout: GridLayout::of(kind),
            page_size: page_size.max(1),
            page_index: 0,
            filter: Map::new(),
            sort: None,
            rows: Vec::new(),
            total: 0,
            stale: true,
        };
        page.ensure_ready()?;
        Ok(page)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Matches across all pages, as of the last load.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Filter the form currently sends.
    pub fn filter(&self) -> &Map<String, Json> {
        &self.filter
    }

    /// Types `text` into the input labelled `label`.
    ///
    /// Empty text clears the input. On a multi-select, `text` is added to
    /// the selection and empty text clears the selection. Any change returns
    /// the grid to its first page.
    pub fn fill(&mut self, label: &str, text: &str) -> Result<(), GridError> {
        let input = self.layout.input(label).ok_or_else(|| GridError::UnknownInput {
            kind: self.kind,
            label: label.to_string(),
        })?;
        let text = text.trim();
        let invalid = || GridError::InvalidInput {
            label: label.to_string(),
            value: text.to_string(),
        };

        match input.kind {
            _ if text.is_empty() => self.clear_input(input),
            InputKind::Number => {
                let number = parse_number(text).ok_or_else(invalid)?;
                self.filter.insert(input.key.to_string(), number);
            }
            Match => {
                self.filter
                    .insert(input.key.to_string(), json!({ "contains": text }));
            }
            Exact => {
                self.filter
                    .insert(input.key.to_string(), json!({ "equals": text }));
            }
            Contains => {
                self.filter
                    .insert(input.key.to_string(), Json::String(text.to_string()));
            }
            Select => {
                let selection = self
                    .filter
                    .entry(input.key)
                    .or_insert_with(|| Json::Array(Vec::new()));
                if let Json::Array(options) = selection {
                    if !options.iter().any(|o| o == text) {
                        options.push(Json::String(text.to_string()));
                    }
                }
            }
            Min | Max => {
                let number = parse_number(text).ok_or_else(invalid)?;
                let range = self
                    .filter
                    .entry(input.key)
                    .or_insert_with(|| Json::Object(Map::new()));
                if let Json::Object(bounds) = range {
                    bounds.insert(bound_key(input.kind).to_string(), number);
                }
            }
        }

        self.filter_changed();
        Ok(())
    }

    /// Fills the `"{label} (min)"` and `"{label} (max)"` inputs.
    pub fn slide(&mut self, label: &str, min: f64, max: f64) -> Result<(), GridError> {
        self.fill(&format!("{label} (min)"), &min.to_string())?;
        self.fill(&format!("{label} (max)"), &max.to_string())
    }

    /// Resets the whole form.
    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.filter_changed();
    }

    /// Makes `column` the single active sort.
    pub fn sort_by(&mut self, column: &str, dir: Dir) -> Result<(), GridError> {
        let column = self.column(column)?;
        self.sort = Some((column.path, dir));
        self.stale = true;
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.stale = true;
    }

    /// Whether the pager's next button is enabled.
    pub fn has_next_page(&self) -> bool {
        (self.page_index + 1) * self.page_size < self.total
    }

    /// Moves to the next page; does nothing on the last page.
    pub fn next_page(&mut self) -> Result<(), GridError> {
        self.ensure_ready()?;
        if self.has_next_page() {
            self.page_index += 1;
            self.stale = true;
        }
        Ok(())
    }

    /// Moves to the previous page; does nothing on the first page.
    pub fn previous_page(&mut self) {
        if self.page_index > 0 {
            self.page_index -= 1;
            self.stale = true;
        }
    }

    /// Jumps to page `index`, clamped to the last page on load.
    pub fn go_to_page(&mut self, index: usize) {
        self.page_index = index.min(self.page_count());
        self.stale = true;
    }

    /// Reloads the current page if anything changed since the last load.
    pub fn ensure_ready(&mut self) -> Result<(), GridError> {
        if self.stale {
            self.reload()?;
        }
        Ok(())
    }

    /// Reloads the current page unconditionally.
    ///
    /// When the matches no longer reach the current page, the page index is
    /// clamped to the last page and that page is loaded instead.
    pub fn reload(&mut self) -> Result<(), GridError> {
        self.load()?;
        let last = self.page_count().saturating_sub(1);
        if self.page_index > last {
            debug!(kind = %self.kind, from = self.page_index, to = last, "clamping page index");
            self.page_index = last;
            self.load()?;
        }
        self.stale = false;
        Ok(())
    }

    /// The current rows as returned by the service.
    pub fn rows(&self) -> &[Json] {
        &self.rows
    }

    /// Ids of the current rows.
    pub fn ids(&self) -> Vec<String> {
        self.rows.iter().map(|row| display(&json_field_value(row, ROW_ID))).collect()
    }

    /// Rendered cells of `column` on the current page.
    pub fn cells(&self, column: &str) -> Result<Vec<String>, GridError> {
        let column = self.column(column)?;
        Ok(self.rows.iter().map(|row| column.render(row)).collect())
    }

    fn column(&self, title: &str) -> Result<&'static Column, GridError> {
        self.layout.column(title).ok_or_else(|| GridError::UnknownColumn {
            kind: self.kind,
            column: title.to_string(),
        })
    }

    fn clear_input(&mut self, input: &FormInput) {
        match input.kind {
            Min | Max => {
                let emptied = match self.filter.get_mut(input.key) {
                    Some(Json::Object(bounds)) => {
                        bounds.remove(bound_key(input.kind));
                        bounds.is_empty()
                    }
                    _ => false,
                };
                if emptied {
                    self.filter.remove(input.key);
                }
            }
            _ => {
                self.filter.remove(input.key);
            }
        }
    }

    fn filter_changed(&mut self) {
        self.page_index = 0;
        self.stale = true;
    }

    fn query(&self) -> Json {
        let mut query = Map::new();
        if !self.filter.is_empty() {
            query.insert("filter".into(), Json::Object(self.filter.clone()));
        }
        if let Some((field, dir)) = self.sort {
            query.insert("sort".into(), json!([{ "field": field, "sort": dir }]));
        }
        query.insert(
            "offset".into(),
            json!(self.page_index.saturating_mul(self.page_size)),
        );
        query.insert("limit".into(), json!(self.page_size));
        Json::Object(query)
    }

    fn load(&mut self) -> Result<(), GridError> {
        let body = self.query().to_string();
        let result = self
            .runtime
            .block_on(self.service.search_json(self.kind, &body))?;

        let total = result
            .get("total")
            .and_then(Json::as_u64)
            .ok_or_else(|| GridError::MalformedResult("missing total".into()))?;
        let rows = match result.get("entities") {
            Some(Json::Array(rows)) => rows.clone(),
            _ => return Err(GridError::MalformedResult("missing entities".into())),
        };

        self.total = usize::try_from(total)
            .map_err(|_| GridError::MalformedResult(format!("total {total} out of range")))?;
        self.rows = rows;
        Ok(())
    }
}

impl SearchPageDriver for GridPage {
    type Error = GridError;

    fn wait_for_page_ready(&mut self) -> Result<(), GridError> {
        self.ensure_ready()
    }

    fn row_ids(&mut self) -> Result<Vec<String>, GridError> {
        self.ensure_ready()?;
        Ok(self.ids())
    }

    fn next_page(&mut self) -> Result<(), GridError> {
        GridPage::next_page(self)
    }

    fn sort_grid_by(&mut self, column: &str, dir: Dir) -> Result<(), GridError> {
        self.sort_by(column, dir)
    }

    fn column_cells(&mut self, column: &str) -> Result<Vec<String>, GridError> {
        self.ensure_ready()?;
        self.cells(column)
    }
}

fn bound_key(kind: InputKind) -> &'static str {
    if kind == Min {
        "min"
    } else {
        "max"
    }
}

fn parse_number(text: &str) -> Option<Json> {
    let text = text.replace(',', "");
    if let Ok(n) = text.parse::<i64>() {
        return Some(Json::from(n));
    }
    let n = text.parse::<f64>().ok().filter(|n| n.is_finite())?;
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(Json::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map(Json::Number)
    }
}

fn display(value: &Value<'_>) -> String {
    value
        .to_display_string()
        .map(Cow::into_owned)
        .unwrap_or_default()
}

/// Groups the integer digits of a rendered number: `"12500.5"` becomes
/// `"12,500.5"`.
pub fn format_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, fraction) = match unsigned.split_once('.') {
        Some((int, fraction)) => (int, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
