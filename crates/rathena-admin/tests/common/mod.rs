//! Shared setup: one runtime and one service over the fixture snapshot.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use rathena_admin::entity::DEFAULT_TRADE_SCALE;
use rathena_admin::{EntityKind, GridPage, SearchService, SnapshotRepository};
use rathena_search::SearchConfig;
use rathena_search_test::ContractFailure;
use tokio::runtime::Runtime;

pub const SNAPSHOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json");

struct Fixture {
    runtime: Runtime,
    service: Arc<SearchService>,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("test runtime");
        let repository = Arc::new(SnapshotRepository::open(SNAPSHOT, DEFAULT_TRADE_SCALE));
        let service = Arc::new(SearchService::new(repository, &SearchConfig::default()));
        Fixture { runtime, service }
    })
}

pub fn service() -> Arc<SearchService> {
    Arc::clone(&fixture().service)
}

/// Opens a fresh list page of `kind`.
pub fn open(kind: EntityKind, page_size: usize) -> Result<GridPage, ContractFailure> {
    let fixture = fixture();
    GridPage::open(
        Arc::clone(&fixture.service),
        fixture.runtime.handle().clone(),
        kind,
        page_size,
    )
    .map_err(ContractFailure::driver)
}

/// Types into a form input.
pub fn fill(page: &mut GridPage, label: &str, text: &str) -> Result<(), ContractFailure> {
    page.fill(label, text).map_err(ContractFailure::driver)
}
