use reldb::Db;
use std::sync::Once;

static INIT: Once = Once::new();

/// Wire tracing into the test harness once per process; `RUST_LOG` selects
/// verbosity.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fully seeded shop database.
pub fn seeded() -> Db {
    init_tracing();
    reldb_shop_fixtures::seeded_db().expect("shop fixtures should seed")
}
