#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Once;

use brrtpath::{build_document, Document};

/// Fixture specs shipped in both YAML and JSON under `tests/fixtures`.
pub const FIXTURES: [&str; 5] = ["petstore", "fund", "balance_platform", "codat", "binlookup"];

/// A URL that no fixture declares.
pub const UNKNOWN_URL: &str = "http://example.com/test/dhhdhd";

/// One real request URL per fixture that declares servers.
pub const KNOWN_URLS: [(&str, &str, &str); 4] = [
    (
        "fund",
        "https://cal-test.adyen.com/cal/services/Fund/v6/accountHolderBalance",
        "/accountHolderBalance",
    ),
    (
        "balance_platform",
        "https://balanceplatform-api-test.adyen.com/btl/v3/transactions/djdchffdjdjrjjrk",
        "/transactions/{id}",
    ),
    (
        "codat",
        "https://api.codat.io/companies/sjsjjsjs/connections/isdjidikdkkd/data/accountTransactions",
        "/companies/{companyId}/connections/{connectionId}/data/accountTransactions",
    ),
    (
        "binlookup",
        "https://pal-test.adyen.com/pal/servlet/BinLookup/v54/get3dsAvailability",
        "/get3dsAvailability",
    ),
];

static TRACING_INIT: Once = Once::new();

/// Route crate logs through the test writer; `RUST_LOG=brrtpath=debug` to see them.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Load `tests/fixtures/<name>.<ext>` through the public loader.
pub fn load_fixture(name: &str, ext: &str) -> Document {
    init_tracing();
    build_document(PathBuf::from(format!("{name}.{ext}")), Some(fixtures_dir().as_path()))
        .unwrap_or_else(|e| panic!("failed to load fixture {name}.{ext}: {e}"))
}

/// Read a fixture as an untyped JSON value.
pub fn fixture_value(name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(fixtures_dir().join(format!("{name}.json")))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}.json: {e}"));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("invalid fixture {name}.json: {e}"))
}
