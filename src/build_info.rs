//! Compile-time build information, reported by `--version` and `/api/health`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string: `emperor-rank <version> <date> (<commit>)`.
pub fn version_line() -> String {
    format!("emperor-rank {BUILD_VERSION} {BUILD_DATE} ({BUILD_COMMIT})")
}
