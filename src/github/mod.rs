// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the source-hosting API seam (page transport + pagination)
// role: github/namespace
// outputs: PageSource implementations and the generic fetch-all-pages primitive
// invariants: Pages are fetched strictly sequentially; one request in flight at a time
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod pagination;
