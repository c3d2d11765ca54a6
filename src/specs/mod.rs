// src/specs/mod.rs
//! # Result “specs” module
//!
//! Each module here knows how to read the winning combination out of one kind of input and
//! nothing else. They are pure functions over text: no network, no cache, no store.
//!
//! ## What lives here
//! - `tulotero` – the upstream results page. The data sits in an inline script as a
//!   JSON object; the parser finds the script, cuts the object out and picks the entry
//!   for the requested date (or a sensible fallback).
//! - `pasted` – a results block pasted by hand. No structure, so a heuristic: the last
//!   run of seven small numbers, plus an optional `Bote` amount.
//!
//! ## What does **not** live here
//! - **Fetching and caching** – `fetch::TuLoteroSource` does the GET, `proxy` owns the cache.
//! - **Settlement** – callers hand the numbers to `store::Store::record_results`.
//!
//! ## Conventions
//! - Case-insensitive tag detection via `core::html`; no DOM.
//! - Anything malformed yields `None`; a debug line says why.
//! - Parsers are tested offline against small inline fixtures.
pub mod pasted;
pub mod tulotero;
