//! Grid monitoring demo: topology store, cascading-failure simulator,
//! map loader fallback and simulated transformer diagnostics.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
/// Grid topology, built-in dataset and cascade simulator.
pub mod grid;
pub mod handoff;
pub mod ingest;
/// CSV export and import.
pub mod io;
pub mod logging;
/// Map fallback, projection, tiles and SVG rendering.
pub mod map;
pub mod netinfo;
pub mod qr;
pub mod routes;
#[cfg(feature = "tui")]
pub mod tui;
