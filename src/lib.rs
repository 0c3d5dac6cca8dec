//! Core backend for an interactive wildlife-observation globe.
//!
//! The crate glues three public services together behind one session type:
//! a biodiversity API for species and observation data, a Wikipedia-style
//! encyclopedia for summaries, and an optional translation service. A
//! presentation layer (native or web) drives [`ExplorerSession`] with user
//! actions and renders the [`ViewUpdate`] each action resolves to.
//!
//! ```no_run
//! use faunaglobe::{ExplorerSession, GlobeConfig, ViewUpdate};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let session = ExplorerSession::new(GlobeConfig::default())?;
//! match session.globe_click(41.4, 2.2, None).await {
//!     ViewUpdate::Area { records, .. } => println!("{} species nearby", records.len()),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod logging;
pub mod module;
pub mod session;

pub use config::GlobeConfig;
pub use error::FetchError;
pub use geo::{GeoPoint, SelectionPolygon};
pub use module::view::{CameraFocus, DisplayRecord, ViewUpdate, detail_focus};
pub use session::{ExplorerSession, SearchMode, SearchRequest};
