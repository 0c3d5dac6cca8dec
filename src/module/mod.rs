///! Service modules
///!
///! Each submodule owns one external surface: `inat` the biodiversity API,
///! `wiki` the encyclopedia, `translate` the optional translation service.
///! `view` turns their answers into display-ready records.

pub mod inat;
pub mod translate;
pub mod view;
pub mod wiki;
