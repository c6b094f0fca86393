//! Voice-assisted inventory lookup for warehouse staff.
//!
//! Operators log in against a credential table, then ask where a stock item
//! is stored, how many units are on hand, or when it will be restocked.
//! Queries are typed or spoken; spoken queries are captured from the default
//! microphone and transcribed locally (Whisper) or by a remote endpoint.

pub mod app;
pub mod audio;
pub mod config;
pub mod desk;
pub mod query;
pub mod session;
pub mod speech;
pub mod store;
pub mod stt;
