pub mod bank;
pub mod dictionary;
pub mod grid;
pub mod letters;
pub mod net;
pub mod room;
pub mod scoring;
pub mod settings;
pub mod validate;

/// Unique identifier for a player. Allocated by the server registry,
/// stable for the lifetime of the connection.
pub type PlayerId = u64;
