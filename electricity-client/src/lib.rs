pub mod db;
pub mod domain;
pub mod serde_formats;
