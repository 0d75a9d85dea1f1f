//! Rate-limited blocking client for the Hacker News public API.
//!
//! ```no_run
//! use hn_client::{Config, HnClient, Mode};
//!
//! let client = HnClient::new(&Config::default())?;
//! for id in client.get_top_stories()?.into_iter().take(3) {
//!     let story = client.item(id)?;
//!     println!("{}", story.title.unwrap_or_default());
//! }
//! let raw = client.get_item(8863, Mode::Raw)?;
//! # let _ = raw;
//! # Ok::<(), hn_client::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod limiter;
pub mod types;

pub use client::HnClient;
pub use config::Config;
pub use error::{Error, Result};
pub use limiter::RateLimiter;
pub use types::{IntoItemId, Item, ItemId, ItemKind, Mode, Payload, Updates, User};
