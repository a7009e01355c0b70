//! Callback: reliable HTTP POST delivery
//!
//! A library for POSTing an arbitrary payload (raw bytes, text, or any
//! serializable value) to a caller-supplied URL, retrying transient network
//! failures with exponential backoff, and letting the caller observe or
//! replace the underlying transport.
//!
//! ```no_run
//! use callback::{Callback, context::Context};
//!
//! # async fn example() -> Result<(), callback::CallbackError> {
//! let mut cb = Callback::new("  https://example.com/callback  ")
//!     .with_payload(serde_json::json!({"a": 12, "b": {"aa": "bb"}}));
//!
//! let response = cb.dispatch(&Context::background()).await?;
//! assert_eq!(cb.url(), "https://example.com/callback");
//! println!("{}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod config;
pub mod context;
pub mod payload;
pub mod time;
pub mod transport;


pub use callback::{Callback, CallbackError};
pub use payload::Payload;
