//! Headless browser page fetcher for JavaScript-heavy sites.
//!
//! Launches an isolated Chromium instance per fetch with stealth
//! configuration, navigates under a hard timeout, and hands back the
//! rendered document. Browser resources are scoped to a single fetch and
//! released deterministically on every exit path.

pub mod error;
pub mod fetcher;
pub mod fingerprint;

pub use error::{BrowserError, Result};
pub use fetcher::{PageFetcher, RenderedPage};
pub use fingerprint::FingerprintConfig;
