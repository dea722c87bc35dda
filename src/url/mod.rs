//! URL handling module for Channel-Sweep
//!
//! This module turns channel references into listing URLs and derives the
//! platform endpoints the crawler talks to.

mod channel;

pub use channel::{
    browse_endpoint, listing_url, origin_of, parse_platform_root, resolve_channel_root, video_url,
};
