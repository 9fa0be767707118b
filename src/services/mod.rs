//! Service layer for the feed client.
//!
//! This module contains the business logic for:
//! - Fallback-chain request delivery (`FallbackResolver`)
//! - Static snapshot loading (`MockLoader`)
//! - Posts/rankings reads and post creation (`FeedApi`)

mod feed;
mod mock;
mod resolver;
pub mod transport;

pub use feed::{DataSource, FeedApi, Loaded};
pub use mock::{MOCK_PREFIX, MockLoader, MockSource};
pub use resolver::{FallbackResolver, ResolvedResponse};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
