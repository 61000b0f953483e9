pub mod defs;

pub use defs::{AuditLog, DeliverySink, FeedDescriptor, FeedEntry, FeedSource, PostBatch};
