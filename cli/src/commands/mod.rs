//! Command handlers, one module per domain.

pub(crate) mod download;
pub(crate) mod history;
pub(crate) mod llm;
pub(crate) mod relist;
pub(crate) mod scan;
pub(crate) mod sites;
