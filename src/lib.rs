//! Cascade Publisher - publishes a content item together with everything it
//! references, so a page never goes live linking to an unpublished fragment.
//!
//! The algorithm lives in [`cascade`]; [`cms`] and [`notify`] talk to the
//! outside world and [`api`] exposes the HTTP trigger surfaces.

pub mod api;
pub mod cascade;
pub mod cms;
pub mod config;
pub mod models;
pub mod notify;
