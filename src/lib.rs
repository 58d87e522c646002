// src/lib.rs

//! sitedex: crawl a web site and publish its pages to a search index.

pub mod crawl;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod storage;
