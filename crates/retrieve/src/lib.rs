//! Retriever (C8): turns an analyzed query plan into a ranked retrieval
//! context, dispatching on intent to pick a search strategy.

mod excerpt;
mod ranker;
mod strategy;

pub use strategy::retrieve;
