//! ORKG - the statement graph of the Open Research Knowledge Graph.
//!
//! Research content (papers, contributions, comparisons, literature lists)
//! is stored as statements over resources, literals, predicates and classes.
//! This crate provides the graph store, the breadth-first subgraph fetcher,
//! the cascade planner that deletes a root together with the subgraph only it
//! owns, the benchmark aggregations, and a CLI over all of them.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod aggregate;
pub mod cascade;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod id_generation;
pub mod services;
pub mod storage;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

// Application context and output formatting for the CLI
pub mod app;
pub mod output;
