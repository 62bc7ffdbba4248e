//! Core types and storage for the reason syntax index.
//!
//! Provides the normalized node model ([`ast::AstNode`]), the persisted
//! index document ([`index::SyntaxIndex`]), JSON persistence, and
//! configuration.

pub mod ast;
pub mod config;
pub mod index;
pub mod schema;
pub mod storage;
