// ABOUTME: Library module for dynamodb-migrator
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod interactive;
pub mod store;
