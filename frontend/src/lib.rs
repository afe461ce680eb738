// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Role-based task desk client.
//!
//! Login resolves the account's role, the session keeps the identity and
//! each role gets its dashboard over the tasks REST backend.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod login;
pub mod render;
pub mod router;
pub mod session;
pub mod storage;
pub mod task_form;

#[cfg(test)]
mod testing;
