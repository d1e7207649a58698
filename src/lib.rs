// SPDX-License-Identifier: MIT

//! Scholarly: student productivity backend.
//!
//! This crate provides the backend API for the Scholarly app: accounts,
//! student profiles, task tracking, study targets, pomodoro accounting,
//! statistics and the AI study assistant, all persisted in a single
//! per-user Firestore document.

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use routes::pomodoro::PomodoroRegistry;
use services::{AssistantClient, IdentityClient, QuoteClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityClient,
    pub assistant: AssistantClient,
    pub quotes: QuoteClient,
    /// Per-user pomodoro timers, advanced lazily on each request.
    pub pomodoros: PomodoroRegistry,
}
