//! # Core Application Logic
//!
//! This module contains Lectern's business logic.
//! It knows nothing about any specific UI technology or network.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • layout (pure render) │
//!                    │                         │
//!                    │  No UI. No network.     │
//!                    └───────────┬─────────────┘
//!                                │ Effects
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │   bible    │
//!           │  Adapter   │──── runs ───▶│ fetch and  │
//!           │ (ratatui)  │              │   cache    │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`layout`] / [`text`]: verse text to display lines
//! - [`scroll`]: verse number ↔ line offset
//! - [`reference`]: "John 3:16" → book/chapter/verses
//! - [`miller`] / [`window`]: the drill-down picker and list windowing
//! - [`config`] / [`settings`]: startup configuration and the saved session

pub mod action;
pub mod config;
pub mod layout;
pub mod miller;
pub mod reference;
pub mod scroll;
pub mod settings;
pub mod state;
pub mod text;
pub mod theme;
pub mod window;
