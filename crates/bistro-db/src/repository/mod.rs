//! # Repository Module
//!
//! Database repository implementations for Bistro.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route handler / OrderSubmitter                                        │
//! │       │                                                                 │
//! │       │  db.orders().insert(&order)                                    │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── insert(&self, order)                                              │
//! │  ├── get_by_number(&self, number)                                      │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`OrderRepository`](order::OrderRepository) - Insert-only order log
//! - [`MenuRepository`](menu::MenuRepository) - Menu catalog
//! - [`RestaurantConfigRepository`](config::RestaurantConfigRepository) - Name, pricing, branding

pub mod config;
pub mod menu;
pub mod order;
