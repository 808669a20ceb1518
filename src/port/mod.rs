//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌───────────────────────────┐
//!                 │  Application (editor,     │
//!   CLI ─────────▶│  player, transfer)        │
//!                 └─────────────┬─────────────┘
//!                               │ EventStore
//!              ┌────────────────┼────────────────┐
//!              ▼                ▼                ▼
//!        ┌──────────┐    ┌────────────┐    ┌──────────┐
//!        │  Remote  │◀───│  Fallback  │───▶│  Local   │
//!        └──────────┘    └────────────┘    └──────────┘
//! ```

pub mod outbound;

pub use outbound::store::EventStore;
