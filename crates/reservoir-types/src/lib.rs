//! Shared type definitions for the Reservoir resource economy.
//!
//! This crate is the single source of truth for the data exchanged between
//! the economy engine, the persistence layer, and the host. Types defined
//! here flow downstream to `TypeScript` via `ts-rs` for the panel UI.
//!
//! # Modules
//!
//! - [`ids`] -- Character identity
//! - [`enums`] -- Selectors (tier, routing, method, pool) and warning levels
//! - [`structs`] -- Per-character and shared state, operation results

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    CapacityTier, ExtractionMethod, ParseSelectorError, Pool, RoutingPolicy, WarningLevel,
};
pub use ids::CharacterId;
pub use structs::{
    CharacterState, Extraction, MAX_LEVEL, MIN_LEVEL, OperationOutcome, OverflowWarning, Progress,
    Sale, SharedPools, Transfer,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the panel UI.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        let _ = crate::ids::CharacterId::export_all();

        let _ = crate::enums::CapacityTier::export_all();
        let _ = crate::enums::Pool::export_all();
        let _ = crate::enums::RoutingPolicy::export_all();
        let _ = crate::enums::ExtractionMethod::export_all();
        let _ = crate::enums::WarningLevel::export_all();

        let _ = crate::structs::CharacterState::export_all();
        let _ = crate::structs::SharedPools::export_all();
        let _ = crate::structs::OverflowWarning::export_all();
        let _ = crate::structs::Extraction::export_all();
        let _ = crate::structs::Transfer::export_all();
        let _ = crate::structs::Sale::export_all();
        let _ = crate::structs::Progress::export_all();
        let _ = crate::structs::OperationOutcome::export_all();
    }
}
