//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit UI interaction logs (ticker changes, button presses).
    pub print_ui_interactions: bool,
    /// Emit every engine state transition.
    pub print_state_transitions: bool,
    /// Emit request URLs and row counts from market data providers.
    pub print_provider_requests: bool,
    /// Emit scaler fits (min/max/scale) during pipeline preparation.
    pub print_scaler_fits: bool,
    /// Emit details of UI state serialization/deserialization.
    pub print_state_serde: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_ui_interactions: true,
    print_state_transitions: false,
    print_provider_requests: false,
    print_scaler_fits: false,
    print_state_serde: false,
};
