// Declarative profiles for the built-in portals
pub mod base;

pub mod airlevel;
pub mod pm25in;
pub mod pm25in_api;
pub mod pm25s;

pub use base::{SourceProfile, StationKey};

/// Profiles compiled into the binary.
pub fn builtin_profiles() -> Vec<SourceProfile> {
    vec![
        airlevel::profile(),
        pm25in::profile(),
        pm25s::profile(),
        pm25in_api::profile(),
    ]
}
