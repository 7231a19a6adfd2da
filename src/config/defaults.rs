//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn name() -> String {
        "CAVOTA".into()
    }

    pub fn url() -> String {
        crate::amp::DEFAULT_ORIGIN.into()
    }

    pub fn logo() -> String {
        "/favicon.png".into()
    }

    pub fn default_image() -> String {
        "/images/og-default.jpg".into()
    }
}

// ============================================================================
// [cms] Section Defaults
// ============================================================================

pub mod cms {
    use std::path::PathBuf;

    pub fn url() -> String {
        "http://localhost:1337".into()
    }

    pub fn token() -> Option<String> {
        None
    }

    pub fn fixtures() -> Option<PathBuf> {
        None
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        3000
    }

    pub fn cache_ttl() -> u64 {
        300
    }
}
