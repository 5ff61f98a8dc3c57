//! Fixed values shared by the rewriting pipeline.

/// Location reported to the catalog in place of the caller's own.
pub mod fake_location {
    pub const COUNTRY: &str = "Austria";
    pub const ISO_CODE: &str = "AT";
    pub const TIMEZONE: &str = "Europe/Vienna";
    /// Replacement for the first two components of a dotted IPv4 address.
    pub const IP_REGION: [u8; 2] = [137, 208];
}

/// Catalog route prefixes, relative to the page origin.
pub mod route {
    pub const USER_LOCATION: &str = "/api/v1/accounts/users/location";
    pub const RELEASES: &str = "/api/v1/anime/releases/";
    pub const RELEASES_LATEST: &str = "/api/v1/anime/releases/latest";
    pub const RELEASES_RANDOM: &str = "/api/v1/anime/releases/random";
    pub const EPISODES: &str = "/api/v1/anime/releases/episodes/";
}

pub const DEFAULT_ORIGIN: &str = "https://anilibria.top";
pub const RELAY_ENDPOINT: &str = "https://api.allorigins.win/get?url=";
pub const SPOOFED_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36 OPR/117.0.0.0";
