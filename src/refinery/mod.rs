// * The Refinery: extraction rules and parsers that turn rendered page
// * state into identifiers and metadata. Pure functions only; everything
// * network-bound lives behind the rendering surface.

pub mod duration;
pub mod listing;
pub mod player;

pub use duration::parse_iso_duration;
pub use listing::{thumbnail_url, video_id_from_href, watch_url, ListingHit};
pub use player::{parse_watch_page, PlayerProbe, WatchPageFallback, PLAYER_PROBE_JS};
