//! Configuration section definitions.
//!
//! Each module corresponds to a section in `permaroute.toml`:
//!
//! | Module   | TOML Section | Purpose                                 |
//! |----------|--------------|-----------------------------------------|
//! | `site`   | `[site]`     | Base URL and mount subdirectory         |
//! | `routes` | `[routes]`   | Path bases, legacy permalink, edit link |
//! | `feed`   | `[feed]`     | Feed generator string and ttl           |

mod feed;
mod routes;
mod site;

pub use feed::FeedConfig;
pub use routes::RoutesConfig;
pub use site::SiteConfig;
