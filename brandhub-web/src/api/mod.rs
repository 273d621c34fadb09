//! HTTP API handlers for brandhub-web

pub mod assets;
pub mod auth;
pub mod billing;
pub mod brands;
pub mod buildinfo;
pub mod forms;
pub mod guard;
pub mod health;
pub mod launches;
pub mod style_check;

pub use assets::{delete_asset, download_asset, list_assets, upload_asset};
pub use auth::{require_caller, CallerId, USER_ID_HEADER};
pub use billing::{get_pricing, get_subscription_status};
pub use brands::{create_brand, delete_brand, get_brand, list_brands, update_brand};
pub use buildinfo::{get_build_info, BuildInfo};
pub use guard::{launch_calendar_guard, style_checker_guard};
pub use health::health_routes;
pub use launches::{create_launch, delete_launch, get_calendar, list_launches, update_launch};
pub use style_check::check_style;
