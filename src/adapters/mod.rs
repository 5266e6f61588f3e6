//! Site adapters, one per job board.
//!
//! Every adapter turns a board's listing page (or API response) into
//! normalized [`ListingRecord`](crate::listing::ListingRecord)s. The shared
//! flow lives in [`listing_page`]; board modules only know their selectors.

pub mod builtin;
pub mod dribbble;
pub mod justremote;
pub mod listing_page;
pub mod normalize;
pub mod productjobsanywhere;
pub mod realworkfromanywhere;
pub mod registry;
pub mod remote4africa;
pub mod remote_rocketship;
pub mod traits;
pub mod up2staff;
pub mod weworkremotely;

use std::sync::LazyLock;

pub use listing_page::{ItemReader, ListingBoard, PageAdapter, PageLayout, RawListing};
pub use registry::AdapterRegistry;
pub use traits::{ExtractContext, SiteAdapter, SourceHandle};

/// Global adapter registry with every supported board.
pub static ADAPTERS: LazyLock<AdapterRegistry> = LazyLock::new(|| {
    let mut registry = AdapterRegistry::new();

    registry.register(Box::new(PageAdapter::new(dribbble::Dribbble::new())));
    registry.register(Box::new(remote_rocketship::RemoteRocketship::new()));
    registry.register(Box::new(PageAdapter::new(builtin::BuiltIn::new())));
    registry.register(Box::new(up2staff::Up2Staff::new()));
    registry.register(Box::new(PageAdapter::new(
        weworkremotely::WeWorkRemotely::new(),
    )));
    registry.register(Box::new(PageAdapter::new(justremote::JustRemote::new())));
    registry.register(Box::new(PageAdapter::new(
        remote4africa::Remote4Africa::new(),
    )));
    registry.register(Box::new(PageAdapter::new(
        realworkfromanywhere::RealWorkFromAnywhere::new(),
    )));
    registry.register(Box::new(PageAdapter::new(
        productjobsanywhere::ProductJobsAnywhere::new(),
    )));

    registry
});
