//! Site assembly and page rendering for docsite.
//!
//! [`Site`] ties the pieces together: it builds the sidebar from the
//! configured folders, renders each document through the container processor
//! and markdown renderer, and lays the result out as a complete HTML page with
//! head tags, build constants, analytics, navbar and sidebar.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docsite_config::Config;
//! use docsite_site::Site;
//!
//! let config = Config::load(None, None)?;
//! let site = Site::load(&config)?;
//! let report = site.build(&config.build_resolved.out_dir)?;
//! assert!(report.warnings.is_empty());
//! # Ok(())
//! # }
//! ```

mod layout;
mod site;

pub use site::{BuildReport, Page, Site, SiteError};
