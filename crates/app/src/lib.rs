//! App shell state for the WrapTrack customer app.
//!
//! Navigation, static content and the tracking screen view model. The
//! progress tracker itself knows nothing about any of this.

#![warn(missing_docs)]

pub mod navigation;
pub mod content;
pub mod view;

pub use navigation::{AuthScreen, Location, NavigationError, Navigator, Screen};
pub use content::{search_faqs, ContactEntry, ContactKind, Disclosure, Faq, CONTACTS, FAQS};
pub use view::{progress_bar, status_marker, StepCard, TrackingView};
