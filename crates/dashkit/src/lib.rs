#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Dashkit
//!
//! View-state building blocks for record dashboards (brokers, sales, listings,
//! tasks, goals).
//!
//! Dashkit provides:
//! - **record** - Field access over JSON objects and maps
//! - **filter** - Search, status and date-range filtering with stable sorting
//! - **paginator** - 1-based pagination over a derived collection
//! - **numeric** - Bounded numeric control with debounced commits
//! - **debounce** - Cancelable quiet-period timer
//! - **key** - Key binding definitions and matching
//! - **message** / **command** - Messages and deferred commands that drive controls
//!
//! ## Example
//!
//! ```rust
//! use dashkit::prelude::*;
//! use serde_json::json;
//!
//! let tasks = vec![
//!     json!({ "title": "Call seller", "status": "todo" }),
//!     json!({ "title": "Stage open house", "status": "done" }),
//!     json!({ "title": "Call lender", "status": "todo" }),
//! ];
//!
//! let mut view = FilterView::new(tasks, ["title"]);
//! view.set_search_value("call");
//! view.set_selected_status("todo");
//!
//! let visible = view.filtered_data();
//! let mut paginator = Paginator::new().per_page(1);
//! let page = paginator.paginate(&visible);
//! assert_eq!(page.total_pages, 2);
//! assert_eq!(page.items[0]["title"], "Call seller");
//! ```

pub mod command;
pub mod debounce;
pub mod filter;
pub mod key;
pub mod message;
pub mod numeric;
pub mod paginator;
pub mod record;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::command::{Cmd, tick};
    pub use crate::debounce::{DebounceMsg, Debouncer};
    pub use crate::filter::{
        ALL_STATUSES, FilterState, FilterView, SortDirection, SortDirective, status_counts,
    };
    pub use crate::key::{Binding, matches};
    pub use crate::message::{BlurMsg, FocusMsg, KeyMsg, Message};
    pub use crate::numeric::{NumericControl, Phase, StepPolicy};
    pub use crate::paginator::{Page, Paginator, Type as PaginatorType};
    pub use crate::record::{FieldValue, Record};
}
