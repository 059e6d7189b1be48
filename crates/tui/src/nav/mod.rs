//! Client-side navigation.
//!
//! - [`catalog`]: static per-role menu tables.
//! - [`NavigationController`]: builds the role's menu into a [`MenuView`],
//!   routes activations to a [`ContentSurface`], records the page in a
//!   [`LocationFragment`] and tracks the responsive sidebar.
//! - [`compute_breadcrumb`] and [`apply_layout`]: pure derivations used by
//!   the controller and directly by the CLI.
//!
//! Nothing here renders. The ratatui shell reads the view-model types
//! ([`MenuViewModel`], [`Breadcrumb`], [`LayoutFlags`]) and draws them.

pub mod breadcrumb;
pub mod catalog;
pub mod controller;
pub mod layout;
pub mod sinks;
pub mod view_model;

pub use breadcrumb::{Breadcrumb, BreadcrumbCrumb, HOME_LABEL_KEY, compute_breadcrumb};
pub use catalog::menu_for;
pub use controller::{NavigationController, NavigationState};
pub use layout::{Backdrop, LayoutFlags, SidebarState, ViewportClass, apply_layout};
pub use sinks::{ContentFrame, ContentSurface, HistoryFragment, LocationFragment, MenuView, SidebarView};
pub use view_model::{MenuRow, MenuViewModel};

/// Controller wired to the shell's own sinks.
pub type ShellNavigation = NavigationController<SidebarView, ContentFrame, HistoryFragment>;
