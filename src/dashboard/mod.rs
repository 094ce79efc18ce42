//! Dashboard layout and reactive controller shared by every front-end.

pub mod controller;
pub mod layout;

pub use controller::{BINDINGS, Binding, ControlChange, Controls, Dashboard, View};
pub use layout::{ControlId, DashboardLayout, Dropdown, DropdownOption};
