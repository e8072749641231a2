// Components module - reusable UI building blocks
//
// Shell components are rendered in every view:
// - Title bar: app name, tabs, user, activity spinner
// - Status bar: dashboard counters and key hints
// - Toast: the controller's current alert
//
// Cards are shared by the Products and Sheets views.

pub mod cards;
pub mod formatters;
pub mod status_bar;
pub mod title_bar;
pub mod toast;
