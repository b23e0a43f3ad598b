//! `tenantnav-nav`: the navigation-projection engine.
//!
//! Turns session, tenant, route, form and locale signals into one immutable
//! `NavigationView`:
//!
//! - `tenant`: which tenant is active and which URL prefix follows from it
//! - `route`: which section is highlighted for the current path
//! - `locale`: selected language and its propagation
//! - `store`: the reducer that holds the latest inputs and recomputes the view
//! - `controller`: the mounted runtime wiring bus, provider, storage and services

pub mod controller;
pub mod event;
pub mod locale;
pub mod route;
pub mod store;
pub mod tenant;
pub mod view;

pub use controller::{NavigationController, NavigationServices};
pub use event::{Inbound, LocaleUpdate, NavEvent};
pub use locale::{LocaleSelection, LocaleSinks, LocaleSynchronizer};
pub use route::{RouteLocation, Section, is_active};
pub use store::{Applied, ProjectionState, SessionProjectionStore};
pub use tenant::{
    FormContext, TenantContext, TenantOrigin, TenantResolution, TenantSource, resolve_tenant,
};
pub use view::{NavItem, NavigationView, ProjectionInputs, project};
