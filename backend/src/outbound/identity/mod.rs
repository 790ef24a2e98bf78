//! Identity provider outbound adapters.
//!
//! `HttpIdentityProvider` talks to the provider's admin REST API;
//! `IdentityLoginService` builds password sign-in on top of it.

mod dto;
mod http_provider;
mod login;

pub use http_provider::{HttpIdentityProvider, IdentityProviderConfig};
pub use login::IdentityLoginService;
