//! Newsletter subscribe relay.
//!
//! Accepts `POST /api/subscribe` with `{email, firstName?}` and forwards it
//! to the Beehiiv subscriptions API. Failures here are reported to the
//! caller and never affect the tax engine.

mod config;
mod provider;
mod relay;
mod server;

pub use config::{API_KEY_ENV, PUBLICATION_ID_ENV, RelayConfig};
pub use provider::{
    BeehiivProvider, BeehiivSubscription, CustomField, NewsletterProvider, ProviderResponse,
    RelayError,
};
pub use relay::{RelayResponse, SubscribeRelay, SubscribeRequest};
pub use server::{SUBSCRIBE_PATH, router, serve};
