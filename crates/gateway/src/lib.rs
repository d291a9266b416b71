//! Clients for the external services the API talks to over HTTP: the hosted
//! checkout gateway that collects contest payments, and the identity provider
//! that verifies bearer tokens. Both sit behind traits so handlers can be
//! tested against in-process fakes.

pub mod checkout;
pub mod client;
pub mod identity;

pub use checkout::{
    CheckoutGateway, CheckoutSession, CreateSessionRequest, CreatedSession, GatewayError,
    LineItem, SessionPaymentStatus,
};
pub use client::HttpCheckoutGateway;
pub use identity::{AuthError, HttpIdentityProvider, IdentityProvider, VerifiedIdentity};
