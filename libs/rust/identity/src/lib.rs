//! Identity provider integration for secret-portal.
//!
//! Provides on-demand access-token acquisition, scoped per requested
//! permission string, and the profile-graph client used to show the
//! signed-in user's profile.

pub mod credential;
pub mod error;
pub mod graph;

pub use credential::{AccessToken, ClientSecretCredential, StaticTokenCredential, TokenCredential};
pub use error::{IdentityError, IdentityResult};
pub use graph::{GraphClient, GraphConfig, UserProfile};
