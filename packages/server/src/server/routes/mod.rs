// HTTP routes
pub mod graphql;
pub mod health;
pub mod media;

pub use graphql::*;
pub use health::*;
pub use media::*;
