pub mod error;
pub mod extract;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod dealers;
    pub mod health;
    pub mod reviews;
}

pub use error::ApiError;
pub use router::{app, create_router, ApiDoc};
pub use types::AppState;
