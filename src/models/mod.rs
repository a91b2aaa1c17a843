// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{LikeEdge, MatchEdge, UserPair, UserProfile, UserRef};
pub use requests::LikeRequest;
pub use responses::{
    DeleteUserResponse, ErrorResponse, HealthResponse, LikeResponse, RelationResponse,
    UnlikeResponse,
};
