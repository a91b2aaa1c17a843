// Service exports
pub mod directory;
pub mod identity;
pub mod memory;
pub mod postgres;
pub mod relationships;
pub mod store;

pub use directory::{DirectoryError, UserDirectory};
pub use identity::{Claims, CurrentUserProvider, JwtUserProvider};
pub use memory::MemoryStore;
pub use postgres::PostgresClient;
pub use relationships::{
    DeletedRelations, LikeOutcome, RelationshipError, RelationshipService, UnlikeOutcome,
};
pub use store::{RelationshipStore, StoreError};
