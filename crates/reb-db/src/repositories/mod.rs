pub mod activity_repo;
pub mod favorite_repo;
pub mod listing_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use favorite_repo::FavoriteRepo;
pub use listing_repo::ListingRepo;
pub use user_repo::UserRepo;
