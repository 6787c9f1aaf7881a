//! Lojistas DB - PostgreSQL persistence for seller records.

pub mod repository;

pub use repository::SellerRepository;
