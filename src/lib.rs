// Infrastructure layer (shared components)
pub mod config;
pub mod error;

// Domain layer (business logic)
pub mod generator;
pub mod lexicon;
pub mod posts;
pub mod template;

// Application layer
pub mod dispatcher;
pub mod platform;
